use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sdkwire_core::{build_url, merge, shape_request, ExecutionContext, HttpMethod, RequestConfig};
use serde_json::json;

fn bench_config_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_merge");

    for size in [0, 4, 16, 64].iter() {
        let default = (0..*size).fold(RequestConfig::new(), |config, i| {
            config.with_header(format!("X-Default-{i}"), "value")
        });
        let method = RequestConfig::new()
            .with_method(HttpMethod::Get)
            .with_header("X-Tags", ["a", "b", "c"]);
        let call = RequestConfig::new().with_header("Authorization", "Bearer token");

        group.bench_with_input(BenchmarkId::new("headers", size), size, |b, _| {
            b.iter(|| black_box(merge(&default, &method, &call)))
        });
    }

    group.finish();
}

fn bench_request_shaping(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_shaping");

    let params = vec![json!({
        "limit": 20,
        "filters": { "category": "shoes", "sizes": [40, 41, 42] },
        "sort": "price-asc"
    })];

    for method in [HttpMethod::Post, HttpMethod::Get] {
        group.bench_with_input(
            BenchmarkId::new("shape", method.as_str()),
            &method,
            |b, &method| {
                b.iter(|| {
                    let url = build_url(
                        "http://localhost:8181/commerce///",
                        Some("http://commerce.internal/commerce"),
                        ExecutionContext::Server,
                        "getProducts",
                    );
                    black_box(shape_request(url, method, params.clone()))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_config_merge, bench_request_shaping);
criterion_main!(benches);
