// Property tests for config layering, URL shaping and error classification

use sdkwire_core::{
    config::{ACCEPT, APPLICATION_JSON, CONTENT_TYPE},
    is_sdk_unauthorized_error, is_specific_sdk_http_error, join_method, merge, shape_request,
    HttpErrorMatcher, HttpMethod, RequestConfig, SdkError, SdkHttpError,
};
use serde_json::{json, Value};

// ============================================================================
// CONFIG MERGE
// ============================================================================

#[cfg(test)]
mod merge_properties {
    use super::*;
    use proptest::prelude::*;

    fn method_strategy() -> impl Strategy<Value = Option<HttpMethod>> {
        prop_oneof![
            Just(None),
            Just(Some(HttpMethod::Get)),
            Just(Some(HttpMethod::Post)),
            Just(Some(HttpMethod::Put)),
            Just(Some(HttpMethod::Delete)),
        ]
    }

    fn header_name() -> impl Strategy<Value = String> {
        "X-[A-Z][a-z]{0,6}"
    }

    fn level_strategy() -> impl Strategy<Value = RequestConfig> {
        (
            method_strategy(),
            prop::collection::btree_map(
                header_name(),
                prop::collection::vec("[a-z0-9]{1,5}", 1..4),
                0..4,
            ),
        )
            .prop_map(|(method, headers)| {
                let mut config = RequestConfig::new();
                config.method = method;
                for (name, values) in headers {
                    if values.len() == 1 {
                        config = config.with_header(name, values[0].clone());
                    } else {
                        config = config.with_header(name, values);
                    }
                }
                config
            })
    }

    proptest! {
        #[test]
        fn test_json_headers_always_present(
            default in level_strategy(),
            method in level_strategy(),
            call in level_strategy(),
        ) {
            let effective = merge(&default, &method, &call);
            prop_assert_eq!(effective.header(CONTENT_TYPE), Some(APPLICATION_JSON));
            prop_assert_eq!(effective.header(ACCEPT), Some(APPLICATION_JSON));
        }

        #[test]
        fn test_most_specific_level_wins(
            default in level_strategy(),
            method in level_strategy(),
            call in level_strategy(),
        ) {
            let effective = merge(&default, &method, &call);

            let expected_method = call.method
                .or(method.method)
                .or(default.method)
                .unwrap_or(HttpMethod::Post);
            prop_assert_eq!(effective.method, expected_method);

            for level in [&default, &method, &call] {
                for name in level.headers.keys() {
                    let winner = [&call, &method, &default]
                        .into_iter()
                        .find_map(|l| l.headers.get(name))
                        .map(|v| v.joined());
                    prop_assert_eq!(effective.header(name).map(str::to_string), winner);
                }
            }
        }

        #[test]
        fn test_multiple_values_become_one_string(
            values in prop::collection::vec("[a-z]{1,4}", 2..5),
        ) {
            let call = RequestConfig::new().with_header("X-Multi", values.clone());
            let effective = merge(&RequestConfig::new(), &RequestConfig::new(), &call);
            let joined = values.join(",");
            prop_assert_eq!(effective.header("X-Multi"), Some(joined.as_str()));
        }
    }
}

// ============================================================================
// URL SHAPING
// ============================================================================

#[cfg(test)]
mod url_properties {
    use super::*;
    use percent_encoding::percent_decode_str;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_trailing_slash_normalization_is_idempotent(
            base in "https?://[a-z]{1,8}(:[0-9]{2,4})?(/[a-z]{1,6}){0,3}",
            slashes in 1usize..6,
            method in "[a-z][A-Za-z]{0,12}",
        ) {
            let many = format!("{base}{}", "/".repeat(slashes));
            let one = format!("{base}/");
            prop_assert_eq!(join_method(&many, &method), join_method(&one, &method));
            prop_assert_eq!(join_method(&base, &method), format!("{base}/{method}"));
        }

        #[test]
        fn test_get_always_empties_params(limit in any::<i64>(), tag in "[ -~]{0,12}") {
            let params = vec![json!({"limit": limit, "tag": tag})];
            let shaped = shape_request("/api/list".to_string(), HttpMethod::Get, params.clone()).unwrap();

            prop_assert!(shaped.params.is_empty());
            let encoded = shaped.url.strip_prefix("/api/list?body=").unwrap();
            let decoded = percent_decode_str(encoded).decode_utf8().unwrap();
            let round_tripped: Vec<Value> = serde_json::from_str(&decoded).unwrap();
            prop_assert_eq!(round_tripped, params);
        }

        #[test]
        fn test_body_methods_leave_request_untouched(id in any::<u32>()) {
            for method in [HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch, HttpMethod::Delete] {
                let params = vec![json!({"id": id})];
                let shaped = shape_request("/api/update".to_string(), method, params.clone()).unwrap();
                prop_assert_eq!(shaped.url.as_str(), "/api/update");
                prop_assert_eq!(&shaped.params, &params);
            }
        }
    }
}

// ============================================================================
// ERROR CLASSIFICATION
// ============================================================================

#[cfg(test)]
mod classification_properties {
    use super::*;
    use proptest::prelude::*;

    fn error_strategy() -> impl Strategy<Value = SdkError> {
        let leaf = prop_oneof![
            (100u16..600, "[a-z ]{0,10}")
                .prop_map(|(code, msg)| SdkError::from(SdkHttpError::new(code, msg))),
            "[a-z ]{0,10}".prop_map(|msg| SdkError::custom(msg)),
            "[a-z]{1,10}".prop_map(SdkError::UnknownMethod),
        ];
        leaf.prop_recursive(3, 8, 1, |inner| {
            ("[a-z ]{0,10}", inner).prop_map(|(msg, cause)| SdkError::caused_by(msg, cause))
        })
    }

    proptest! {
        #[test]
        fn test_unauthorized_iff_specific_401(err in error_strategy()) {
            let matcher = HttpErrorMatcher::new().status_code(401);
            prop_assert_eq!(
                is_sdk_unauthorized_error(&err),
                is_specific_sdk_http_error(&err, &matcher)
            );
        }
    }
}
