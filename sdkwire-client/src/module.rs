use crate::options::ModuleOptions;
use crate::sender::RequestSender;
use anyhow::Result;
use async_trait::async_trait;
use sdkwire_core::{RequestConfig, SdkError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Handle given to every method: the module options and the request sender
/// the generated methods use.
#[derive(Debug, Clone)]
pub struct ModuleContext {
    request_sender: RequestSender,
}

impl ModuleContext {
    pub fn options(&self) -> &ModuleOptions {
        self.request_sender.options()
    }

    pub fn request_sender(&self) -> &RequestSender {
        &self.request_sender
    }
}

/// A callable module method
#[async_trait]
pub trait Method: Send + Sync {
    async fn call(
        &self,
        context: &ModuleContext,
        params: Value,
        config: Option<RequestConfig>,
    ) -> Result<Value, SdkError>;
}

pub type MethodHandle = Arc<dyn Method>;

/// Method generated for a declared endpoint; forwards to the request sender.
#[derive(Debug, Clone)]
pub struct EndpointMethod {
    name: String,
}

impl EndpointMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Method for EndpointMethod {
    async fn call(
        &self,
        context: &ModuleContext,
        params: Value,
        config: Option<RequestConfig>,
    ) -> Result<Value, SdkError> {
        context.request_sender.send(&self.name, params, config).await
    }
}

pub struct FnMethod<F> {
    f: F,
}

impl<F> fmt::Debug for FnMethod<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMethod").finish_non_exhaustive()
    }
}

/// Build a method from an async closure, for overriding or extending a
/// module.
///
/// ```rust
/// use sdkwire_client::{method_fn, ModuleContext};
/// use serde_json::json;
///
/// let get_first = method_fn(|ctx: ModuleContext, params, config| async move {
///     let products = ctx.request_sender().send("getProducts", params, config).await?;
///     Ok(products[0].clone())
/// });
/// # let _ = get_first;
/// ```
pub fn method_fn<F, Fut>(f: F) -> FnMethod<F>
where
    F: Fn(ModuleContext, Value, Option<RequestConfig>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, SdkError>> + Send,
{
    FnMethod { f }
}

#[async_trait]
impl<F, Fut> Method for FnMethod<F>
where
    F: Fn(ModuleContext, Value, Option<RequestConfig>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, SdkError>> + Send,
{
    async fn call(
        &self,
        context: &ModuleContext,
        params: Value,
        config: Option<RequestConfig>,
    ) -> Result<Value, SdkError> {
        (self.f)(context.clone(), params, config).await
    }
}

/// One module method bound to its module context
#[derive(Clone)]
pub struct BoundMethod {
    name: String,
    method: MethodHandle,
    context: ModuleContext,
}

impl BoundMethod {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn call(&self, params: Value, config: Option<RequestConfig>) -> Result<Value, SdkError> {
        self.method.call(&self.context, params, config).await
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A built SDK module: a fixed registry of named methods.
#[derive(Clone)]
pub struct Module {
    context: ModuleContext,
    methods: Arc<HashMap<String, MethodHandle>>,
}

impl Module {
    pub fn builder(options: ModuleOptions) -> ModuleBuilder {
        ModuleBuilder::new(options)
    }

    pub fn context(&self) -> &ModuleContext {
        &self.context
    }

    pub fn request_sender(&self) -> &RequestSender {
        &self.context.request_sender
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Method names in sorted order
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn method(&self, name: &str) -> Option<BoundMethod> {
        self.methods.get(name).map(|method| BoundMethod {
            name: name.to_string(),
            method: Arc::clone(method),
            context: self.context.clone(),
        })
    }

    pub async fn call(
        &self,
        name: &str,
        params: Value,
        config: Option<RequestConfig>,
    ) -> Result<Value, SdkError> {
        let method = self
            .methods
            .get(name)
            .ok_or_else(|| SdkError::UnknownMethod(name.to_string()))?;
        method.call(&self.context, params, config).await
    }

    pub async fn call_typed<P, R>(
        &self,
        name: &str,
        params: &P,
        config: Option<RequestConfig>,
    ) -> Result<R, SdkError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let params = serde_json::to_value(params)?;
        let value = self.call(name, params, config).await?;
        Ok(serde_json::from_value(value)?)
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("api_url", &self.context.options().api_url)
            .field("methods", &self.method_names())
            .finish()
    }
}

type Extender = Box<dyn FnOnce(&ModuleContext, &Module) -> Vec<(String, MethodHandle)> + Send>;

/// Assembles a [`Module`] from declared endpoints plus user overrides and
/// extensions. All composition happens here; a built module never changes.
///
/// Order of application: endpoints, overrides, extensions, then functional
/// extensions in registration order, each seeing the module built so far.
pub struct ModuleBuilder {
    options: ModuleOptions,
    endpoints: Vec<String>,
    overrides: Vec<(String, MethodHandle)>,
    extensions: Vec<(String, MethodHandle)>,
    extenders: Vec<Extender>,
}

impl ModuleBuilder {
    pub fn new(options: ModuleOptions) -> Self {
        Self {
            options,
            endpoints: Vec::new(),
            overrides: Vec::new(),
            extensions: Vec::new(),
            extenders: Vec::new(),
        }
    }

    pub fn endpoint(mut self, name: impl Into<String>) -> Self {
        self.endpoints.push(name.into());
        self
    }

    pub fn endpoints<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints.extend(names.into_iter().map(Into::into));
        self
    }

    /// Replace the implementation of a method
    pub fn override_method(mut self, name: impl Into<String>, method: impl Method + 'static) -> Self {
        self.overrides.push((name.into(), Arc::new(method)));
        self
    }

    /// Add a method outside the declared endpoint set
    pub fn extend_method(mut self, name: impl Into<String>, method: impl Method + 'static) -> Self {
        self.extensions.push((name.into(), Arc::new(method)));
        self
    }

    /// Add methods computed from the module built so far. The returned
    /// methods may hold on to a clone of that module to call back into it.
    pub fn extend_with<F>(mut self, extender: F) -> Self
    where
        F: FnOnce(&ModuleContext, &Module) -> Vec<(String, MethodHandle)> + Send + 'static,
    {
        self.extenders.push(Box::new(extender));
        self
    }

    pub fn build(self) -> Result<Module> {
        let options = Arc::new(self.options);
        let context = ModuleContext {
            request_sender: RequestSender::new(options)?,
        };

        let mut methods: HashMap<String, MethodHandle> = HashMap::new();
        for name in self.endpoints {
            let method: MethodHandle = Arc::new(EndpointMethod::new(name.clone()));
            if methods.insert(name.clone(), method).is_some() {
                warn!("Endpoint {} declared more than once", name);
            }
        }

        for (name, method) in self.overrides {
            if methods.insert(name.clone(), method).is_none() {
                warn!("Override for {} does not replace a declared endpoint", name);
            }
        }

        for (name, method) in self.extensions {
            if methods.insert(name.clone(), method).is_some() {
                warn!("Extension {} replaces an existing method", name);
            }
        }

        for extender in self.extenders {
            let snapshot = Module {
                context: context.clone(),
                methods: Arc::new(methods.clone()),
            };
            for (name, method) in extender(&context, &snapshot) {
                if methods.insert(name.clone(), method).is_some() {
                    warn!("Extension {} replaces an existing method", name);
                }
            }
        }

        debug!(
            "Built module for {} with {} methods",
            context.options().api_url,
            methods.len()
        );

        Ok(Module {
            context,
            methods: Arc::new(methods),
        })
    }
}

impl fmt::Debug for ModuleBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleBuilder")
            .field("options", &self.options)
            .field("endpoints", &self.endpoints)
            .field("overrides", &self.overrides.len())
            .field("extensions", &self.extensions.len())
            .field("extenders", &self.extenders.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdkwire_core::EffectiveConfig;
    use sdkwire_transport::transport_fn;
    use serde_json::json;

    fn options() -> ModuleOptions {
        ModuleOptions::new("http://localhost:8181/commerce").with_http_client(transport_fn(
            |url, params, _config: EffectiveConfig| async move {
                Ok(json!({ "url": url, "params": params }))
            },
        ))
    }

    #[tokio::test]
    async fn test_generated_methods() {
        let module = Module::builder(options())
            .endpoints(["getProduct", "getProducts"])
            .build()
            .unwrap();

        assert_eq!(module.method_names(), vec!["getProduct", "getProducts"]);
        let value = module.call("getProduct", json!({"id": 1}), None).await.unwrap();
        assert_eq!(value["url"], "http://localhost:8181/commerce/getProduct");
        assert_eq!(value["params"], json!([{"id": 1}]));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let module = Module::builder(options()).endpoint("getProduct").build().unwrap();
        let err = module.call("getCart", json!({}), None).await.unwrap_err();
        assert!(matches!(err, SdkError::UnknownMethod(name) if name == "getCart"));
        assert!(module.method("getCart").is_none());
    }

    #[tokio::test]
    async fn test_bound_method() {
        let module = Module::builder(options()).endpoint("getProduct").build().unwrap();
        let get_product = module.method("getProduct").unwrap();
        assert_eq!(get_product.name(), "getProduct");

        let value = get_product.call(json!(3), None).await.unwrap();
        assert_eq!(value["params"], json!([3]));
    }

    #[test]
    fn test_debug_lists_methods() {
        let module = Module::builder(options())
            .endpoints(["b", "a"])
            .build()
            .unwrap();
        let debug = format!("{:?}", module);
        assert!(debug.contains(r#"methods: ["a", "b"]"#));
    }
}
