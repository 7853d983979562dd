//! Declarative macro for typed module facades

/// Declare a struct wrapping a [`Module`](crate::Module) with one async
/// method per endpoint.
///
/// # Example
///
/// ```rust
/// use sdkwire_client::{sdk_module, transport_fn, ModuleOptions};
/// use serde_json::json;
///
/// sdk_module! {
///     /// Commerce endpoints
///     pub struct Commerce {
///         get_product => "getProduct",
///         get_products => "getProducts",
///     }
/// }
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let options = ModuleOptions::new("http://localhost:8181/commerce")
///     .with_http_client(transport_fn(|_, params, _| async move { Ok(json!(params)) }));
/// let commerce = Commerce::new(options)?;
/// let product = commerce.get_product(json!({ "id": 1 }), None).await?;
/// # let _ = product;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! sdk_module {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($method:ident => $endpoint:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            module: $crate::Module,
        }

        impl $name {
            pub const ENDPOINTS: &'static [&'static str] = &[$($endpoint),*];

            /// Builder preloaded with this module's endpoints, for adding
            /// overrides and extensions before building
            pub fn builder(options: $crate::ModuleOptions) -> $crate::ModuleBuilder {
                $crate::Module::builder(options).endpoints(Self::ENDPOINTS.iter().copied())
            }

            pub fn new(options: $crate::ModuleOptions) -> $crate::__private::anyhow::Result<Self> {
                Ok(Self::from_module(Self::builder(options).build()?))
            }

            pub fn from_module(module: $crate::Module) -> Self {
                Self { module }
            }

            pub fn module(&self) -> &$crate::Module {
                &self.module
            }

            $(
                pub async fn $method(
                    &self,
                    params: $crate::__private::serde_json::Value,
                    config: ::core::option::Option<$crate::RequestConfig>,
                ) -> ::core::result::Result<$crate::__private::serde_json::Value, $crate::SdkError> {
                    self.module.call($endpoint, params, config).await
                }
            )*
        }
    };
}
