use crate::module::Module;
use sdkwire_core::{RequestConfig, SdkError};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Named collection of built modules, e.g. `commerce` and `cms`.
#[derive(Debug, Clone, Default)]
pub struct Sdk {
    modules: HashMap<String, Module>,
}

impl Sdk {
    pub fn builder() -> SdkBuilder {
        SdkBuilder::default()
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn module_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Call `method` on module `module`
    pub async fn call(
        &self,
        module: &str,
        method: &str,
        params: Value,
        config: Option<RequestConfig>,
    ) -> Result<Value, SdkError> {
        let target = self
            .modules
            .get(module)
            .ok_or_else(|| SdkError::UnknownMethod(format!("{module}.{method}")))?;
        target.call(method, params, config).await
    }
}

#[derive(Debug, Default)]
pub struct SdkBuilder {
    modules: HashMap<String, Module>,
}

impl SdkBuilder {
    pub fn module(mut self, name: impl Into<String>, module: Module) -> Self {
        let name = name.into();
        if self.modules.insert(name.clone(), module).is_some() {
            warn!("Module {} registered twice, keeping the last one", name);
        }
        self
    }

    pub fn build(self) -> Sdk {
        Sdk {
            modules: self.modules,
        }
    }
}
