//! 基于类型注册表的扫描器

use di_abstractions::{in_package, TypeScanner};
use infrastructure_common::{ConfigError, TypeRegistry};
use std::sync::Arc;
use tracing::debug;

/// 注册表扫描器
///
/// 按登记顺序返回扫描包及其子包中的类型
#[derive(Debug, Clone)]
pub struct RegistryScanner {
    registry: Arc<TypeRegistry>,
}

impl RegistryScanner {
    /// 基于类型注册表创建扫描器
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }
}

impl TypeScanner for RegistryScanner {
    fn scan(&self, package: &str) -> Result<Vec<String>, ConfigError> {
        let found: Vec<String> = self
            .registry
            .iter()
            .filter(|d| in_package(d.package(), package))
            .map(|d| d.qualified_name())
            .collect();

        if found.is_empty() {
            return Err(ConfigError::ScanRootNotFound {
                package: package.to_string(),
            });
        }

        debug!("扫描包 {} 发现 {} 个类型", package, found.len());
        Ok(found)
    }

    fn name(&self) -> &str {
        "RegistryScanner"
    }
}
