//! 组件定义读取器

use di_abstractions::{BeanDefinition, TypeScanner};
use infrastructure_common::{lower_first_case, ConfigError, ContextConfig, TypeRegistry};
use std::sync::Arc;
use tracing::{debug, info};

/// 组件定义读取器
///
/// 只保留带组件或控制器标记的具体类型。每个类型产生一个具体名称的定义
/// （标记上的覆盖名称，缺省为首字母小写的简单类型名），
/// 再为每个实现的能力接口产生一个以接口全限定名注册的定义。
#[derive(Debug, Clone)]
pub struct BeanDefinitionReader {
    registry: Arc<TypeRegistry>,
    config: ContextConfig,
}

impl BeanDefinitionReader {
    /// 创建读取器
    pub fn new(registry: Arc<TypeRegistry>, config: ContextConfig) -> Self {
        Self { registry, config }
    }

    /// 扫描并生成组件定义
    pub fn load_bean_definitions(
        &self,
        scanner: &dyn TypeScanner,
    ) -> Result<Vec<BeanDefinition>, ConfigError> {
        let package = self.config.require_scan_package()?;
        let mut definitions = Vec::new();

        for type_name in scanner.scan(package)? {
            let descriptor = self
                .registry
                .get(&type_name)
                .ok_or_else(|| ConfigError::TypeNotFound {
                    type_name: type_name.clone(),
                })?;

            if descriptor.is_interface() || !descriptor.is_managed() {
                continue;
            }

            let bean_name = descriptor
                .stereotype()
                .and_then(|s| s.name())
                .map(str::to_string)
                .unwrap_or_else(|| lower_first_case(descriptor.simple_name()));
            debug!("读取组件定义: {} -> {}", bean_name, type_name);
            definitions.push(BeanDefinition::new(bean_name, type_name.as_str()));

            for interface in descriptor.interfaces() {
                definitions.push(BeanDefinition::new(interface.as_str(), type_name.as_str()));
            }
        }

        info!("从包 {} 读取了 {} 个组件定义", package, definitions.len());
        Ok(definitions)
    }

    /// 上下文配置
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }
}
