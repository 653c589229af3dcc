//! 类型化配置绑定器实现

use crate::manager::LayeredConfigManager;
use config_abstractions::ConfigManager;
use infrastructure_common::{ConfigError, ConfigSection};
use serde::Deserialize;
use tracing::debug;

/// 类型化配置绑定器
///
/// 把某个前缀下的全部键收集为配置节，再通过 serde 绑定到目标类型
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedConfigBinder;

impl TypedConfigBinder {
    /// 创建绑定器
    pub fn new() -> Self {
        Self
    }

    /// 收集前缀下的配置节，键去掉前缀
    pub fn section(&self, manager: &LayeredConfigManager, prefix: &str) -> ConfigSection {
        let head = format!("{}.", prefix);
        let mut section = ConfigSection::new();
        for key in manager.get_all_keys() {
            if let Some(sub_key) = key.strip_prefix(&head) {
                if let Ok(value) = manager.get_configuration(&key) {
                    section.insert(sub_key, value);
                }
            }
        }
        section
    }

    /// 绑定前缀下的配置到具体类型
    pub fn bind<T>(&self, manager: &LayeredConfigManager, prefix: &str) -> Result<T, ConfigError>
    where
        T: for<'de> Deserialize<'de>,
    {
        debug!("绑定配置到类型: {} -> {}", prefix, std::any::type_name::<T>());
        self.section(manager, prefix).bind()
    }
}
