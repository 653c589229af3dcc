//! 配置管理器抽象接口

use crate::keys;
use crate::provider::ConfigProvider;
use infrastructure_common::{ConfigError, ConfigSection, ContextConfig};
use serde_json::Value;

/// 配置管理器 trait
///
/// 聚合多个配置提供者，按优先级返回配置值
pub trait ConfigManager: Send + Sync {
    /// 注册配置提供者
    fn register_provider(&mut self, provider: Box<dyn ConfigProvider>);

    /// 获取配置值（最高优先级的提供者胜出）
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError>;

    /// 获取字符串配置值
    fn get_string(&self, key: &str) -> Option<String> {
        match self.get_configuration(key).ok()? {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// 按键列表收集配置节
    fn get_section(&self, keys: &[&str]) -> ConfigSection {
        let mut section = ConfigSection::new();
        for key in keys {
            if let Ok(value) = self.get_configuration(key) {
                section.insert(*key, value);
            }
        }
        section
    }

    /// 绑定容器上下文配置，所有值按字符串处理
    fn context_config(&self) -> Result<ContextConfig, ConfigError> {
        let mut section = ConfigSection::new();
        for key in keys::CONTEXT_KEYS {
            if let Some(value) = self.get_string(key) {
                section.insert(key, Value::String(value));
            }
        }
        ContextConfig::from_section(&section)
    }

    /// 已注册的提供者名称（按优先级降序）
    fn provider_names(&self) -> Vec<String>;
}
