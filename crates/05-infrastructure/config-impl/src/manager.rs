//! 配置管理器实现

use config_abstractions::{ConfigManager, ConfigProvider};
use infrastructure_common::ConfigError;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

/// 分层配置管理器
///
/// 按优先级降序查询各提供者，第一个包含该键的提供者胜出
#[derive(Default)]
pub struct LayeredConfigManager {
    /// 配置提供者列表（按优先级排序）
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl fmt::Debug for LayeredConfigManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredConfigManager")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl LayeredConfigManager {
    /// 创建新的配置管理器
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式注册提供者
    pub fn with_provider(mut self, provider: Box<dyn ConfigProvider>) -> Self {
        self.register_provider(provider);
        self
    }

    /// 获取配置提供者数量
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// 合并所有提供者的键
    pub fn get_all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .providers
            .iter()
            .flat_map(|p| p.get_all_keys())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// 重新加载全部提供者
    pub fn reload_all(&mut self) -> Result<(), ConfigError> {
        for provider in &mut self.providers {
            provider.reload()?;
            debug!("配置提供者已重新加载: {}", provider.name());
        }
        Ok(())
    }
}

impl ConfigManager for LayeredConfigManager {
    fn register_provider(&mut self, provider: Box<dyn ConfigProvider>) {
        info!(
            "注册配置提供者: {} (优先级 {})",
            provider.name(),
            provider.priority()
        );

        self.providers.push(provider);

        // 稳定排序，同优先级保持注册顺序
        self.providers
            .sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        for provider in &self.providers {
            if provider.contains_key(key) {
                debug!("配置键 {} 来自 {}", key, provider.name());
                return provider.get_configuration(key);
            }
        }
        Err(ConfigError::KeyNotFound {
            key: key.to_string(),
        })
    }

    fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }
}
