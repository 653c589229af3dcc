//! 配置提供者抽象接口

use infrastructure_common::{ConfigError, ConfigSection};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;

/// 配置提供者 trait
///
/// 定义从不同数据源获取配置的统一接口。配置在启动时一次性读取，
/// 因此接口是同步的。
pub trait ConfigProvider: Send + Sync + Debug {
    /// 获取配置值
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError>;

    /// 检查配置键是否存在
    fn contains_key(&self, key: &str) -> bool;

    /// 获取所有配置键
    fn get_all_keys(&self) -> Vec<String>;

    /// 重新加载配置
    fn reload(&mut self) -> Result<(), ConfigError>;

    /// 获取提供者名称
    fn name(&self) -> &str;

    /// 获取提供者优先级，数值越高越优先
    fn priority(&self) -> i32 {
        0
    }

    /// 按键列表收集配置节，缺失的键不出现在结果中
    fn get_section(&self, keys: &[&str]) -> ConfigSection {
        let mut section = ConfigSection::new();
        for key in keys {
            if let Ok(value) = self.get_configuration(key) {
                section.insert(*key, value);
            }
        }
        section
    }
}

/// 文件配置提供者 trait
pub trait FileConfigProvider: ConfigProvider {
    /// 获取文件路径
    fn file_path(&self) -> &Path;

    /// 检查文件是否存在
    fn file_exists(&self) -> bool {
        self.file_path().exists()
    }
}

/// 环境变量配置提供者 trait
pub trait EnvironmentConfigProvider: ConfigProvider {
    /// 获取环境变量前缀
    fn prefix(&self) -> &str;

    /// 获取分隔符
    fn separator(&self) -> &str;

    /// 获取所有匹配的环境变量
    fn get_matching_env_vars(&self) -> HashMap<String, String>;
}
