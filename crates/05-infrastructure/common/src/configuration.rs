//! 配置相关的基础定义

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 容器上下文配置
///
/// 字段名与属性文件中的键一一对应
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// 组件扫描根包
    #[serde(rename = "scanPackage")]
    pub scan_package: Option<String>,
    /// 切点表达式
    #[serde(rename = "pointCut")]
    pub point_cut: Option<String>,
    /// 切面类型全限定名
    #[serde(rename = "aspectClass")]
    pub aspect_class: Option<String>,
    /// 前置通知方法名
    #[serde(rename = "aspectBefore")]
    pub aspect_before: Option<String>,
    /// 后置通知方法名
    #[serde(rename = "aspectAfter")]
    pub aspect_after: Option<String>,
    /// 异常通知方法名
    #[serde(rename = "aspectAfterThrow")]
    pub aspect_after_throw: Option<String>,
    /// 异常通知绑定的参数名
    #[serde(rename = "aspectAfterThrowingName")]
    pub aspect_after_throwing_name: Option<String>,
    /// 模板根目录
    #[serde(rename = "templateRoot")]
    pub template_root: Option<String>,
}

impl ContextConfig {
    /// 创建只带扫描包的配置
    pub fn new(scan_package: impl Into<String>) -> Self {
        Self {
            scan_package: Some(scan_package.into()),
            ..Self::default()
        }
    }

    /// 从配置节绑定
    pub fn from_section(section: &ConfigSection) -> Result<Self, ConfigError> {
        section.bind()
    }

    /// 获取非空的扫描包
    pub fn require_scan_package(&self) -> Result<&str, ConfigError> {
        non_blank(self.scan_package.as_deref()).ok_or_else(|| ConfigError::KeyNotFound {
            key: "scanPackage".to_string(),
        })
    }

    /// 获取非空的切点表达式
    pub fn point_cut(&self) -> Option<&str> {
        non_blank(self.point_cut.as_deref())
    }

    /// 获取非空的模板根目录
    pub fn template_root(&self) -> Option<&str> {
        non_blank(self.template_root.as_deref())
    }
}

/// 过滤空白字符串
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// 配置节
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSection {
    /// 配置数据
    pub data: HashMap<String, serde_json::Value>,
}

impl ConfigSection {
    /// 创建新的配置节
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// 插入配置项
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// 获取配置项
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// 绑定到具体类型
    pub fn bind<T>(&self) -> Result<T, ConfigError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let value = serde_json::Value::Object(
            self.data
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        );

        serde_json::from_value(value).map_err(|e| ConfigError::SerializationError { source: e })
    }
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bind_context_config_from_section() {
        let mut section = ConfigSection::new();
        section.insert("scanPackage", json!("demo"));
        section.insert("pointCut", json!("public .* demo.service..*Impl..*(.*)"));
        section.insert("templateRoot", json!("  "));
        section.insert("unrelated", json!("ignored"));

        let config = ContextConfig::from_section(&section).unwrap();
        assert_eq!(config.require_scan_package().unwrap(), "demo");
        assert_eq!(config.point_cut(), Some("public .* demo.service..*Impl..*(.*)"));
        assert_eq!(config.template_root(), None);
    }

    #[test]
    fn test_missing_scan_package() {
        let err = ContextConfig::default().require_scan_package().unwrap_err();
        assert!(matches!(err, ConfigError::KeyNotFound { key } if key == "scanPackage"));
    }
}
