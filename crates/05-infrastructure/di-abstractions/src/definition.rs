//! 组件定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 组件定义
///
/// 同一实现类型可以有多个定义：一个具体名称，加上每个实现的能力接口一个
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeanDefinition {
    registered_name: String,
    implementation_type: String,
}

impl BeanDefinition {
    /// 创建组件定义
    pub fn new(registered_name: impl Into<String>, implementation_type: impl Into<String>) -> Self {
        Self {
            registered_name: registered_name.into(),
            implementation_type: implementation_type.into(),
        }
    }

    /// 注册名称，容器内唯一
    pub fn registered_name(&self) -> &str {
        &self.registered_name
    }

    /// 实现类型全限定名
    pub fn implementation_type(&self) -> &str {
        &self.implementation_type
    }
}

impl fmt::Display for BeanDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.registered_name, self.implementation_type)
    }
}
