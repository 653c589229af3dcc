//! 组件定义注册表抽象接口

use crate::definition::BeanDefinition;
use infrastructure_common::ConfigError;

/// 组件定义注册表 trait
pub trait BeanDefinitionRegistry {
    /// 注册组件定义
    ///
    /// 注册名称重复时返回 [`ConfigError::DuplicateBeanDefinition`]
    fn register_definition(&mut self, definition: BeanDefinition) -> Result<(), ConfigError>;

    /// 批量注册，遇到第一个错误即停止
    fn register_definitions(&mut self, definitions: Vec<BeanDefinition>) -> Result<(), ConfigError> {
        for definition in definitions {
            self.register_definition(definition)?;
        }
        Ok(())
    }

    /// 按注册名称查找
    fn get_definition(&self, name: &str) -> Option<&BeanDefinition>;

    /// 是否已注册
    fn contains_definition(&self, name: &str) -> bool {
        self.get_definition(name).is_some()
    }

    /// 已注册定义数量
    fn definition_count(&self) -> usize;
}
