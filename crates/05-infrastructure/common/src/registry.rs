//! 类型注册表
//!
//! 应用在启动时把所有类型描述登记到注册表，扫描器和容器只读地使用它

use crate::errors::ConfigError;
use crate::metadata::TypeDescriptor;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 类型注册表
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    /// 按登记顺序保存的类型描述
    types: Vec<Arc<TypeDescriptor>>,
    /// 全限定名到下标的索引
    index: HashMap<String, usize>,
}

impl TypeRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记类型描述
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<(), ConfigError> {
        let type_name = descriptor.qualified_name();
        if self.index.contains_key(&type_name) {
            return Err(ConfigError::DuplicateType { type_name });
        }

        debug!("登记类型: {}", type_name);
        self.index.insert(type_name, self.types.len());
        self.types.push(Arc::new(descriptor));
        Ok(())
    }

    /// 链式登记
    pub fn with(mut self, descriptor: TypeDescriptor) -> Result<Self, ConfigError> {
        self.register(descriptor)?;
        Ok(self)
    }

    /// 按全限定名查找
    pub fn get(&self, type_name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.index.get(type_name).map(|&i| &self.types[i])
    }

    /// 是否包含指定类型
    pub fn contains(&self, type_name: &str) -> bool {
        self.index.contains_key(type_name)
    }

    /// 按登记顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.types.iter()
    }

    /// 已登记类型数量
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
