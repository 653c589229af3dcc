//! # Dependency Injection Abstractions
//!
//! 组件容器抽象层，定义类型扫描、组件定义注册和组件查找的核心接口。
//!
//! ## 核心接口
//!
//! - [`TypeScanner`] - 类型扫描器接口
//! - [`BeanDefinition`] - 组件定义
//! - [`BeanDefinitionRegistry`] - 组件定义注册表接口
//! - [`BeanFactory`] - 组件查找接口

pub mod definition;
pub mod factory;
pub mod registry;
pub mod scanner;

pub use definition::*;
pub use factory::*;
pub use registry::*;
pub use scanner::*;
