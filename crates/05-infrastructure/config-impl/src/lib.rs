//! # Configuration Implementation
//!
//! 配置管理的具体实现，提供各种配置源和分层管理。
//!
//! ## 主要组件
//!
//! - [`LayeredConfigManager`] - 按优先级分层的配置管理器
//! - [`PropertiesConfigProvider`] - `.properties` 配置提供者
//! - [`TomlConfigProvider`] - TOML 配置提供者
//! - [`EnvironmentConfigProviderImpl`] - 环境变量配置提供者
//! - [`TypedConfigBinder`] - 按前缀绑定到具体类型

pub mod binder;
pub mod manager;
pub mod providers;

pub use binder::*;
pub use manager::*;
pub use providers::*;
