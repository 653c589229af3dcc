//! # Configuration Abstractions
//!
//! 配置管理抽象层，定义配置读取的核心接口和约定。
//!
//! ## 核心接口
//!
//! - [`ConfigProvider`] - 配置提供者接口
//! - [`ConfigManager`] - 配置管理器接口
//! - [`keys`] - 容器识别的配置键

pub mod keys;
pub mod manager;
pub mod provider;

pub use manager::*;
pub use provider::*;
