//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn Mini Container 各层共享的 traits、元数据和错误类型。
//!
//! ## 核心组件
//!
//! - [`Bean`] - 容器管理对象的统一调用接口
//! - [`Autowired`] - 字段注入点
//! - [`TypeDescriptor`] - 类型元数据（标记、能力接口、注入字段、方法签名、路由）
//! - [`TypeRegistry`] - 启动期类型注册表，替代运行时反射
//! - [`Matcher`] - 文本匹配策略接口
//! - [`ContextConfig`] - 容器上下文配置
//!
//! ## 设计原则
//!
//! - 启动期显式登记元数据，运行期只读
//! - 基于名称的动态调用，代理与真实对象实现同一接口
//! - 不使用进程级全局状态

pub mod component;
pub mod configuration;
pub mod errors;
pub mod matcher;
pub mod metadata;
pub mod registry;
pub mod value;

pub use component::*;
pub use configuration::*;
pub use errors::*;
pub use matcher::*;
pub use metadata::*;
pub use registry::*;
pub use value::*;
