//! # 基础设施组合层
//!
//! 这个 crate 负责把配置、日志、组件容器和请求分发器组合成一个可运行的应用，
//! 并把分发器挂到 HTTP 服务器上。
//!
//! ## 主要功能
//!
//! - **应用构建器**: 使用构建者模式组装配置源、日志和容器
//! - **日志初始化**: 基于 `tracing-subscriber` 的文本/JSON 输出
//! - **HTTP 绑定**: 所有 GET/POST 请求经由 axum 交给 [`webmvc::DispatcherServlet`]
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_common::TypeRegistry;
//! use infrastructure_composition::{ApplicationBuilder, LoggingConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let application = ApplicationBuilder::new()
//!         .add_config_file("application.properties")?
//!         .add_config_env_vars("MINI")
//!         .with_logging(LoggingConfig::development())
//!         .build(TypeRegistry::new())?;
//!
//!     application.serve(None).await?;
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod builder;
pub mod logging;
pub mod server;

pub use application::*;
pub use builder::*;
pub use logging::*;
pub use server::*;
