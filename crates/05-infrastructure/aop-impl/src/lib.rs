//! # AOP Implementation
//!
//! 基于代理的切面织入。
//!
//! - [`Pointcut`] - 由切点表达式派生的类型匹配与方法匹配
//! - [`AdviceConfig`] / [`AdviceSupport`] - 切面配置及其针对目标类型的编译
//! - [`MethodAdviceTable`] - 方法签名到通知的映射
//! - [`AopProxy`] - 包装目标组件，在调用前后执行通知

pub mod advice;
pub mod pointcut;
pub mod proxy;

pub use advice::*;
pub use pointcut::*;
pub use proxy::*;
