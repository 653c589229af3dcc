//! # 组件容器具体实现
//!
//! 提供类型扫描、组件定义读取和带切面织入的组件容器实现
//!
//! 启动流程：扫描 → 读取定义 → 注册 → 全量实例化。
//! 构建期间的可变状态保存在 [`ContainerBuildContext`] 中，构建完成后被消费，
//! 得到只读的 [`ApplicationContext`]。

pub mod context;
pub mod reader;
pub mod scanner;

pub use context::*;
pub use reader::*;
pub use scanner::*;
