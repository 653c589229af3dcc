//! 组件基础接口定义
//!
//! 提供所有容器管理对象必须实现的基础 trait

use crate::errors::{BindingError, BindingResult, InvocationError, InvocationResult};
use crate::value::Value;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 容器管理对象 trait
///
/// 所有组件、控制器、切面都通过此 trait 暴露按名称调用的能力。
/// 代理对象实现同一 trait，因此调用方无法区分代理与真实对象。
pub trait Bean: Send + Sync + 'static {
    /// 实现类型的全限定名
    fn type_name(&self) -> &str;

    /// 按方法名调用
    fn invoke(&self, method: &str, args: &[Value]) -> InvocationResult;

    /// 为注入点赋值
    fn inject(&self, field: &str, _dependency: BeanRef) -> BindingResult<()> {
        Err(BindingError::UnknownField {
            type_name: self.type_name().to_string(),
            field: field.to_string(),
        })
    }

    /// 转换为 `Any`，用于获取具体类型
    fn as_any(&self) -> &dyn Any;

    /// 是否为代理对象
    fn is_proxy(&self) -> bool {
        false
    }
}

/// 共享的组件引用
pub type BeanRef = Arc<dyn Bean>;

/// 组件工厂函数类型，对应无参构造
pub type BeanFactoryFn = fn() -> BeanRef;

impl fmt::Debug for dyn Bean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bean")
            .field("type_name", &self.type_name())
            .field("proxy", &self.is_proxy())
            .finish()
    }
}

/// 字段注入点
///
/// 构造后由容器赋值一次；循环依赖时可能先拿到尚未完成注入的对象
#[derive(Default)]
pub struct Autowired {
    cell: OnceCell<BeanRef>,
}

impl Autowired {
    /// 创建空的注入点
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// 注入依赖
    pub fn bind(&self, field: &str, dependency: BeanRef) -> BindingResult<()> {
        self.cell
            .set(dependency)
            .map_err(|_| BindingError::AlreadyBound {
                field: field.to_string(),
            })
    }

    /// 获取已注入的依赖
    pub fn get(&self) -> Option<&BeanRef> {
        self.cell.get()
    }

    /// 是否已注入
    pub fn is_bound(&self) -> bool {
        self.cell.get().is_some()
    }

    /// 调用已注入依赖的方法
    pub fn invoke(&self, method: &str, args: &[Value]) -> InvocationResult {
        let target = self.cell.get().ok_or_else(|| InvocationError::Unbound {
            method: method.to_string(),
        })?;
        target.invoke(method, args)
    }
}

impl fmt::Debug for Autowired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(bean) => write!(f, "Autowired({})", bean.type_name()),
            None => f.write_str("Autowired(<unbound>)"),
        }
    }
}
