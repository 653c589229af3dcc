//! # 演示应用
//!
//! 一组控制器、两个相互依赖的服务和一个日志切面，展示容器、切面代理和请求分发的完整链路。
//!
//! - `/test/query?name=..` - 控制器直接写响应，经由被代理的服务
//! - `/test/verify?name=..` - 服务失败时由异常通知吞掉错误
//! - `/page/first?name=..` - 渲染 `first` 模板
//! - `/page/fail` - 触发 500 视图

pub mod action;
pub mod aspect;
pub mod service;

use infrastructure_common::{ConfigResult, TypeRegistry};

/// 默认配置文件
pub const CONFIG_FILE: &str = "application.properties";

/// 登记全部演示类型
pub fn type_registry() -> ConfigResult<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    for descriptor in service::descriptors()
        .into_iter()
        .chain(action::descriptors())
        .chain(aspect::descriptors())
    {
        registry.register(descriptor)?;
    }
    Ok(registry)
}
