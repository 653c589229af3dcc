//! # Web MVC
//!
//! 请求分发：处理器映射 → 参数绑定 → 视图解析。
//!
//! - [`HttpRequest`] / [`ResponseWriter`] / [`HttpResponse`] - 与具体服务器无关的请求响应模型
//! - [`HandlerMapping`] - 路由正则到控制器方法的映射
//! - [`HandlerAdapter`] - 按参数类型绑定实参并调用处理器
//! - [`ViewResolver`] / [`View`] - 模板文件解析与占位符替换
//! - [`DispatcherServlet`] - 分发入口，把错误转换为 404/500 视图

pub mod adapter;
pub mod dispatcher;
pub mod http;
pub mod mapping;
pub mod model;
pub mod view;

pub use adapter::*;
pub use dispatcher::*;
pub use http::*;
pub use mapping::*;
pub use model::*;
pub use view::*;
