//! 处理器适配器

use crate::http::{HttpRequest, ResponseWriter};
use crate::mapping::HandlerMapping;
use crate::model::ModelAndView;
use infrastructure_common::{InvocationError, MethodDescriptor, ParamType, Value};
use std::sync::Arc;
use tracing::debug;

/// 按参数类型绑定实参并调用处理器
#[derive(Debug, Clone, Copy, Default)]
pub struct HandlerAdapter;

impl HandlerAdapter {
    /// 创建适配器
    pub fn new() -> Self {
        Self
    }

    /// 调用处理器，返回值为 [`ModelAndView`] 时交给视图解析，否则视为已完成响应
    pub fn handle(
        &self,
        mapping: &HandlerMapping,
        request: &Arc<HttpRequest>,
        response: &Arc<ResponseWriter>,
    ) -> Result<Option<ModelAndView>, InvocationError> {
        let args = bind_arguments(mapping.method(), request, response);
        debug!("调用处理器: {} ({} 个参数)", mapping.handler_name(), args.len());

        let result = mapping.controller().invoke(&mapping.method().name, &args)?;
        Ok(result.downcast_ref::<ModelAndView>().cloned())
    }
}

/// 按声明顺序构造实参
///
/// - 请求、响应对象原样传入
/// - 带命名参数标记的字符串参数取请求参数，多值以逗号连接并去掉全部空白；参数缺失时为空值
/// - 其余参数为空值
pub fn bind_arguments(
    method: &MethodDescriptor,
    request: &Arc<HttpRequest>,
    response: &Arc<ResponseWriter>,
) -> Vec<Value> {
    method
        .params
        .iter()
        .map(|param| match (&param.param_type, param.request_param.as_deref()) {
            (ParamType::Request, _) => Value::Object(Arc::clone(request) as _),
            (ParamType::Response, _) => Value::Object(Arc::clone(response) as _),
            (ParamType::String, Some(name)) => request
                .param_values(name)
                .map(|values| {
                    values
                        .join(",")
                        .chars()
                        .filter(|c| !c.is_whitespace())
                        .collect::<String>()
                })
                .map(Value::Str)
                .unwrap_or(Value::Null),
            _ => Value::Null,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure_common::ParamDescriptor;

    #[test]
    fn test_bind_by_declared_type() {
        let method = MethodDescriptor::new("query")
            .param(ParamDescriptor::request())
            .param(ParamDescriptor::response())
            .param(ParamDescriptor::request_param("name"))
            .param(ParamDescriptor::string())
            .param(ParamDescriptor::request_param("missing"))
            .param(ParamDescriptor::of("i32"));

        let request = Arc::new(
            HttpRequest::get("/test/query")
                .with_param("name", " Ada ")
                .with_param("name", "Love lace")
                .with_param("address", "ignored"),
        );
        let response = Arc::new(ResponseWriter::new());

        let args = bind_arguments(&method, &request, &response);
        assert_eq!(args.len(), 6);
        assert_eq!(
            args[0].downcast_ref::<HttpRequest>().map(HttpRequest::uri),
            Some("/test/query")
        );
        assert!(args[1].downcast_ref::<ResponseWriter>().is_some());
        assert_eq!(args[2].as_str(), Some("Ada,Lovelace"));
        assert!(args[3].is_null());
        assert!(args[4].is_null());
        assert!(args[5].is_null());
    }
}
