//! 演示控制器

use crate::service::TEST_SERVICE;
use infrastructure_common::{
    Autowired, Bean, BeanRef, BindingError, BindingResult, InvocationError, InvocationResult,
    MethodDescriptor, ParamDescriptor, TypeDescriptor, Value,
};
use std::any::Any;
use std::sync::Arc;
use webmvc::{ModelAndView, ResponseWriter};

fn response_arg<'a>(
    method: &str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a ResponseWriter, InvocationError> {
    args.get(index)
        .and_then(Value::downcast_ref::<ResponseWriter>)
        .ok_or_else(|| InvocationError::argument(method, index, "HttpResponse"))
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

fn or_null(value: &Value) -> String {
    if value.is_null() {
        "null".to_string()
    } else {
        value.to_string()
    }
}

/// `/test/*` 控制器，直接写响应
#[derive(Debug, Default)]
pub struct TestAction {
    test_service: Autowired,
}

impl TestAction {
    fn query(&self, args: &[Value]) -> InvocationResult {
        let response = response_arg("query", args, 1)?;
        let name = arg(args, 2);
        let address = arg(args, 3);
        let data = self.test_service.invoke("query", std::slice::from_ref(&name))?;

        response.write(&format!(
            "{{name={}, address={}, data={}}}",
            or_null(&name),
            or_null(&address),
            or_null(&data)
        ));
        Ok(Value::Null)
    }

    fn verify(&self, args: &[Value]) -> InvocationResult {
        let response = response_arg("verify", args, 0)?;
        let verified = self
            .test_service
            .invoke("verify", args.get(1..).unwrap_or(&[]))?;
        response.write(&format!("verified={}", verified.as_bool().unwrap_or(false)));
        Ok(Value::Null)
    }
}

impl Bean for TestAction {
    fn type_name(&self) -> &str {
        "demo.action.TestAction"
    }

    fn invoke(&self, method: &str, args: &[Value]) -> InvocationResult {
        match method {
            "query" => self.query(args),
            "verify" => self.verify(args),
            other => Err(InvocationError::no_such_method(self.type_name(), other)),
        }
    }

    fn inject(&self, field: &str, dependency: BeanRef) -> BindingResult<()> {
        match field {
            "test_service" => self.test_service.bind(field, dependency),
            _ => Err(BindingError::UnknownField {
                type_name: self.type_name().to_string(),
                field: field.to_string(),
            }),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `/page` 控制器，返回视图
#[derive(Debug, Default)]
pub struct PageAction;

impl Bean for PageAction {
    fn type_name(&self) -> &str {
        "demo.action.PageAction"
    }

    fn invoke(&self, method: &str, args: &[Value]) -> InvocationResult {
        match method {
            "first" => {
                let name = arg(args, 0);
                Ok(ModelAndView::new("first")
                    .with("title", "Lorn Mini Container")
                    .with("data", format!("欢迎, {}", name))
                    .with("name", name)
                    .into_value())
            }
            "fail" => Err(InvocationError::failed("页面处理失败")),
            other => Err(InvocationError::no_such_method(self.type_name(), other)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) fn descriptors() -> Vec<TypeDescriptor> {
    vec![
        TypeDescriptor::class("demo.action", "TestAction")
            .controller()
            .request_mapping("/test")
            .autowired("test_service", TEST_SERVICE)
            .method(
                MethodDescriptor::new("query")
                    .param(ParamDescriptor::request())
                    .param(ParamDescriptor::response())
                    .param(ParamDescriptor::request_param("name"))
                    .param(ParamDescriptor::string())
                    .throws("IoError")
                    .request_mapping("/query"),
            )
            .method(
                MethodDescriptor::new("verify")
                    .param(ParamDescriptor::response())
                    .param(ParamDescriptor::request_param("name"))
                    .request_mapping("/verify"),
            )
            .factory(|| Arc::new(TestAction::default())),
        TypeDescriptor::class("demo.action", "PageAction")
            .controller()
            .request_mapping("/page")
            .method(
                MethodDescriptor::new("first")
                    .returns("ModelAndView")
                    .param(ParamDescriptor::request_param("name"))
                    .request_mapping("/first"),
            )
            .method(MethodDescriptor::new("fail").request_mapping("/fail"))
            .factory(|| Arc::new(PageAction)),
    ]
}
