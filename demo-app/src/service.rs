//! 演示服务
//!
//! `TestServiceImpl` 与 `DemoServiceImpl` 互相注入对方的接口

use infrastructure_common::{
    Autowired, Bean, BeanRef, BindingError, BindingResult, InvocationError, InvocationResult,
    MethodDescriptor, ParamDescriptor, TypeDescriptor, Value,
};
use std::any::Any;
use std::sync::Arc;
use tracing::info;

pub const TEST_SERVICE: &str = "demo.service.ITestService";
pub const DEMO_SERVICE: &str = "demo.service.IDemoService";

#[derive(Debug, Default)]
pub struct TestServiceImpl {
    demo_service: Autowired,
}

impl TestServiceImpl {
    fn query(&self, name: &Value) -> InvocationResult {
        let echoed = self.demo_service.invoke("get", std::slice::from_ref(name))?;
        info!("----------------------{}---------------------", echoed);
        Ok(Value::from(format!(
            "==================={}======================",
            name
        )))
    }

    fn verify(&self, name: &Value) -> InvocationResult {
        match name.as_str() {
            Some(name) if !name.is_empty() => Ok(Value::from(true)),
            _ => Err(InvocationError::failed("name 不能为空")),
        }
    }
}

impl Bean for TestServiceImpl {
    fn type_name(&self) -> &str {
        "demo.service.TestServiceImpl"
    }

    fn invoke(&self, method: &str, args: &[Value]) -> InvocationResult {
        let name = args.first().cloned().unwrap_or_default();
        match method {
            "query" => self.query(&name),
            "verify" => self.verify(&name),
            other => Err(InvocationError::no_such_method(self.type_name(), other)),
        }
    }

    fn inject(&self, field: &str, dependency: BeanRef) -> BindingResult<()> {
        match field {
            "demo_service" => self.demo_service.bind(field, dependency),
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

#[derive(Debug, Default)]
pub struct DemoServiceImpl {
    test_service: Autowired,
}

impl DemoServiceImpl {
    /// 是否已拿到对端服务
    pub fn is_wired(&self) -> bool {
        self.test_service.is_bound()
    }
}

impl Bean for DemoServiceImpl {
    fn type_name(&self) -> &str {
        "demo.service.DemoServiceImpl"
    }

    fn invoke(&self, method: &str, args: &[Value]) -> InvocationResult {
        match method {
            "get" => Ok(args.first().cloned().unwrap_or_default()),
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

pub(crate) fn descriptors() -> Vec<TypeDescriptor> {
    vec![
        TypeDescriptor::interface("demo.service", "ITestService"),
        TypeDescriptor::interface("demo.service", "IDemoService"),
        TypeDescriptor::class("demo.service", "TestServiceImpl")
            .component()
            .implements(TEST_SERVICE)
            .autowired("demo_service", DEMO_SERVICE)
            .method(
                MethodDescriptor::new("query")
                    .returns("String")
                    .param(ParamDescriptor::string()),
            )
            .method(
                MethodDescriptor::new("verify")
                    .returns("boolean")
                    .param(ParamDescriptor::string()),
            )
            .factory(|| Arc::new(TestServiceImpl::default())),
        TypeDescriptor::class("demo.service", "DemoServiceImpl")
            .component()
            .implements(DEMO_SERVICE)
            .autowired("test_service", TEST_SERVICE)
            .method(
                MethodDescriptor::new("get")
                    .returns("String")
                    .param(ParamDescriptor::string()),
            )
            .factory(|| Arc::new(DemoServiceImpl::default())),
    ]
}
