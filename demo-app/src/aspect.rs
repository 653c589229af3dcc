//! 日志切面

use infrastructure_common::{
    Bean, InvocationError, InvocationResult, MethodDescriptor, ParamDescriptor, TypeDescriptor,
    Value,
};
use std::any::Any;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct LogAspect;

impl Bean for LogAspect {
    fn type_name(&self) -> &str {
        "demo.aspect.LogAspect"
    }

    fn invoke(&self, method: &str, args: &[Value]) -> InvocationResult {
        match method {
            "before" => info!("========before======="),
            "after" => info!("========after======="),
            "exception" => match args.first().filter(|error| !error.is_null()) {
                Some(error) => warn!("========after exception======= {}", error),
                None => warn!("========after exception======="),
            },
            other => return Err(InvocationError::no_such_method(self.type_name(), other)),
        }
        Ok(Value::Null)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) fn descriptors() -> Vec<TypeDescriptor> {
    vec![TypeDescriptor::class("demo.aspect", "LogAspect")
        .method(MethodDescriptor::new("before"))
        .method(MethodDescriptor::new("after"))
        .method(MethodDescriptor::new("exception").param(ParamDescriptor::string()))
        .factory(|| Arc::new(LogAspect))]
}
