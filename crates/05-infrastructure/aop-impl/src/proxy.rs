//! 通知代理
//!
//! [`AopProxy`] 与目标实现同一个 [`Bean`] 接口，调用方无需区分。

use crate::advice::{AdviceKind, MethodAdvices, MethodAdviceTable};
use dashmap::DashMap;
use infrastructure_common::{
    Bean, BeanRef, BindingResult, InvocationResult, TypeDescriptor, Value,
};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// 通知代理
pub struct AopProxy {
    target: BeanRef,
    descriptor: Arc<TypeDescriptor>,
    table: MethodAdviceTable,
    /// 调用名到通知集合的缓存，未匹配的方法缓存为 `None`
    cache: DashMap<String, Option<Arc<MethodAdvices>>>,
}

impl AopProxy {
    /// 包装目标组件
    pub fn new(target: BeanRef, descriptor: Arc<TypeDescriptor>, table: MethodAdviceTable) -> Self {
        let cache = DashMap::new();
        let declaring = descriptor.qualified_name();
        for method in descriptor.methods() {
            if let Some(advices) = table.get(&method.signature(&declaring)) {
                cache.insert(method.name.clone(), Some(Arc::clone(advices)));
            }
        }

        debug!(
            "创建代理: {} ({} 个方法带通知)",
            declaring,
            table.len()
        );
        Self {
            target,
            descriptor,
            table,
            cache,
        }
    }

    /// 被代理的目标
    pub fn target(&self) -> &BeanRef {
        &self.target
    }

    /// 方法通知表
    pub fn advice_table(&self) -> &MethodAdviceTable {
        &self.table
    }

    /// 查找调用对应的通知
    ///
    /// 缓存未命中时按方法简单名在声明类型上重新查找，并以原调用名回填缓存，
    /// 以支持通过能力接口限定名发起的调用
    fn advices_for(&self, method: &str) -> Option<Arc<MethodAdvices>> {
        if let Some(cached) = self.cache.get(method) {
            return cached.clone();
        }

        let declaring = self.descriptor.qualified_name();
        let resolved = self
            .descriptor
            .find_method(simple_method_name(method))
            .and_then(|m| self.table.get(&m.signature(&declaring)))
            .cloned();

        self.cache.insert(method.to_string(), resolved.clone());
        resolved
    }
}

/// 去掉调用名上的类型限定
fn simple_method_name(method: &str) -> &str {
    method.rsplit('.').next().unwrap_or(method)
}

impl Bean for AopProxy {
    fn type_name(&self) -> &str {
        self.target.type_name()
    }

    /// before → 目标调用 → 失败时 afterThrow → after
    ///
    /// 目标调用的错误在异常通知执行后被吞掉，此时返回 [`Value::Null`]
    fn invoke(&self, method: &str, args: &[Value]) -> InvocationResult {
        let name = simple_method_name(method);
        let Some(advices) = self.advices_for(method) else {
            return self.target.invoke(name, args);
        };

        advices.run(AdviceKind::Before, None)?;

        let result = match self.target.invoke(name, args) {
            Ok(value) => value,
            Err(e) => {
                error!("{}.{} 调用失败: {}", self.type_name(), name, e);
                advices.run(AdviceKind::AfterThrow, Some(&e.to_string()))?;
                Value::Null
            }
        };

        advices.run(AdviceKind::After, None)?;
        Ok(result)
    }

    fn inject(&self, field: &str, dependency: BeanRef) -> BindingResult<()> {
        self.target.inject(field, dependency)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_proxy(&self) -> bool {
        true
    }
}

impl fmt::Debug for AopProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AopProxy")
            .field("target", &self.target.type_name())
            .field("advised_methods", &self.table.len())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::advice::AdviceSupport;
    use infrastructure_common::{
        ContextConfig, InvocationError, MethodDescriptor, ParamDescriptor, TypeRegistry,
    };
    use std::cell::RefCell;

    thread_local! {
        static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    fn record(event: impl Into<String>) {
        EVENTS.with(|events| events.borrow_mut().push(event.into()));
    }

    fn take_events() -> Vec<String> {
        EVENTS.with(|events| events.borrow_mut().drain(..).collect())
    }

    #[derive(Debug, Default)]
    pub(crate) struct RecordingAspect;

    impl Bean for RecordingAspect {
        fn type_name(&self) -> &str {
            "demo.aspect.RecordingAspect"
        }

        fn invoke(&self, method: &str, args: &[Value]) -> InvocationResult {
            match method {
                "before" | "after" => record(method),
                "exception" => record(format!("exception:{}", args[0])),
                "broken" => return Err(InvocationError::failed("aspect broken")),
                other => return Err(InvocationError::no_such_method(self.type_name(), other)),
            }
            Ok(Value::Null)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug, Default)]
    struct TestServiceImpl;

    impl Bean for TestServiceImpl {
        fn type_name(&self) -> &str {
            "demo.service.TestServiceImpl"
        }

        fn invoke(&self, method: &str, args: &[Value]) -> InvocationResult {
            match method {
                "query" => {
                    record("call");
                    Ok(Value::from(format!("hello {}", args[0])))
                }
                "fail" => {
                    record("call");
                    Err(InvocationError::failed("boom"))
                }
                "internal" => Ok(Value::from("internal")),
                other => Err(InvocationError::no_such_method(self.type_name(), other)),
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    pub(crate) fn registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(
                TypeDescriptor::class("demo.aspect", "RecordingAspect")
                    .method(MethodDescriptor::new("before"))
                    .method(MethodDescriptor::new("after"))
                    .method(MethodDescriptor::new("broken"))
                    .method(MethodDescriptor::new("exception").param(ParamDescriptor::string()))
                    .factory(|| Arc::new(RecordingAspect)),
            )
            .unwrap()
            .with(
                TypeDescriptor::class("demo.service", "TestServiceImpl")
                    .component()
                    .implements("demo.service.ITestService")
                    .method(
                        MethodDescriptor::new("query")
                            .returns("String")
                            .param(ParamDescriptor::string()),
                    )
                    .method(MethodDescriptor::new("fail").throws("IoError"))
                    .method(MethodDescriptor::new("internal").with_modifiers("private"))
                    .factory(|| Arc::new(TestServiceImpl)),
            )
            .unwrap()
    }

    fn proxy(config: ContextConfig) -> AopProxy {
        let registry = registry();
        let support = AdviceSupport::from_context(&config, &registry)
            .unwrap()
            .unwrap();
        let descriptor = Arc::clone(registry.get("demo.service.TestServiceImpl").unwrap());
        let table = support.compile(&descriptor).unwrap();
        AopProxy::new(Arc::new(TestServiceImpl), descriptor, table)
    }

    fn config() -> ContextConfig {
        ContextConfig {
            point_cut: Some("public .* demo.service..*ServiceImpl..*(.*)".to_string()),
            aspect_class: Some("demo.aspect.RecordingAspect".to_string()),
            aspect_before: Some("before".to_string()),
            aspect_after: Some("after".to_string()),
            aspect_after_throw: Some("exception".to_string()),
            ..ContextConfig::new("demo")
        }
    }

    #[test]
    fn test_advice_order_on_success() {
        let proxy = proxy(config());
        take_events();

        let value = proxy.invoke("query", &[Value::from("ada")]).unwrap();
        assert_eq!(value.as_str(), Some("hello ada"));
        assert_eq!(take_events(), vec!["before", "call", "after"]);
        assert!(proxy.is_proxy());
        assert_eq!(proxy.type_name(), "demo.service.TestServiceImpl");
    }

    #[test]
    fn test_failure_is_swallowed_after_throw_advice() {
        let proxy = proxy(config());
        take_events();

        let value = proxy.invoke("fail", &[]).unwrap();
        assert!(value.is_null());
        assert_eq!(
            take_events(),
            vec!["before", "call", "exception:boom", "after"]
        );
    }

    #[test]
    fn test_unmatched_method_is_forwarded_without_advice() {
        let proxy = proxy(config());
        take_events();

        let value = proxy.invoke("internal", &[]).unwrap();
        assert_eq!(value.as_str(), Some("internal"));
        assert!(take_events().is_empty());
    }

    #[test]
    fn test_qualified_call_name_is_resolved_and_cached() {
        let proxy = proxy(config());
        take_events();

        let qualified = "demo.service.ITestService.query";
        assert!(!proxy.cache.contains_key(qualified));
        proxy.invoke(qualified, &[Value::from("x")]).unwrap();
        assert_eq!(take_events(), vec!["before", "call", "after"]);
        assert!(proxy.cache.get(qualified).unwrap().is_some());
    }

    #[test]
    fn test_advice_failure_is_escalated() {
        let proxy = proxy(ContextConfig {
            aspect_before: Some("broken".to_string()),
            ..config()
        });
        take_events();

        let err = proxy.invoke("query", &[Value::from("x")]).unwrap_err();
        assert!(matches!(err, InvocationError::Advice { .. }));
        assert!(take_events().is_empty());
    }
}
