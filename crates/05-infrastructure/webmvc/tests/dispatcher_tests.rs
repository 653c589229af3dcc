//! 请求分发的集成测试

use di_impl::ApplicationContext;
use infrastructure_common::{
    Bean, ContextConfig, InvocationError, InvocationResult, MethodDescriptor, ParamDescriptor,
    TypeDescriptor, TypeRegistry, Value,
};
use std::any::Any;
use std::path::Path;
use std::sync::Arc;
use webmvc::{DispatcherServlet, HttpRequest, ModelAndView, ResponseWriter};

#[derive(Debug, Default)]
struct TestAction;

impl Bean for TestAction {
    fn type_name(&self) -> &str {
        "demo.action.TestAction"
    }

    fn invoke(&self, method: &str, args: &[Value]) -> InvocationResult {
        match method {
            "query" => {
                let response = args[1]
                    .downcast_ref::<ResponseWriter>()
                    .ok_or_else(|| InvocationError::argument(method, 1, "HttpResponse"))?;
                response.write(&format!("name={}", args[2]));
                Ok(Value::Null)
            }
            "page" => Ok(ModelAndView::new("first")
                .with("title", "Welcome")
                .with("name", args[0].clone())
                .into_value()),
            "fail" => Err(InvocationError::failed("handler exploded")),
            "nowhere" => Ok(ModelAndView::new("unknown").into_value()),
            "boom" => Ok(args[7].clone()),
            other => Err(InvocationError::no_such_method(self.type_name(), other)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn registry() -> Arc<TypeRegistry> {
    let registry = TypeRegistry::new()
        .with(
            TypeDescriptor::class("demo.action", "TestAction")
                .controller()
                .request_mapping("/test/*")
                .method(
                    MethodDescriptor::new("query")
                        .param(ParamDescriptor::request())
                        .param(ParamDescriptor::response())
                        .param(ParamDescriptor::request_param("name"))
                        .request_mapping("query"),
                )
                .method(
                    MethodDescriptor::new("page")
                        .returns("ModelAndView")
                        .param(ParamDescriptor::request_param("name"))
                        .request_mapping("/page"),
                )
                .method(MethodDescriptor::new("fail").request_mapping("/fail"))
                .method(MethodDescriptor::new("nowhere").request_mapping("/nowhere"))
                .method(MethodDescriptor::new("boom").request_mapping("/boom"))
                .method(MethodDescriptor::new("helper"))
                .factory(|| Arc::new(TestAction)),
        )
        .unwrap();
    Arc::new(registry)
}

fn dispatcher(template_root: Option<&Path>) -> DispatcherServlet {
    let config = ContextConfig {
        template_root: template_root.map(|p| p.display().to_string()),
        ..ContextConfig::new("demo")
    };
    let context = ApplicationContext::refresh(registry(), config).unwrap();
    DispatcherServlet::init(Arc::new(context)).unwrap()
}

fn templates() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("first.html"), "<h1>${title}</h1>\n<p>Hello, ${name}!</p>").unwrap();
    std::fs::write(dir.path().join("404.html"), "<h1>Not here</h1>").unwrap();
    std::fs::write(dir.path().join("500.html"), "<h1>${detail}</h1>\n<pre>${stackTrace}</pre>").unwrap();
    dir
}

#[test]
fn test_only_routed_methods_are_mapped() {
    let dispatcher = dispatcher(None);
    let patterns: Vec<&str> = dispatcher
        .handler_mappings()
        .iter()
        .map(|m| m.pattern())
        .collect();
    assert_eq!(
        patterns,
        vec![
            "/test(?:/.*)?/query",
            "/test(?:/.*)?/page",
            "/test(?:/.*)?/fail",
            "/test(?:/.*)?/nowhere",
            "/test(?:/.*)?/boom",
        ]
    );
}

#[test]
fn test_terminal_handler_writes_response() {
    let dispatcher = dispatcher(None);
    let response = dispatcher.service(
        HttpRequest::get("/app//test/query")
            .with_context_path("/app")
            .with_param("name", "Ada Lovelace"),
    );

    assert_eq!(response.status(), 200);
    assert_eq!(response.body_text(), "name=AdaLovelace");
}

#[test]
fn test_path_outside_context_is_not_found() {
    let dispatcher = dispatcher(None);
    let response = dispatcher.service(
        HttpRequest::get("/application/test/query")
            .with_context_path("/app")
            .with_param("name", "Ada"),
    );
    assert_eq!(response.status(), 404);

    let response = dispatcher.service(HttpRequest::get("/test/query").with_context_path("/app"));
    assert_eq!(response.status(), 404);
    assert_eq!(response.body_text(), "404 Not Found");
}

#[test]
fn test_wildcard_route_rejects_prefix_lookalike() {
    let dispatcher = dispatcher(None);
    let response = dispatcher.service(HttpRequest::post("/testing/query"));

    assert_eq!(response.status(), 404);
    assert_eq!(response.body_text(), "404 Not Found");
}

#[test]
fn test_model_and_view_is_rendered() {
    let dir = templates();
    let dispatcher = dispatcher(Some(dir.path()));
    let response = dispatcher.service(HttpRequest::get("/test/page").with_param("name", "Ada"));

    assert_eq!(response.status(), 200);
    assert!(response.content_type().starts_with("text/html"));
    assert_eq!(response.body_text(), "<h1>Welcome</h1>\n<p>Hello, Ada!</p>");
}

#[test]
fn test_missing_param_renders_empty() {
    let dir = templates();
    let dispatcher = dispatcher(Some(dir.path()));
    let response = dispatcher.service(HttpRequest::get("/test/page"));

    assert_eq!(response.body_text(), "<h1>Welcome</h1>\n<p>Hello, !</p>");
}

#[test]
fn test_unmapped_path_uses_404_template() {
    let dir = templates();
    let dispatcher = dispatcher(Some(dir.path()));
    let response = dispatcher.service(HttpRequest::get("/missing"));

    assert_eq!(response.status(), 404);
    assert_eq!(response.body_text(), "<h1>Not here</h1>");
}

#[test]
fn test_failing_handler_yields_500_with_stack_summary() {
    let dir = templates();
    let dispatcher = dispatcher(Some(dir.path()));
    let response = dispatcher.service(HttpRequest::get("/test/fail"));

    assert_eq!(response.status(), 500);
    let body = response.body_text();
    assert!(body.starts_with("<h1>500 Exception</h1>"));
    assert!(body.contains("demo.action.TestAction.fail"));
    assert!(body.contains("handler exploded"));
}

#[test]
fn test_panicking_handler_yields_500() {
    let dir = templates();
    let dispatcher = dispatcher(Some(dir.path()));
    let response = dispatcher.service(HttpRequest::get("/test/boom"));

    assert_eq!(response.status(), 500);
    let body = response.body_text();
    assert!(body.starts_with("<h1>500 Exception</h1>"));
    let stack_trace = body.lines().nth(1).unwrap();
    assert!(stack_trace.starts_with("<pre>[处理器执行时发生 panic: demo.action.TestAction.boom"));
    assert!(stack_trace.contains("index out of bounds"));
}

#[test]
fn test_panicking_handler_without_templates() {
    let dispatcher = dispatcher(None);
    let response = dispatcher.service(HttpRequest::post("/test/boom"));

    assert_eq!(response.status(), 500);
    assert!(response
        .body_text()
        .starts_with("500 Exception, Detail: [处理器执行时发生 panic: demo.action.TestAction.boom"));

    // 分发器在 panic 之后仍可继续处理请求
    let response = dispatcher.service(HttpRequest::get("/test/query").with_param("name", "Ada"));
    assert_eq!(response.status(), 200);
}

#[test]
fn test_failing_handler_without_templates() {
    let dispatcher = dispatcher(None);
    let response = dispatcher.service(HttpRequest::get("/test/fail"));

    assert_eq!(response.status(), 500);
    assert!(response
        .body_text()
        .starts_with("500 Exception, Detail: [处理器执行失败: demo.action.TestAction.fail"));
}

#[test]
fn test_unknown_view_writes_nothing() {
    let dir = templates();
    let dispatcher = dispatcher(Some(dir.path()));
    let response = dispatcher.service(HttpRequest::get("/test/nowhere"));

    assert_eq!(response.status(), 200);
    assert!(response.body().is_empty());
}

#[test]
fn test_missing_template_root_is_fatal() {
    let config = ContextConfig {
        template_root: Some("/nonexistent/layouts".to_string()),
        ..ContextConfig::new("demo")
    };
    let context = ApplicationContext::refresh(registry(), config).unwrap();
    let err = DispatcherServlet::init(Arc::new(context)).unwrap_err();
    assert!(matches!(
        err,
        infrastructure_common::ConfigError::TemplateRootNotFound { .. }
    ));
}
