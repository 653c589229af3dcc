//! 应用组装与 HTTP 绑定测试

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use infrastructure_common::{
    Bean, ContextConfig, FrameworkError, InvocationError, InvocationResult, MethodDescriptor,
    ParamDescriptor, TypeDescriptor, TypeRegistry, Value,
};
use infrastructure_composition::{ApplicationBuilder, ServerSettings, DEFAULT_ADDRESS};
use std::any::Any;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;
use webmvc::{ModelAndView, ResponseWriter};

#[derive(Debug, Default)]
struct GreetingAction;

impl Bean for GreetingAction {
    fn type_name(&self) -> &str {
        "shop.web.GreetingAction"
    }

    fn invoke(&self, method: &str, args: &[Value]) -> InvocationResult {
        match method {
            "hello" => {
                let response = args[0]
                    .downcast_ref::<ResponseWriter>()
                    .ok_or_else(|| InvocationError::argument(method, 0, "HttpResponse"))?;
                response.write(&format!("hello {}", args[1]));
                Ok(Value::Null)
            }
            "page" => Ok(ModelAndView::new("greeting")
                .with("name", args[0].clone())
                .into_value()),
            other => Err(InvocationError::no_such_method(self.type_name(), other)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn registry() -> TypeRegistry {
    TypeRegistry::new()
        .with(
            TypeDescriptor::class("shop.web", "GreetingAction")
                .controller()
                .request_mapping("/greet")
                .method(
                    MethodDescriptor::new("hello")
                        .param(ParamDescriptor::response())
                        .param(ParamDescriptor::request_param("name"))
                        .request_mapping("/hello"),
                )
                .method(
                    MethodDescriptor::new("page")
                        .returns("ModelAndView")
                        .param(ParamDescriptor::request_param("name"))
                        .request_mapping("/page"),
                )
                .factory(|| Arc::new(GreetingAction)),
        )
        .unwrap()
}

fn write_fixture(dir: &Path) {
    std::fs::create_dir(dir.join("layouts")).unwrap();
    std::fs::write(dir.join("layouts/greeting.html"), "<p>Hi ${name}</p>").unwrap();
    std::fs::write(
        dir.join("application.properties"),
        "scanPackage=shop\ntemplateRoot=layouts\nserver.address=127.0.0.1:9090\nserver.contextPath=/shop\n",
    )
    .unwrap();
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[test]
fn test_build_from_properties_file() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let application = ApplicationBuilder::new()
        .add_config_file(dir.path().join("application.properties"))
        .unwrap()
        .build(registry())
        .unwrap();

    let settings = application.server_settings();
    assert_eq!(settings.context_path(), "/shop");
    assert_eq!(settings.socket_addr().unwrap().port(), 9090);

    let template_root = application.context().config().template_root().unwrap();
    assert_eq!(Path::new(template_root), dir.path().join("layouts"));
    assert_eq!(application.dispatcher().view_resolvers().len(), 1);
    assert_eq!(application.dispatcher().handler_mappings().len(), 2);
}

#[test]
fn test_missing_config_file() {
    let err = ApplicationBuilder::new()
        .add_config_file("/nonexistent/application.properties")
        .err()
        .unwrap();
    assert!(matches!(err, FrameworkError::ConfigError { .. }));
}

#[test]
fn test_missing_scan_package_is_fatal() {
    let err = ApplicationBuilder::new()
        .with_context_config(ContextConfig::default())
        .build(registry())
        .unwrap_err();
    assert!(matches!(err, FrameworkError::ConfigError { .. }));
}

#[test]
fn test_default_server_settings() {
    let settings = ServerSettings::default();
    assert_eq!(settings.context_path(), "");
    assert_eq!(
        settings.socket_addr().unwrap(),
        DEFAULT_ADDRESS.parse::<std::net::SocketAddr>().unwrap()
    );

    let invalid = ServerSettings {
        address: Some("not an address".to_string()),
        ..ServerSettings::default()
    };
    assert!(matches!(
        invalid.socket_addr(),
        Err(FrameworkError::BootstrapFailed { .. })
    ));
}

#[tokio::test]
async fn test_get_query_string_reaches_handler() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let application = ApplicationBuilder::new()
        .add_config_file(dir.path().join("application.properties"))
        .unwrap()
        .build(registry())
        .unwrap();

    let response = application
        .router()
        .oneshot(
            Request::get("/shop/greet/hello?name=Ada%20Lovelace")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "hello AdaLovelace");
}

#[tokio::test]
async fn test_form_post_is_rendered() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let application = ApplicationBuilder::new()
        .add_config_file(dir.path().join("application.properties"))
        .unwrap()
        .build(registry())
        .unwrap();

    let response = application
        .router()
        .oneshot(
            Request::post("/shop/greet/page")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("name=Grace"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(body_text(response).await, "<p>Hi Grace</p>");
}

#[tokio::test]
async fn test_unmapped_path_and_method() {
    let application = ApplicationBuilder::new()
        .with_context_config(ContextConfig::new("shop"))
        .build(registry())
        .unwrap();

    let response = application
        .router()
        .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "404 Not Found");

    let response = application
        .router()
        .oneshot(
            Request::delete("/greet/hello")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
