//! 演示应用的端到端测试：属性文件 → 容器 → 切面代理 → 分发 → 模板

use aop_impl::AopProxy;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use config_impl::providers::EnvironmentConfigProviderImpl;
use demo_app::action::TestAction;
use demo_app::service::DemoServiceImpl;
use di_abstractions::BeanFactory;
use infrastructure_common::{ConfigError, FrameworkError};
use infrastructure_composition::{Application, ApplicationBuilder};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use webmvc::HttpRequest;

fn config_file() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demo-app/application.properties")
}

fn application() -> anyhow::Result<Application> {
    let application = ApplicationBuilder::new()
        .add_config_file(config_file())?
        .build(demo_app::type_registry()?)?;
    Ok(application)
}

async fn get(application: &Application, uri: &str) -> (StatusCode, String) {
    let response = application
        .router()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[test]
fn test_demo_container_layout() -> anyhow::Result<()> {
    let application = application()?;
    let context = application.context();

    assert_eq!(
        context.bean_names(),
        vec![
            "testServiceImpl",
            "demo.service.ITestService",
            "demoServiceImpl",
            "demo.service.IDemoService",
            "testAction",
            "pageAction",
        ]
    );
    assert!(!context.contains_bean("logAspect"));

    // 服务被代理，控制器不在切点范围内
    assert!(context.get_bean("testServiceImpl")?.is_proxy());
    assert!(context.get_bean("demo.service.IDemoService")?.is_proxy());
    assert!(!context.get_bean("testAction")?.is_proxy());
    assert!(context.binding_errors().is_empty());
    Ok(())
}

#[test]
fn test_cycle_peers_are_wired_behind_proxies() -> anyhow::Result<()> {
    let application = application()?;
    let context = application.context();

    let bean = context.get_bean("demoServiceImpl")?;
    let proxy = bean.as_any().downcast_ref::<AopProxy>().unwrap();
    let demo_service = proxy
        .target()
        .as_any()
        .downcast_ref::<DemoServiceImpl>()
        .unwrap();
    assert!(demo_service.is_wired());

    let action = context.get_typed::<TestAction>("testAction")?;
    assert!(format!("{:?}", action).contains("demo.service.TestServiceImpl"));
    Ok(())
}

#[test]
fn test_query_through_dispatcher() -> anyhow::Result<()> {
    let application = application()?;
    let response = application
        .dispatcher()
        .service(HttpRequest::get("/test/query").with_param("name", "Ada"));

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.body_text(),
        "{name=Ada, address=null, data====================Ada======================}"
    );
    Ok(())
}

#[test]
fn test_after_throw_advice_swallows_service_failure() -> anyhow::Result<()> {
    let application = application()?;
    let dispatcher = application.dispatcher();

    let ok = dispatcher.service(HttpRequest::get("/test/verify").with_param("name", "Ada"));
    assert_eq!(ok.body_text(), "verified=true");

    let swallowed = dispatcher.service(HttpRequest::get("/test/verify"));
    assert_eq!(swallowed.status(), 200);
    assert_eq!(swallowed.body_text(), "verified=false");
    Ok(())
}

#[tokio::test]
async fn test_pages_over_http() -> anyhow::Result<()> {
    let application = application()?;

    let (status, body) = get(&application, "/page/first?name=Ada").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>Lorn Mini Container</title>"));
    assert!(body.contains("<p>Hello, Ada</p>"));
    assert!(body.contains("<p>欢迎, Ada</p>"));

    let (status, body) = get(&application, "/page/fail").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("<h1>500 Exception</h1>"));
    assert!(body.contains("demo.action.PageAction.fail"));
    assert!(body.contains("页面处理失败"));

    let (status, body) = get(&application, "/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("<h1>404 Not Found</h1>"));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_requests_share_one_context() -> anyhow::Result<()> {
    let application = Arc::new(application()?);

    let mut handles = Vec::new();
    for i in 0..16 {
        let application = Arc::clone(&application);
        handles.push(tokio::spawn(async move {
            get(&application, &format!("/test/query?name=user{}", i)).await
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let (status, body) = handle.await?;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with(&format!("{{name=user{},", i)));
    }
    Ok(())
}

#[test]
fn test_environment_overrides_properties() -> anyhow::Result<()> {
    let provider = EnvironmentConfigProviderImpl::from_vars(
        "MINI",
        [("MINI_SCAN_PACKAGE".to_string(), "nowhere".to_string())],
    );
    let err = ApplicationBuilder::new()
        .add_config_file(config_file())?
        .add_provider(Box::new(provider))
        .build(demo_app::type_registry()?)
        .unwrap_err();

    assert!(matches!(
        err,
        FrameworkError::ConfigError {
            source: ConfigError::ScanRootNotFound { .. }
        }
    ));
    Ok(())
}
