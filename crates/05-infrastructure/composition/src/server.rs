//! HTTP 绑定
//!
//! axum 只负责收发字节：每个请求被转换为 [`HttpRequest`]，在阻塞线程池中交给
//! [`DispatcherServlet::service`]，结果再转换回 axum 响应。

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use infrastructure_common::{FrameworkError, FrameworkResult};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use webmvc::{DispatcherServlet, HttpRequest, HttpResponse};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Clone)]
struct ServerState {
    dispatcher: Arc<DispatcherServlet>,
    context_path: Arc<str>,
}

/// 构建路由：全部 GET/POST 请求交给分发器，其余方法返回 405
pub fn router(dispatcher: Arc<DispatcherServlet>, context_path: &str) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(ServerState {
            dispatcher,
            context_path: Arc::from(context_path),
        })
        .layer(TraceLayer::new_for_http())
}

async fn dispatch(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method != Method::GET && method != Method::POST {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let request = to_request(&method, &uri, &headers, &body, &state.context_path);
    let dispatcher = Arc::clone(&state.dispatcher);
    match tokio::task::spawn_blocking(move || dispatcher.service(request)).await {
        Ok(response) => into_axum_response(response),
        Err(e) => {
            error!("分发任务异常终止: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// 转换请求：查询串与表单体合并为参数表，头名转小写
pub fn to_request(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: &[u8],
    context_path: &str,
) -> HttpRequest {
    let mut request =
        HttpRequest::new(method.as_str(), uri.path()).with_context_path(context_path);

    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            request = request.with_header(name.as_str(), value);
        }
    }

    if let Some(query) = uri.query() {
        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            request.add_param(name, value);
        }
    }

    let is_form = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));
    if *method == Method::POST && is_form {
        for (name, value) in url::form_urlencoded::parse(body) {
            request.add_param(name, value);
        }
    }

    request
}

fn into_axum_response(response: HttpResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = response.content_type().to_string();
    (
        status,
        [(header::CONTENT_TYPE, content_type)],
        response.into_body(),
    )
        .into_response()
}

/// 绑定地址并运行服务，Ctrl-C 时优雅退出
pub async fn serve(router: Router, address: SocketAddr) -> FrameworkResult<()> {
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|e| FrameworkError::ServerFailed {
            message: format!("绑定地址 {} 失败: {}", address, e),
        })?;
    info!("HTTP 服务已启动: http://{}", address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FrameworkError::ServerFailed {
            message: e.to_string(),
        })?;

    info!("HTTP 服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("监听退出信号失败: {}", e);
    }
}
