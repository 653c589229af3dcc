//! 组装完成的应用

use crate::server;
use axum::Router;
use di_impl::ApplicationContext;
use infrastructure_common::{non_blank, FrameworkError, FrameworkResult};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use webmvc::DispatcherServlet;

/// 默认监听地址
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:8080";

/// `server.*` 配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// 监听地址
    pub address: Option<String>,
    /// 应用上下文路径
    #[serde(rename = "contextPath")]
    pub context_path: Option<String>,
}

impl ServerSettings {
    /// 解析监听地址，未配置时使用 [`DEFAULT_ADDRESS`]
    pub fn socket_addr(&self) -> FrameworkResult<SocketAddr> {
        let address = non_blank(self.address.as_deref()).unwrap_or(DEFAULT_ADDRESS);
        address.parse().map_err(|e| FrameworkError::BootstrapFailed {
            message: format!("无效的监听地址 {}: {}", address, e),
        })
    }

    /// 上下文路径，未配置时为空串
    pub fn context_path(&self) -> &str {
        non_blank(self.context_path.as_deref()).unwrap_or("")
    }
}

/// 应用：只读容器加分发器
#[derive(Debug, Clone)]
pub struct Application {
    context: Arc<ApplicationContext>,
    dispatcher: Arc<DispatcherServlet>,
    server: ServerSettings,
}

impl Application {
    /// 由容器、分发器和服务配置组装应用
    pub fn new(
        context: Arc<ApplicationContext>,
        dispatcher: Arc<DispatcherServlet>,
        server: ServerSettings,
    ) -> Self {
        Self {
            context,
            dispatcher,
            server,
        }
    }

    /// 只读容器
    pub fn context(&self) -> &Arc<ApplicationContext> {
        &self.context
    }

    /// 请求分发器
    pub fn dispatcher(&self) -> &Arc<DispatcherServlet> {
        &self.dispatcher
    }

    /// `server.*` 配置
    pub fn server_settings(&self) -> &ServerSettings {
        &self.server
    }

    /// 把分发器挂到 axum 路由上
    pub fn router(&self) -> Router {
        server::router(Arc::clone(&self.dispatcher), self.server.context_path())
    }

    /// 启动 HTTP 服务，直到收到 Ctrl-C
    ///
    /// `address` 为空时使用 `server.address` 配置
    pub async fn serve(&self, address: Option<SocketAddr>) -> FrameworkResult<()> {
        let address = match address {
            Some(address) => address,
            None => self.server.socket_addr()?,
        };
        server::serve(self.router(), address).await
    }
}
