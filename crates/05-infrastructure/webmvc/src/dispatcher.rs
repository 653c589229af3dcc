//! 请求分发器

use crate::adapter::HandlerAdapter;
use crate::http::{HttpRequest, HttpResponse, ResponseWriter};
use crate::mapping::HandlerMapping;
use crate::model::ModelAndView;
use crate::view::ViewResolver;
use di_impl::ApplicationContext;
use infrastructure_common::{stack_summary, ConfigError, DispatchError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

/// 未找到处理器时的视图名
pub const NOT_FOUND_VIEW: &str = "404";
/// 处理失败时的视图名
pub const ERROR_VIEW: &str = "500";

/// 请求分发器
///
/// 初始化完成后只读，可在多个线程中并发调用 [`DispatcherServlet::service`]
#[derive(Debug)]
pub struct DispatcherServlet {
    context: Arc<ApplicationContext>,
    handler_mappings: Vec<HandlerMapping>,
    adapter: HandlerAdapter,
    view_resolvers: Vec<ViewResolver>,
}

impl DispatcherServlet {
    /// 基于已完成初始化的容器建立映射和视图解析器
    pub fn init(context: Arc<ApplicationContext>) -> Result<Self, ConfigError> {
        let handler_mappings = HandlerMapping::build_all(&context)?;

        let view_resolvers = match context.config().template_root() {
            Some(root) => ViewResolver::scan(Path::new(root))?,
            None => {
                warn!("未配置 templateRoot, 只使用内置的 404/500 文本响应");
                Vec::new()
            }
        };

        info!(
            "分发器初始化完成: {} 个处理器映射, {} 个视图",
            handler_mappings.len(),
            view_resolvers.len()
        );
        Ok(Self {
            context,
            handler_mappings,
            adapter: HandlerAdapter::new(),
            view_resolvers,
        })
    }

    /// 处理一个请求，GET 与 POST 走同一路径
    ///
    /// 分发过程中的错误不会传播到调用方：未匹配返回 404 视图，其余返回 500 视图
    pub fn service(&self, request: HttpRequest) -> HttpResponse {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "dispatch",
            %request_id,
            method = %request.method(),
            uri = %request.uri()
        );
        let _guard = span.enter();

        let request = Arc::new(request);
        let response = Arc::new(ResponseWriter::new());

        if let Err(error) = self.do_dispatch(&request, &response) {
            let view = match &error {
                DispatchError::NoHandlerFound { .. } => {
                    warn!("{}", error);
                    response.set_status(404);
                    ModelAndView::new(NOT_FOUND_VIEW)
                }
                _ => {
                    error!("请求处理失败: {}", error);
                    response.set_status(500);
                    ModelAndView::new(ERROR_VIEW)
                        .with("detail", "500 Exception")
                        .with("stackTrace", stack_summary(&error))
                }
            };

            response.reset();
            if let Err(render_error) = self.process_dispatch_result(&response, &view) {
                error!("错误视图渲染失败: {}", render_error);
                response.reset();
                write_fallback(&response, &view);
            }
        }

        response.to_response()
    }

    fn do_dispatch(
        &self,
        request: &Arc<HttpRequest>,
        response: &Arc<ResponseWriter>,
    ) -> Result<(), DispatchError> {
        let path = request.path();
        let found = path.as_deref().and_then(|path| self.get_handler(path));
        let Some(mapping) = found else {
            return Err(DispatchError::NoHandlerFound {
                path: path.unwrap_or_else(|| request.uri().to_string()),
            });
        };

        // 处理器 panic 与返回错误一样转换为 500
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.adapter.handle(mapping, request, response)
        }))
        .map_err(|payload| DispatchError::HandlerPanicked {
            handler: mapping.handler_name(),
            message: panic_message(payload.as_ref()),
        })?;
        let view = outcome.map_err(|source| DispatchError::HandlerFailed {
            handler: mapping.handler_name(),
            source,
        })?;

        match view {
            Some(view) => self.process_dispatch_result(response, &view),
            None => Ok(()),
        }
    }

    /// 第一个匹配的映射胜出
    pub fn get_handler(&self, path: &str) -> Option<&HandlerMapping> {
        self.handler_mappings.iter().find(|m| m.matches(path))
    }

    /// 按视图名找到解析器并渲染；404/500 没有模板时写入内置文本
    fn process_dispatch_result(
        &self,
        response: &ResponseWriter,
        view: &ModelAndView,
    ) -> Result<(), DispatchError> {
        let resolved = self
            .view_resolvers
            .iter()
            .find(|resolver| resolver.name() == view.view_name())
            .and_then(|resolver| resolver.resolve_view_name(view.view_name()));

        let Some(template) = resolved else {
            if !write_fallback(response, view) {
                warn!("视图不存在: {}", view.view_name());
            }
            return Ok(());
        };

        let body = template
            .render(view.model())
            .map_err(|source| DispatchError::RenderFailed {
                view: view.view_name().to_string(),
                source,
            })?;
        response.set_content_type("text/html; charset=UTF-8");
        response.write(&body);
        Ok(())
    }

    /// 全部处理器映射
    pub fn handler_mappings(&self) -> &[HandlerMapping] {
        &self.handler_mappings
    }

    /// 全部视图解析器
    pub fn view_resolvers(&self) -> &[ViewResolver] {
        &self.view_resolvers
    }

    /// 应用上下文
    pub fn context(&self) -> &Arc<ApplicationContext> {
        &self.context
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// 写入内置的 404/500 文本，其他视图返回 `false`
fn write_fallback(response: &ResponseWriter, view: &ModelAndView) -> bool {
    match view.view_name() {
        NOT_FOUND_VIEW => response.write("404 Not Found"),
        ERROR_VIEW => {
            let detail = view
                .get("stackTrace")
                .map(ToString::to_string)
                .unwrap_or_default();
            response.write(&format!("500 Exception, Detail: {}", detail));
        }
        _ => return false,
    }
    true
}
