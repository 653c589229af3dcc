//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
///
/// 启动期致命错误，出现即终止容器初始化
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置序列化失败: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("扫描包无法解析: {package}")]
    ScanRootNotFound { package: String },

    #[error("类型未注册: {type_name}")]
    TypeNotFound { type_name: String },

    #[error("类型缺少无参构造: {type_name}")]
    NotInstantiable { type_name: String },

    #[error("类型重复注册: {type_name}")]
    DuplicateType { type_name: String },

    #[error("The {name} is exist")]
    DuplicateBeanDefinition { name: String },

    #[error("切点表达式无效: {expression}, 原因: {message}")]
    InvalidPointcut { expression: String, message: String },

    #[error("匹配模式无效: {pattern}, 原因: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("切面类型未注册: {type_name}")]
    AspectNotFound { type_name: String },

    #[error("切面方法不存在: {aspect}.{method}")]
    AdviceMethodNotFound { aspect: String, method: String },

    #[error("模板目录不存在: {path}")]
    TemplateRootNotFound { path: String },
}

/// 依赖查找错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {name}")]
    NoSuchBean { name: String },

    #[error("组件类型不匹配: {name}, 期望 {expected}")]
    TypeMismatch { name: String, expected: String },
}

/// 依赖注入错误类型
///
/// 非致命：记录日志后字段保持未注入
#[derive(Error, Debug, Clone)]
pub enum BindingError {
    #[error("无法解析依赖: {bean}.{field} -> {target}")]
    UnresolvedDependency {
        bean: String,
        field: String,
        target: String,
    },

    #[error("字段已注入: {field}")]
    AlreadyBound { field: String },

    #[error("未知注入字段: {type_name}.{field}")]
    UnknownField { type_name: String, field: String },
}

/// 方法调用错误类型
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("方法不存在: {type_name}.{method}")]
    NoSuchMethod { type_name: String, method: String },

    #[error("参数不匹配: {method} 第 {index} 个参数, 期望 {expected}")]
    ArgumentMismatch {
        method: String,
        index: usize,
        expected: String,
    },

    #[error("依赖未注入, 无法调用: {method}")]
    Unbound { method: String },

    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("通知执行失败: {advice}")]
    Advice {
        advice: String,
        #[source]
        source: Box<InvocationError>,
    },
}

impl InvocationError {
    /// 创建方法不存在错误
    pub fn no_such_method(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self::NoSuchMethod {
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    /// 创建参数不匹配错误
    pub fn argument(method: impl Into<String>, index: usize, expected: impl Into<String>) -> Self {
        Self::ArgumentMismatch {
            method: method.into(),
            index,
            expected: expected.into(),
        }
    }

    /// 创建业务失败错误
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带原因的业务失败错误
    pub fn failed_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Failed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// 请求分发错误类型
///
/// 只在分发器内部传播，边界处转换为 404/500 视图
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("404 Not Found: {path}")]
    NoHandlerFound { path: String },

    #[error("处理器执行失败: {handler}")]
    HandlerFailed {
        handler: String,
        #[source]
        source: InvocationError,
    },

    #[error("处理器执行时发生 panic: {handler}: {message}")]
    HandlerPanicked { handler: String, message: String },

    #[error("视图渲染失败: {view}")]
    RenderFailed {
        view: String,
        #[source]
        source: std::io::Error,
    },
}

/// 框架错误类型
#[derive(Error, Debug)]
pub enum FrameworkError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("启动失败: {message}")]
    BootstrapFailed { message: String },

    #[error("服务运行失败: {message}")]
    ServerFailed { message: String },
}

/// 把错误及其 source 链展开为摘要，用作 500 视图的调用栈信息
pub fn stack_summary(error: &(dyn std::error::Error + 'static)) -> String {
    let mut frames = vec![error.to_string()];
    let mut current = error.source();
    while let Some(cause) = current {
        frames.push(cause.to_string());
        current = cause.source();
    }
    format!("[{}]", frames.join(", caused by: "))
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type BindingResult<T> = Result<T, BindingError>;
pub type InvocationResult = Result<crate::value::Value, InvocationError>;
pub type DispatchResult<T> = Result<T, DispatchError>;
pub type FrameworkResult<T> = Result<T, FrameworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_summary_walks_source_chain() {
        let error = DispatchError::HandlerFailed {
            handler: "demo.action.TestAction.query".to_string(),
            source: InvocationError::failed("boom"),
        };

        let summary = stack_summary(&error);
        assert!(summary.starts_with('['));
        assert!(summary.contains("demo.action.TestAction.query"));
        assert!(summary.contains("caused by: boom"));
    }
}
