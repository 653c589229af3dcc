//! 容器识别的配置键

/// 组件扫描根包
pub const SCAN_PACKAGE: &str = "scanPackage";
/// 切点表达式
pub const POINT_CUT: &str = "pointCut";
/// 切面类型
pub const ASPECT_CLASS: &str = "aspectClass";
/// 前置通知方法
pub const ASPECT_BEFORE: &str = "aspectBefore";
/// 后置通知方法
pub const ASPECT_AFTER: &str = "aspectAfter";
/// 异常通知方法
pub const ASPECT_AFTER_THROW: &str = "aspectAfterThrow";
/// 异常通知绑定名
pub const ASPECT_AFTER_THROWING_NAME: &str = "aspectAfterThrowingName";
/// 模板根目录
pub const TEMPLATE_ROOT: &str = "templateRoot";
/// 日志级别
pub const LOG_LEVEL: &str = "logLevel";

/// 绑定到 `ContextConfig` 的全部键
pub const CONTEXT_KEYS: [&str; 8] = [
    SCAN_PACKAGE,
    POINT_CUT,
    ASPECT_CLASS,
    ASPECT_BEFORE,
    ASPECT_AFTER,
    ASPECT_AFTER_THROW,
    ASPECT_AFTER_THROWING_NAME,
    TEMPLATE_ROOT,
];
