//! 处理器映射

use crate::http::collapse_slashes;
use di_impl::ApplicationContext;
use infrastructure_common::{
    BeanRef, ConfigError, Matcher, MethodDescriptor, RegexMatcher, TypeDescriptor,
};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// 路由正则到控制器方法的映射，启动后只读
#[derive(Clone)]
pub struct HandlerMapping {
    matcher: Arc<dyn Matcher>,
    controller: BeanRef,
    descriptor: Arc<TypeDescriptor>,
    method: MethodDescriptor,
}

impl HandlerMapping {
    /// 创建映射
    pub fn new(
        matcher: Arc<dyn Matcher>,
        controller: BeanRef,
        descriptor: Arc<TypeDescriptor>,
        method: MethodDescriptor,
    ) -> Self {
        Self {
            matcher,
            controller,
            descriptor,
            method,
        }
    }

    /// 按控制器声明顺序生成全部映射
    pub fn build_all(context: &ApplicationContext) -> Result<Vec<HandlerMapping>, ConfigError> {
        let mut mappings = Vec::new();

        for (descriptor, controller) in context.controllers() {
            let base = descriptor.base_route().unwrap_or("");
            for method in descriptor.methods() {
                let Some(route) = method.route.as_deref() else {
                    continue;
                };

                let pattern = route_pattern(base, route);
                let matcher = RegexMatcher::new(&pattern)?;
                info!(
                    "Mapped: {} -> {}.{}",
                    pattern,
                    descriptor.qualified_name(),
                    method.name
                );
                mappings.push(HandlerMapping::new(
                    Arc::new(matcher),
                    Arc::clone(controller),
                    Arc::clone(descriptor),
                    method.clone(),
                ));
            }
        }

        Ok(mappings)
    }

    /// 路径是否匹配
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }

    /// 路由正则
    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }

    /// 控制器实例
    pub fn controller(&self) -> &BeanRef {
        &self.controller
    }

    /// 处理方法描述
    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    /// `类型全限定名.方法名`
    pub fn handler_name(&self) -> String {
        format!("{}.{}", self.descriptor.qualified_name(), self.method.name)
    }
}

impl fmt::Debug for HandlerMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerMapping")
            .field("pattern", &self.pattern())
            .field("handler", &self.handler_name())
            .finish()
    }
}

/// 把类型级和方法级路由拼接成正则
///
/// 独占一段的 `*` 匹配零个或多个路径段，因此 `/test/*` 加 `query` 同时匹配
/// `/test/query` 和 `/test/a/query`；段内的 `*` 匹配任意字符；其余字符按字面匹配
pub fn route_pattern(base: &str, route: &str) -> String {
    let joined = collapse_slashes(&format!("/{}/{}", base, route));
    let mut pattern = String::new();

    for segment in joined.split('/').skip(1) {
        if segment == "*" {
            pattern.push_str("(?:/.*)?");
            continue;
        }
        pattern.push('/');
        let literal = segment
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        pattern.push_str(&literal);
    }

    if pattern.is_empty() {
        pattern.push('/');
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(base: &str, route: &str) -> RegexMatcher {
        RegexMatcher::new(&route_pattern(base, route)).unwrap()
    }

    #[test]
    fn test_segment_wildcard() {
        let matcher = matcher("/test/*", "query");
        assert!(matcher.matches("/test/query"));
        assert!(matcher.matches("/test/a/b/query"));
        assert!(!matcher.matches("/testing/query"));
        assert!(!matcher.matches("/test/queryx"));
    }

    #[test]
    fn test_separators_are_collapsed() {
        assert_eq!(route_pattern("/test", "/query"), "/test/query");
        assert_eq!(route_pattern("", "query"), "/query");
        assert_eq!(route_pattern("", ""), "/");
        assert_eq!(route_pattern("/api/", "/v1.0/list"), "/api/v1\\.0/list");
    }

    #[test]
    fn test_embedded_wildcard() {
        let matcher = matcher("/files", "*.html");
        assert!(matcher.matches("/files/index.html"));
        assert!(!matcher.matches("/files/index.htm"));
    }
}
