//! 切点表达式
//!
//! 表达式形如 `public .* demo.service..*ServiceImpl..*(.*)`，
//! 分别派生出类型级匹配和方法级匹配两条规则。
//! 两者并不等价：类型名不满足类型规则时，即使有方法满足方法规则也不会被代理。

use infrastructure_common::{ConfigError, Matcher, RegexMatcher};
use std::fmt;
use std::sync::Arc;

/// 编译后的切点
#[derive(Clone)]
pub struct Pointcut {
    expression: String,
    class_matcher: Arc<dyn Matcher>,
    method_matcher: Arc<dyn Matcher>,
}

impl Pointcut {
    /// 解析切点表达式
    pub fn parse(expression: &str) -> Result<Self, ConfigError> {
        let escaped = escape_expression(expression);

        let class_pattern = class_pattern(&escaped).ok_or_else(|| ConfigError::InvalidPointcut {
            expression: expression.to_string(),
            message: "缺少参数列表或类型段".to_string(),
        })?;
        let method_pattern = escaped.replace('\\', "");

        Ok(Self {
            expression: expression.to_string(),
            class_matcher: Arc::new(compile(expression, &class_pattern)?),
            method_matcher: Arc::new(compile(expression, &method_pattern)?),
        })
    }

    /// 使用自定义匹配策略
    pub fn with_matchers(
        expression: impl Into<String>,
        class_matcher: Arc<dyn Matcher>,
        method_matcher: Arc<dyn Matcher>,
    ) -> Self {
        Self {
            expression: expression.into(),
            class_matcher,
            method_matcher,
        }
    }

    /// 原始表达式
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// 类型全限定名是否满足类型规则
    pub fn matches_class(&self, type_name: &str) -> bool {
        self.class_matcher.matches(type_name)
    }

    /// 方法签名是否满足方法规则，签名末尾的 throws 子句先被去掉
    pub fn matches_method(&self, signature: &str) -> bool {
        self.method_matcher.matches(strip_throws(signature))
    }

    /// 类型规则文本
    pub fn class_pattern(&self) -> &str {
        self.class_matcher.pattern()
    }

    /// 方法规则文本
    pub fn method_pattern(&self) -> &str {
        self.method_matcher.pattern()
    }
}

impl fmt::Debug for Pointcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pointcut")
            .field("expression", &self.expression)
            .field("class", &self.class_matcher.pattern())
            .field("method", &self.method_matcher.pattern())
            .finish()
    }
}

fn compile(expression: &str, pattern: &str) -> Result<RegexMatcher, ConfigError> {
    RegexMatcher::new(pattern).map_err(|e| ConfigError::InvalidPointcut {
        expression: expression.to_string(),
        message: e.to_string(),
    })
}

/// 转义点号和括号，`.*` 保持通配含义
fn escape_expression(expression: &str) -> String {
    expression
        .replace('.', "\\.")
        .replace("\\.*", ".*")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// 截取参数列表之前、去掉方法段后的最后一个空格之后的部分
fn class_pattern(escaped: &str) -> Option<String> {
    let end = escaped.rfind("\\(")?.checked_sub(4)?;
    let head = escaped.get(..end)?.replace('\\', "");
    let start = head.rfind(' ').map_or(0, |i| i + 1);
    Some(head[start..].to_string())
}

/// 去掉签名末尾的 throws 子句
pub fn strip_throws(signature: &str) -> &str {
    match signature.rfind("throw") {
        Some(index) => signature[..index].trim(),
        None => signature,
    }
}
