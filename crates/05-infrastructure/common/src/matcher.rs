//! 文本匹配策略
//!
//! 切点与路由都基于正则的整串匹配，策略通过 [`Matcher`] 隔离以便替换

use crate::errors::ConfigError;
use regex::Regex;
use std::fmt;

/// 匹配器 trait
pub trait Matcher: Send + Sync + fmt::Debug {
    /// 候选字符串是否整体匹配
    fn matches(&self, candidate: &str) -> bool;

    /// 匹配模式的文本形式
    fn pattern(&self) -> &str;
}

/// 正则匹配器，语义为整串匹配
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    source: String,
    regex: Regex,
}

impl RegexMatcher {
    /// 编译正则
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
            ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }
}

impl Matcher for RegexMatcher {
    fn matches(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    fn pattern(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for RegexMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
