//! 类型扫描器抽象接口

use infrastructure_common::ConfigError;

/// 类型扫描器 trait
///
/// 遍历包命名空间，返回其中所有类型的全限定名
pub trait TypeScanner: Send + Sync {
    /// 扫描指定包（含子包）
    ///
    /// 包无法解析时返回 [`ConfigError::ScanRootNotFound`]
    fn scan(&self, package: &str) -> Result<Vec<String>, ConfigError>;

    /// 获取扫描器名称
    fn name(&self) -> &str;
}

/// 判断类型所在包是否位于扫描根包之下
pub fn in_package(type_package: &str, scan_package: &str) -> bool {
    type_package == scan_package
        || type_package
            .strip_prefix(scan_package)
            .is_some_and(|rest| rest.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_package() {
        assert!(in_package("demo", "demo"));
        assert!(in_package("demo.service", "demo"));
        assert!(!in_package("demonstration", "demo"));
        assert!(!in_package("other.demo", "demo"));
    }
}
