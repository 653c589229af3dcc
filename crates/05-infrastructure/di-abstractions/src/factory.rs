//! 组件查找抽象接口

use infrastructure_common::{BeanRef, DependencyError};

/// 组件查找 trait
///
/// 容器构建完成后只读，可在多个线程间共享
pub trait BeanFactory: Send + Sync {
    /// 按注册名称获取组件
    fn get_bean(&self, name: &str) -> Result<BeanRef, DependencyError>;

    /// 按类型全限定名获取组件
    ///
    /// 先按实现类型查找，再按能力接口名称查找
    fn get_bean_by_type(&self, type_name: &str) -> Result<BeanRef, DependencyError>;

    /// 是否包含指定名称的组件
    fn contains_bean(&self, name: &str) -> bool {
        self.get_bean(name).is_ok()
    }

    /// 组件定义数量
    fn bean_count(&self) -> usize;

    /// 全部注册名称（注册顺序）
    fn bean_names(&self) -> Vec<String>;
}
