//! 通知配置与编译

use crate::pointcut::Pointcut;
use infrastructure_common::{
    non_blank, BeanRef, ConfigError, ContextConfig, InvocationError, InvocationResult,
    TypeDescriptor, TypeRegistry, Value,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// 通知种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdviceKind {
    /// 方法调用前
    Before,
    /// 方法调用后，无论成功与否
    After,
    /// 方法返回错误时
    AfterThrow,
}

impl AdviceKind {
    /// 配置中使用的名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::AfterThrow => "afterThrow",
        }
    }
}

impl fmt::Display for AdviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 切面配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceConfig {
    /// 切点表达式
    pub pointcut: String,
    /// 切面类型全限定名
    pub aspect_type: String,
    /// 前置通知方法名
    pub before: Option<String>,
    /// 后置通知方法名
    pub after: Option<String>,
    /// 异常通知方法名
    pub after_throw: Option<String>,
    /// 异常通知中接收错误的参数名
    pub after_throwing_name: Option<String>,
}

impl AdviceConfig {
    /// 从上下文配置读取，未配置切点时返回 `None`
    ///
    /// 配置了切点却没有切面类型是配置错误
    pub fn from_context(config: &ContextConfig) -> Result<Option<Self>, ConfigError> {
        let Some(pointcut) = config.point_cut() else {
            return Ok(None);
        };
        let aspect_type = non_blank(config.aspect_class.as_deref()).ok_or_else(|| {
            ConfigError::KeyNotFound {
                key: "aspectClass".to_string(),
            }
        })?;

        let owned = |value: &Option<String>| non_blank(value.as_deref()).map(str::to_string);
        Ok(Some(Self {
            pointcut: pointcut.to_string(),
            aspect_type: aspect_type.to_string(),
            before: owned(&config.aspect_before),
            after: owned(&config.aspect_after),
            after_throw: owned(&config.aspect_after_throw),
            after_throwing_name: owned(&config.aspect_after_throwing_name),
        }))
    }

    /// 已配置的通知方法
    fn advice_methods(&self) -> impl Iterator<Item = (AdviceKind, &str)> {
        [
            (AdviceKind::Before, self.before.as_deref()),
            (AdviceKind::After, self.after.as_deref()),
            (AdviceKind::AfterThrow, self.after_throw.as_deref()),
        ]
        .into_iter()
        .filter_map(|(kind, method)| method.map(|m| (kind, m)))
    }
}

/// 单条通知：切面实例加上绑定的方法
#[derive(Clone)]
pub struct Advice {
    aspect: BeanRef,
    method: String,
    /// 方法声明了参数时，异常通知会收到错误描述
    accepts_error: bool,
    throwing_name: Option<String>,
}

impl Advice {
    /// 调用通知方法
    pub fn invoke(&self, error: Option<&str>) -> InvocationResult {
        match (self.accepts_error, error) {
            (true, Some(message)) => {
                debug!(
                    "异常通知 {} 绑定 {}",
                    self.method,
                    self.throwing_name.as_deref().unwrap_or("<unnamed>")
                );
                self.aspect.invoke(&self.method, &[Value::from(message)])
            }
            (true, None) => self.aspect.invoke(&self.method, &[Value::Null]),
            (false, _) => self.aspect.invoke(&self.method, &[]),
        }
    }

    /// 绑定的通知方法名
    pub fn method(&self) -> &str {
        &self.method
    }

    /// 切面实例
    pub fn aspect(&self) -> &BeanRef {
        &self.aspect
    }
}

impl fmt::Debug for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Advice({}.{})", self.aspect.type_name(), self.method)
    }
}

/// 一个方法上的通知集合
#[derive(Debug, Clone, Default)]
pub struct MethodAdvices {
    /// 前置通知
    pub before: Option<Advice>,
    /// 后置通知
    pub after: Option<Advice>,
    /// 异常通知
    pub after_throw: Option<Advice>,
}

impl MethodAdvices {
    /// 按种类获取
    pub fn get(&self, kind: AdviceKind) -> Option<&Advice> {
        match kind {
            AdviceKind::Before => self.before.as_ref(),
            AdviceKind::After => self.after.as_ref(),
            AdviceKind::AfterThrow => self.after_throw.as_ref(),
        }
    }

    fn set(&mut self, kind: AdviceKind, advice: Advice) {
        match kind {
            AdviceKind::Before => self.before = Some(advice),
            AdviceKind::After => self.after = Some(advice),
            AdviceKind::AfterThrow => self.after_throw = Some(advice),
        }
    }

    /// 执行指定种类的通知，未配置时为空操作
    ///
    /// 通知自身失败会被包装为 [`InvocationError::Advice`] 向上抛出
    pub fn run(&self, kind: AdviceKind, error: Option<&str>) -> Result<(), InvocationError> {
        match self.get(kind) {
            Some(advice) => advice
                .invoke(error)
                .map(|_| ())
                .map_err(|e| InvocationError::Advice {
                    advice: format!("{}:{}", kind, advice.method()),
                    source: Box::new(e),
                }),
            None => Ok(()),
        }
    }
}

/// 方法通知表：规范签名到通知集合
#[derive(Debug, Clone, Default)]
pub struct MethodAdviceTable {
    entries: HashMap<String, Arc<MethodAdvices>>,
}

impl MethodAdviceTable {
    /// 按规范签名查找
    pub fn get(&self, signature: &str) -> Option<&Arc<MethodAdvices>> {
        self.entries.get(signature)
    }

    /// 已匹配的方法数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否没有任何匹配的方法
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 已匹配的签名
    pub fn signatures(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// 切面支持
///
/// 启动时编译一次切点，然后针对每个目标类型生成方法通知表
#[derive(Debug, Clone)]
pub struct AdviceSupport {
    config: AdviceConfig,
    pointcut: Pointcut,
    aspect: Arc<TypeDescriptor>,
}

impl AdviceSupport {
    /// 编译切面配置，并检查切面类型及其通知方法
    pub fn new(config: AdviceConfig, registry: &TypeRegistry) -> Result<Self, ConfigError> {
        let pointcut = Pointcut::parse(&config.pointcut)?;
        Self::with_pointcut(config, pointcut, registry)
    }

    /// 使用已构造的切点
    pub fn with_pointcut(
        config: AdviceConfig,
        pointcut: Pointcut,
        registry: &TypeRegistry,
    ) -> Result<Self, ConfigError> {
        let aspect = registry
            .get(&config.aspect_type)
            .cloned()
            .ok_or_else(|| ConfigError::AspectNotFound {
                type_name: config.aspect_type.clone(),
            })?;

        for (_, method) in config.advice_methods() {
            if aspect.find_method(method).is_none() {
                return Err(ConfigError::AdviceMethodNotFound {
                    aspect: config.aspect_type.clone(),
                    method: method.to_string(),
                });
            }
        }

        info!(
            "切面已编译: {} (类型规则 {})",
            config.pointcut,
            pointcut.class_pattern()
        );
        Ok(Self {
            config,
            pointcut,
            aspect,
        })
    }

    /// 从上下文配置创建，未配置切点时返回 `None`
    pub fn from_context(
        config: &ContextConfig,
        registry: &TypeRegistry,
    ) -> Result<Option<Self>, ConfigError> {
        AdviceConfig::from_context(config)?
            .map(|advice| Self::new(advice, registry))
            .transpose()
    }

    /// 目标类型是否需要代理
    pub fn class_matches(&self, target: &TypeDescriptor) -> bool {
        self.pointcut.matches_class(&target.qualified_name())
    }

    /// 为目标类型生成方法通知表，每条通知持有新建的切面实例
    pub fn compile(&self, target: &TypeDescriptor) -> Result<MethodAdviceTable, ConfigError> {
        let declaring = target.qualified_name();
        let mut table = MethodAdviceTable::default();

        for method in target.methods() {
            let signature = method.signature(&declaring);
            if !self.pointcut.matches_method(&signature) {
                continue;
            }

            let mut advices = MethodAdvices::default();
            for (kind, name) in self.config.advice_methods() {
                advices.set(kind, self.advice(kind, name)?);
            }
            debug!("方法匹配切点: {}", signature);
            table.entries.insert(signature, Arc::new(advices));
        }

        Ok(table)
    }

    fn advice(&self, kind: AdviceKind, method: &str) -> Result<Advice, ConfigError> {
        let aspect = self
            .aspect
            .instantiate()
            .ok_or_else(|| ConfigError::NotInstantiable {
                type_name: self.aspect.qualified_name(),
            })?;
        let accepts_error = kind == AdviceKind::AfterThrow
            && self
                .aspect
                .find_method(method)
                .is_some_and(|m| !m.params.is_empty());

        Ok(Advice {
            aspect,
            method: method.to_string(),
            accepts_error,
            throwing_name: self.config.after_throwing_name.clone(),
        })
    }

    /// 切点
    pub fn pointcut(&self) -> &Pointcut {
        &self.pointcut
    }

    /// 切面配置
    pub fn config(&self) -> &AdviceConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::tests::{registry, RecordingAspect};

    fn context() -> ContextConfig {
        ContextConfig {
            point_cut: Some("public .* demo.service..*ServiceImpl..*(.*)".to_string()),
            aspect_class: Some("demo.aspect.RecordingAspect".to_string()),
            aspect_before: Some("before".to_string()),
            aspect_after: Some("after".to_string()),
            aspect_after_throw: Some("exception".to_string()),
            aspect_after_throwing_name: Some("ex".to_string()),
            ..ContextConfig::new("demo")
        }
    }

    #[test]
    fn test_no_pointcut_means_no_advice() {
        let support = AdviceSupport::from_context(&ContextConfig::new("demo"), &registry()).unwrap();
        assert!(support.is_none());
    }

    #[test]
    fn test_pointcut_without_aspect_is_rejected() {
        let config = ContextConfig {
            aspect_class: None,
            ..context()
        };
        let err = AdviceConfig::from_context(&config).unwrap_err();
        assert!(matches!(err, ConfigError::KeyNotFound { key } if key == "aspectClass"));
    }

    #[test]
    fn test_unknown_aspect_and_method() {
        let config = ContextConfig {
            aspect_class: Some("demo.aspect.Missing".to_string()),
            ..context()
        };
        let err = AdviceSupport::from_context(&config, &registry()).unwrap_err();
        assert!(matches!(err, ConfigError::AspectNotFound { .. }));

        let config = ContextConfig {
            aspect_before: Some("nope".to_string()),
            ..context()
        };
        let err = AdviceSupport::from_context(&config, &registry()).unwrap_err();
        assert!(matches!(err, ConfigError::AdviceMethodNotFound { .. }));
    }

    #[test]
    fn test_compile_table_for_matching_methods() {
        let registry = registry();
        let support = AdviceSupport::from_context(&context(), &registry)
            .unwrap()
            .unwrap();
        let target = registry.get("demo.service.TestServiceImpl").unwrap();

        assert!(support.class_matches(target));
        let table = support.compile(target).unwrap();
        assert_eq!(table.len(), 2);

        let advices = table
            .get("public String demo.service.TestServiceImpl.query(String)")
            .unwrap();
        assert!(advices.before.is_some());
        assert!(advices.after.is_some());
        assert!(advices.after_throw.as_ref().unwrap().accepts_error);

        // 每条通知持有独立的切面实例
        let before = advices.before.as_ref().unwrap().aspect();
        let after = advices.after.as_ref().unwrap().aspect();
        assert!(!Arc::ptr_eq(before, after));
        assert!(before.as_any().downcast_ref::<RecordingAspect>().is_some());
    }

    #[test]
    fn test_blank_advice_names_are_skipped() {
        let config = ContextConfig {
            aspect_after: Some("  ".to_string()),
            aspect_after_throw: None,
            ..context()
        };
        let registry = registry();
        let support = AdviceSupport::from_context(&config, &registry).unwrap().unwrap();
        let table = support
            .compile(registry.get("demo.service.TestServiceImpl").unwrap())
            .unwrap();

        for signature in table.signatures() {
            let advices = table.get(signature).unwrap();
            assert!(advices.before.is_some());
            assert!(advices.after.is_none());
            assert!(advices.after_throw.is_none());
        }
    }
}
