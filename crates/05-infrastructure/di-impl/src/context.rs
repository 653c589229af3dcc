//! 组件容器
//!
//! 组件实例保存在按实现类型分配的槽位中，注册名称和实现类型都索引到槽位。
//! 槽位状态依次为 `Absent → Raw → Ready`：
//! `Raw` 持有刚构造、尚未完成注入的实例，解析过程中再次遇到该槽位时直接返回它，
//! 从而终止循环依赖；`Ready` 持有最终对外暴露的对象（可能是代理）。
//!
//! 循环依赖会在组件之间形成 `Arc` 环，组件与进程同寿命，这部分内存不会回收。

use aop_impl::{AdviceSupport, AopProxy};
use di_abstractions::{BeanDefinition, BeanDefinitionRegistry, BeanFactory, TypeScanner};
use infrastructure_common::{
    Bean, BeanRef, BindingError, ConfigError, ContextConfig, DependencyError, TypeDescriptor,
    TypeRegistry,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::reader::BeanDefinitionReader;
use crate::scanner::RegistryScanner;

/// 槽位状态
enum SlotState {
    Absent,
    Raw(BeanRef),
    Ready(BeanRef),
}

struct BeanSlot {
    descriptor: Arc<TypeDescriptor>,
    state: SlotState,
}

/// 容器构建上下文
///
/// 持有启动期间的全部可变状态，构建完成后由 [`ContainerBuildContext::finish`] 消费
pub struct ContainerBuildContext {
    registry: Arc<TypeRegistry>,
    advice: Option<AdviceSupport>,
    /// 注册顺序的定义及其槽位
    definitions: Vec<(BeanDefinition, usize)>,
    /// 注册名称到定义下标
    names: HashMap<String, usize>,
    /// 实现类型到槽位
    types: HashMap<String, usize>,
    slots: Vec<BeanSlot>,
    binding_errors: Vec<BindingError>,
}

impl ContainerBuildContext {
    /// 创建构建上下文
    pub fn new(registry: Arc<TypeRegistry>, advice: Option<AdviceSupport>) -> Self {
        Self {
            registry,
            advice,
            definitions: Vec::new(),
            names: HashMap::new(),
            types: HashMap::new(),
            slots: Vec::new(),
            binding_errors: Vec::new(),
        }
    }

    /// 按注册名称或实现类型查找槽位
    fn lookup_slot(&self, name: &str) -> Option<usize> {
        self.names
            .get(name)
            .map(|&index| self.definitions[index].1)
            .or_else(|| self.types.get(name).copied())
    }

    /// 实例化全部已注册的定义
    pub fn instantiate_all(&mut self) -> Result<(), ConfigError> {
        for index in 0..self.definitions.len() {
            let slot = self.definitions[index].1;
            self.resolve(slot)?;
        }
        Ok(())
    }

    /// 按注册名称获取组件，必要时创建
    pub fn get_bean(&mut self, name: &str) -> Result<BeanRef, ConfigError> {
        let slot = self
            .lookup_slot(name)
            .ok_or_else(|| ConfigError::TypeNotFound {
                type_name: name.to_string(),
            })?;
        self.resolve(slot)
    }

    fn resolve(&mut self, slot: usize) -> Result<BeanRef, ConfigError> {
        match &self.slots[slot].state {
            SlotState::Ready(bean) => return Ok(Arc::clone(bean)),
            SlotState::Raw(bean) => {
                debug!("循环依赖, 提前暴露未完成注入的实例: {}", bean.type_name());
                return Ok(Arc::clone(bean));
            }
            SlotState::Absent => {}
        }

        let descriptor = Arc::clone(&self.slots[slot].descriptor);
        let raw = descriptor
            .instantiate()
            .ok_or_else(|| ConfigError::NotInstantiable {
                type_name: descriptor.qualified_name(),
            })?;
        debug!("创建组件实例: {}", descriptor.qualified_name());
        self.slots[slot].state = SlotState::Raw(Arc::clone(&raw));

        self.populate(&descriptor, &raw)?;
        let exposed = self.wrap(&descriptor, raw)?;

        self.slots[slot].state = SlotState::Ready(Arc::clone(&exposed));
        Ok(exposed)
    }

    /// 为注入点赋值，无法解析的依赖记录后跳过
    fn populate(&mut self, descriptor: &TypeDescriptor, bean: &BeanRef) -> Result<(), ConfigError> {
        for field in descriptor.fields() {
            let target = field.target_name();
            let Some(slot) = self.lookup_slot(target) else {
                let error = BindingError::UnresolvedDependency {
                    bean: descriptor.qualified_name(),
                    field: field.name.clone(),
                    target: target.to_string(),
                };
                warn!("{}", error);
                self.binding_errors.push(error);
                continue;
            };

            let dependency = self.resolve(slot)?;
            if let Err(error) = bean.inject(&field.name, dependency) {
                warn!("{}", error);
                self.binding_errors.push(error);
            }
        }
        Ok(())
    }

    /// 类型满足切点时包装为代理
    fn wrap(&self, descriptor: &Arc<TypeDescriptor>, raw: BeanRef) -> Result<BeanRef, ConfigError> {
        let Some(support) = &self.advice else {
            return Ok(raw);
        };
        if !support.class_matches(descriptor) {
            return Ok(raw);
        }

        let table = support.compile(descriptor)?;
        info!("组件 {} 匹配切点, 使用代理", descriptor.qualified_name());
        Ok(Arc::new(AopProxy::new(raw, Arc::clone(descriptor), table)))
    }

    /// 结束构建，得到只读容器
    pub fn finish(self, config: ContextConfig) -> Result<ApplicationContext, ConfigError> {
        let beans = self
            .slots
            .into_iter()
            .map(|slot| match slot.state {
                SlotState::Ready(instance) => Ok(ManagedBean {
                    descriptor: slot.descriptor,
                    instance,
                }),
                _ => Err(ConfigError::NotInstantiable {
                    type_name: slot.descriptor.qualified_name(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ApplicationContext {
            config,
            registry: self.registry,
            definitions: self.definitions,
            names: self.names,
            types: self.types,
            beans,
            binding_errors: self.binding_errors,
        })
    }
}

impl BeanDefinitionRegistry for ContainerBuildContext {
    fn register_definition(&mut self, definition: BeanDefinition) -> Result<(), ConfigError> {
        let name = definition.registered_name();
        if self.names.contains_key(name) {
            return Err(ConfigError::DuplicateBeanDefinition {
                name: name.to_string(),
            });
        }

        let implementation = definition.implementation_type();
        let slot = match self.types.get(implementation) {
            Some(&slot) => slot,
            None => {
                let descriptor = self.registry.get(implementation).cloned().ok_or_else(|| {
                    ConfigError::TypeNotFound {
                        type_name: implementation.to_string(),
                    }
                })?;
                self.slots.push(BeanSlot {
                    descriptor,
                    state: SlotState::Absent,
                });
                self.types
                    .insert(implementation.to_string(), self.slots.len() - 1);
                self.slots.len() - 1
            }
        };

        debug!("注册组件定义: {}", definition);
        self.names
            .insert(name.to_string(), self.definitions.len());
        self.definitions.push((definition, slot));
        Ok(())
    }

    fn get_definition(&self, name: &str) -> Option<&BeanDefinition> {
        self.names.get(name).map(|&index| &self.definitions[index].0)
    }

    fn definition_count(&self) -> usize {
        self.definitions.len()
    }
}

struct ManagedBean {
    descriptor: Arc<TypeDescriptor>,
    instance: BeanRef,
}

/// 应用上下文
///
/// 构建完成后只读，可通过 `Arc` 在请求线程间共享
pub struct ApplicationContext {
    config: ContextConfig,
    registry: Arc<TypeRegistry>,
    definitions: Vec<(BeanDefinition, usize)>,
    names: HashMap<String, usize>,
    types: HashMap<String, usize>,
    beans: Vec<ManagedBean>,
    binding_errors: Vec<BindingError>,
}

impl ApplicationContext {
    /// 使用注册表扫描器启动容器
    pub fn refresh(registry: Arc<TypeRegistry>, config: ContextConfig) -> Result<Self, ConfigError> {
        let scanner = RegistryScanner::new(Arc::clone(&registry));
        Self::refresh_with(registry, config, &scanner)
    }

    /// 使用指定扫描器启动容器
    ///
    /// 全部定义注册成功后才开始实例化，重复名称不会产生任何实例
    pub fn refresh_with(
        registry: Arc<TypeRegistry>,
        config: ContextConfig,
        scanner: &dyn TypeScanner,
    ) -> Result<Self, ConfigError> {
        info!("开始初始化应用上下文, 扫描包: {}", config.require_scan_package()?);

        let reader = BeanDefinitionReader::new(Arc::clone(&registry), config.clone());
        let definitions = reader.load_bean_definitions(scanner)?;

        let advice = AdviceSupport::from_context(&config, &registry)?;
        let mut build = ContainerBuildContext::new(registry, advice);
        build.register_definitions(definitions)?;
        build.instantiate_all()?;

        let context = build.finish(config)?;
        info!(
            "应用上下文初始化完成: {} 个组件定义, {} 个实例",
            context.definitions.len(),
            context.beans.len()
        );
        Ok(context)
    }

    fn slot_of(&self, name: &str) -> Option<usize> {
        self.names.get(name).map(|&index| self.definitions[index].1)
    }

    /// 获取具体类型的组件
    ///
    /// 被代理的组件无法取得具体类型，返回 [`DependencyError::TypeMismatch`]
    pub fn get_typed<T: Bean>(&self, name: &str) -> Result<&T, DependencyError> {
        let slot = self.slot_of(name).ok_or_else(|| DependencyError::NoSuchBean {
            name: name.to_string(),
        })?;
        self.beans[slot]
            .instance
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| DependencyError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }

    /// 组件的类型描述
    pub fn descriptor_of(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.slot_of(name).map(|slot| &self.beans[slot].descriptor)
    }

    /// 全部控制器，每个实现类型只出现一次
    pub fn controllers(&self) -> impl Iterator<Item = (&Arc<TypeDescriptor>, &BeanRef)> {
        self.beans
            .iter()
            .filter(|bean| bean.descriptor.is_controller())
            .map(|bean| (&bean.descriptor, &bean.instance))
    }

    /// 组件定义（注册顺序）
    pub fn definitions(&self) -> impl Iterator<Item = &BeanDefinition> {
        self.definitions.iter().map(|(definition, _)| definition)
    }

    /// 构建期间记录的注入失败
    pub fn binding_errors(&self) -> &[BindingError] {
        &self.binding_errors
    }

    /// 上下文配置
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// 类型注册表
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }
}

impl BeanFactory for ApplicationContext {
    fn get_bean(&self, name: &str) -> Result<BeanRef, DependencyError> {
        self.slot_of(name)
            .map(|slot| Arc::clone(&self.beans[slot].instance))
            .ok_or_else(|| DependencyError::NoSuchBean {
                name: name.to_string(),
            })
    }

    fn get_bean_by_type(&self, type_name: &str) -> Result<BeanRef, DependencyError> {
        match self.types.get(type_name) {
            Some(&slot) => Ok(Arc::clone(&self.beans[slot].instance)),
            None => self.get_bean(type_name),
        }
    }

    fn bean_count(&self) -> usize {
        self.definitions.len()
    }

    fn bean_names(&self) -> Vec<String> {
        self.definitions
            .iter()
            .map(|(definition, _)| definition.registered_name().to_string())
            .collect()
    }
}

impl fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("definitions", &self.definitions.len())
            .field("beans", &self.beans.len())
            .field("binding_errors", &self.binding_errors.len())
            .finish()
    }
}
