//! 元数据定义
//!
//! 启动期登记的类型信息：标记、能力接口、注入字段、方法签名和路由。
//! 这些结构替代运行时反射，由读取器、容器、切面和分发器共同消费。

use crate::component::{BeanFactoryFn, BeanRef};

/// 请求对象的参数类型名
pub const REQUEST_TYPE: &str = "HttpRequest";
/// 响应对象的参数类型名
pub const RESPONSE_TYPE: &str = "HttpResponse";
/// 字符串参数类型名
pub const STRING_TYPE: &str = "String";
/// 无返回值
pub const VOID_TYPE: &str = "void";

/// 类型种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// 可实例化的具体类型
    Class,
    /// 能力接口，只作为注册名出现
    Interface,
}

/// 组件标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stereotype {
    /// 普通组件，可带覆盖名称
    Component { name: Option<String> },
    /// 控制器
    Controller { name: Option<String> },
}

impl Stereotype {
    /// 标记上声明的名称
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Component { name } | Self::Controller { name } => {
                name.as_deref().filter(|n| !n.trim().is_empty())
            }
        }
    }
}

/// 注入字段描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// 字段名
    pub name: String,
    /// 声明类型的全限定名
    pub declared_type: String,
    /// 注入标记上的覆盖名称
    pub qualifier: Option<String>,
}

impl FieldDescriptor {
    /// 解析注入目标名称：覆盖名称优先，否则使用声明类型全限定名
    pub fn target_name(&self) -> &str {
        self.qualifier
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(&self.declared_type)
    }
}

/// 参数类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Request,
    Response,
    String,
    Other(String),
}

impl ParamType {
    /// 用于签名的类型名
    pub fn type_name(&self) -> &str {
        match self {
            Self::Request => REQUEST_TYPE,
            Self::Response => RESPONSE_TYPE,
            Self::String => STRING_TYPE,
            Self::Other(name) => name,
        }
    }
}

/// 方法参数描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescriptor {
    /// 参数类型
    pub param_type: ParamType,
    /// 命名参数标记
    pub request_param: Option<String>,
}

impl ParamDescriptor {
    /// 请求对象参数
    pub fn request() -> Self {
        Self {
            param_type: ParamType::Request,
            request_param: None,
        }
    }

    /// 响应对象参数
    pub fn response() -> Self {
        Self {
            param_type: ParamType::Response,
            request_param: None,
        }
    }

    /// 未标记的字符串参数
    pub fn string() -> Self {
        Self {
            param_type: ParamType::String,
            request_param: None,
        }
    }

    /// 带命名参数标记的字符串参数
    pub fn request_param(name: impl Into<String>) -> Self {
        Self {
            param_type: ParamType::String,
            request_param: Some(name.into()),
        }
    }

    /// 其他类型参数
    pub fn of(type_name: impl Into<String>) -> Self {
        Self {
            param_type: ParamType::Other(type_name.into()),
            request_param: None,
        }
    }
}

/// 方法描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// 方法名
    pub name: String,
    /// 修饰符，如 `public`
    pub modifiers: String,
    /// 返回类型名
    pub return_type: String,
    /// 按声明顺序的参数
    pub params: Vec<ParamDescriptor>,
    /// 声明抛出的错误类型
    pub throws: Vec<String>,
    /// 方法级路由片段
    pub route: Option<String>,
}

impl MethodDescriptor {
    /// 创建公开、无返回值、无参数的方法描述
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: "public".to_string(),
            return_type: VOID_TYPE.to_string(),
            params: Vec::new(),
            throws: Vec::new(),
            route: None,
        }
    }

    /// 设置修饰符
    pub fn with_modifiers(mut self, modifiers: impl Into<String>) -> Self {
        self.modifiers = modifiers.into();
        self
    }

    /// 设置返回类型
    pub fn returns(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = return_type.into();
        self
    }

    /// 追加参数
    pub fn param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    /// 声明可能抛出的错误类型
    pub fn throws(mut self, error_type: impl Into<String>) -> Self {
        self.throws.push(error_type.into());
        self
    }

    /// 设置路由片段
    pub fn request_mapping(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// 规范签名字符串，例如
    /// `public String demo.service.TestServiceImpl.query(String) throws IoError`
    pub fn signature(&self, declaring_type: &str) -> String {
        let params = self
            .params
            .iter()
            .map(|p| p.param_type.type_name())
            .collect::<Vec<_>>()
            .join(",");

        let mut signature = String::new();
        if !self.modifiers.is_empty() {
            signature.push_str(&self.modifiers);
            signature.push(' ');
        }
        signature.push_str(&format!(
            "{} {}.{}({})",
            self.return_type, declaring_type, self.name, params
        ));
        if !self.throws.is_empty() {
            signature.push_str(" throws ");
            signature.push_str(&self.throws.join(","));
        }
        signature
    }
}

/// 类型描述
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    package: String,
    simple_name: String,
    kind: TypeKind,
    stereotype: Option<Stereotype>,
    interfaces: Vec<String>,
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodDescriptor>,
    base_route: Option<String>,
    factory: Option<BeanFactoryFn>,
}

impl TypeDescriptor {
    /// 创建具体类型描述
    pub fn class(package: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self::new(package.into(), simple_name.into(), TypeKind::Class)
    }

    /// 创建能力接口描述
    pub fn interface(package: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self::new(package.into(), simple_name.into(), TypeKind::Interface)
    }

    fn new(package: String, simple_name: String, kind: TypeKind) -> Self {
        Self {
            package,
            simple_name,
            kind,
            stereotype: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            base_route: None,
            factory: None,
        }
    }

    /// 标记为组件
    pub fn component(mut self) -> Self {
        self.stereotype = Some(Stereotype::Component { name: None });
        self
    }

    /// 标记为带覆盖名称的组件
    pub fn component_named(mut self, name: impl Into<String>) -> Self {
        self.stereotype = Some(Stereotype::Component {
            name: Some(name.into()),
        });
        self
    }

    /// 标记为控制器
    pub fn controller(mut self) -> Self {
        self.stereotype = Some(Stereotype::Controller { name: None });
        self
    }

    /// 声明实现的能力接口（全限定名）
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// 设置类型级路由
    pub fn request_mapping(mut self, base_route: impl Into<String>) -> Self {
        self.base_route = Some(base_route.into());
        self
    }

    /// 声明注入字段，目标名称为声明类型
    pub fn autowired(mut self, field: impl Into<String>, declared_type: impl Into<String>) -> Self {
        self.fields.push(FieldDescriptor {
            name: field.into(),
            declared_type: declared_type.into(),
            qualifier: None,
        });
        self
    }

    /// 声明带覆盖名称的注入字段
    pub fn autowired_named(
        mut self,
        field: impl Into<String>,
        declared_type: impl Into<String>,
        qualifier: impl Into<String>,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name: field.into(),
            declared_type: declared_type.into(),
            qualifier: Some(qualifier.into()),
        });
        self
    }

    /// 声明方法
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// 设置无参构造工厂
    pub fn factory(mut self, factory: BeanFactoryFn) -> Self {
        self.factory = Some(factory);
        self
    }

    /// 包名
    pub fn package(&self) -> &str {
        &self.package
    }

    /// 简单类型名
    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    /// 全限定名
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.simple_name.clone()
        } else {
            format!("{}.{}", self.package, self.simple_name)
        }
    }

    /// 类型种类
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// 是否为能力接口
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// 组件标记
    pub fn stereotype(&self) -> Option<&Stereotype> {
        self.stereotype.as_ref()
    }

    /// 是否带组件或控制器标记
    pub fn is_managed(&self) -> bool {
        self.stereotype.is_some()
    }

    /// 是否为控制器
    pub fn is_controller(&self) -> bool {
        matches!(self.stereotype, Some(Stereotype::Controller { .. }))
    }

    /// 实现的能力接口
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// 注入字段
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// 声明的方法（声明顺序）
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// 按名称查找方法
    pub fn find_method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// 类型级路由
    pub fn base_route(&self) -> Option<&str> {
        self.base_route.as_deref()
    }

    /// 使用无参构造创建实例
    pub fn instantiate(&self) -> Option<BeanRef> {
        self.factory.map(|factory| factory())
    }
}

/// 首字母小写，作为默认组件名
pub fn lower_first_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
