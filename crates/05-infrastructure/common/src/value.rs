//! 动态值
//!
//! 基于名称的方法调用使用 [`Value`] 传递参数和返回值

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 动态值
#[derive(Clone, Default)]
pub enum Value {
    /// 空值，对应未赋值的返回值或未绑定的参数
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// 任意共享对象，例如请求、响应、`ModelAndView`
    Object(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// 包装任意对象
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Self::Object(Arc::new(value))
    }

    /// 是否为空值
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// 获取字符串
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// 获取整数
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// 获取布尔值
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// 向下转型为具体对象
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Object(object) => object.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Self::Object(_) => f.write_str("<object>"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Object(_) => f.write_str("Object(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_renders_null_as_empty() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from("Ada").to_string(), "Ada");
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "[a, b]");
    }

    #[test]
    fn test_object_downcast() {
        #[derive(Debug, PartialEq)]
        struct Marker(u8);

        let value = Value::object(Marker(7));
        assert_eq!(value.downcast_ref::<Marker>(), Some(&Marker(7)));
        assert!(value.downcast_ref::<String>().is_none());
        assert_eq!(value.clone(), value);
    }

    #[test]
    fn test_option_conversion() {
        assert!(Value::from(None::<String>).is_null());
        assert_eq!(Value::from(Some("x")).as_str(), Some("x"));
    }
}
