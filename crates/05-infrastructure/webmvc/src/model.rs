//! 模型与视图

use infrastructure_common::Value;
use std::collections::HashMap;

/// 逻辑视图名加渲染数据
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelAndView {
    view_name: String,
    model: HashMap<String, Value>,
}

impl ModelAndView {
    /// 创建指定视图名的空模型
    pub fn new(view_name: impl Into<String>) -> Self {
        Self {
            view_name: view_name.into(),
            model: HashMap::new(),
        }
    }

    /// 添加模型数据
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.model.insert(key.into(), value.into());
        self
    }

    /// 逻辑视图名
    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    /// 模型数据
    pub fn model(&self) -> &HashMap<String, Value> {
        &self.model
    }

    /// 按键取模型数据
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.model.get(key)
    }

    /// 作为处理器返回值
    pub fn into_value(self) -> Value {
        Value::object(self)
    }
}
