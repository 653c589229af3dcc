//! 请求与响应模型

use parking_lot::Mutex;
use std::collections::HashMap;

/// HTTP 请求
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    method: String,
    uri: String,
    context_path: String,
    params: HashMap<String, Vec<String>>,
    headers: HashMap<String, String>,
}

impl HttpRequest {
    /// 创建请求
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// 创建 GET 请求
    pub fn get(uri: impl Into<String>) -> Self {
        Self::new("GET", uri)
    }

    /// 创建 POST 请求
    pub fn post(uri: impl Into<String>) -> Self {
        Self::new("POST", uri)
    }

    /// 设置上下文路径
    pub fn with_context_path(mut self, context_path: impl Into<String>) -> Self {
        self.context_path = context_path.into();
        self
    }

    /// 追加请求参数，同名参数保留全部值
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_param(name, value);
        self
    }

    /// 设置请求头
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// 追加请求参数
    pub fn add_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.entry(name.into()).or_default().push(value.into());
    }

    /// 请求方法
    pub fn method(&self) -> &str {
        &self.method
    }

    /// 原始 URI 路径
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// 上下文路径
    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    /// 参数表
    pub fn params(&self) -> &HashMap<String, Vec<String>> {
        &self.params
    }

    /// 指定参数的全部值
    pub fn param_values(&self, name: &str) -> Option<&[String]> {
        self.params.get(name).map(Vec::as_slice)
    }

    /// 请求头，名称不区分大小写
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// 去掉上下文路径前缀并合并连续分隔符后的路径
    ///
    /// 上下文路径按整段匹配，URI 不在上下文路径下时返回 `None`
    pub fn path(&self) -> Option<String> {
        let context_path = self.context_path.trim_end_matches('/');
        if context_path.is_empty() {
            return Some(collapse_slashes(&self.uri));
        }

        let relative = self.uri.strip_prefix(context_path)?;
        if relative.is_empty() || relative.starts_with('/') {
            Some(collapse_slashes(relative))
        } else {
            None
        }
    }
}

/// 合并连续的 `/`
pub fn collapse_slashes(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !previous_slash {
                collapsed.push(c);
            }
            previous_slash = true;
        } else {
            collapsed.push(c);
            previous_slash = false;
        }
    }
    collapsed
}

#[derive(Debug)]
struct ResponseState {
    status: u16,
    content_type: String,
    body: String,
}

/// 响应写入器
///
/// 以共享对象的形式传给处理器，处理器可直接写入响应体
#[derive(Debug)]
pub struct ResponseWriter {
    state: Mutex<ResponseState>,
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseWriter {
    /// 创建空响应，状态码 200
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ResponseState {
                status: 200,
                content_type: "text/plain; charset=UTF-8".to_string(),
                body: String::new(),
            }),
        }
    }

    /// 追加响应体
    pub fn write(&self, text: &str) {
        self.state.lock().body.push_str(text);
    }

    /// 设置状态码
    pub fn set_status(&self, status: u16) {
        self.state.lock().status = status;
    }

    /// 设置内容类型
    pub fn set_content_type(&self, content_type: impl Into<String>) {
        self.state.lock().content_type = content_type.into();
    }

    /// 状态码
    pub fn status(&self) -> u16 {
        self.state.lock().status
    }

    /// 丢弃已写入的响应体
    pub fn reset(&self) {
        self.state.lock().body.clear();
    }

    /// 生成最终响应
    pub fn to_response(&self) -> HttpResponse {
        let state = self.state.lock();
        HttpResponse {
            status: state.status,
            content_type: state.content_type.clone(),
            body: state.body.as_bytes().to_vec(),
        }
    }
}

/// HTTP 响应，响应体为 UTF-8 编码
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    content_type: String,
    body: Vec<u8>,
}

impl HttpResponse {
    /// 状态码
    pub fn status(&self) -> u16 {
        self.status
    }

    /// 内容类型
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// 响应体字节
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// 响应体文本
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// 取出响应体
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}
