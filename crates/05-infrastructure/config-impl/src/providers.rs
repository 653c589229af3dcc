//! 配置提供者实现

use config_abstractions::{
    ConfigProvider, EnvironmentConfigProvider as EnvironmentConfigProviderTrait,
    FileConfigProvider,
};
use infrastructure_common::ConfigError;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 读取配置文件内容，文件不存在时返回 `FileNotFound`
fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

/// `.properties` 配置提供者
///
/// 支持 `key=value` 与 `key: value` 两种写法，`#` 和 `!` 开头的行为注释，
/// 行尾反斜杠表示续行。键与值都会去掉首尾空白。
#[derive(Debug)]
pub struct PropertiesConfigProvider {
    file_path: PathBuf,
    entries: HashMap<String, String>,
    priority: i32,
}

impl PropertiesConfigProvider {
    /// 创建并立即加载
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut provider = Self {
            file_path: path.as_ref().to_path_buf(),
            entries: HashMap::new(),
            priority: 100,
        };
        provider.load_config()?;
        Ok(provider)
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn load_config(&mut self) -> Result<(), ConfigError> {
        debug!("加载属性配置文件: {}", self.file_path.display());

        let content = read_config_file(&self.file_path)?;
        self.entries = parse_properties(&content);

        debug!("属性配置文件加载完成, 共 {} 项", self.entries.len());
        Ok(())
    }
}

/// 解析属性文本
pub fn parse_properties(content: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    let mut pending = String::new();

    for raw in content.lines() {
        let line = raw.trim();
        if pending.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!'))
        {
            continue;
        }

        if let Some(continued) = line.strip_suffix('\\') {
            pending.push_str(continued);
            continue;
        }
        pending.push_str(line);

        let logical = std::mem::take(&mut pending);
        if let Some((key, value)) = split_property(&logical) {
            entries.insert(key, value);
        }
    }

    if !pending.is_empty() {
        if let Some((key, value)) = split_property(&pending) {
            entries.insert(key, value);
        }
    }

    entries
}

fn split_property(line: &str) -> Option<(String, String)> {
    let (key, value) = match line.find(['=', ':']) {
        Some(index) => (&line[..index], &line[index + 1..]),
        None => match line.find(char::is_whitespace) {
            Some(index) => (&line[..index], &line[index..]),
            None => (line, ""),
        },
    };

    let key = key.trim();
    if key.is_empty() {
        warn!("忽略没有键的属性行: {}", line);
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}

impl ConfigProvider for PropertiesConfigProvider {
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        self.entries
            .get(key)
            .map(|v| Value::String(v.clone()))
            .ok_or_else(|| ConfigError::KeyNotFound {
                key: key.to_string(),
            })
    }

    fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get_all_keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn reload(&mut self) -> Result<(), ConfigError> {
        self.load_config()
    }

    fn name(&self) -> &str {
        "PropertiesConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

impl FileConfigProvider for PropertiesConfigProvider {
    fn file_path(&self) -> &Path {
        &self.file_path
    }
}

/// TOML 配置提供者
///
/// 嵌套表通过点号路径访问，例如 `server.address`
#[derive(Debug)]
pub struct TomlConfigProvider {
    file_path: PathBuf,
    config: Option<toml::Value>,
    priority: i32,
}

impl TomlConfigProvider {
    /// 创建新的 TOML 配置提供者
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut provider = Self {
            file_path: path.as_ref().to_path_buf(),
            config: None,
            priority: 100,
        };

        provider.load_config()?;
        Ok(provider)
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn load_config(&mut self) -> Result<(), ConfigError> {
        debug!("加载 TOML 配置文件: {}", self.file_path.display());

        let content = read_config_file(&self.file_path)?;
        self.config = Some(toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?);

        debug!("TOML 配置文件加载完成");
        Ok(())
    }

    fn toml_to_json(value: &toml::Value) -> Value {
        match value {
            toml::Value::String(s) => Value::String(s.clone()),
            toml::Value::Integer(i) => Value::Number(serde_json::Number::from(*i)),
            toml::Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            toml::Value::Boolean(b) => Value::Bool(*b),
            toml::Value::Array(arr) => Value::Array(arr.iter().map(Self::toml_to_json).collect()),
            toml::Value::Table(table) => Value::Object(
                table
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::toml_to_json(v)))
                    .collect(),
            ),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        }
    }

    fn get_nested_value(&self, path: &str) -> Option<&toml::Value> {
        let mut current = self.config.as_ref()?;
        for part in path.split('.') {
            match current {
                toml::Value::Table(table) => current = table.get(part)?,
                _ => return None,
            }
        }
        Some(current)
    }

    fn collect_keys(table: &toml::Table, prefix: &str, keys: &mut Vec<String>) {
        for (key, value) in table {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };

            match value {
                toml::Value::Table(nested) => Self::collect_keys(nested, &full_key, keys),
                _ => keys.push(full_key),
            }
        }
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        self.get_nested_value(key)
            .map(Self::toml_to_json)
            .ok_or_else(|| ConfigError::KeyNotFound {
                key: key.to_string(),
            })
    }

    fn contains_key(&self, key: &str) -> bool {
        self.get_nested_value(key).is_some()
    }

    fn get_all_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Some(toml::Value::Table(table)) = &self.config {
            Self::collect_keys(table, "", &mut keys);
        }
        keys
    }

    fn reload(&mut self) -> Result<(), ConfigError> {
        self.load_config()
    }

    fn name(&self) -> &str {
        "TomlConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

impl FileConfigProvider for TomlConfigProvider {
    fn file_path(&self) -> &Path {
        &self.file_path
    }
}

/// 环境变量配置提供者
///
/// `MINI_SCAN_PACKAGE` 在前缀为 `MINI` 时映射为 `scanPackage`，
/// 双分隔符映射为点号，例如 `MINI_SERVER__ADDRESS` 映射为 `server.address`
#[derive(Debug)]
pub struct EnvironmentConfigProviderImpl {
    prefix: String,
    separator: String,
    priority: i32,
    env_vars: HashMap<String, String>,
}

impl EnvironmentConfigProviderImpl {
    /// 从进程环境变量创建
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::from_vars(prefix, std::env::vars())
    }

    /// 从给定的变量集合创建
    pub fn from_vars<I>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut provider = Self {
            prefix: prefix.into(),
            separator: "_".to_string(),
            // 环境变量最高优先级
            priority: 200,
            env_vars: HashMap::new(),
        };
        provider.load_env_vars(vars);
        provider
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn load_env_vars<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        debug!("加载环境变量，前缀: {}", self.prefix);

        let head = format!("{}{}", self.prefix, self.separator);
        self.env_vars = vars
            .into_iter()
            .filter_map(|(key, value)| {
                let rest = key.strip_prefix(&head)?;
                (!rest.is_empty()).then(|| (self.env_key_to_config_key(rest), value))
            })
            .collect();

        debug!("加载了 {} 个环境变量", self.env_vars.len());
    }

    /// 将去掉前缀的环境变量名转换为配置键
    fn env_key_to_config_key(&self, env_key: &str) -> String {
        let section_separator = self.separator.repeat(2);
        env_key
            .split(section_separator.as_str())
            .map(|part| self.to_camel_case(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn to_camel_case(&self, part: &str) -> String {
        let mut key = String::with_capacity(part.len());
        for (i, word) in part
            .split(self.separator.as_str())
            .filter(|w| !w.is_empty())
            .enumerate()
        {
            let lower = word.to_lowercase();
            if i == 0 {
                key.push_str(&lower);
            } else {
                let mut chars = lower.chars();
                if let Some(first) = chars.next() {
                    key.extend(first.to_uppercase());
                    key.push_str(chars.as_str());
                }
            }
        }
        key
    }
}

impl ConfigProvider for EnvironmentConfigProviderImpl {
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        self.env_vars
            .get(key)
            .map(|v| Value::String(v.clone()))
            .ok_or_else(|| ConfigError::KeyNotFound {
                key: key.to_string(),
            })
    }

    fn contains_key(&self, key: &str) -> bool {
        self.env_vars.contains_key(key)
    }

    fn get_all_keys(&self) -> Vec<String> {
        self.env_vars.keys().cloned().collect()
    }

    fn reload(&mut self) -> Result<(), ConfigError> {
        self.load_env_vars(std::env::vars());
        Ok(())
    }

    fn name(&self) -> &str {
        "EnvironmentConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

impl EnvironmentConfigProviderTrait for EnvironmentConfigProviderImpl {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn separator(&self) -> &str {
        &self.separator
    }

    fn get_matching_env_vars(&self) -> HashMap<String, String> {
        self.env_vars.clone()
    }
}
