//! 视图解析与渲染

use infrastructure_common::{ConfigError, Value};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 默认模板后缀
pub const DEFAULT_TEMPLATE_SUFFIX: &str = ".html";

/// 占位符：`${name}`，同时接受全角 `￥{name}`
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[$￥]\{([^}]+)\}").expect("占位符正则无效"));

/// 模板视图
#[derive(Debug, Clone)]
pub struct View {
    file: PathBuf,
}

impl View {
    /// 创建模板视图
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    /// 模板文件路径
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// 逐行读取模板并替换占位符，缺失的键替换为空串，保留换行
    pub fn render(&self, model: &HashMap<String, Value>) -> io::Result<String> {
        let reader = BufReader::new(File::open(&self.file)?);
        let mut output = String::new();

        for (index, line) in reader.lines().enumerate() {
            if index > 0 {
                output.push('\n');
            }
            output.push_str(&render_line(&line?, model));
        }

        Ok(output)
    }
}

/// 替换一行中的全部占位符
pub fn render_line(line: &str, model: &HashMap<String, Value>) -> String {
    PLACEHOLDER
        .replace_all(line, |caps: &Captures| {
            model
                .get(caps[1].trim())
                .map(Value::to_string)
                .unwrap_or_default()
        })
        .into_owned()
}

/// 视图解析器，每个解析器对应模板目录中的一个文件
#[derive(Debug, Clone)]
pub struct ViewResolver {
    template_root: PathBuf,
    name: String,
}

impl ViewResolver {
    /// 为模板文件创建解析器，逻辑名为去掉 `.html` 后缀的文件名
    pub fn new(template_root: impl Into<PathBuf>, file_name: &str) -> Self {
        Self {
            template_root: template_root.into(),
            name: file_name.replace(DEFAULT_TEMPLATE_SUFFIX, ""),
        }
    }

    /// 为模板目录中的每个文件创建解析器，按文件名排序
    pub fn scan(template_root: &Path) -> Result<Vec<ViewResolver>, ConfigError> {
        if !template_root.is_dir() {
            return Err(ConfigError::TemplateRootNotFound {
                path: template_root.display().to_string(),
            });
        }

        let mut file_names = Vec::new();
        for entry in std::fs::read_dir(template_root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                file_names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        file_names.sort();

        let resolvers: Vec<ViewResolver> = file_names
            .iter()
            .map(|file_name| ViewResolver::new(template_root, file_name))
            .collect();
        info!(
            "模板目录 {} 共 {} 个视图",
            template_root.display(),
            resolvers.len()
        );
        Ok(resolvers)
    }

    /// 逻辑视图名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 解析视图，空名称返回 `None`
    pub fn resolve_view_name(&self, view_name: &str) -> Option<View> {
        if view_name.is_empty() {
            return None;
        }
        let file_name = if view_name.ends_with(DEFAULT_TEMPLATE_SUFFIX) {
            view_name.to_string()
        } else {
            format!("{}{}", view_name, DEFAULT_TEMPLATE_SUFFIX)
        };
        debug!("解析视图: {} -> {}", view_name, file_name);
        Some(View::new(self.template_root.join(file_name)))
    }
}
