//! 应用构建器

use crate::application::{Application, ServerSettings};
use crate::logging::{initialize_logging, parse_level, LoggingConfig};
use config_abstractions::{keys, ConfigManager, ConfigProvider};
use config_impl::binder::TypedConfigBinder;
use config_impl::manager::LayeredConfigManager;
use config_impl::providers::{
    EnvironmentConfigProviderImpl, PropertiesConfigProvider, TomlConfigProvider,
};
use di_impl::ApplicationContext;
use infrastructure_common::{ContextConfig, FrameworkResult, TypeRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use webmvc::DispatcherServlet;

/// 应用构建器
///
/// 收集配置源与日志设置，`build` 时依次完成：配置合并 → 日志初始化 →
/// 容器启动 → 分发器初始化
pub struct ApplicationBuilder {
    config_sources: Vec<Box<dyn ConfigProvider>>,
    /// 第一个配置文件所在目录，用于解析相对的模板目录
    base_dir: Option<PathBuf>,
    context_overrides: Option<ContextConfig>,
    logging_enabled: bool,
    logging_config: LoggingConfig,
    explicit_level: bool,
}

impl ApplicationBuilder {
    /// 创建新的应用构建器
    pub fn new() -> Self {
        Self {
            config_sources: Vec::new(),
            base_dir: None,
            context_overrides: None,
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
            explicit_level: false,
        }
    }

    /// 按扩展名添加配置文件，`.toml` 走 TOML 解析，其余按属性文件处理
    pub fn add_config_file<P: AsRef<Path>>(self, path: P) -> FrameworkResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.add_config_toml(path),
            _ => self.add_config_properties(path),
        }
    }

    /// 添加属性配置文件
    pub fn add_config_properties<P: AsRef<Path>>(mut self, path: P) -> FrameworkResult<Self> {
        let path = path.as_ref();
        info!("添加属性配置文件: {}", path.display());
        let provider = PropertiesConfigProvider::new(path)?;
        self.remember_base_dir(path);
        self.config_sources.push(Box::new(provider));
        Ok(self)
    }

    /// 添加 TOML 配置文件
    pub fn add_config_toml<P: AsRef<Path>>(mut self, path: P) -> FrameworkResult<Self> {
        let path = path.as_ref();
        info!("添加 TOML 配置文件: {}", path.display());
        let provider = TomlConfigProvider::new(path)?;
        self.remember_base_dir(path);
        self.config_sources.push(Box::new(provider));
        Ok(self)
    }

    /// 添加环境变量配置源
    pub fn add_config_env_vars<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);
        self.config_sources
            .push(Box::new(EnvironmentConfigProviderImpl::new(prefix)));
        self
    }

    /// 添加任意配置提供者
    pub fn add_provider(mut self, provider: Box<dyn ConfigProvider>) -> Self {
        self.config_sources.push(provider);
        self
    }

    /// 直接指定容器上下文配置，优先于所有配置源
    pub fn with_context_config(mut self, config: ContextConfig) -> Self {
        self.context_overrides = Some(config);
        self
    }

    /// 配置日志
    ///
    /// 配置源中的 `logLevel` 会覆盖这里的级别，除非另外调用了 [`Self::with_log_level`]
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true; // 启用日志初始化
        self
    }

    /// 固定日志级别
    pub fn with_log_level(mut self, level: tracing::Level) -> Self {
        self.logging_config.level = level;
        self.explicit_level = true;
        self
    }

    fn remember_base_dir(&mut self, path: &Path) {
        if self.base_dir.is_none() {
            self.base_dir = path.parent().map(Path::to_path_buf);
        }
    }

    /// 构建应用
    pub fn build(self, registry: TypeRegistry) -> FrameworkResult<Application> {
        let mut config_manager = LayeredConfigManager::new();
        for provider in self.config_sources {
            config_manager.register_provider(provider);
        }

        // 只有在明确配置了日志时才初始化日志
        // 避免在测试环境中重复初始化
        if self.logging_enabled {
            let mut logging = self.logging_config;
            if !self.explicit_level {
                if let Some(level) = config_manager.get_string(keys::LOG_LEVEL) {
                    logging.level = parse_level(&level)?;
                }
            }
            // 已有全局订阅者时沿用
            if let Err(e) = initialize_logging(&logging) {
                warn!("{}", e);
            }
        }

        info!("开始构建应用");
        debug!("配置提供者: {:?}", config_manager.provider_names());

        let mut context_config = match self.context_overrides {
            Some(config) => config,
            None => config_manager.context_config()?,
        };
        context_config.template_root =
            resolve_template_root(context_config.template_root.take(), self.base_dir.as_deref());

        let server: ServerSettings = TypedConfigBinder::new().bind(&config_manager, "server")?;

        let context = ApplicationContext::refresh(Arc::new(registry), context_config)?;
        if !context.binding_errors().is_empty() {
            warn!("{} 个依赖未能注入", context.binding_errors().len());
        }

        let context = Arc::new(context);
        let dispatcher = DispatcherServlet::init(Arc::clone(&context))?;

        info!("应用构建完成");
        Ok(Application::new(context, Arc::new(dispatcher), server))
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 相对的模板目录按配置文件所在目录解析
fn resolve_template_root(
    template_root: Option<String>,
    base_dir: Option<&Path>,
) -> Option<String> {
    let root = template_root?;
    let path = Path::new(root.trim());
    match base_dir {
        Some(base) if path.is_relative() && !root.trim().is_empty() => {
            Some(base.join(path).display().to_string())
        }
        _ => Some(root),
    }
}
