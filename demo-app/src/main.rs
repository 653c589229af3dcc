//! # 演示应用程序
//!
//! 读取属性配置，启动容器与分发器，并在指定地址上提供 HTTP 服务

use anyhow::Context;
use clap::Parser;
use infrastructure_composition::{parse_level, ApplicationBuilder, LoggingConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "demo-app")]
#[command(about = "Lorn Mini Container 演示应用")]
struct Args {
    /// 配置文件路径（.properties 或 .toml）
    #[arg(short, long, default_value = demo_app::CONFIG_FILE)]
    config: PathBuf,

    /// 监听地址，覆盖 server.address
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// 日志级别，覆盖配置中的 logLevel
    #[arg(long)]
    log_level: Option<String>,

    /// 输出 JSON 格式日志
    #[arg(long)]
    json: bool,

    /// 环境变量前缀
    #[arg(long, default_value = "MINI")]
    env_prefix: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let logging = if args.json {
        LoggingConfig::production()
    } else {
        LoggingConfig::default()
    };
    let mut builder = ApplicationBuilder::new()
        .add_config_file(&args.config)
        .with_context(|| format!("无法加载配置文件 {}", args.config.display()))?
        .add_config_env_vars(&args.env_prefix)
        .with_logging(logging);
    if let Some(level) = &args.log_level {
        builder = builder.with_log_level(parse_level(level)?);
    }

    let registry = demo_app::type_registry().context("演示类型登记失败")?;
    let application = builder.build(registry).context("应用启动失败")?;
    info!(
        "已注册 {} 个处理器映射",
        application.dispatcher().handler_mappings().len()
    );

    application.serve(args.bind).await?;
    Ok(())
}
