//! 日志系统配置模块
//! 支持结构化日志、日志级别配置和按天轮转的文件日志

use std::path::{Path, PathBuf};

use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

/// 初始化日志系统
///
/// 启用文件日志时返回的 guard 必须保留到进程退出，否则缓冲的日志会丢失。
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let json = config.format == "json";

    // 日志写 stderr，stdout 留给命令输出
    let console_layer = if json {
        fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .boxed()
    };

    if !config.enable_file_logging {
        Registry::default()
            .with(filter)
            .with(console_layer)
            .try_init()?;
        return Ok(None);
    }

    let (log_dir, file_name) = log_file_location(config);
    std::fs::create_dir_all(&log_dir)?;

    // 按天轮转，实际文件名为 <file_name>.YYYY-MM-DD
    let file_appender = rolling::daily(&log_dir, &file_name);
    let (writer, guard) = non_blocking(file_appender);

    let file_layer = if json {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_timer(ChronoUtc::rfc_3339())
            .boxed()
    } else {
        fmt::layer()
            .with_writer(writer)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false)
            .boxed()
    };

    Registry::default()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(Some(guard))
}

const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_LOG_FILE: &str = "otc-dealer.log";

/// 拆分 `log_file_path` 为目录和文件名前缀
fn log_file_location(config: &LoggingConfig) -> (PathBuf, String) {
    let Some(path) = config.log_file_path.as_deref().map(Path::new) else {
        return (PathBuf::from(DEFAULT_LOG_DIR), DEFAULT_LOG_FILE.to_string());
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    (dir, file_name)
}
