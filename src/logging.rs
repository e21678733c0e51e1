//! tracing 初始化与默认 logger

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::domain::LogLevel;
use crate::settings::{Logger, SagaSettings};

pub struct LogGuard(#[allow(dead_code)] Option<WorkerGuard>);

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// 给出目录时按天滚动写文件，否则写 stderr
    pub dir: Option<PathBuf>,
    pub filter: Option<String>,
}

impl LogConfig {
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }
}

/// 设置文件里的 `log_filter`；目录不在设置文件里，由调用方补上
impl From<&SagaSettings> for LogConfig {
    fn from(settings: &SagaSettings) -> Self {
        Self {
            dir: None,
            filter: settings.log_filter.clone(),
        }
    }
}

pub fn init(cfg: LogConfig) -> LogGuard {
    let filter = match cfg.filter {
        Some(s) if !s.trim().is_empty() => EnvFilter::new(s),
        _ => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let Some(log_dir) = cfg.dir else {
        let stderr_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init();
        return LogGuard(None);
    };

    let log_dir = match fs::create_dir_all(&log_dir) {
        Ok(()) => log_dir,
        Err(_) => std::env::temp_dir().join("saga-middleware-logs"),
    };
    let _ = fs::create_dir_all(&log_dir);

    let file_appender = tracing_appender::rolling::daily(&log_dir, "saga-middleware.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();
    tracing::info!(log_dir = %log_dir.display(), "tracing 已初始化");

    LogGuard(Some(guard))
}

/// 把 `(level, message)` 转发给 tracing 的 logger
pub fn tracing_logger() -> Logger {
    Rc::new(forward)
}

/// 有 logger 选项时交给它，否则走 tracing
pub(crate) fn log(logger: Option<&Logger>, level: LogLevel, message: &str) {
    match logger {
        Some(logger) => logger(level, message),
        None => forward(level, message),
    }
}

fn forward(level: LogLevel, message: &str) {
    match level {
        LogLevel::Debug => tracing::debug!(target: "saga", "{message}"),
        LogLevel::Info => tracing::info!(target: "saga", "{message}"),
        LogLevel::Warn => tracing::warn!(target: "saga", "{message}"),
        LogLevel::Error => tracing::error!(target: "saga", "{message}"),
    }
}
