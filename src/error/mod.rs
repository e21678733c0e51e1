//! 统一错误处理模块
//!
//! 每一类失败各占一个文件：配置、启动、上下文、派发管线、设置文件。
//! 所有错误都在任何任务被创建之前同步返回，不存在需要回滚的半初始化状态。

mod config;
mod context;
mod dispatch;
mod run;
mod settings;

pub use config::ConfigError;
pub use context::ContextError;
pub use dispatch::{BoxError, DispatchError, EmitError};
pub use run::RunError;
pub use settings::SettingsError;

/// 错误分类，对应对外约定的四类致命错误以及派发管线错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidConfiguration,
    InvalidEntryPoint,
    NotMounted,
    InvalidArgument,
    Dispatch,
}

/// 顶层错误类型
#[derive(Debug, thiserror::Error)]
pub enum SagaError {
    /// 中间件构造参数错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// `run` 调用失败
    #[error("启动 saga 失败: {0}")]
    Run(#[from] RunError),

    /// `set_context` 参数错误
    #[error("上下文错误: {0}")]
    Context(#[from] ContextError),

    /// 派发管线错误
    #[error("派发失败: {0}")]
    Dispatch(#[from] DispatchError),

    /// 设置文件错误
    #[error("设置错误: {0}")]
    Settings(#[from] SettingsError),
}

impl SagaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SagaError::Config(_) | SagaError::Settings(_) => ErrorKind::InvalidConfiguration,
            SagaError::Run(RunError::InvalidEntryPoint { .. }) => ErrorKind::InvalidEntryPoint,
            SagaError::Run(RunError::NotMounted) => ErrorKind::NotMounted,
            SagaError::Context(_) => ErrorKind::InvalidArgument,
            SagaError::Dispatch(_) => ErrorKind::Dispatch,
        }
    }
}
