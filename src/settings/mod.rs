//! 中间件配置
//!
//! 两个来源：可选的 TOML 设置文件（声明式部分），以及代码里挂上的回调。
//! 两者汇总成类型化的 [`SagaOptions`]，构造中间件时由 [`validate`] 一次性校验。

mod options;
pub mod store;

use serde::Deserialize;

pub use options::{Logger, OnError, SagaOptions, ValidatedOptions, validate};
pub use store::{SagaSettings, load_settings, parse_settings, try_load_settings};

/// 运行模式，决定诊断信息的详略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    #[default]
    Development,
    Production,
}

impl RuntimeMode {
    pub const ENV_VAR: &'static str = "SAGA_ENV";

    /// 读取 `SAGA_ENV`；未设置或无法识别时按开发模式处理
    pub fn from_env() -> Self {
        std::env::var(Self::ENV_VAR)
            .ok()
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => RuntimeMode::Production,
            _ => RuntimeMode::Development,
        }
    }
}
