//! 设置文件（TOML）
//!
//! ```toml
//! mode = "production"
//! log_filter = "info,saga_middleware=debug"
//!
//! [context]
//! api_base = "https://example.invalid"
//! retries = 3
//! ```
//!
//! 未识别的顶层键收集进 `extra`，交给 [`crate::settings::validate`] 判断。

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use super::RuntimeMode;
use crate::error::SettingsError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SagaSettings {
    /// 缺省时读 `SAGA_ENV`
    pub mode: Option<RuntimeMode>,
    pub log_filter: Option<String>,
    /// 初始上下文
    pub context: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub fn parse_settings(text: &str) -> Result<SagaSettings, toml::de::Error> {
    toml::from_str(text)
}

pub fn try_load_settings(path: &Path) -> Result<SagaSettings, SettingsError> {
    let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// 读不到或解析失败时回退默认值
pub fn load_settings(path: &Path) -> SagaSettings {
    match try_load_settings(path) {
        Ok(settings) => settings,
        Err(SettingsError::Read { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            SagaSettings::default()
        }
        Err(e) => {
            tracing::warn!(err = %e, "设置文件不可用，使用默认设置");
            SagaSettings::default()
        }
    }
}
