use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::ids::EffectId;

/// 交给 monitor 的 effect 描述。
///
/// 本层只构造 `Root`；解释器上报的嵌套 effect 用 `Custom` 携带自己的序列化形式，
/// devtools 类 monitor 可以直接把整个结构序列化成 JSON。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectDescription {
    Root { saga: String, args: Vec<Value> },
    Custom { label: String, payload: Value },
}

/// `effect_triggered` 钩子的参数
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggeredEffect {
    pub effect_id: EffectId,
    pub parent_effect_id: EffectId,
    pub root: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub effect: EffectDescription,
}

impl TriggeredEffect {
    /// root task 的合成描述：挂在虚拟的 0 号 effect 之下，
    /// 观察者可以像处理嵌套 effect 一样处理它。
    pub fn root(effect_id: EffectId, saga: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            effect_id,
            parent_effect_id: EffectId::ROOT_PARENT,
            root: true,
            label: None,
            effect: EffectDescription::Root {
                saga: saga.into(),
                args,
            },
        }
    }
}

/// logger 选项收到的日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// `on_error` 的附加信息，由解释器在任务未捕获错误时填充
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorInfo {
    pub saga_stack: String,
}
