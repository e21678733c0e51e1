//! 类型化的中间件选项与一次性校验

use serde_json::{Map, Value};
use std::error::Error;
use std::fmt;
use std::rc::Rc;

use super::{RuntimeMode, SagaSettings};
use crate::core::{EmitterWrapper, MonitorHooks};
use crate::domain::{ErrorInfo, LogLevel};
use crate::error::ConfigError;

/// `logger(level, message)`
pub type Logger = Rc<dyn Fn(LogLevel, &str)>;

/// 任务未捕获错误的最后一道回调
pub type OnError = Rc<dyn Fn(&(dyn Error + 'static), &ErrorInfo)>;

/// 声明式来源里的保留键如何处理
#[derive(Debug, Clone, Copy)]
enum KeyRule {
    /// 必须是函数，设置文件里只能是数据
    Callable,
    /// 已废弃，附带替代键
    Retired(&'static str),
    /// 只能在代码里通过对应的 builder 方法设置
    CodeOnly(&'static str),
}

/// 按顺序检查，第一个命中的键决定报错
const KEY_RULES: [(&str, KeyRule); 6] = [
    ("logger", KeyRule::Callable),
    ("onerror", KeyRule::Retired("on_error")),
    ("onError", KeyRule::Callable),
    ("on_error", KeyRule::Callable),
    ("emitter", KeyRule::Callable),
    ("saga_monitor", KeyRule::CodeOnly("with_monitor")),
];

pub struct SagaOptions<A> {
    pub context: Map<String, Value>,
    pub saga_monitor: Option<MonitorHooks<A>>,
    pub logger: Option<Logger>,
    pub on_error: Option<OnError>,
    pub emitter: Option<EmitterWrapper<A>>,
    pub mode: RuntimeMode,
    /// 设置文件里无法映射到类型化字段的键
    pub extra: Map<String, Value>,
}

impl<A> Default for SagaOptions<A> {
    fn default() -> Self {
        Self {
            context: Map::new(),
            saga_monitor: None,
            logger: None,
            on_error: None,
            emitter: None,
            mode: RuntimeMode::from_env(),
            extra: Map::new(),
        }
    }
}

impl<A> fmt::Debug for SagaOptions<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SagaOptions")
            .field("context", &self.context)
            .field("saga_monitor", &self.saga_monitor)
            .field("logger", &self.logger.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("emitter", &self.emitter.is_some())
            .field("mode", &self.mode)
            .field("extra", &self.extra)
            .finish()
    }
}

impl<A: 'static> SagaOptions<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: SagaSettings) -> Self {
        Self {
            context: settings.context,
            mode: settings.mode.unwrap_or_else(RuntimeMode::from_env),
            extra: settings.extra,
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = context;
        self
    }

    pub fn with_monitor(mut self, hooks: MonitorHooks<A>) -> Self {
        self.saga_monitor = Some(hooks);
        self
    }

    pub fn with_logger(mut self, logger: impl Fn(LogLevel, &str) + 'static) -> Self {
        self.logger = Some(Rc::new(logger));
        self
    }

    pub fn with_on_error(
        mut self,
        on_error: impl Fn(&(dyn Error + 'static), &ErrorInfo) + 'static,
    ) -> Self {
        self.on_error = Some(Rc::new(on_error));
        self
    }

    pub fn with_emitter(mut self, wrapper: EmitterWrapper<A>) -> Self {
        self.emitter = Some(wrapper);
        self
    }

    pub fn with_mode(mut self, mode: RuntimeMode) -> Self {
        self.mode = mode;
        self
    }
}

/// 通过校验的选项；`extra` 已被消化
pub struct ValidatedOptions<A> {
    pub context: Map<String, Value>,
    pub saga_monitor: Option<MonitorHooks<A>>,
    pub logger: Option<Logger>,
    pub on_error: Option<OnError>,
    pub emitter: Option<EmitterWrapper<A>>,
    pub mode: RuntimeMode,
}

impl<A> fmt::Debug for ValidatedOptions<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedOptions")
            .field("context", &self.context)
            .field("saga_monitor", &self.saga_monitor)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// 校验选项；无副作用（除了对无关键的 warn 日志），失败时什么都没有被创建
pub fn validate<A>(options: SagaOptions<A>) -> Result<ValidatedOptions<A>, ConfigError> {
    let SagaOptions {
        context,
        saga_monitor,
        logger,
        on_error,
        emitter,
        mode,
        extra,
    } = options;

    for (key, rule) in KEY_RULES {
        if !extra.contains_key(key) {
            continue;
        }
        let option = key.to_owned();
        return Err(match rule {
            KeyRule::Callable => ConfigError::NotCallable { option },
            KeyRule::Retired(replacement) => ConfigError::RetiredOption {
                key: option,
                replacement,
            },
            KeyRule::CodeOnly(setter) => ConfigError::CodeOnly { option, setter },
        });
    }
    for key in extra.keys() {
        tracing::warn!(key = %key, "忽略未知的中间件选项");
    }

    Ok(ValidatedOptions {
        context,
        saga_monitor,
        logger,
        on_error,
        emitter,
        mode,
    })
}
