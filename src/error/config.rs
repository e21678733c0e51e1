//! 中间件构造参数错误

use crate::settings::RuntimeMode;

const SAGA_PASSED_SHORT: &str =
    "Saga 中间件不再接受 generator 函数，请改用 sagaMiddleware.run";

const SAGA_PASSED_LONG: &str = "你向 Saga 中间件传入了一个函数。你大概是想直接把 saga 交给中间件来启动，\
自 0.10.0 起不再支持这种用法。要运行 saga，必须在中间件挂载到 store 之后动态启动：

    let saga_middleware = create_saga_middleware(SagaOptions::default(), interpreter)?;
    let store = Store::with_middleware(reducer, initial, vec![saga_middleware.as_middleware()]);
    saga_middleware.run(&saga, args)?;";

/// 配置错误（InvalidConfiguration）
///
/// 在工厂调用时同步返回，此时 `get_state`/`dispatch` 都还没有被触碰。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 把 saga 当作 options 传给了中间件工厂
    #[error("{message}")]
    SagaPassedAsOptions { message: &'static str },

    /// 本应是函数的选项给了一个普通值
    #[error("`options.{option}` passed to the Saga middleware is not a function!")]
    NotCallable { option: String },

    /// 已废弃的选项名
    #[error("`options.{key}` was removed. Use `options.{replacement}` instead.")]
    RetiredOption {
        key: String,
        replacement: &'static str,
    },

    /// 只能在代码里挂上的选项出现在了设置文件里
    #[error("`options.{option}` cannot be set from a settings file. Set it in code via `SagaOptions::{setter}`.")]
    CodeOnly {
        option: String,
        setter: &'static str,
    },
}

impl ConfigError {
    pub fn saga_passed(mode: RuntimeMode) -> Self {
        let message = match mode {
            RuntimeMode::Production => SAGA_PASSED_SHORT,
            RuntimeMode::Development => SAGA_PASSED_LONG,
        };
        ConfigError::SagaPassedAsOptions { message }
    }
}
