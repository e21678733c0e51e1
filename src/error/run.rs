//! `run` 调用相关错误

/// `run` 的调用签名，出现在错误信息和废弃提示里
pub const RUN_SAGA_SIGNATURE: &str = "runSaga(storeInterface, saga, ...args)";

/// 启动 saga 失败
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// 入口不是可挂起的 generator 函数（InvalidEntryPoint）
    #[error("{signature}: saga argument must be a Generator function! ({saga} 返回了普通值 {returned})")]
    InvalidEntryPoint {
        signature: &'static str,
        saga: String,
        returned: String,
    },

    /// 中间件尚未挂载（NotMounted）
    #[error(
        "Before running a Saga, you must mount the Saga middleware on the Store using \
         Store::with_middleware(reducer, initial, vec![saga_middleware.as_middleware()])"
    )]
    NotMounted,
}

impl RunError {
    pub(crate) fn not_a_generator(saga: &str, returned: &serde_json::Value) -> Self {
        RunError::InvalidEntryPoint {
            signature: RUN_SAGA_SIGNATURE,
            saga: saga.to_owned(),
            returned: returned.to_string(),
        }
    }
}
