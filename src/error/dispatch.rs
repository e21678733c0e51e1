//! 派发管线错误

/// 订阅者、reducer 等用户回调返回的错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 某个订阅者在 emit 过程中失败，本轮剩余订阅者不再调用
#[derive(Debug, thiserror::Error)]
#[error("第 {subscriber} 个订阅者处理失败: {source}")]
pub struct EmitError {
    /// 失败订阅者在本轮快照中的位置
    pub subscriber: usize,
    #[source]
    pub source: BoxError,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Emit(#[from] EmitError),

    /// 中间件构造期间调用了 dispatch
    #[error("Dispatching while constructing your middleware is not allowed")]
    NotReady,

    /// reducer 内部再次派发
    #[error("Reducers may not dispatch actions")]
    ReducerReentry,
}
