//! 上下文合并错误

/// `set_context` 收到了非键值映射（InvalidArgument）
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("{caller}.setContext(props): argument {found} is not a plain object")]
    InvalidArgument {
        caller: &'static str,
        found: &'static str,
    },
}
