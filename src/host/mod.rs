//! 宿主派发管线的边界
//!
//! 三层工厂 `(options) -> (store capabilities) -> (next) -> (action) -> result`，
//! options 层由 [`crate::core::create_saga_middleware`] 承担，这里定义后两层的形状。

mod store;

use std::rc::Rc;

use crate::error::DispatchError;

pub use store::Store;

pub type DispatchResult<A> = Result<A, DispatchError>;

/// 单个派发函数；管线中的每一层都是这个形状
pub type Dispatch<A> = Rc<dyn Fn(A) -> DispatchResult<A>>;

pub type GetState<S> = Rc<dyn Fn() -> S>;

/// next 层：接收下游派发函数，返回包装后的派发函数
pub type Layer<A> = Box<dyn FnOnce(Dispatch<A>) -> Dispatch<A>>;

/// 宿主交给中间件的能力。`dispatch` 是延迟绑定的完整管线。
pub struct StoreCapabilities<A, S> {
    pub get_state: GetState<S>,
    pub dispatch: Dispatch<A>,
}

impl<A, S> Clone for StoreCapabilities<A, S> {
    fn clone(&self) -> Self {
        Self {
            get_state: Rc::clone(&self.get_state),
            dispatch: Rc::clone(&self.dispatch),
        }
    }
}

/// 管线中间件的 store 层
pub trait Middleware<A, S> {
    fn attach(&self, caps: StoreCapabilities<A, S>) -> Layer<A>;
}
