//! 最小的同步 store
//!
//! 只提供嵌入和测试需要的部分：reducer、`apply_middleware` 式的组合、
//! 延迟绑定的 dispatch。一次只处理一个 action，处理完再返回。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{Dispatch, DispatchResult, GetState, Middleware, StoreCapabilities};
use crate::error::DispatchError;

struct StoreInner<A, S> {
    state: RefCell<S>,
    reducer: Box<dyn Fn(&S, &A) -> S>,
    reducing: Cell<bool>,
}

impl<A, S> StoreInner<A, S> {
    fn reduce(&self, action: A) -> DispatchResult<A> {
        if self.reducing.get() {
            return Err(DispatchError::ReducerReentry);
        }
        self.reducing.set(true);
        let next = {
            let state = self.state.borrow();
            (self.reducer)(&state, &action)
        };
        self.reducing.set(false);
        *self.state.borrow_mut() = next;
        Ok(action)
    }
}

pub struct Store<A, S> {
    inner: Rc<StoreInner<A, S>>,
    dispatch: Dispatch<A>,
}

impl<A: 'static, S: Clone + 'static> Store<A, S> {
    pub fn new(reducer: impl Fn(&S, &A) -> S + 'static, initial: S) -> Self {
        Self::with_middleware(reducer, initial, Vec::new())
    }

    /// 等价于 `createStore(reducer, initial, applyMiddleware(...middlewares))`
    ///
    /// 第一个中间件在最外层。中间件构造期间调用 `caps.dispatch` 会得到
    /// [`DispatchError::NotReady`]。
    pub fn with_middleware(
        reducer: impl Fn(&S, &A) -> S + 'static,
        initial: S,
        middlewares: Vec<Rc<dyn Middleware<A, S>>>,
    ) -> Self {
        let inner = Rc::new(StoreInner {
            state: RefCell::new(initial),
            reducer: Box::new(reducer),
            reducing: Cell::new(false),
        });

        let base: Dispatch<A> = {
            let inner = Rc::clone(&inner);
            Rc::new(move |action| inner.reduce(action))
        };

        let slot: Rc<RefCell<Option<Dispatch<A>>>> = Rc::new(RefCell::new(None));
        let late: Dispatch<A> = {
            let slot = Rc::clone(&slot);
            Rc::new(move |action| {
                let current = slot.borrow().clone();
                match current {
                    Some(dispatch) => dispatch(action),
                    None => Err(DispatchError::NotReady),
                }
            })
        };
        let get_state: GetState<S> = {
            let inner = Rc::clone(&inner);
            Rc::new(move || inner.state.borrow().clone())
        };
        let caps = StoreCapabilities {
            get_state,
            dispatch: late,
        };

        let layers: Vec<_> = middlewares.iter().map(|m| m.attach(caps.clone())).collect();
        let mut dispatch = base;
        for layer in layers.into_iter().rev() {
            dispatch = layer(dispatch);
        }
        *slot.borrow_mut() = Some(Rc::clone(&dispatch));

        tracing::debug!(middlewares = middlewares.len(), "store 已创建");
        Self { inner, dispatch }
    }

    pub fn dispatch(&self, action: A) -> DispatchResult<A> {
        (self.dispatch)(action)
    }

    pub fn state(&self) -> S {
        self.inner.state.borrow().clone()
    }

    /// 完整管线的派发函数，可以交给别处持有
    pub fn dispatcher(&self) -> Dispatch<A> {
        Rc::clone(&self.dispatch)
    }
}
