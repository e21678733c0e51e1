//! 派发来源标记
//!
//! 交给解释器的 dispatch 会在调用期间把线程内的来源标记为 `Saga`，
//! 并进入带 effect id 的 tracing span。action 本身不被改动，下游 reducer 看到的是同一个值。

use std::cell::Cell;
use std::rc::Rc;

use crate::domain::EffectId;
use crate::host::Dispatch;

/// 当前正在派发的 action 从哪里来
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOrigin {
    /// 宿主直接调用 store 的 dispatch
    Host,
    /// saga 任务内部（put 之类的 effect）
    Saga,
}

thread_local! {
    static ORIGIN: Cell<DispatchOrigin> = const { Cell::new(DispatchOrigin::Host) };
}

pub fn current_origin() -> DispatchOrigin {
    ORIGIN.with(Cell::get)
}

pub fn is_saga_dispatch() -> bool {
    current_origin() == DispatchOrigin::Saga
}

/// 在 `f` 执行期间切换来源，返回时恢复（包括嵌套派发）
pub(crate) fn with_origin<T>(origin: DispatchOrigin, f: impl FnOnce() -> T) -> T {
    let _guard = OriginGuard::enter(origin);
    f()
}

struct OriginGuard {
    prev: DispatchOrigin,
}

impl OriginGuard {
    fn enter(origin: DispatchOrigin) -> Self {
        let prev = ORIGIN.with(|o| o.replace(origin));
        Self { prev }
    }
}

impl Drop for OriginGuard {
    fn drop(&mut self) {
        ORIGIN.with(|o| o.set(self.prev));
    }
}

/// 包装交给解释器的 dispatch：纯透传，不吞、不延迟、不重复调用
pub fn wrap_saga_dispatch<A: 'static>(dispatch: Dispatch<A>, effect_id: EffectId) -> Dispatch<A> {
    Rc::new(move |action: A| {
        let span = tracing::trace_span!("saga_dispatch", effect_id = effect_id.get());
        let _entered = span.enter();
        with_origin(DispatchOrigin::Saga, || dispatch(action))
    })
}
