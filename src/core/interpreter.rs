//! 任务解释器边界
//!
//! 本层只负责把 root saga 交给解释器；effect 的语义、任务树、取消、join 都在解释器内部。

use std::fmt;
use std::rc::Rc;

use crate::core::{Monitor, SagaContext, Subscribe};
use crate::domain::EffectId;
use crate::host::{Dispatch, GetState};
use crate::saga::SagaIterator;
use crate::settings::{Logger, OnError};

/// 透传给解释器的选项
pub struct ProcOptions<A> {
    pub saga_monitor: Option<Rc<Monitor<A>>>,
    pub logger: Option<Logger>,
    pub on_error: Option<OnError>,
}

impl<A> Clone for ProcOptions<A> {
    fn clone(&self) -> Self {
        Self {
            saga_monitor: self.saga_monitor.clone(),
            logger: self.logger.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<A> fmt::Debug for ProcOptions<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcOptions")
            .field("saga_monitor", &self.saga_monitor.is_some())
            .field("logger", &self.logger.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// `proc` 的参数；`dispatch` 已经过 saga 来源包装
pub struct ProcArgs<A, S, E> {
    pub iterator: Box<dyn SagaIterator<E>>,
    pub subscribe: Subscribe<A>,
    pub dispatch: Dispatch<A>,
    pub get_state: GetState<S>,
    pub context: SagaContext,
    pub options: ProcOptions<A>,
    pub effect_id: EffectId,
    pub name: String,
}

pub trait TaskInterpreter<A, S> {
    /// saga 交出的 effect 类型
    type Effect;
    /// 代表运行中 root task 的句柄
    type Task: fmt::Debug;

    /// 开始驱动迭代器，立刻返回任务句柄
    fn proc(&self, args: ProcArgs<A, S, Self::Effect>) -> Self::Task;
}
