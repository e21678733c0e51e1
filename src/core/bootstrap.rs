//! root saga 启动
//!
//! 校验入口 → 分配 effect id → 通知 monitor → 交给解释器 → 通知 monitor → 返回任务。
//! 校验失败时既不分配 id 也不触碰 monitor。

use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::core::infra::{EffectIdSource, ProcessEffectIds, wrap_saga_dispatch};
use crate::core::{Monitor, ProcArgs, ProcOptions, SagaContext, Subscribe, TaskInterpreter};
use crate::domain::{LogLevel, TriggeredEffect};
use crate::error::RunError;
use crate::host::{Dispatch, GetState};
use crate::logging;
use crate::saga::{Invocation, Saga, SagaIterator};
use crate::settings::{Logger, OnError, RuntimeMode};

const LEGACY_DEPRECATION: &str = "runSaga(iterator, storeInterface) has been deprecated in favor of \
runSaga(storeInterface, saga, ...args)";

/// 启动 root saga 所需的一切；由中间件挂载时组装
pub struct StoreInterface<A, S> {
    pub subscribe: Subscribe<A>,
    pub dispatch: Dispatch<A>,
    pub get_state: GetState<S>,
    pub context: SagaContext,
    pub saga_monitor: Option<Rc<Monitor<A>>>,
    pub logger: Option<Logger>,
    pub on_error: Option<OnError>,
    pub mode: RuntimeMode,
}

impl<A, S> Clone for StoreInterface<A, S> {
    fn clone(&self) -> Self {
        Self {
            subscribe: Rc::clone(&self.subscribe),
            dispatch: Rc::clone(&self.dispatch),
            get_state: Rc::clone(&self.get_state),
            context: self.context.clone(),
            saga_monitor: self.saga_monitor.clone(),
            logger: self.logger.clone(),
            on_error: self.on_error.clone(),
            mode: self.mode,
        }
    }
}

impl<A, S> fmt::Debug for StoreInterface<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreInterface")
            .field("context", &self.context)
            .field("saga_monitor", &self.saga_monitor.is_some())
            .field("logger", &self.logger.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

pub struct Bootstrap<A, S, I> {
    interpreter: I,
    ids: Rc<dyn EffectIdSource>,
    _marker: PhantomData<fn() -> (A, S)>,
}

impl<A, S, I> Bootstrap<A, S, I> {
    pub fn new(interpreter: I) -> Self {
        Self::with_ids(interpreter, Rc::new(ProcessEffectIds))
    }

    pub fn with_ids(interpreter: I, ids: Rc<dyn EffectIdSource>) -> Self {
        Self {
            interpreter,
            ids,
            _marker: PhantomData,
        }
    }

    pub fn interpreter(&self) -> &I {
        &self.interpreter
    }
}

impl<A: 'static, S: 'static, I: TaskInterpreter<A, S>> Bootstrap<A, S, I> {
    pub fn run(
        &self,
        interface: &StoreInterface<A, S>,
        saga: &Saga<I::Effect>,
        args: Vec<Value>,
    ) -> Result<I::Task, RunError> {
        let iterator = match saga.invoke(&args) {
            Invocation::Suspended(iterator) => iterator,
            Invocation::Returned(value) => {
                return Err(RunError::not_a_generator(saga.name(), &value));
            }
        };
        Ok(self.start(interface, iterator, saga.name().to_owned(), args))
    }

    /// 旧调用方式：直接传入已经创建好的迭代器
    #[deprecated(note = "use `run(store_interface, saga, args)`")]
    pub fn run_legacy(
        &self,
        iterator: Box<dyn SagaIterator<I::Effect>>,
        interface: &StoreInterface<A, S>,
    ) -> I::Task {
        if interface.mode == RuntimeMode::Development {
            logging::log(interface.logger.as_ref(), LogLevel::Warn, LEGACY_DEPRECATION);
        }
        let name = iterator.name().to_owned();
        self.start(interface, iterator, name, Vec::new())
    }

    fn start(
        &self,
        interface: &StoreInterface<A, S>,
        iterator: Box<dyn SagaIterator<I::Effect>>,
        name: String,
        args: Vec<Value>,
    ) -> I::Task {
        let effect_id = self.ids.next_id();
        tracing::debug!(effect_id = effect_id.get(), saga = %name, "启动 root saga");

        if let Some(monitor) = &interface.saga_monitor {
            monitor.effect_triggered(&TriggeredEffect::root(effect_id, name.clone(), args));
        }

        let task = self.interpreter.proc(ProcArgs {
            iterator,
            subscribe: Rc::clone(&interface.subscribe),
            dispatch: wrap_saga_dispatch(Rc::clone(&interface.dispatch), effect_id),
            get_state: Rc::clone(&interface.get_state),
            context: interface.context.clone(),
            options: ProcOptions {
                saga_monitor: interface.saga_monitor.clone(),
                logger: interface.logger.clone(),
                on_error: interface.on_error.clone(),
            },
            effect_id,
            name,
        });

        if let Some(monitor) = &interface.saga_monitor {
            monitor.effect_resolved(effect_id, &task);
        }
        task
    }
}
