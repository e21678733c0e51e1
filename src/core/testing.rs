//! 单元测试用的记录型解释器

use serde_json::Value;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::core::{Emitter, ProcArgs, SagaContext, StoreInterface, TaskInterpreter};
use crate::domain::EffectId;
use crate::saga::IteratorStep;
use crate::settings::RuntimeMode;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedTask {
    pub effect_id: EffectId,
    pub name: String,
    pub first_effect: Option<String>,
}

/// 记录每次 `proc` 的参数，并把迭代器推进一步
#[derive(Clone, Default)]
pub(crate) struct RecordingInterpreter {
    calls: Rc<RefCell<Vec<ProcArgs<String, i64, String>>>>,
}

impl RecordingInterpreter {
    pub fn calls(&self) -> Ref<'_, Vec<ProcArgs<String, i64, String>>> {
        self.calls.borrow()
    }

    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl TaskInterpreter<String, i64> for RecordingInterpreter {
    type Effect = String;
    type Task = RecordedTask;

    fn proc(&self, mut args: ProcArgs<String, i64, String>) -> RecordedTask {
        let first_effect = match args.iterator.step(Value::Null) {
            IteratorStep::Yielded(effect) => Some(effect),
            IteratorStep::Done(_) => None,
        };
        let task = RecordedTask {
            effect_id: args.effect_id,
            name: args.name.clone(),
            first_effect,
        };
        self.calls.borrow_mut().push(args);
        task
    }
}

/// 最小的 store interface：dispatch 原样返回，状态恒为 0
pub(crate) fn interface(emitter: &Emitter<String>) -> StoreInterface<String, i64> {
    StoreInterface {
        subscribe: emitter.subscribe_fn(),
        dispatch: Rc::new(|action: String| Ok(action)),
        get_state: Rc::new(|| 0),
        context: SagaContext::default(),
        saga_monitor: None,
        logger: None,
        on_error: None,
        mode: RuntimeMode::Development,
    }
}
