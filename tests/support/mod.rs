//! 集成测试用的小型解释器：只懂 take / put / select / get_context 四种 effect

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use saga_middleware::core::prelude::*;
use saga_middleware::error::BoxError;
use saga_middleware::core::infra::ProcessEffectIds;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Take(String),
    /// 等到指定 action 时让订阅回调返回错误
    Refuse(String),
    Put(String),
    Select,
    GetContext(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskStatus {
    Running,
    Done(Value),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct TaskHandle {
    pub id: EffectId,
    status: Rc<RefCell<TaskStatus>>,
}

impl TaskHandle {
    pub fn status(&self) -> TaskStatus {
        self.status.borrow().clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Wait {
    Take(String),
    Refuse(String),
}

struct Runner {
    effect_id: EffectId,
    name: String,
    iterator: RefCell<Box<dyn SagaIterator<Effect>>>,
    waiting_for: RefCell<Option<Wait>>,
    dispatch: Dispatch<String>,
    get_state: GetState<i64>,
    context: SagaContext,
    options: ProcOptions<String>,
    status: Rc<RefCell<TaskStatus>>,
    unsubscribe: RefCell<Option<Unsubscribe>>,
}

impl Runner {
    fn advance(&self, mut input: Value) {
        loop {
            let step = self.iterator.borrow_mut().step(input);
            match step {
                IteratorStep::Done(value) => {
                    *self.status.borrow_mut() = TaskStatus::Done(value);
                    if let Some(unsubscribe) = self.unsubscribe.borrow().as_ref() {
                        unsubscribe.unsubscribe();
                    }
                    return;
                }
                IteratorStep::Yielded(Effect::Take(pattern)) => {
                    *self.waiting_for.borrow_mut() = Some(Wait::Take(pattern));
                    return;
                }
                IteratorStep::Yielded(Effect::Refuse(pattern)) => {
                    *self.waiting_for.borrow_mut() = Some(Wait::Refuse(pattern));
                    return;
                }
                IteratorStep::Yielded(Effect::Put(action)) => {
                    self.report(&action);
                    match (self.dispatch)(action) {
                        Ok(action) => input = json!(action),
                        Err(err) => {
                            if let Some(on_error) = &self.options.on_error {
                                let info = ErrorInfo {
                                    saga_stack: format!("at {}", self.name),
                                };
                                on_error(&err, &info);
                            }
                            *self.status.borrow_mut() = TaskStatus::Failed(err.to_string());
                            return;
                        }
                    }
                }
                IteratorStep::Yielded(Effect::Select) => input = json!((self.get_state)()),
                IteratorStep::Yielded(Effect::GetContext(key)) => {
                    input = self.context.get_key(&key).unwrap_or(Value::Null);
                }
            }
        }
    }

    fn report(&self, action: &str) {
        if let Some(monitor) = &self.options.saga_monitor {
            let id = ProcessEffectIds.next_id();
            monitor.effect_triggered(&TriggeredEffect {
                effect_id: id,
                parent_effect_id: self.effect_id,
                root: false,
                label: None,
                effect: EffectDescription::Custom {
                    label: "put".to_owned(),
                    payload: json!(action),
                },
            });
        }
    }

    fn on_action(&self, action: &str) -> Result<(), BoxError> {
        let wait = {
            let mut waiting = self.waiting_for.borrow_mut();
            let matched =
                matches!(waiting.as_ref(), Some(Wait::Take(p) | Wait::Refuse(p)) if p == action);
            if matched { waiting.take() } else { None }
        };
        match wait {
            Some(Wait::Take(_)) => {
                self.advance(json!(action));
                Ok(())
            }
            Some(Wait::Refuse(_)) => {
                *self.status.borrow_mut() = TaskStatus::Failed(format!("refused {action}"));
                Err(format!("{} refused {action}", self.name).into())
            }
            None => Ok(()),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MiniInterpreter;

impl TaskInterpreter<String, i64> for MiniInterpreter {
    type Effect = Effect;
    type Task = TaskHandle;

    fn proc(&self, args: ProcArgs<String, i64, Effect>) -> TaskHandle {
        let status = Rc::new(RefCell::new(TaskStatus::Running));
        let runner = Rc::new(Runner {
            effect_id: args.effect_id,
            name: args.name,
            iterator: RefCell::new(args.iterator),
            waiting_for: RefCell::new(None),
            dispatch: args.dispatch,
            get_state: args.get_state,
            context: args.context,
            options: args.options,
            status: Rc::clone(&status),
            unsubscribe: RefCell::new(None),
        });

        let listener = Rc::clone(&runner);
        let unsubscribe =
            (args.subscribe)(Rc::new(move |action: &String| listener.on_action(action)));
        *runner.unsubscribe.borrow_mut() = Some(unsubscribe);

        runner.advance(Value::Null);
        TaskHandle {
            id: args.effect_id,
            status,
        }
    }
}

/// 按顺序交出预先写好的 effect，记录每一步收到的恢复值，结束时返回最后一个恢复值
pub struct Script {
    effects: VecDeque<Effect>,
    inputs: Rc<RefCell<Vec<Value>>>,
}

impl SagaIterator<Effect> for Script {
    fn step(&mut self, input: Value) -> IteratorStep<Effect> {
        self.inputs.borrow_mut().push(input.clone());
        match self.effects.pop_front() {
            Some(effect) => IteratorStep::Yielded(effect),
            None => IteratorStep::Done(input),
        }
    }

    fn name(&self) -> &str {
        "script"
    }
}

pub fn script(name: &str, effects: Vec<Effect>) -> (Saga<Effect>, Rc<RefCell<Vec<Value>>>) {
    let inputs: Rc<RefCell<Vec<Value>>> = Rc::default();
    let recorded = Rc::clone(&inputs);
    let saga = Saga::generator(name, move |_: &[Value]| Script {
        effects: effects.clone().into(),
        inputs: Rc::clone(&recorded),
    });
    (saga, inputs)
}

/// 记录每个被归约的 action，状态为已归约 action 的数量
pub fn logging_store(
    middleware: Rc<dyn saga_middleware::host::Middleware<String, i64>>,
) -> (Store<String, i64>, Rc<RefCell<Vec<String>>>) {
    let reduced: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&reduced);
    let store = Store::with_middleware(
        move |state: &i64, action: &String| {
            sink.borrow_mut().push(action.clone());
            state + 1
        },
        0,
        vec![middleware],
    );
    (store, reduced)
}
