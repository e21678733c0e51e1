//! saga 中间件
//!
//! 工厂分三层：`create_saga_middleware(options)` 校验并建好共享上下文；
//! `mount(caps)` 在挂载到 store 时组装 emitter、monitor 与 [`StoreInterface`]；
//! [`MiddlewareLayer::wrap`] 包住下游 dispatch，在每个 action 归约之后发布给 saga。

use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::core::infra::{DispatchOrigin, current_origin, with_origin};
use crate::core::{
    Bootstrap, EmitFn, Emitter, Monitor, SagaContext, StoreInterface, TaskInterpreter, normalize,
};
use crate::error::{ConfigError, ContextError, RunError};
use crate::host::{Dispatch, DispatchResult, Layer, Middleware, StoreCapabilities};
use crate::saga::Saga;
use crate::settings::{RuntimeMode, SagaOptions, ValidatedOptions, validate};

/// 工厂的输入：正常是选项，误把 saga 传进来时给出迁移提示
pub enum MiddlewareInput<A, E> {
    Options(SagaOptions<A>),
    Saga(Saga<E>),
}

impl<A, E> From<SagaOptions<A>> for MiddlewareInput<A, E> {
    fn from(options: SagaOptions<A>) -> Self {
        MiddlewareInput::Options(options)
    }
}

impl<A, E> From<Saga<E>> for MiddlewareInput<A, E> {
    fn from(saga: Saga<E>) -> Self {
        MiddlewareInput::Saga(saga)
    }
}

pub fn create_saga_middleware<A, S, I>(
    input: impl Into<MiddlewareInput<A, I::Effect>>,
    interpreter: I,
) -> Result<SagaMiddleware<A, S, I>, ConfigError>
where
    A: Clone + fmt::Debug + 'static,
    S: 'static,
    I: TaskInterpreter<A, S>,
{
    create_saga_middleware_with(input, Bootstrap::new(interpreter))
}

/// 同上，但使用调用方组装的 [`Bootstrap`]（比如注入确定的 effect id 序列）
pub fn create_saga_middleware_with<A, S, I>(
    input: impl Into<MiddlewareInput<A, I::Effect>>,
    bootstrap: Bootstrap<A, S, I>,
) -> Result<SagaMiddleware<A, S, I>, ConfigError>
where
    A: Clone + fmt::Debug + 'static,
    S: 'static,
    I: TaskInterpreter<A, S>,
{
    let options = match input.into() {
        MiddlewareInput::Options(options) => options,
        MiddlewareInput::Saga(saga) => {
            tracing::warn!(saga = %saga.name(), "saga 被当作中间件选项传入");
            return Err(ConfigError::saga_passed(RuntimeMode::from_env()));
        }
    };
    let options = validate(options)?;
    let context = SagaContext::new(options.context.clone());

    Ok(SagaMiddleware {
        inner: Rc::new(Inner {
            options,
            context,
            bootstrap,
            attached: OnceCell::new(),
        }),
    })
}

struct Attached<A, S> {
    interface: StoreInterface<A, S>,
    emit: EmitFn<A>,
}

impl<A: Clone + fmt::Debug + 'static, S> Attached<A, S> {
    fn layer(&self) -> MiddlewareLayer<A> {
        MiddlewareLayer {
            emit: Rc::clone(&self.emit),
            monitor: self.interface.saga_monitor.clone(),
        }
    }
}

struct Inner<A, S, I> {
    options: ValidatedOptions<A>,
    context: SagaContext,
    bootstrap: Bootstrap<A, S, I>,
    attached: OnceCell<Attached<A, S>>,
}

/// 中间件句柄；克隆共享同一个实例
pub struct SagaMiddleware<A, S, I> {
    inner: Rc<Inner<A, S, I>>,
}

impl<A, S, I> Clone for SagaMiddleware<A, S, I> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A, S, I> fmt::Debug for SagaMiddleware<A, S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SagaMiddleware")
            .field("options", &self.inner.options)
            .field("context", &self.inner.context)
            .field("attached", &self.inner.attached.get().is_some())
            .finish()
    }
}

impl<A, S, I> SagaMiddleware<A, S, I>
where
    A: Clone + fmt::Debug + 'static,
    S: 'static,
    I: TaskInterpreter<A, S> + 'static,
{
    /// 浅合并进共享上下文；挂载前后都可以调用
    pub fn set_context(&self, props: Value) -> Result<(), ContextError> {
        self.inner.context.merge_as("sagaMiddleware", props)
    }

    pub fn context(&self) -> &SagaContext {
        &self.inner.context
    }

    pub fn is_attached(&self) -> bool {
        self.inner.attached.get().is_some()
    }

    /// 启动 root saga；挂载之前一律返回 `NotMounted`
    pub fn run(&self, saga: &Saga<I::Effect>, args: Vec<Value>) -> Result<I::Task, RunError> {
        let attached = self.inner.attached.get().ok_or(RunError::NotMounted)?;
        self.inner.bootstrap.run(&attached.interface, saga, args)
    }

    /// store 层。只应调用一次；重复挂载沿用第一次的 emitter 与 monitor
    pub fn mount(&self, caps: StoreCapabilities<A, S>) -> MiddlewareLayer<A> {
        if let Some(attached) = self.inner.attached.get() {
            tracing::warn!("saga 中间件重复挂载，沿用第一次的 store interface");
            return attached.layer();
        }

        let options = &self.inner.options;
        let emitter = Emitter::new();
        let emit = emitter.wrapped_emit(options.emitter.as_ref());
        let interface = StoreInterface {
            subscribe: emitter.subscribe_fn(),
            dispatch: caps.dispatch,
            get_state: caps.get_state,
            context: self.inner.context.clone(),
            saga_monitor: normalize(options.saga_monitor.as_ref()),
            logger: options.logger.clone(),
            on_error: options.on_error.clone(),
            mode: options.mode,
        };
        tracing::debug!(
            monitor = interface.saga_monitor.is_some(),
            emitter_wrapped = options.emitter.is_some(),
            "saga 中间件已挂载"
        );

        let attached = Attached { interface, emit };
        let layer = attached.layer();
        // 上面已确认未挂载
        let _ = self.inner.attached.set(attached);
        layer
    }

    /// 以 trait object 形式交给 [`crate::host::Store::with_middleware`]
    pub fn as_middleware(&self) -> Rc<dyn Middleware<A, S>> {
        Rc::new(self.clone())
    }
}

impl<A, S, I> Middleware<A, S> for SagaMiddleware<A, S, I>
where
    A: Clone + fmt::Debug + 'static,
    S: 'static,
    I: TaskInterpreter<A, S> + 'static,
{
    fn attach(&self, caps: StoreCapabilities<A, S>) -> Layer<A> {
        let layer = self.mount(caps);
        Box::new(move |next: Dispatch<A>| layer.wrap(next))
    }
}

/// next 层
pub struct MiddlewareLayer<A> {
    emit: EmitFn<A>,
    monitor: Option<Rc<Monitor<A>>>,
}

impl<A: Clone + fmt::Debug + 'static> MiddlewareLayer<A> {
    /// 每个 action：通知 monitor → 下游归约 → 发布给 saga → 返回下游结果
    pub fn wrap(self, next: Dispatch<A>) -> Dispatch<A> {
        let MiddlewareLayer { emit, monitor } = self;
        Rc::new(move |action: A| -> DispatchResult<A> {
            if let Some(monitor) = &monitor {
                monitor.action_dispatched(&action);
            }
            let origin = current_origin();
            let result = next(action.clone())?;
            tracing::trace!(action = ?action, origin = ?origin, "action 已归约，发布给 saga");
            with_origin(DispatchOrigin::Host, || emit(&action))?;
            Ok(result)
        })
    }
}

impl<A> fmt::Debug for MiddlewareLayer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareLayer")
            .field("monitor", &self.monitor.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::infra::SequentialIds;
    use crate::core::testing::{RecordedTask, RecordingInterpreter};
    use crate::core::{EmitterWrapper, MonitorHooks};
    use crate::domain::EffectId;
    use crate::error::{DispatchError, EmitError};
    use crate::host::Store;
    use crate::saga::{Invocation, from_iter};
    use serde_json::json;
    use std::cell::RefCell;

    type Mw = SagaMiddleware<String, i64, RecordingInterpreter>;

    fn middleware(options: SagaOptions<String>) -> (Mw, RecordingInterpreter) {
        let interp = RecordingInterpreter::default();
        let boot = Bootstrap::with_ids(interp.clone(), Rc::new(SequentialIds::default()));
        (create_saga_middleware_with(options, boot).unwrap(), interp)
    }

    fn counting_store(mw: &Mw) -> Store<String, i64> {
        Store::with_middleware(|s: &i64, _a: &String| s + 1, 0, vec![mw.as_middleware()])
    }

    fn saga() -> Saga<String> {
        Saga::generator("watcher", |_: &[Value]| from_iter(vec!["take".to_owned()]))
    }

    #[test]
    fn test_run_before_attach_is_not_mounted() {
        let (mw, interp) = middleware(SagaOptions::new());
        let plain: Saga<String> = Saga::new("plain", |_| Invocation::Returned(Value::Null));
        assert!(matches!(mw.run(&saga(), vec![]), Err(RunError::NotMounted)));
        // 即使入口本身无效，也先报未挂载
        assert!(matches!(mw.run(&plain, vec![]), Err(RunError::NotMounted)));
        assert_eq!(interp.count(), 0);
    }

    #[test]
    fn test_saga_passed_as_options() {
        let interp = RecordingInterpreter::default();
        let err = create_saga_middleware::<String, i64, _>(saga(), interp).unwrap_err();
        assert!(matches!(err, ConfigError::SagaPassedAsOptions { .. }));
    }

    #[test]
    fn test_non_callable_option_fails_at_construction() {
        let mut options = SagaOptions::new();
        options.extra.insert("emitter".to_owned(), json!(1));
        let interp = RecordingInterpreter::default();
        let err = create_saga_middleware::<String, i64, _>(options, interp).unwrap_err();
        assert!(err.to_string().contains("`options.emitter`"));
    }

    #[test]
    fn test_run_after_attach_hands_shared_capabilities() {
        let mut context = serde_json::Map::new();
        context.insert("tenant".to_owned(), json!("acme"));
        let (mw, interp) = middleware(SagaOptions::new().with_context(context));
        let store = counting_store(&mw);
        assert!(mw.is_attached());

        let task = mw.run(&saga(), vec![json!(1)]).unwrap();
        assert_eq!(
            task,
            RecordedTask {
                effect_id: EffectId::new(1),
                name: "watcher".to_owned(),
                first_effect: Some("take".to_owned()),
            }
        );

        let calls = interp.calls();
        let args = &calls[0];
        assert!(args.context.same_as(mw.context()));
        assert_eq!(args.context.get_key("tenant"), Some(json!("acme")));
        assert_eq!((args.get_state)(), 0);
        (args.dispatch)("from saga".to_owned()).unwrap();
        assert_eq!(store.state(), 1);
    }

    #[test]
    fn test_set_context_before_and_after_attach() {
        let (mw, _) = middleware(SagaOptions::new());
        mw.set_context(json!({"a": 1})).unwrap();
        let _store = counting_store(&mw);
        mw.set_context(json!({"b": 2})).unwrap();
        assert_eq!(Value::Object(mw.context().get()), json!({"a": 1, "b": 2}));

        let err = mw.set_context(json!([1])).unwrap_err();
        assert!(err.to_string().starts_with("sagaMiddleware.setContext"));
    }

    #[test]
    fn test_subscribers_see_state_after_reduction() {
        let (mw, interp) = middleware(SagaOptions::new());
        let store = counting_store(&mw);
        mw.run(&saga(), vec![]).unwrap();

        let seen: Rc<RefCell<Vec<(String, i64)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let get_state = Rc::clone(&interp.calls()[0].get_state);
        let subscribe = Rc::clone(&interp.calls()[0].subscribe);
        subscribe(Rc::new(move |action: &String| {
            sink.borrow_mut().push((action.clone(), get_state()));
            Ok(())
        }));

        assert_eq!(store.dispatch("A".to_owned()).unwrap(), "A");
        store.dispatch("B".to_owned()).unwrap();
        assert_eq!(*seen.borrow(), vec![("A".to_owned(), 1), ("B".to_owned(), 2)]);
    }

    #[test]
    fn test_monitor_sees_action_before_reducer() {
        let order: Rc<RefCell<Vec<String>>> = Rc::default();
        let hook_log = Rc::clone(&order);
        let hooks = MonitorHooks::new()
            .on_action_dispatched(move |a: &String| hook_log.borrow_mut().push(format!("monitor {a}")));
        let (mw, _) = middleware(SagaOptions::new().with_monitor(hooks));

        let reducer_log = Rc::clone(&order);
        let store = Store::with_middleware(
            move |s: &i64, a: &String| {
                reducer_log.borrow_mut().push(format!("reduce {a}"));
                s + 1
            },
            0,
            vec![mw.as_middleware()],
        );
        store.dispatch("X".to_owned()).unwrap();
        assert_eq!(*order.borrow(), vec!["monitor X", "reduce X"]);
    }

    #[test]
    fn test_emitter_option_decorates_publish() {
        let wrapper: EmitterWrapper<String> = Rc::new(|emit: EmitFn<String>| -> EmitFn<String> {
            Rc::new(move |action: &String| -> Result<(), EmitError> {
                if action.starts_with('_') {
                    return Ok(());
                }
                emit(action)
            })
        });
        let (mw, interp) = middleware(SagaOptions::new().with_emitter(wrapper));
        let store = counting_store(&mw);
        mw.run(&saga(), vec![]).unwrap();

        let seen: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&seen);
        (interp.calls()[0].subscribe)(Rc::new(move |a: &String| {
            sink.borrow_mut().push(a.clone());
            Ok(())
        }));

        store.dispatch("_private".to_owned()).unwrap();
        store.dispatch("public".to_owned()).unwrap();
        assert_eq!(*seen.borrow(), vec!["public"]);
        assert_eq!(store.state(), 2);
    }

    #[test]
    fn test_subscriber_error_surfaces_after_reduction() {
        let (mw, interp) = middleware(SagaOptions::new());
        let store = counting_store(&mw);
        mw.run(&saga(), vec![]).unwrap();
        (interp.calls()[0].subscribe)(Rc::new(|_: &String| Err("saga crashed".into())));

        let err = store.dispatch("A".to_owned()).unwrap_err();
        assert!(matches!(err, DispatchError::Emit(_)));
        assert_eq!(store.state(), 1);
    }

    #[test]
    fn test_second_attach_reuses_first_interface() {
        let (mw, interp) = middleware(SagaOptions::new());
        let first = counting_store(&mw);
        let _second = counting_store(&mw);
        mw.run(&saga(), vec![]).unwrap();

        (interp.calls()[0].dispatch)("x".to_owned()).unwrap();
        assert_eq!(first.state(), 1);
    }
}
