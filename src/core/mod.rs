mod bootstrap;
mod context;
mod emitter;
mod interpreter;
mod middleware;
mod monitor;

pub mod infra;

pub mod prelude;

#[cfg(test)]
mod testing;

// 公共导出
pub use bootstrap::{Bootstrap, StoreInterface};
pub use context::SagaContext;
pub use emitter::{EmitFn, Emitter, EmitterWrapper, Subscribe, SubscriberFn, Unsubscribe};
pub use interpreter::{ProcArgs, ProcOptions, TaskInterpreter};
pub use middleware::{
    MiddlewareInput, MiddlewareLayer, SagaMiddleware, create_saga_middleware,
    create_saga_middleware_with,
};
pub use monitor::{
    ActionHook, CancelledHook, Monitor, MonitorHooks, RejectedHook, ResolvedHook, TriggeredHook,
    normalize,
};
