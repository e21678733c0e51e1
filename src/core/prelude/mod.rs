#![allow(unused_imports)]
//! 编写解释器和 saga 时常用的导入

pub use crate::core::infra::{DispatchOrigin, EffectIdSource, current_origin, next_effect_id};
pub use crate::core::{
    Monitor, MonitorHooks, ProcArgs, ProcOptions, SagaContext, SagaMiddleware, Subscribe,
    TaskInterpreter, Unsubscribe, create_saga_middleware,
};
pub use crate::domain::{EffectDescription, EffectId, ErrorInfo, LogLevel, TriggeredEffect};
pub use crate::error::{BoxError, DispatchError, RunError};
pub use crate::host::{Dispatch, GetState, Store};
pub use crate::saga::{IteratorStep, Saga, SagaIterator, from_iter};
pub use crate::settings::{RuntimeMode, SagaOptions};
