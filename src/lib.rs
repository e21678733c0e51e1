//! 把 generator 驱动的任务运行时挂接到同步 action 派发管线上的中间件层。
//!
//! effect 的解释交给实现了 [`TaskInterpreter`] 的外部解释器；本 crate 负责
//! 选项校验、挂载、action 发布、共享上下文、monitor 规范化以及 root saga 的启动。

pub mod core;
pub mod domain;
pub mod error;
pub mod host;
pub mod logging;
pub mod saga;
pub mod settings;

pub use crate::core::{
    Bootstrap, MiddlewareInput, MonitorHooks, SagaContext, SagaMiddleware, StoreInterface,
    TaskInterpreter, create_saga_middleware,
};
pub use crate::error::{ErrorKind, SagaError};
pub use crate::saga::Saga;
pub use crate::settings::SagaOptions;
