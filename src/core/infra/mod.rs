mod dispatch_origin;
mod effect_ids;

pub(crate) use dispatch_origin::with_origin;
pub use dispatch_origin::{DispatchOrigin, current_origin, is_saga_dispatch, wrap_saga_dispatch};
pub use effect_ids::{EffectIdSource, ProcessEffectIds, SequentialIds, next_effect_id};
