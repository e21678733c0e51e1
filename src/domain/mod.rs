pub mod ids;
pub mod model;

pub use ids::EffectId;
pub use model::{EffectDescription, ErrorInfo, LogLevel, TriggeredEffect};
