use serde::{Deserialize, Serialize};
use std::fmt;

/// Effect 标识符：正整数，进程内单调递增，永不复用。
///
/// `0` 保留给 root task 的虚拟父节点，真实 effect 从 1 开始编号。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(u64);

impl EffectId {
    /// root task 的 `parent_effect_id`
    pub const ROOT_PARENT: EffectId = EffectId(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
