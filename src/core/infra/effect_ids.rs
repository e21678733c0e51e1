//! Effect 标识符生成
//!
//! 进程级计数器在进程启动时从 1 开始，只增不减，不提供重置。
//! 需要确定序列的场景（测试、回放）注入 [`SequentialIds`]。

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::EffectId;

static NEXT_EFFECT_ID: AtomicU64 = AtomicU64::new(1);

/// 分配 effect 标识符的单一职责接口
pub trait EffectIdSource {
    fn next_id(&self) -> EffectId;
}

/// 进程级单调计数器；解释器为嵌套 effect 编号时也走这里
pub fn next_effect_id() -> EffectId {
    EffectId::new(NEXT_EFFECT_ID.fetch_add(1, Ordering::Relaxed))
}

/// 默认来源：共享进程级计数器
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEffectIds;

impl EffectIdSource for ProcessEffectIds {
    fn next_id(&self) -> EffectId {
        next_effect_id()
    }
}

/// 可注入的确定序列
#[derive(Debug)]
pub struct SequentialIds {
    next: Cell<u64>,
}

impl SequentialIds {
    /// 从 `first` 开始编号；0 保留给 root 的虚拟父节点，会被抬到 1
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Cell::new(first.max(1)),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl EffectIdSource for SequentialIds {
    fn next_id(&self) -> EffectId {
        let id = self.next.get();
        self.next.set(id + 1);
        EffectId::new(id)
    }
}
