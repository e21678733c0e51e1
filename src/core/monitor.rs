//! Monitor 适配
//!
//! 调用方只需要实现五个钩子中的任意子集（[`MonitorHooks`]）。挂载时规范化一次，
//! 得到每个钩子都可调用的 [`Monitor`]，之后所有任务共享同一个 `Rc<Monitor>`，
//! 跨任务累计状态（比如计数器）的 monitor 因此能正常工作。

use std::error::Error;
use std::fmt;
use std::rc::Rc;

use crate::domain::{EffectId, TriggeredEffect};

pub type TriggeredHook = Rc<dyn Fn(&TriggeredEffect)>;
pub type ResolvedHook = Rc<dyn Fn(EffectId, &dyn fmt::Debug)>;
pub type RejectedHook = Rc<dyn Fn(EffectId, &(dyn Error + 'static))>;
pub type CancelledHook = Rc<dyn Fn(EffectId)>;
pub type ActionHook<A> = Rc<dyn Fn(&A)>;

/// 调用方提供的（可能不完整的）monitor
pub struct MonitorHooks<A> {
    effect_triggered: Option<TriggeredHook>,
    effect_resolved: Option<ResolvedHook>,
    effect_rejected: Option<RejectedHook>,
    effect_cancelled: Option<CancelledHook>,
    action_dispatched: Option<ActionHook<A>>,
}

impl<A> Default for MonitorHooks<A> {
    fn default() -> Self {
        Self {
            effect_triggered: None,
            effect_resolved: None,
            effect_rejected: None,
            effect_cancelled: None,
            action_dispatched: None,
        }
    }
}

impl<A> Clone for MonitorHooks<A> {
    fn clone(&self) -> Self {
        Self {
            effect_triggered: self.effect_triggered.clone(),
            effect_resolved: self.effect_resolved.clone(),
            effect_rejected: self.effect_rejected.clone(),
            effect_cancelled: self.effect_cancelled.clone(),
            action_dispatched: self.action_dispatched.clone(),
        }
    }
}

impl<A> fmt::Debug for MonitorHooks<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorHooks")
            .field("effect_triggered", &self.effect_triggered.is_some())
            .field("effect_resolved", &self.effect_resolved.is_some())
            .field("effect_rejected", &self.effect_rejected.is_some())
            .field("effect_cancelled", &self.effect_cancelled.is_some())
            .field("action_dispatched", &self.action_dispatched.is_some())
            .finish()
    }
}

impl<A: 'static> MonitorHooks<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_effect_triggered(mut self, f: impl Fn(&TriggeredEffect) + 'static) -> Self {
        self.effect_triggered = Some(Rc::new(f));
        self
    }

    pub fn on_effect_resolved(mut self, f: impl Fn(EffectId, &dyn fmt::Debug) + 'static) -> Self {
        self.effect_resolved = Some(Rc::new(f));
        self
    }

    pub fn on_effect_rejected(
        mut self,
        f: impl Fn(EffectId, &(dyn Error + 'static)) + 'static,
    ) -> Self {
        self.effect_rejected = Some(Rc::new(f));
        self
    }

    pub fn on_effect_cancelled(mut self, f: impl Fn(EffectId) + 'static) -> Self {
        self.effect_cancelled = Some(Rc::new(f));
        self
    }

    pub fn on_action_dispatched(mut self, f: impl Fn(&A) + 'static) -> Self {
        self.action_dispatched = Some(Rc::new(f));
        self
    }
}

impl<A: fmt::Debug + 'static> MonitorHooks<A> {
    /// 把五个钩子都写进 tracing 的现成 monitor
    pub fn tracing() -> Self {
        Self::new()
            .on_effect_triggered(|e| {
                tracing::debug!(
                    effect_id = e.effect_id.get(),
                    parent_effect_id = e.parent_effect_id.get(),
                    root = e.root,
                    effect = ?e.effect,
                    "effect triggered"
                );
            })
            .on_effect_resolved(|id, result| {
                tracing::debug!(effect_id = id.get(), result = ?result, "effect resolved");
            })
            .on_effect_rejected(|id, err| {
                tracing::warn!(effect_id = id.get(), err = %err, "effect rejected");
            })
            .on_effect_cancelled(|id| {
                tracing::debug!(effect_id = id.get(), "effect cancelled");
            })
            .on_action_dispatched(|action| {
                tracing::trace!(action = ?action, "action dispatched");
            })
    }
}

/// 规范化之后的 monitor：五个钩子全部存在，缺失的是 no-op
pub struct Monitor<A> {
    effect_triggered: TriggeredHook,
    effect_resolved: ResolvedHook,
    effect_rejected: RejectedHook,
    effect_cancelled: CancelledHook,
    action_dispatched: ActionHook<A>,
}

impl<A: 'static> Monitor<A> {
    /// 生成新值，不修改调用方的 `hooks`
    pub fn from_hooks(hooks: &MonitorHooks<A>) -> Self {
        Self {
            effect_triggered: hooks
                .effect_triggered
                .clone()
                .unwrap_or_else(|| Rc::new(|_: &TriggeredEffect| {})),
            effect_resolved: hooks
                .effect_resolved
                .clone()
                .unwrap_or_else(|| Rc::new(|_: EffectId, _: &dyn fmt::Debug| {})),
            effect_rejected: hooks
                .effect_rejected
                .clone()
                .unwrap_or_else(|| Rc::new(|_: EffectId, _: &(dyn Error + 'static)| {})),
            effect_cancelled: hooks
                .effect_cancelled
                .clone()
                .unwrap_or_else(|| Rc::new(|_: EffectId| {})),
            action_dispatched: hooks
                .action_dispatched
                .clone()
                .unwrap_or_else(|| Rc::new(|_: &A| {})),
        }
    }
}

impl<A> Monitor<A> {
    pub fn effect_triggered(&self, effect: &TriggeredEffect) {
        (self.effect_triggered)(effect);
    }

    pub fn effect_resolved(&self, effect_id: EffectId, result: &dyn fmt::Debug) {
        (self.effect_resolved)(effect_id, result);
    }

    pub fn effect_rejected(&self, effect_id: EffectId, error: &(dyn Error + 'static)) {
        (self.effect_rejected)(effect_id, error);
    }

    pub fn effect_cancelled(&self, effect_id: EffectId) {
        (self.effect_cancelled)(effect_id);
    }

    pub fn action_dispatched(&self, action: &A) {
        (self.action_dispatched)(action);
    }
}

impl<A> fmt::Debug for Monitor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor").finish_non_exhaustive()
    }
}

/// 没有 monitor 时保持 `None`，有则补齐缺失钩子
pub fn normalize<A: 'static>(hooks: Option<&MonitorHooks<A>>) -> Option<Rc<Monitor<A>>> {
    hooks.map(|h| Rc::new(Monitor::from_hooks(h)))
}
