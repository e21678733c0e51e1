//! 同步发布/订阅
//!
//! 一个发布通道，多个订阅者，不做缓冲。`emit` 开始时对订阅者列表做快照，
//! 回调里订阅、退订、甚至嵌套 emit 都不会扰乱本轮遍历。
//! 第一个返回错误的订阅者会终止本轮（fail-fast）。

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{BoxError, EmitError};

pub type SubscriberFn<T> = dyn Fn(&T) -> Result<(), BoxError>;

/// 发布函数；`emitter` 选项可以对它做装饰
pub type EmitFn<T> = Rc<dyn Fn(&T) -> Result<(), EmitError>>;

/// `emitter` 选项：接收原始发布函数，返回装饰后的发布函数
pub type EmitterWrapper<T> = Rc<dyn Fn(EmitFn<T>) -> EmitFn<T>>;

/// 交给解释器的订阅入口
pub type Subscribe<T> = Rc<dyn Fn(Rc<SubscriberFn<T>>) -> Unsubscribe>;

struct Registry<T> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Rc<SubscriberFn<T>>)>>,
}

impl<T> Registry<T> {
    fn remove(&self, id: u64) {
        let removed = {
            let mut entries = self.entries.borrow_mut();
            let pos = entries.iter().position(|(entry_id, _)| *entry_id == id);
            pos.map(|pos| entries.remove(pos))
        };
        // 回调在 borrow 释放之后才析构
        drop(removed);
    }

    fn snapshot(&self) -> Vec<Rc<SubscriberFn<T>>> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect()
    }
}

pub struct Emitter<T> {
    registry: Rc<Registry<T>>,
}

impl<T: 'static> Emitter<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(Registry {
                next_id: Cell::new(1),
                entries: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&T) -> Result<(), BoxError> + 'static) -> Unsubscribe {
        self.subscribe_rc(Rc::new(callback))
    }

    pub fn subscribe_rc(&self, callback: Rc<SubscriberFn<T>>) -> Unsubscribe {
        let id = self.registry.next_id.get();
        self.registry.next_id.set(id + 1);
        self.registry.entries.borrow_mut().push((id, callback));

        let weak: Weak<Registry<T>> = Rc::downgrade(&self.registry);
        Unsubscribe::new(move || {
            if let Some(registry) = weak.upgrade() {
                registry.remove(id);
            }
        })
    }

    /// 按注册顺序调用本轮开始时的全部订阅者
    pub fn emit(&self, value: &T) -> Result<(), EmitError> {
        emit_snapshot(&self.registry, value)
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.entries.borrow().len()
    }

    /// 未装饰的发布函数
    pub fn emit_fn(&self) -> EmitFn<T> {
        let registry = Rc::clone(&self.registry);
        Rc::new(move |value: &T| emit_snapshot(&registry, value))
    }

    /// 应用 `emitter` 选项后的发布函数；没有装饰时等同于 [`Emitter::emit_fn`]
    pub fn wrapped_emit(&self, wrapper: Option<&EmitterWrapper<T>>) -> EmitFn<T> {
        match wrapper {
            Some(wrap) => wrap(self.emit_fn()),
            None => self.emit_fn(),
        }
    }

    pub fn subscribe_fn(&self) -> Subscribe<T> {
        let emitter = self.clone();
        Rc::new(move |callback| emitter.subscribe_rc(callback))
    }
}

fn emit_snapshot<T>(registry: &Registry<T>, value: &T) -> Result<(), EmitError> {
    for (subscriber, callback) in registry.snapshot().iter().enumerate() {
        callback(value).map_err(|source| EmitError { subscriber, source })?;
    }
    Ok(())
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("subscribers", &self.registry.entries.borrow().len())
            .finish()
    }
}

/// 退订句柄：只移除对应的那一次注册，重复调用无效果
#[derive(Clone)]
pub struct Unsubscribe {
    remove: Rc<dyn Fn()>,
    done: Rc<Cell<bool>>,
}

impl Unsubscribe {
    fn new(remove: impl Fn() + 'static) -> Self {
        Self {
            remove: Rc::new(remove),
            done: Rc::new(Cell::new(false)),
        }
    }

    pub fn unsubscribe(&self) {
        if self.done.replace(true) {
            return;
        }
        (self.remove)();
    }

    pub fn is_active(&self) -> bool {
        !self.done.get()
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("active", &self.is_active())
            .finish()
    }
}
