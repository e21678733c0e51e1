//! saga 入口与单步协议
//!
//! 本层不解释 effect，只关心两件事：入口可以被调用，调用结果是可挂起的迭代器。
//! effect 类型 `E` 由解释器决定，这里完全透传。

use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// 迭代器单步的结果，对应 `{value, done}`
#[derive(Debug, Clone, PartialEq)]
pub enum IteratorStep<E> {
    /// 挂起并交出一个 effect
    Yielded(E),
    /// 迭代结束，携带返回值
    Done(Value),
}

/// 可挂起计算的单步接口
pub trait SagaIterator<E> {
    /// 用上一个 effect 的结果推进一步
    fn step(&mut self, input: Value) -> IteratorStep<E>;

    /// 诊断用名称
    fn name(&self) -> &str {
        "anonymous"
    }
}

/// 调用入口函数的结果
pub enum Invocation<E> {
    /// generator 风格：得到一个可挂起的迭代器
    Suspended(Box<dyn SagaIterator<E>>),
    /// 普通函数风格：直接返回了值，不能作为 saga 运行
    Returned(Value),
}

impl<E> fmt::Debug for Invocation<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invocation::Suspended(it) => f.debug_tuple("Suspended").field(&it.name()).finish(),
            Invocation::Returned(v) => f.debug_tuple("Returned").field(v).finish(),
        }
    }
}

pub type SagaFn<E> = dyn Fn(&[Value]) -> Invocation<E>;

/// 具名的 saga 入口
pub struct Saga<E> {
    name: String,
    func: Rc<SagaFn<E>>,
}

impl<E: 'static> Saga<E> {
    pub fn new(name: impl Into<String>, func: impl Fn(&[Value]) -> Invocation<E> + 'static) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    /// 以返回迭代器的闭包构造入口，最常见的写法
    pub fn generator<I>(name: impl Into<String>, func: impl Fn(&[Value]) -> I + 'static) -> Self
    where
        I: SagaIterator<E> + 'static,
    {
        Self::new(name, move |args| Invocation::Suspended(Box::new(func(args))))
    }
}

impl<E> Saga<E> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn invoke(&self, args: &[Value]) -> Invocation<E> {
        (self.func)(args)
    }
}

impl<E> Clone for Saga<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: Rc::clone(&self.func),
        }
    }
}

impl<E> fmt::Debug for Saga<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Saga").field("name", &self.name).finish_non_exhaustive()
    }
}

/// 把普通 `Iterator` 包装成 [`SagaIterator`]，忽略恢复值
#[derive(Debug)]
pub struct IterSaga<I> {
    name: String,
    inner: I,
}

impl<I> IterSaga<I> {
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

pub fn from_iter<I: IntoIterator>(iter: I) -> IterSaga<I::IntoIter> {
    IterSaga {
        name: "anonymous".to_owned(),
        inner: iter.into_iter(),
    }
}

impl<I: Iterator> SagaIterator<I::Item> for IterSaga<I> {
    fn step(&mut self, _input: Value) -> IteratorStep<I::Item> {
        match self.inner.next() {
            Some(effect) => IteratorStep::Yielded(effect),
            None => IteratorStep::Done(Value::Null),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
