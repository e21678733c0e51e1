//! 共享上下文
//!
//! 每个中间件实例恰好一份，按引用交给所有任务。只支持浅合并：
//! 新键覆盖旧键，缺席的键保持不变，没有删除。

use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ContextError;

#[derive(Debug, Clone, Default)]
pub struct SagaContext {
    inner: Rc<RefCell<Map<String, Value>>>,
}

impl SagaContext {
    pub fn new(initial: Map<String, Value>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(initial)),
        }
    }

    /// 当前内容的快照
    pub fn get(&self) -> Map<String, Value> {
        self.inner.borrow().clone()
    }

    pub fn get_key(&self, key: &str) -> Option<Value> {
        self.inner.borrow().get(key).cloned()
    }

    /// 合并任意 JSON 值；只接受对象（结构检查，不看类型名）
    pub fn merge(&self, partial: Value) -> Result<(), ContextError> {
        self.merge_as("context", partial)
    }

    pub(crate) fn merge_as(&self, caller: &'static str, partial: Value) -> Result<(), ContextError> {
        match partial {
            Value::Object(map) => {
                self.merge_map(map);
                Ok(())
            }
            other => Err(ContextError::InvalidArgument {
                caller,
                found: describe(&other),
            }),
        }
    }

    pub fn merge_map(&self, partial: Map<String, Value>) {
        let mut inner = self.inner.borrow_mut();
        for (key, value) in partial {
            inner.insert(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// 两个句柄是否指向同一份上下文
    pub fn same_as(&self, other: &SagaContext) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
