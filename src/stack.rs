
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StackError>;

#[derive(Debug, Clone, Copy, Error, Eq, PartialEq)]
pub enum StackError {
    #[error("stack underflow: requested {requested} values, but only {depth} available")]
    Underflow { requested: usize, depth: usize },
}

#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    pub fn extend(&mut self, values: impl IntoIterator<Item = T>) {
        self.items.extend(values);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    /// Peeks `n` values below the top; `peek_nth(0)` is `peek()`.
    pub fn peek_nth(&self, n: usize) -> Option<&T> {
        self.items.len().checked_sub(n + 1).map(|i| &self.items[i])
    }

    /// Removes the top `count` values and returns them in push order.
    /// The stack is left untouched on underflow.
    pub fn pop_many(&mut self, count: usize) -> Result<Vec<T>> {
        let depth = self.items.len();
        if count > depth {
            return Err(StackError::Underflow {
                requested: count,
                depth,
            });
        }
        if count == 0 {
            return Ok(Vec::new());
        }
        Ok(self.items.split_off(depth - count))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bottom to top.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}
