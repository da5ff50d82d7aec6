
use crate::stack::{Result, Stack, StackError};

/// Construction context: a stack of open values plus a stack of waypoint
/// marks recording the depth at which a speculative sub-parse began.
#[derive(Debug)]
pub struct Tracer<T> {
    state: Stack<T>,
    waypoints: Stack<usize>,
}

impl<T> Default for Tracer<T> {
    fn default() -> Self {
        Self {
            state: Stack::new(),
            waypoints: Stack::new(),
        }
    }
}

impl<T> Tracer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waypoint(&mut self) {
        self.waypoints.push(self.state.len());
    }

    /// Pops everything pushed since the latest waypoint, in push order.
    /// Without a pending waypoint nothing is popped.
    pub fn rewind(&mut self) -> Result<Vec<T>> {
        let Some(mark) = self.waypoints.pop() else {
            return Ok(Vec::new());
        };
        let depth = self.state.len();
        let count = depth.checked_sub(mark).ok_or(StackError::Underflow {
            requested: mark,
            depth,
        })?;
        self.state.pop_many(count)
    }

    pub fn push(&mut self, value: T) {
        self.state.push(value);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.state.pop()
    }

    pub fn current(&self) -> Option<&T> {
        self.state.peek()
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.state.peek_mut()
    }

    pub fn peek_nth(&self, n: usize) -> Option<&T> {
        self.state.peek_nth(n)
    }

    /// Nearest open value (searching from the top) matching `predicate`.
    pub fn find_last(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.state.iter().rev().find(|v| predicate(v))
    }

    pub fn find_last_mut(&mut self, predicate: impl Fn(&T) -> bool) -> Option<&mut T> {
        self.state.iter_mut().rev().find(|v| predicate(v))
    }

    pub fn depth(&self) -> usize {
        self.state.len()
    }

    pub fn pending_waypoints(&self) -> usize {
        self.waypoints.len()
    }
}
