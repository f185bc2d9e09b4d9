//! LIFO scope stack over pooled scope objects
//!
//! Clip masks, bounds tracking, flow layout and UI canvases all follow
//! the same discipline: enter a scope, work inside it, exit and have
//! the parent's state become visible again. [`ScopeStack`] manages the
//! stack itself plus object reuse; restoring parent state on exit is
//! the caller's job, since it differs per scope kind.
//!
//! Scopes must be exited in LIFO order by explicit `enter`/`exit`
//! pairs. Exiting with no scope active is a programmer error: it
//! debug-asserts, and degrades to a no-op in release builds.

use super::pool::{Pool, PoolId};

/// Stack of strictly nested, pooled scope objects
pub struct ScopeStack<T> {
    pool: Pool<T>,
    stack: Vec<PoolId>,
}

impl<T: Default + 'static> ScopeStack<T> {
    /// Create an empty scope stack
    pub fn new() -> Self {
        Self {
            pool: Pool::with_factory(T::default),
            stack: Vec::new(),
        }
    }

    /// Enter a new scope and return it for initialization.
    /// The scope keeps whatever state its previous user left; callers
    /// reset the fields they care about.
    pub fn enter(&mut self) -> &mut T {
        let id = self.pool.acquire_or_create();
        self.stack.push(id);
        self.pool.get_mut(id).expect("freshly acquired scope")
    }

    /// Exit the innermost scope, returning it to the pool
    pub fn exit(&mut self) {
        debug_assert!(!self.stack.is_empty(), "scope exit without matching enter");
        if let Some(id) = self.stack.pop() {
            self.pool.release(id);
        }
    }

    /// Whether any scope is active
    pub fn is_active(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The innermost scope, if any
    pub fn current(&self) -> Option<&T> {
        self.stack.last().and_then(|id| self.pool.get(*id))
    }

    /// The innermost scope, mutably, if any
    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.stack.last().copied().and_then(|id| self.pool.get_mut(id))
    }
}

impl<T: Default + 'static> Default for ScopeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}
