//! Reusable object pool
//!
//! Keeps two disjoint sets of items — available and in-use — so that
//! per-frame helper objects (scopes, material state, text composers)
//! are recycled instead of reallocated. Items are addressed through
//! [`PoolId`] tokens; the pool retains ownership of every item it has
//! ever created, except those removed with
//! [`Pool::purge_next_available`].
//!
//! All operations are O(1) apart from [`Pool::release_all`], which is
//! linear in the pool size.

use std::collections::VecDeque;

/// Token addressing an item inside a [`Pool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolId(usize);

impl PoolId {
    /// Raw slot index. Stable for the lifetime of the item; used by
    /// callers that need to mirror pooled objects externally (e.g.
    /// per-material GPU state keyed by slot).
    pub fn index(self) -> usize {
        self.0
    }
}

/// Object pool with disjoint available/in-use sets
pub struct Pool<T> {
    slots: Vec<Option<T>>,
    in_use: Vec<bool>,
    available: VecDeque<PoolId>,
    in_use_count: usize,
    factory: Option<Box<dyn Fn() -> T>>,
}

impl<T> Pool<T> {
    /// Create an empty pool with no factory. [`Pool::acquire_or_create`]
    /// on an exhausted factory-less pool is a fatal error.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            in_use: Vec::new(),
            available: VecDeque::new(),
            in_use_count: 0,
            factory: None,
        }
    }

    /// Create a pool that constructs new items on demand
    pub fn with_factory(factory: impl Fn() -> T + 'static) -> Self {
        Self {
            factory: Some(Box::new(factory)),
            ..Self::new()
        }
    }

    /// Add an externally created item, either directly into use or
    /// onto the available queue.
    pub fn insert(&mut self, item: T, currently_in_use: bool) -> PoolId {
        let id = PoolId(self.slots.len());
        self.slots.push(Some(item));
        self.in_use.push(currently_in_use);
        if currently_in_use {
            self.in_use_count += 1;
        } else {
            self.available.push_back(id);
        }
        id
    }

    /// Whether at least one item is available
    pub fn has_available(&self) -> bool {
        !self.available.is_empty()
    }

    /// Take the next available item into use, if any
    pub fn try_acquire(&mut self) -> Option<PoolId> {
        let id = self.available.pop_front()?;
        self.in_use[id.0] = true;
        self.in_use_count += 1;
        Some(id)
    }

    /// Take the next available item into use, creating one through the
    /// factory when the pool is exhausted.
    ///
    /// # Panics
    /// Panics if the pool is exhausted and no factory was configured.
    /// That is a programming error, not a recoverable condition: the
    /// pool cannot invent a default item.
    pub fn acquire_or_create(&mut self) -> PoolId {
        if let Some(id) = self.try_acquire() {
            return id;
        }
        let factory = self
            .factory
            .as_ref()
            .expect("pool exhausted and no factory configured");
        let item = factory();
        self.insert(item, true)
    }

    /// Permanently remove the next available item from the pool,
    /// handing ownership to the caller (e.g. for destruction).
    pub fn purge_next_available(&mut self) -> Option<T> {
        let id = self.available.pop_front()?;
        self.slots[id.0].take()
    }

    /// Move an in-use item back to the available set.
    /// Releasing an already-available item is a no-op.
    pub fn release(&mut self, id: PoolId) {
        if !self.in_use[id.0] {
            return;
        }
        self.in_use[id.0] = false;
        self.in_use_count -= 1;
        self.available.push_back(id);
    }

    /// Bulk-reclaim every in-use item
    pub fn release_all(&mut self) {
        if self.in_use_count == 0 {
            return;
        }
        for (index, in_use) in self.in_use.iter_mut().enumerate() {
            if *in_use {
                *in_use = false;
                self.available.push_back(PoolId(index));
            }
        }
        self.in_use_count = 0;
    }

    /// Borrow an item by id. `None` only for purged slots.
    pub fn get(&self, id: PoolId) -> Option<&T> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Mutably borrow an item by id. `None` only for purged slots.
    pub fn get_mut(&mut self, id: PoolId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Number of items currently checked out
    pub fn in_use_count(&self) -> usize {
        self.in_use_count
    }

    /// Number of items waiting on the available queue
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Total live items (available + in use)
    pub fn total_count(&self) -> usize {
        self.available.len() + self.in_use_count
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pool {{ in use: {} | available: {} | total: {} }}",
            self.in_use_count(),
            self.available_count(),
            self.total_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_release_accounting() {
        let mut pool: Pool<u32> = Pool::with_factory(|| 7);
        let a = pool.acquire_or_create();
        let b = pool.acquire_or_create();
        assert_eq!(pool.in_use_count(), 2);
        assert_eq!(pool.available_count(), 0);

        pool.release(a);
        assert_eq!(pool.in_use_count(), 1);
        assert_eq!(pool.available_count(), 1);

        // Recycled, not newly created
        let c = pool.acquire_or_create();
        assert_eq!(c, a);
        assert_eq!(pool.total_count(), 2);
        assert_ne!(b, c);
    }

    #[test]
    fn double_release_is_noop() {
        let mut pool: Pool<u32> = Pool::with_factory(|| 0);
        let a = pool.acquire_or_create();
        pool.release(a);
        pool.release(a);
        assert_eq!(pool.available_count(), 1);
        assert_eq!(pool.in_use_count(), 0);
    }

    #[test]
    fn release_all_reclaims_everything() {
        let mut pool: Pool<String> = Pool::with_factory(String::new);
        for _ in 0..5 {
            pool.acquire_or_create();
        }
        pool.release_all();
        assert_eq!(pool.in_use_count(), 0);
        assert_eq!(pool.available_count(), 5);
        assert_eq!(pool.total_count(), 5);
    }

    #[test]
    fn purge_removes_items_permanently() {
        let mut pool: Pool<u32> = Pool::new();
        pool.insert(1, false);
        pool.insert(2, false);
        assert_eq!(pool.purge_next_available(), Some(1));
        assert_eq!(pool.available_count(), 1);
        assert_eq!(pool.purge_next_available(), Some(2));
        assert_eq!(pool.purge_next_available(), None);
        assert_eq!(pool.total_count(), 0);
    }

    #[test]
    #[should_panic(expected = "no factory")]
    fn exhausted_factoryless_pool_is_fatal() {
        let mut pool: Pool<u32> = Pool::new();
        pool.acquire_or_create();
    }

    #[test]
    fn items_are_reachable_through_ids() {
        let mut pool: Pool<Vec<u8>> = Pool::with_factory(Vec::new);
        let id = pool.acquire_or_create();
        pool.get_mut(id).unwrap().push(42);
        pool.release(id);
        // Pooled items keep their contents until the next user clears them
        assert_eq!(pool.get(id).unwrap().as_slice(), &[42]);
    }
}
