//! # Entity Identifiers
//!
//! Entities are plain integers. Each live entity carries two of them:
//! - an [`EntityId`], the slot index into every component store, which is
//!   handed back to the pool on deletion and reused by later spawns
//! - a [`Uid`], issued from a monotonic counter and never reused, for
//!   references that must outlive id recycling
//!
//! The [`IdAllocator`] keeps the `id <-> uid` mapping a bijection over the
//! live set.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::config::EngineConfig;
use crate::error::{CoreError, CoreResult};

/// Recyclable slot identifier for a live entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Wraps a raw slot index.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the slot index as a `usize` for store access.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Permanent identifier, unique over the lifetime of an allocator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Uid(u64);

impl Uid {
    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uid:{}", self.0)
    }
}

/// Issues and recycles entity identifiers.
///
/// Fresh ids come from a counter; reclaimed ids go into a free set and the
/// smallest one is always handed out first. Uids only ever count up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdAllocator {
    /// Next id never handed out before.
    next_fresh: u32,
    /// Reclaimed ids, all below `next_fresh`.
    free: BTreeSet<u32>,
    /// Next uid to issue.
    next_uid: u64,
    /// `id -> uid`, indexed by id. `None` for ids not currently live.
    uids: Vec<Option<Uid>>,
    /// `uid -> id` for live entities.
    ids: HashMap<Uid, EntityId>,
    /// Size of the id domain.
    limit: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Creates an allocator spanning the full `u32` id domain.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(u32::MAX)
    }

    /// Creates an allocator that will never have more than `limit` live ids.
    #[must_use]
    pub fn with_limit(limit: u32) -> Self {
        Self {
            next_fresh: 0,
            free: BTreeSet::new(),
            next_uid: 0,
            uids: Vec::new(),
            ids: HashMap::new(),
            limit,
        }
    }

    /// Creates an allocator sized from an [`EngineConfig`].
    #[must_use]
    pub fn with_config(config: &EngineConfig) -> Self {
        let mut allocator = Self::with_limit(config.max_entities);
        let reserve = config.initial_capacity.min(config.max_entities as usize);
        allocator.uids.reserve(reserve);
        allocator.ids.reserve(reserve);
        allocator
    }

    /// Moves the uid counter, so exhaustion can be reached in tests.
    #[cfg(test)]
    pub(crate) fn with_next_uid(mut self, next_uid: u64) -> Self {
        self.next_uid = next_uid;
        self
    }

    /// Returns the size of the id domain.
    #[inline]
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Issues a fresh `(id, uid)` pair and records the mapping.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::UidsExhausted`] or [`CoreError::IdsExhausted`]
    /// when the respective domain has nothing left. Nothing is consumed on
    /// failure.
    pub fn allocate(&mut self) -> CoreResult<(EntityId, Uid)> {
        if self.next_uid == u64::MAX {
            tracing::error!("uid counter exhausted");
            return Err(CoreError::UidsExhausted);
        }

        let raw = if let Some(raw) = self.free.pop_first() {
            raw
        } else if self.next_fresh < self.limit {
            let raw = self.next_fresh;
            self.next_fresh += 1;
            raw
        } else {
            tracing::error!(limit = self.limit, "entity ids exhausted");
            return Err(CoreError::IdsExhausted { limit: self.limit });
        };

        let id = EntityId(raw);
        let uid = Uid(self.next_uid);
        self.next_uid += 1;

        if self.uids.len() <= id.index() {
            self.uids.resize(id.index() + 1, None);
        }
        self.uids[id.index()] = Some(uid);
        self.ids.insert(uid, id);

        Ok((id, uid))
    }

    /// Drops the mapping for `id` and makes it eligible for reuse.
    ///
    /// Returns `false`, and does nothing, if `id` is not live.
    pub fn reclaim(&mut self, id: EntityId) -> bool {
        let Some(uid) = self.uids.get_mut(id.index()).and_then(Option::take) else {
            return false;
        };
        self.ids.remove(&uid);
        self.free.insert(id.raw());
        true
    }

    /// Looks up the permanent uid of a live id.
    #[inline]
    #[must_use]
    pub fn uid_of(&self, id: EntityId) -> Option<Uid> {
        self.uids.get(id.index()).copied().flatten()
    }

    /// Looks up the current id of a live uid.
    #[inline]
    #[must_use]
    pub fn id_of(&self, uid: Uid) -> Option<EntityId> {
        self.ids.get(&uid).copied()
    }

    /// Checks whether `id` is currently issued.
    #[inline]
    #[must_use]
    pub fn is_live(&self, id: EntityId) -> bool {
        self.uid_of(id).is_some()
    }

    /// Returns the number of live entities.
    #[inline]
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.ids.len()
    }

    /// Iterates over live `(id, uid)` pairs in ascending id order.
    pub fn iter_live(&self) -> impl Iterator<Item = (EntityId, Uid)> + '_ {
        self.uids
            .iter()
            .enumerate()
            .filter_map(|(index, uid)| uid.map(|uid| (EntityId(index as u32), uid)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_is_sequential() {
        let mut alloc = IdAllocator::new();
        let (a, ua) = alloc.allocate().unwrap();
        let (b, ub) = alloc.allocate().unwrap();
        assert_eq!(a.raw(), 0);
        assert_eq!(b.raw(), 1);
        assert_ne!(ua, ub);
        assert_eq!(alloc.live_count(), 2);
    }

    #[test]
    fn test_reclaim_reuses_id_not_uid() {
        let mut alloc = IdAllocator::new();
        let (a, ua) = alloc.allocate().unwrap();
        let _ = alloc.allocate().unwrap();

        assert!(alloc.reclaim(a));
        assert_eq!(alloc.uid_of(a), None);
        assert_eq!(alloc.id_of(ua), None);

        let (c, uc) = alloc.allocate().unwrap();
        assert_eq!(c, a);
        assert_ne!(uc, ua);
        assert_eq!(alloc.id_of(uc), Some(c));
    }

    #[test]
    fn test_smallest_free_id_first() {
        let mut alloc = IdAllocator::new();
        let ids: Vec<_> = (0..5).map(|_| alloc.allocate().unwrap().0).collect();
        alloc.reclaim(ids[3]);
        alloc.reclaim(ids[1]);

        assert_eq!(alloc.allocate().unwrap().0, ids[1]);
        assert_eq!(alloc.allocate().unwrap().0, ids[3]);
        assert_eq!(alloc.allocate().unwrap().0.raw(), 5);
    }

    #[test]
    fn test_reclaim_is_idempotent() {
        let mut alloc = IdAllocator::new();
        let (a, _) = alloc.allocate().unwrap();
        assert!(alloc.reclaim(a));
        assert!(!alloc.reclaim(a));
        assert!(!alloc.reclaim(EntityId::new(99)));

        // The id must only be handed out once after a double reclaim.
        let (b, _) = alloc.allocate().unwrap();
        let (c, _) = alloc.allocate().unwrap();
        assert_eq!(b, a);
        assert_ne!(c, a);
    }

    #[test]
    fn test_exhaustion() {
        let mut alloc = IdAllocator::with_limit(2);
        let (a, _) = alloc.allocate().unwrap();
        let _ = alloc.allocate().unwrap();
        assert_eq!(alloc.allocate(), Err(CoreError::IdsExhausted { limit: 2 }));

        alloc.reclaim(a);
        assert_eq!(alloc.allocate().unwrap().0, a);
    }

    #[test]
    fn test_uid_exhaustion_consumes_nothing() {
        let mut alloc = IdAllocator::new().with_next_uid(u64::MAX - 1);
        let (a, last) = alloc.allocate().unwrap();
        assert_eq!(last.raw(), u64::MAX - 1);
        alloc.reclaim(a);

        let before = alloc.clone();
        assert_eq!(alloc.allocate(), Err(CoreError::UidsExhausted));
        assert_eq!(alloc, before);
        assert_eq!(alloc.live_count(), 0);
    }

    #[test]
    fn test_iter_live_ascending() {
        let mut alloc = IdAllocator::new();
        let ids: Vec<_> = (0..4).map(|_| alloc.allocate().unwrap().0).collect();
        alloc.reclaim(ids[2]);

        let live: Vec<_> = alloc.iter_live().map(|(id, _)| id.raw()).collect();
        assert_eq!(live, vec![0, 1, 3]);
    }
}
