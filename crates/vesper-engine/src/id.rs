//! Object identifiers and allocation.
//!
//! An [`ObjectId`] names one game object for the lifetime of a level
//! instance. Ids are handed out monotonically by an [`IdAllocator`] and are
//! never recycled, so a renderer or event consumer holding an id of a
//! destroyed projectile can never confuse it with a newly spawned one.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ObjectId
// ---------------------------------------------------------------------------

/// A level-unique game object identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Construct an id from its raw value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw `u32` representation.
    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// IdAllocator
// ---------------------------------------------------------------------------

/// Hands out fresh [`ObjectId`]s in increasing order.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    /// Create a new allocator starting at id 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn allocate(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u32 {
        self.next
    }

    /// Restart allocation from id 0 (used by level reset).
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_monotonically() {
        let mut ids = IdAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert!(a < b);
        assert_eq!(a.to_raw(), 0);
        assert_eq!(b.to_raw(), 1);
        assert_eq!(ids.allocated(), 2);
    }

    #[test]
    fn reset_restarts_sequence() {
        let mut ids = IdAllocator::new();
        ids.allocate();
        ids.allocate();
        ids.reset();
        assert_eq!(ids.allocate(), ObjectId::from_raw(0));
    }

    #[test]
    fn display_and_debug() {
        let id = ObjectId::from_raw(7);
        assert_eq!(format!("{id}"), "obj#7");
        assert_eq!(format!("{id:?}"), "ObjectId(7)");
    }
}
