//! Identifier generation.
//!
//! Phonebook entries get small integer ids from a [`Sequence`]: a monotonic
//! counter that starts after the highest id already present, so an id is never
//! handed out twice, even after the entry holding it is deleted. Blogs and users
//! use random UUIDs from [`new_uuid`].

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic `u64` id source.
#[derive(Debug)]
pub struct Sequence {
    next: AtomicU64,
}

impl Sequence {
    /// A sequence whose first id is 1.
    pub fn new() -> Self {
        Self::starting_after(0)
    }

    /// A sequence whose first id is `last + 1`.
    pub fn starting_after(last: u64) -> Self {
        Self {
            next: AtomicU64::new(last + 1),
        }
    }

    /// Take the next id.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Random v4 UUID rendered as a hyphenated string.
pub fn new_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}
