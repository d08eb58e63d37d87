//! Per-frame memoization store
//!
//! Values are keyed by `(owner, key)` and stamped with the frame they were
//! written in. An entry is only observable while its stamp matches the
//! current frame, so advancing the frame invalidates everything at once.
//!
//! # Usage constraint
//!
//! A cache belongs to the single thread composing frames. It is not
//! synchronized and must not be shared across threads.

use std::any::Any;
use std::collections::HashMap;

use crate::foundation::ids::ObjectId;

/// Cache key: the owning object plus a query name.
pub type CacheKey = (ObjectId, &'static str);

struct CacheEntry {
    frame_stamp: u64,
    value: Box<dyn Any>,
}

/// Frame-scoped memoization for per-object queries.
///
/// Supports heterogeneous value types per key. Reading a key with a type
/// other than the one written is a miss.
pub struct FrameCache {
    frame: u64,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl FrameCache {
    /// Create an empty cache at frame 0
    pub fn new() -> Self {
        Self {
            frame: 0,
            entries: HashMap::new(),
        }
    }

    /// The frame whose entries are currently valid
    pub fn current_frame(&self) -> u64 {
        self.frame
    }

    /// Switch to `frame`, invalidating entries written in any other frame.
    ///
    /// Stale entries are dropped eagerly so memory stays bounded by one
    /// frame's worth of queries.
    pub fn begin_frame(&mut self, frame: u64) {
        if frame != self.frame {
            self.frame = frame;
            self.purge_stale();
        }
    }

    /// Look up a value written this frame
    pub fn get<T: Clone + 'static>(&self, owner: ObjectId, key: &'static str) -> Option<T> {
        let entry = self.entries.get(&(owner, key))?;
        if entry.frame_stamp != self.frame {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Store a value for the current frame, replacing any previous value
    pub fn set<T: 'static>(&mut self, owner: ObjectId, key: &'static str, value: T) {
        self.entries.insert(
            (owner, key),
            CacheEntry {
                frame_stamp: self.frame,
                value: Box::new(value),
            },
        );
    }

    /// Return the memoized value, computing and storing it on a miss
    pub fn get_or_insert_with<T, F>(&mut self, owner: ObjectId, key: &'static str, compute: F) -> T
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        if let Some(value) = self.get(owner, key) {
            return value;
        }
        let value = compute();
        self.set(owner, key, value.clone());
        value
    }

    /// Drop entries stamped with any frame other than the current one
    pub fn purge_stale(&mut self) {
        let frame = self.frame;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.frame_stamp == frame);
        let purged = before - self.entries.len();
        if purged > 0 {
            log::debug!("FrameCache purged {} stale entries at frame {}", purged, frame);
        }
    }

    /// Number of stored entries (valid for the current frame after a purge)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for FrameCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCache")
            .field("frame", &self.frame)
            .field("entries", &self.entries.len())
            .finish()
    }
}
