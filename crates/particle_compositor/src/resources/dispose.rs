//! Disposal capability
//!
//! Hosts differ in when a destroyed object may actually be torn down: some
//! allow it immediately, others only at the end of the frame. The backend is
//! picked once from configuration instead of inspecting the runtime
//! environment at each call.

use serde::{Deserialize, Serialize};

/// Disposal backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisposeMode {
    /// Drop objects as soon as they are disposed
    Immediate,
    /// Queue objects and drop them on [`DisposeQueue::flush`]
    #[default]
    Deferred,
}

/// Disposes owned objects according to a [`DisposeMode`].
#[derive(Debug)]
pub struct DisposeQueue<T> {
    mode: DisposeMode,
    pending: Vec<T>,
    disposed: usize,
}

impl<T> DisposeQueue<T> {
    /// Create a queue for the given backend
    pub fn new(mode: DisposeMode) -> Self {
        Self {
            mode,
            pending: Vec::new(),
            disposed: 0,
        }
    }

    /// Active backend
    pub fn mode(&self) -> DisposeMode {
        self.mode
    }

    /// Dispose an object. An absent object is ignored.
    pub fn dispose(&mut self, object: Option<T>) {
        let Some(object) = object else {
            return;
        };
        match self.mode {
            DisposeMode::Immediate => {
                drop(object);
                self.disposed += 1;
            }
            DisposeMode::Deferred => self.pending.push(object),
        }
    }

    /// Drop every queued object; returns how many were dropped
    pub fn flush(&mut self) -> usize {
        let count = self.pending.len();
        if count > 0 {
            self.pending.clear();
            self.disposed += count;
            log::debug!("DisposeQueue flushed {} deferred objects", count);
        }
        count
    }

    /// Objects waiting for the next flush
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Objects actually dropped so far
    pub fn disposed_count(&self) -> usize {
        self.disposed
    }
}

impl<T> Drop for DisposeQueue<T> {
    fn drop(&mut self) {
        self.flush();
    }
}
