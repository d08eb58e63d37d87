//! Growable scratch buffer
//!
//! A single shared working array that only ever grows, in power-of-two
//! steps. Per-frame code borrows it for the duration of one operation
//! instead of allocating its own array.
//!
//! # Usage constraint
//!
//! One holder at a time. The `&mut` borrow returned by
//! [`ScratchBuffer::acquire`] enforces this within safe code; the buffer is
//! not meant to be shared across threads.

/// Monotonically growing buffer sized to powers of two.
///
/// Contents are not preserved across a growth event.
#[derive(Debug)]
pub struct ScratchBuffer<T> {
    data: Vec<T>,
    generation: u64,
}

impl<T: Clone + Default> ScratchBuffer<T> {
    /// Create a buffer with an initial capacity, rounded up to a power of two
    pub fn with_capacity(initial: usize) -> Self {
        let capacity = grown_capacity(initial);
        Self {
            data: vec![T::default(); capacity],
            generation: 0,
        }
    }

    /// Borrow the shared buffer with room for at least `min_size` elements.
    ///
    /// Returns the whole backing storage (`len() == capacity()`). If the
    /// current capacity is too small the storage is replaced by one sized to
    /// the smallest power of two `>= min_size`.
    pub fn acquire(&mut self, min_size: usize) -> &mut [T] {
        if self.data.len() < min_size {
            let capacity = grown_capacity(min_size);
            log::debug!(
                "ScratchBuffer growing from {} to {} elements",
                self.data.len(),
                capacity
            );
            // Old contents are dropped, not copied
            self.data = vec![T::default(); capacity];
            self.generation += 1;
        }
        &mut self.data
    }

    /// Current capacity in elements
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of growth events so far. Unchanged means the storage identity
    /// is unchanged.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<T: Clone + Default> Default for ScratchBuffer<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

/// Smallest power of two `>= size`, saturating at `size` itself when the
/// next power of two would overflow.
fn grown_capacity(size: usize) -> usize {
    size.checked_next_power_of_two().unwrap_or(size)
}
