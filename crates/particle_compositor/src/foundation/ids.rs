//! Identity types shared across the compositor

/// Stable identity of a host object (emitter, graphic, canvas).
///
/// Assigned by the host; the compositor only compares and hashes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// Unique identifier for materials
///
/// Ids are handed out in allocation order, which gives material batching an
/// arbitrary but total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Identifier for a texture resolved from a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Sequential id allocator
///
/// Starts from 1, reserving 0 for "no object".
#[derive(Debug)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create a new allocator
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate the next object id
    pub fn next_object(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next += 1;
        id
    }

    /// Allocate the next material id
    ///
    /// Material ids share the same sequence, truncated to 32 bits.
    pub fn next_material(&mut self) -> MaterialId {
        let raw = self.next;
        self.next += 1;
        MaterialId(u32::try_from(raw).unwrap_or(u32::MAX))
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
