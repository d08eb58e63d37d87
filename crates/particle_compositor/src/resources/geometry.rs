//! Frame-transient geometry storage
//!
//! [`GeometryBuffer`] is the pooled unit mesh building writes into, and
//! [`Particle`] is the element type of the shared particle scratch array.
//! Neither knows how meshes are built; they only hold the data.

use bytemuck::{Pod, Zeroable};

use super::pool::ResourcePool;

/// Vertex layout for canvas particle geometry
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct UiVertex {
    /// Position in canvas space
    pub position: [f32; 3],
    /// Vertex color (RGBA, 0-255)
    pub color: [u8; 4],
    /// Texture coordinates
    pub uv: [f32; 2],
}

/// Snapshot of a single simulated particle, as copied out of the host
/// simulation for mesh building.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Particle {
    /// Position in simulation space
    pub position: [f32; 3],
    /// Velocity in simulation space
    pub velocity: [f32; 3],
    /// Size along each axis
    pub size: [f32; 3],
    /// Rotation in radians
    pub rotation: f32,
    /// Color (RGBA, 0-255)
    pub color: [u8; 4],
    /// Seconds of life left
    pub remaining_lifetime: f32,
}

/// Reusable vertex/index storage for one emitter's mesh.
///
/// A cleared buffer compares equal to a freshly constructed one; capacity is
/// retained so steady-state frames do not allocate.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBuffer {
    vertices: Vec<UiVertex>,
    indices: Vec<u32>,
    dynamic: bool,
}

impl GeometryBuffer {
    /// Create an empty buffer flagged for per-frame rewrites
    pub fn new_dynamic() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            dynamic: true,
        }
    }

    /// Append a quad (two triangles) and return its base vertex index.
    ///
    /// Returns `None` and writes nothing once the quad's indices would no
    /// longer fit in `u32`.
    pub fn push_quad(&mut self, corners: [UiVertex; 4]) -> Option<u32> {
        let indices = quad_indices(self.vertices.len())?;
        self.vertices.extend_from_slice(&corners);
        self.indices.extend_from_slice(&indices);
        Some(indices[0])
    }

    /// Vertices written so far
    pub fn vertices(&self) -> &[UiVertex] {
        &self.vertices
    }

    /// Indices written so far
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Raw vertex bytes for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Whether the buffer is flagged for per-frame rewrites
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Whether no geometry has been written
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Drop all geometry, keeping allocated capacity
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.dynamic = true;
    }

    /// Vertex capacity currently allocated
    pub fn vertex_capacity(&self) -> usize {
        self.vertices.capacity()
    }
}

impl Default for GeometryBuffer {
    fn default() -> Self {
        Self::new_dynamic()
    }
}

/// Triangle indices of a quad whose first vertex lands at `vertex_count`
fn quad_indices(vertex_count: usize) -> Option<[u32; 6]> {
    let base = u32::try_from(vertex_count).ok()?;
    let last = base.checked_add(3)?;
    Some([base, base + 1, base + 2, base + 2, last, base])
}

/// Pool of geometry buffers, reset by clearing
pub fn geometry_pool() -> ResourcePool<GeometryBuffer> {
    ResourcePool::new(GeometryBuffer::new_dynamic, GeometryBuffer::clear)
}
