//! Particle emitter model
//!
//! The compositor never owns emitters. Hosts expose them through the
//! [`ParticleEmitter`] accessor trait; [`Emitter`] is a plain-data
//! implementation for hosts (and tests) that keep their own copies.

use crate::foundation::ids::{MaterialId, ObjectId};
use crate::foundation::math::{Point3, Transform};

use super::texture::TextureSheetAnimation;

/// Material reference as seen by draw ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialRef {
    /// Allocation-order identity
    pub id: MaterialId,
    /// Render queue, drawn ascending
    pub render_queue: i32,
}

impl MaterialRef {
    /// Create a material reference
    pub const fn new(id: MaterialId, render_queue: i32) -> Self {
        Self { id, render_queue }
    }
}

/// Space particles are simulated in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SimulationSpace {
    /// Relative to the emitter transform
    #[default]
    Local,
    /// Relative to the world origin
    World,
    /// Relative to a host-supplied transform
    Custom,
}

/// How particles are turned into geometry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ParticleRenderMode {
    /// Camera-facing quads
    #[default]
    Billboard,
    /// Quads stretched along velocity
    Stretch,
    /// Quads parallel to the XZ plane
    HorizontalBillboard,
    /// Quads facing the camera around Y only
    VerticalBillboard,
    /// An instanced mesh per particle
    Mesh,
    /// Nothing is rendered
    None,
}

/// Accessor for an emitter competing for draw order.
pub trait ParticleEmitter {
    /// Stable host identity
    fn id(&self) -> ObjectId;

    /// False once the host has destroyed the emitter
    fn is_alive(&self) -> bool {
        true
    }

    /// Primary material, if assigned
    fn shared_material(&self) -> Option<MaterialRef>;

    /// Trail material, used when no primary material is assigned
    fn trail_material(&self) -> Option<MaterialRef>;

    /// Sorting layer value, drawn ascending
    fn sorting_layer_value(&self) -> i32;

    /// Order within the sorting layer, drawn ascending
    fn sorting_order(&self) -> i32;

    /// Offset added to view depth before the depth tie-break
    fn sorting_fudge(&self) -> f32;

    /// Emitter origin in world space
    fn world_position(&self) -> Point3;

    /// Primary material, falling back to the trail material.
    ///
    /// Destroyed emitters resolve to no material.
    fn resolved_material(&self) -> Option<MaterialRef> {
        if !self.is_alive() {
            return None;
        }
        self.shared_material().or_else(|| self.trail_material())
    }

    /// Whether mesh baking can run for this emitter
    fn can_bake_mesh(&self) -> bool {
        true
    }
}

impl<E: ParticleEmitter + ?Sized> ParticleEmitter for &E {
    fn id(&self) -> ObjectId {
        (**self).id()
    }

    fn is_alive(&self) -> bool {
        (**self).is_alive()
    }

    fn shared_material(&self) -> Option<MaterialRef> {
        (**self).shared_material()
    }

    fn trail_material(&self) -> Option<MaterialRef> {
        (**self).trail_material()
    }

    fn sorting_layer_value(&self) -> i32 {
        (**self).sorting_layer_value()
    }

    fn sorting_order(&self) -> i32 {
        (**self).sorting_order()
    }

    fn sorting_fudge(&self) -> f32 {
        (**self).sorting_fudge()
    }

    fn world_position(&self) -> Point3 {
        (**self).world_position()
    }

    fn resolved_material(&self) -> Option<MaterialRef> {
        (**self).resolved_material()
    }

    fn can_bake_mesh(&self) -> bool {
        (**self).can_bake_mesh()
    }
}

/// Plain-data emitter
#[derive(Debug, Clone, PartialEq)]
pub struct Emitter {
    /// Stable host identity
    pub id: ObjectId,
    /// False once destroyed
    pub alive: bool,
    /// Primary material
    pub material: Option<MaterialRef>,
    /// Trail material
    pub trail_material: Option<MaterialRef>,
    /// Sorting layer value
    pub sorting_layer_value: i32,
    /// Order within the sorting layer
    pub sorting_order: i32,
    /// Depth offset for the depth tie-break
    pub sorting_fudge: f32,
    /// World transform
    pub transform: Transform,
    /// Configured simulation space
    pub simulation_space: SimulationSpace,
    /// Transform used by [`SimulationSpace::Custom`]
    pub custom_simulation_transform: Option<Transform>,
    /// Geometry mode
    pub render_mode: ParticleRenderMode,
    /// Mesh asset used by [`ParticleRenderMode::Mesh`]
    pub mesh: Option<ObjectId>,
    /// Sprite-sheet animation settings
    pub texture_sheet: Option<TextureSheetAnimation>,
}

impl Emitter {
    /// Create a live emitter with no materials at the origin
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            alive: true,
            material: None,
            trail_material: None,
            sorting_layer_value: 0,
            sorting_order: 0,
            sorting_fudge: 0.0,
            transform: Transform::identity(),
            simulation_space: SimulationSpace::Local,
            custom_simulation_transform: None,
            render_mode: ParticleRenderMode::Billboard,
            mesh: None,
            texture_sheet: None,
        }
    }

    /// Set the primary material
    pub fn with_material(mut self, material: MaterialRef) -> Self {
        self.material = Some(material);
        self
    }

    /// Set the trail material
    pub fn with_trail_material(mut self, material: MaterialRef) -> Self {
        self.trail_material = Some(material);
        self
    }

    /// Set the sorting layer value and order
    pub fn with_sorting(mut self, layer_value: i32, order: i32) -> Self {
        self.sorting_layer_value = layer_value;
        self.sorting_order = order;
        self
    }

    /// Set the sorting fudge
    pub fn with_sorting_fudge(mut self, fudge: f32) -> Self {
        self.sorting_fudge = fudge;
        self
    }

    /// Set the world transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the simulation space
    pub fn with_simulation_space(mut self, space: SimulationSpace) -> Self {
        self.simulation_space = space;
        self
    }

    /// Set the geometry mode and optional mesh
    pub fn with_render_mode(mut self, mode: ParticleRenderMode, mesh: Option<ObjectId>) -> Self {
        self.render_mode = mode;
        self.mesh = mesh;
        self
    }

    /// Set the sprite-sheet animation
    pub fn with_texture_sheet(mut self, sheet: TextureSheetAnimation) -> Self {
        self.texture_sheet = Some(sheet);
        self
    }

    /// Mark the emitter destroyed
    pub fn destroy(&mut self) {
        self.alive = false;
    }

    /// Simulation space after resolving a custom space with no transform
    /// back to local space
    pub fn resolved_simulation_space(&self) -> SimulationSpace {
        match self.simulation_space {
            SimulationSpace::Custom if self.custom_simulation_transform.is_none() => {
                SimulationSpace::Local
            }
            space => space,
        }
    }

    /// Whether particles effectively simulate in local space
    pub fn is_local_space(&self) -> bool {
        self.resolved_simulation_space() == SimulationSpace::Local
    }

    /// Whether particles effectively simulate in world space
    pub fn is_world_space(&self) -> bool {
        self.resolved_simulation_space() == SimulationSpace::World
    }
}

impl ParticleEmitter for Emitter {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn shared_material(&self) -> Option<MaterialRef> {
        self.material
    }

    fn trail_material(&self) -> Option<MaterialRef> {
        self.trail_material
    }

    fn sorting_layer_value(&self) -> i32 {
        self.sorting_layer_value
    }

    fn sorting_order(&self) -> i32 {
        self.sorting_order
    }

    fn sorting_fudge(&self) -> f32 {
        self.sorting_fudge
    }

    fn world_position(&self) -> Point3 {
        Point3::from(self.transform.position)
    }

    /// Mesh mode without a mesh would crash the baker, and mode `None`
    /// produces no geometry at all.
    fn can_bake_mesh(&self) -> bool {
        match self.render_mode {
            ParticleRenderMode::Mesh => self.mesh.is_some(),
            ParticleRenderMode::None => false,
            _ => true,
        }
    }
}
