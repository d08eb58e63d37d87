//! # Frame Compositor
//!
//! The owned per-frame context tying ordering, visibility and working
//! buffers together. Hosts create one compositor per rendering thread and
//! drive it once per frame:
//!
//! ```text
//! begin_frame()
//!   compose(host, emitters, view)   per canvas host
//!   rent_geometry() / particle_scratch(n) / release_geometry()
//! end_frame()                       flush deferred disposals
//! ```
//!
//! Nothing here is synchronized; the compositor belongs to the thread that
//! composes frames.

use crate::core::config::CompositorConfig;
use crate::foundation::math::Transform;
use crate::frame::{FrameCache, FrameCounter};
use crate::render::emitter::ParticleEmitter;
use crate::render::order::RenderOrderResolver;
use crate::render::visibility::{Renderable, ScreenInfo, VisibilityClassifier};
use crate::resources::{geometry_pool, DisposeQueue, GeometryBuffer, Particle, ResourcePool, ScratchBuffer};

/// Emitters selected for drawing under one canvas host
#[derive(Debug, Clone, PartialEq)]
pub struct DrawSet {
    /// Indices into the sorted emitter slice, in draw order
    pub emitters: Vec<usize>,
    /// Alpha contributed by the host's ancestor groups
    pub group_alpha: f32,
}

impl DrawSet {
    /// A draw set with nothing to draw
    pub fn empty() -> Self {
        Self {
            emitters: Vec::new(),
            group_alpha: 1.0,
        }
    }

    /// Whether nothing is drawn
    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }
}

/// Per-frame composition context
pub struct FrameCompositor {
    config: CompositorConfig,
    counter: FrameCounter,
    cache: FrameCache,
    resolver: RenderOrderResolver,
    classifier: VisibilityClassifier,
    geometry: ResourcePool<GeometryBuffer>,
    particles: ScratchBuffer<Particle>,
    disposer: DisposeQueue<GeometryBuffer>,
}

impl FrameCompositor {
    /// Create a compositor for a screen of the given size
    pub fn new(config: CompositorConfig, screen: ScreenInfo) -> Self {
        let mut geometry = geometry_pool();
        geometry.prewarm(config.pools.geometry_prewarm);

        log::info!(
            "FrameCompositor created (sort_by_material: {}, dispose: {:?}, scratch: {})",
            config.sorting.sort_by_material,
            config.dispose,
            config.pools.particle_scratch_capacity
        );

        Self {
            counter: FrameCounter::new(),
            cache: FrameCache::new(),
            resolver: RenderOrderResolver::new(),
            classifier: VisibilityClassifier::new(screen),
            geometry,
            particles: ScratchBuffer::with_capacity(config.pools.particle_scratch_capacity),
            disposer: DisposeQueue::new(config.dispose),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Current frame stamp
    pub fn current_frame(&self) -> u64 {
        self.counter.current()
    }

    /// Start a new frame, invalidating every memoized query
    pub fn begin_frame(&mut self) -> u64 {
        let frame = self.counter.advance();
        self.cache.begin_frame(frame);
        frame
    }

    /// Start the frame matching the host's own frame count
    pub fn sync_frame(&mut self, host_frame: u64) -> u64 {
        self.counter.sync_to(host_frame);
        self.cache.begin_frame(self.counter.current());
        self.counter.current()
    }

    /// Update screen dimensions after a resize
    pub fn set_screen(&mut self, screen: ScreenInfo) {
        self.classifier.set_screen(screen);
    }

    /// Select what to draw for the emitters owned by `host`.
    ///
    /// An invisible host yields an empty draw set and leaves `emitters`
    /// untouched. Otherwise `emitters` are sorted in place and the draw set
    /// lists the live, bakeable ones in draw order.
    pub fn compose<R, E>(&mut self, host: &R, emitters: &mut [E], view: &Transform) -> DrawSet
    where
        R: Renderable + ?Sized,
        E: ParticleEmitter,
    {
        if !self.classifier.is_visible(&mut self.cache, host) {
            log::trace!("Host {:?} not visible at frame {}", host.id(), self.current_frame());
            return DrawSet::empty();
        }

        self.resolver
            .sort(emitters, view, self.config.sorting.sort_by_material);

        let selected = emitters
            .iter()
            .enumerate()
            .filter(|(_, emitter)| emitter.is_alive() && emitter.can_bake_mesh())
            .map(|(index, _)| index)
            .collect();

        DrawSet {
            emitters: selected,
            group_alpha: self.classifier.parent_group_alpha(&mut self.cache, host),
        }
    }

    /// Memoized visibility of `renderable` this frame
    pub fn is_visible<R: Renderable + ?Sized>(&mut self, renderable: &R) -> bool {
        self.classifier.is_visible(&mut self.cache, renderable)
    }

    /// Memoized ancestor-group alpha of `renderable` this frame
    pub fn parent_group_alpha<R: Renderable + ?Sized>(&mut self, renderable: &R) -> f32 {
        self.classifier.parent_group_alpha(&mut self.cache, renderable)
    }

    /// Rent an empty geometry buffer
    pub fn rent_geometry(&mut self) -> GeometryBuffer {
        self.geometry.rent()
    }

    /// Return a geometry buffer and clear the handle
    pub fn release_geometry(&mut self, handle: &mut Option<GeometryBuffer>) {
        self.geometry.release(handle);
    }

    /// Shared particle working array with room for `min_size` particles
    pub fn particle_scratch(&mut self, min_size: usize) -> &mut [Particle] {
        self.particles.acquire(min_size)
    }

    /// Finish the frame; returns how many deferred disposals ran
    pub fn end_frame(&mut self) -> usize {
        self.disposer.flush()
    }

    /// Hand every free pooled geometry buffer to the disposer.
    ///
    /// Returns how many buffers were released from the pool.
    pub fn trim(&mut self) -> usize {
        let mut count = 0;
        for buffer in self.geometry.drain_free() {
            self.disposer.dispose(Some(buffer));
            count += 1;
        }
        if count > 0 {
            log::debug!("FrameCompositor trimmed {} geometry buffers", count);
        }
        count
    }

    /// Geometry pool statistics: (free, outstanding, created)
    pub fn geometry_stats(&self) -> (usize, usize, usize) {
        (
            self.geometry.free_count(),
            self.geometry.outstanding(),
            self.geometry.created_count(),
        )
    }

    /// Geometry buffers actually disposed so far
    pub fn disposed_geometry(&self) -> usize {
        self.disposer.disposed_count()
    }

    /// Frame cache backing the memoized queries
    pub fn cache(&self) -> &FrameCache {
        &self.cache
    }
}

impl std::fmt::Debug for FrameCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCompositor")
            .field("frame", &self.counter.current())
            .field("cache", &self.cache)
            .field("geometry", &self.geometry)
            .field("scratch_capacity", &self.particles.capacity())
            .field("pending_disposals", &self.disposer.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ids::{MaterialId, ObjectId};
    use crate::render::emitter::{Emitter, MaterialRef, ParticleRenderMode};
    use crate::render::visibility::{CanvasRect, Surface};
    use crate::resources::DisposeMode;
    use approx::assert_relative_eq;

    fn compositor(config: CompositorConfig) -> FrameCompositor {
        FrameCompositor::new(config, ScreenInfo::new(200.0, 100.0))
    }

    fn host(x: f32) -> CanvasRect {
        CanvasRect::new(ObjectId(100), Surface::overlay()).with_rect(x, 10.0, 50.0, 50.0)
    }

    fn emitter(id: u64, material: u32, queue: i32) -> Emitter {
        Emitter::new(ObjectId(id)).with_material(MaterialRef::new(MaterialId(material), queue))
    }

    #[test]
    fn test_invisible_host_skips_sorting() {
        let mut compositor = compositor(CompositorConfig::default());
        compositor.begin_frame();

        let mut emitters = vec![emitter(1, 1, 10), emitter(2, 1, 5)];
        let draw = compositor.compose(&host(-500.0), &mut emitters, &Transform::identity());

        assert!(draw.is_empty());
        assert_eq!(draw.group_alpha, 1.0);
        assert_eq!(emitters[0].id, ObjectId(1));
    }

    #[test]
    fn test_compose_filters_dead_and_unbakeable() {
        let mut compositor = compositor(CompositorConfig::default());
        compositor.begin_frame();

        let mut dead = emitter(3, 1, 0);
        dead.destroy();
        let mut emitters = vec![
            emitter(1, 1, 10),
            emitter(2, 1, 5).with_render_mode(ParticleRenderMode::Mesh, None),
            dead,
            emitter(4, 1, 1),
        ];

        let host = host(10.0).with_alpha(0.5, 0.25);
        let draw = compositor.compose(&host, &mut emitters, &Transform::identity());

        let drawn: Vec<ObjectId> = draw.emitters.iter().map(|&i| emitters[i].id).collect();
        assert_eq!(drawn, vec![ObjectId(4), ObjectId(1)]);
        assert_relative_eq!(draw.group_alpha, 0.5);
        // Dead emitter was sorted to the back
        assert_eq!(emitters[3].id, ObjectId(3));
    }

    #[test]
    fn test_compose_honors_sort_by_material() {
        let mut compositor = compositor(CompositorConfig::new().with_sort_by_material(true));
        compositor.begin_frame();

        let mut emitters = vec![emitter(1, 9, 0), emitter(2, 3, 4000), emitter(3, 5, 100)];
        let draw = compositor.compose(&host(10.0), &mut emitters, &Transform::identity());

        let drawn: Vec<u64> = draw.emitters.iter().map(|&i| emitters[i].id.0).collect();
        assert_eq!(drawn, vec![2, 3, 1]);
    }

    #[test]
    fn test_geometry_reused_across_frames() {
        let mut compositor = compositor(CompositorConfig::new().with_geometry_prewarm(2));
        assert_eq!(compositor.geometry_stats(), (2, 0, 2));

        for _ in 0..3 {
            compositor.begin_frame();
            let mut a = Some(compositor.rent_geometry());
            let mut b = Some(compositor.rent_geometry());
            compositor.release_geometry(&mut a);
            compositor.release_geometry(&mut b);
            assert!(a.is_none() && b.is_none());
            compositor.end_frame();
        }

        assert_eq!(compositor.geometry_stats(), (2, 0, 2));
    }

    #[test]
    fn test_trim_defers_disposal_until_end_frame() {
        let mut compositor = compositor(CompositorConfig::new().with_geometry_prewarm(3));
        assert_eq!(compositor.trim(), 3);
        assert_eq!(compositor.disposed_geometry(), 0);
        assert_eq!(compositor.end_frame(), 3);
        assert_eq!(compositor.disposed_geometry(), 3);
        assert_eq!(compositor.geometry_stats().0, 0);
    }

    #[test]
    fn test_trim_immediate_disposal() {
        let config = CompositorConfig::new()
            .with_geometry_prewarm(2)
            .with_dispose_mode(DisposeMode::Immediate);
        let mut compositor = compositor(config);
        assert_eq!(compositor.trim(), 2);
        assert_eq!(compositor.disposed_geometry(), 2);
        assert_eq!(compositor.end_frame(), 0);
    }

    #[test]
    fn test_particle_scratch_grows_from_config() {
        let mut compositor = compositor(CompositorConfig::new().with_particle_scratch_capacity(16));
        assert_eq!(compositor.particle_scratch(10).len(), 16);
        assert_eq!(compositor.particle_scratch(1000).len(), 1024);
        assert_eq!(compositor.particle_scratch(5).len(), 1024);
    }

    #[test]
    fn test_sync_frame_invalidates_cache() {
        let mut compositor = compositor(CompositorConfig::default());
        compositor.sync_frame(40);
        assert!(compositor.is_visible(&host(10.0)));
        assert_eq!(compositor.cache().len(), 1);

        assert_eq!(compositor.sync_frame(41), 41);
        assert!(compositor.cache().is_empty());
        assert_eq!(compositor.sync_frame(12), 41);
    }
}
