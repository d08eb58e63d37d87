//! Canvas visibility and group alpha
//!
//! A canvas-hosted renderable is visible when the viewport-space bounds of
//! its four world corners overlap the `[0, 1]^3` viewport region. Touching
//! the edge counts. Both queries are memoized per frame in a [`FrameCache`].

use crate::foundation::bounds::Aabb;
use crate::foundation::ids::ObjectId;
use crate::foundation::math::{approximately, clamp01, safe_reciprocal, Point3, Vec2};
use crate::frame::cache::FrameCache;

use super::camera::Camera;

/// Cache key for memoized visibility
pub const VISIBLE_KEY: &str = "is_visible";

/// Cache key for memoized parent-group alpha
pub const PARENT_GROUP_ALPHA_KEY: &str = "parent_group_alpha";

/// How a surface maps to the screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Drawn over everything in screen pixels; never uses a camera
    #[default]
    ScreenSpaceOverlay,
    /// Screen-aligned but placed in front of a camera
    ScreenSpaceCamera,
    /// Placed in the world and seen through a camera
    WorldSpace,
}

/// The canvas a renderable is drawn on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    /// Screen mapping
    pub render_mode: RenderMode,
    /// Camera assigned to the canvas, if any
    pub world_camera: Option<Camera>,
}

impl Surface {
    /// An overlay surface drawn in screen pixels
    pub fn overlay() -> Self {
        Self::default()
    }

    /// A surface seen through `camera`
    pub fn with_camera(render_mode: RenderMode, camera: Camera) -> Self {
        Self {
            render_mode,
            world_camera: Some(camera),
        }
    }

    /// Camera used for projection. Overlay surfaces, and camera modes with
    /// no camera assigned, project without one.
    pub fn active_camera(&self) -> Option<&Camera> {
        match self.render_mode {
            RenderMode::ScreenSpaceOverlay => None,
            RenderMode::ScreenSpaceCamera | RenderMode::WorldSpace => self.world_camera.as_ref(),
        }
    }
}

/// Screen dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenInfo {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl ScreenInfo {
    /// Create screen info
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Accessor for a canvas-hosted object
pub trait Renderable {
    /// Stable host identity
    fn id(&self) -> ObjectId;

    /// False once the host has destroyed the object
    fn is_alive(&self) -> bool {
        true
    }

    /// Rectangle corners in world space
    fn world_corners(&self) -> [Point3; 4];

    /// Canvas the object is drawn on
    fn surface(&self) -> Option<&Surface>;

    /// The object's own alpha
    fn alpha(&self) -> f32;

    /// Alpha including every ancestor group and the object itself
    fn inherited_alpha(&self) -> f32;
}

/// Ancestor-only alpha, factoring `own` out of `inherited`
pub fn group_alpha_ratio(own: f32, inherited: f32) -> f32 {
    if approximately(own, 0.0) {
        return 1.0;
    }
    clamp01(inherited / own)
}

/// Per-frame visibility and alpha queries for canvas renderables.
#[derive(Debug, Clone)]
pub struct VisibilityClassifier {
    screen: ScreenInfo,
}

impl VisibilityClassifier {
    /// Create a classifier for a screen of the given size
    pub fn new(screen: ScreenInfo) -> Self {
        Self { screen }
    }

    /// Current screen dimensions
    pub fn screen(&self) -> ScreenInfo {
        self.screen
    }

    /// Update the screen dimensions. Results already memoized this frame
    /// are kept.
    pub fn set_screen(&mut self, screen: ScreenInfo) {
        self.screen = screen;
    }

    /// Whether `renderable` overlaps the viewport this frame.
    ///
    /// Destroyed objects and objects without a surface are never visible.
    pub fn is_visible<R: Renderable + ?Sized>(&self, cache: &mut FrameCache, renderable: &R) -> bool {
        if !renderable.is_alive() {
            return false;
        }
        cache.get_or_insert_with(renderable.id(), VISIBLE_KEY, || {
            let visible = self
                .viewport_bounds(renderable)
                .is_some_and(|bounds| bounds.intersects(&Aabb::unit_viewport()));
            log::trace!("Visibility of {:?}: {}", renderable.id(), visible);
            visible
        })
    }

    /// Alpha contributed by ancestor groups only.
    ///
    /// Destroyed objects report 1.
    pub fn parent_group_alpha<R: Renderable + ?Sized>(&self, cache: &mut FrameCache, renderable: &R) -> f32 {
        if !renderable.is_alive() {
            return 1.0;
        }
        cache.get_or_insert_with(renderable.id(), PARENT_GROUP_ALPHA_KEY, || {
            group_alpha_ratio(renderable.alpha(), renderable.inherited_alpha())
        })
    }

    /// Viewport-space bounds of the renderable's corners with depth zeroed
    pub fn viewport_bounds<R: Renderable + ?Sized>(&self, renderable: &R) -> Option<Aabb> {
        let surface = renderable.surface()?;
        let camera = surface.active_camera();
        let corners = renderable.world_corners();
        Aabb::from_points(corners.iter().map(|corner| {
            let viewport = self.project(camera, corner);
            Point3::new(viewport.x, viewport.y, 0.0)
        }))
    }

    fn project(&self, camera: Option<&Camera>, corner: &Point3) -> Vec2 {
        match camera {
            Some(camera) => {
                let viewport = camera.world_to_viewport(corner);
                Vec2::new(viewport.x, viewport.y)
            }
            // Cameraless surfaces are already in screen pixels
            None => Vec2::new(
                corner.x * safe_reciprocal(self.screen.width),
                corner.y * safe_reciprocal(self.screen.height),
            ),
        }
    }
}

/// Plain-data canvas rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasRect {
    /// Stable host identity
    pub id: ObjectId,
    /// False once destroyed
    pub alive: bool,
    /// Corners: bottom-left, top-left, top-right, bottom-right
    pub corners: [Point3; 4],
    /// Canvas the rectangle is drawn on
    pub surface: Option<Surface>,
    /// Own alpha
    pub alpha: f32,
    /// Alpha including ancestors
    pub inherited_alpha: f32,
}

impl CanvasRect {
    /// Create an opaque rectangle at the origin with zero size
    pub fn new(id: ObjectId, surface: Surface) -> Self {
        Self {
            id,
            alive: true,
            corners: [Point3::origin(); 4],
            surface: Some(surface),
            alpha: 1.0,
            inherited_alpha: 1.0,
        }
    }

    /// Place the rectangle in the `z = 0` plane
    pub fn with_rect(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.corners = [
            Point3::new(x, y, 0.0),
            Point3::new(x, y + height, 0.0),
            Point3::new(x + width, y + height, 0.0),
            Point3::new(x + width, y, 0.0),
        ];
        self
    }

    /// Set the own and inherited alpha
    pub fn with_alpha(mut self, alpha: f32, inherited_alpha: f32) -> Self {
        self.alpha = alpha;
        self.inherited_alpha = inherited_alpha;
        self
    }

    /// Mark the rectangle destroyed
    pub fn destroy(&mut self) {
        self.alive = false;
    }
}

impl Renderable for CanvasRect {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn world_corners(&self) -> [Point3; 4] {
        self.corners
    }

    fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    fn alpha(&self) -> f32 {
        self.alpha
    }

    fn inherited_alpha(&self) -> f32 {
        self.inherited_alpha
    }
}
