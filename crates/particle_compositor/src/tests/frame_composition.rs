//! Draw-set composition across frames

use std::cell::Cell;

use crate::core::config::CompositorConfig;
use crate::foundation::ids::{IdAllocator, MaterialId, ObjectId};
use crate::foundation::math::{Point3, Transform, Vec3};
use crate::render::camera::Camera;
use crate::render::emitter::{Emitter, MaterialRef};
use crate::render::visibility::{CanvasRect, Renderable, RenderMode, ScreenInfo, Surface};
use crate::FrameCompositor;

/// Canvas host that counts how often its geometry is read
struct TrackedHost {
    rect: CanvasRect,
    corner_reads: Cell<usize>,
}

impl TrackedHost {
    fn new(rect: CanvasRect) -> Self {
        Self {
            rect,
            corner_reads: Cell::new(0),
        }
    }
}

impl Renderable for TrackedHost {
    fn id(&self) -> ObjectId {
        self.rect.id
    }

    fn world_corners(&self) -> [Point3; 4] {
        self.corner_reads.set(self.corner_reads.get() + 1);
        self.rect.corners
    }

    fn surface(&self) -> Option<&Surface> {
        self.rect.surface.as_ref()
    }

    fn alpha(&self) -> f32 {
        self.rect.alpha
    }

    fn inherited_alpha(&self) -> f32 {
        self.rect.inherited_alpha
    }
}

fn screen() -> ScreenInfo {
    ScreenInfo::new(1280.0, 720.0)
}

fn drawn_ids(emitters: &[Emitter], indices: &[usize]) -> Vec<ObjectId> {
    indices.iter().map(|&i| emitters[i].id).collect()
}

#[test]
fn test_queue_layer_scenario_through_compositor() {
    let mut ids = IdAllocator::new();
    let material = MaterialRef::new(ids.next_material(), 0);
    let with_queue = |id: ObjectId, queue: i32, layer: i32| {
        Emitter::new(id)
            .with_material(MaterialRef::new(material.id, queue))
            .with_sorting(layer, 0)
    };

    let a = with_queue(ids.next_object(), 10, 0);
    let b = with_queue(ids.next_object(), 5, 0);
    let c = with_queue(ids.next_object(), 5, 1);
    let expected = vec![b.id, c.id, a.id];

    let host = CanvasRect::new(ids.next_object(), Surface::overlay()).with_rect(100.0, 100.0, 300.0, 200.0);
    let mut compositor = FrameCompositor::new(CompositorConfig::default(), screen());
    compositor.begin_frame();

    let mut emitters = vec![a, b, c];
    let draw = compositor.compose(&host, &mut emitters, &Transform::identity());

    assert_eq!(drawn_ids(&emitters, &draw.emitters), expected);
    assert_eq!(compositor.end_frame(), 0);
}

#[test]
fn test_visibility_computed_once_per_frame() {
    let host = TrackedHost::new(
        CanvasRect::new(ObjectId(1), Surface::overlay())
            .with_rect(0.0, 0.0, 64.0, 64.0)
            .with_alpha(0.8, 0.4),
    );
    let mut compositor = FrameCompositor::new(CompositorConfig::default(), screen());

    for frame in 1..=3 {
        compositor.begin_frame();
        // Two emitter groups under the same host
        let mut front = vec![Emitter::new(ObjectId(10))];
        let mut back = vec![Emitter::new(ObjectId(11))];
        let first = compositor.compose(&host, &mut front, &Transform::identity());
        let second = compositor.compose(&host, &mut back, &Transform::identity());

        assert_eq!(first.group_alpha, second.group_alpha);
        assert_eq!(host.corner_reads.get(), frame);
    }
}

#[test]
fn test_host_leaving_screen_between_frames() {
    let mut host = CanvasRect::new(ObjectId(1), Surface::overlay()).with_rect(600.0, 300.0, 50.0, 50.0);
    let mut compositor = FrameCompositor::new(CompositorConfig::default(), screen());
    let material = MaterialRef::new(MaterialId(1), 3000);
    let mut emitters = vec![Emitter::new(ObjectId(2)).with_material(material)];

    compositor.begin_frame();
    assert_eq!(compositor.compose(&host, &mut emitters, &Transform::identity()).emitters, vec![0]);

    // Same frame: the memoized answer stands even though the host moved
    host = host.with_rect(-600.0, 300.0, 50.0, 50.0);
    assert_eq!(compositor.compose(&host, &mut emitters, &Transform::identity()).emitters, vec![0]);

    compositor.begin_frame();
    assert!(compositor.compose(&host, &mut emitters, &Transform::identity()).is_empty());
}

#[test]
fn test_world_space_canvas_with_depth_ordering() {
    let camera = Camera::perspective(Vec3::new(0.0, 0.0, 20.0), 60.0, 16.0 / 9.0, 0.1, 200.0);
    let surface = Surface::with_camera(RenderMode::WorldSpace, camera);
    let host = CanvasRect::new(ObjectId(1), surface).with_rect(-2.0, -2.0, 4.0, 4.0);

    let material = MaterialRef::new(MaterialId(1), 3000);
    let at = |id: u64, z: f32| {
        Emitter::new(ObjectId(id))
            .with_material(material)
            .with_transform(Transform::from_position(Vec3::new(0.0, 0.0, z)))
    };
    let mut emitters = vec![at(2, -5.0), at(3, 5.0), at(4, 0.0)];

    let mut compositor = FrameCompositor::new(CompositorConfig::default(), screen());
    compositor.begin_frame();
    let draw = compositor.compose(&host, &mut emitters, &Transform::identity());

    assert_eq!(
        drawn_ids(&emitters, &draw.emitters),
        vec![ObjectId(3), ObjectId(4), ObjectId(2)]
    );
}

#[test]
fn test_config_file_contents_drive_ordering() {
    let config: CompositorConfig = toml::from_str(
        r#"
        log_level = "debug"

        [sorting]
        sort_by_material = true
        "#,
    )
    .unwrap();
    config.validate().unwrap();

    let mut compositor = FrameCompositor::new(config, screen());
    compositor.begin_frame();

    let host = CanvasRect::new(ObjectId(1), Surface::overlay()).with_rect(0.0, 0.0, 10.0, 10.0);
    let mut emitters = vec![
        Emitter::new(ObjectId(2)).with_material(MaterialRef::new(MaterialId(7), 0)),
        Emitter::new(ObjectId(3)),
        Emitter::new(ObjectId(4)).with_material(MaterialRef::new(MaterialId(2), 9000)),
    ];
    let draw = compositor.compose(&host, &mut emitters, &Transform::identity());

    // The material-less emitter sinks but still has geometry to bake
    assert_eq!(
        drawn_ids(&emitters, &draw.emitters),
        vec![ObjectId(4), ObjectId(2), ObjectId(3)]
    );
}
