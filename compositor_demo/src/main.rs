//! Compositor demo application
//!
//! Drives a scripted orbit of particle emitters under two canvases through
//! the compositor and logs the draw set of every frame. A `.toml` or `.ron`
//! configuration file may be passed as the first argument.

use particle_compositor::foundation::logging;
use particle_compositor::prelude::*;
use particle_compositor::resources::UiVertex;

const FRAMES: u32 = 6;

/// Frame at which the demo simulates a window resize
const RESIZE_FRAME: u32 = 3;

/// Demo failures
#[derive(thiserror::Error, Debug)]
enum DemoError {
    /// The configuration file could not be loaded
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),
}

fn load_config() -> Result<CompositorConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => Ok(CompositorConfig::load_validated(&path)?),
        None => Ok(CompositorConfig::default()),
    }
}

struct DemoScene {
    overlay: CanvasRect,
    world: CanvasRect,
    overlay_emitters: Vec<Emitter>,
    world_emitters: Vec<Emitter>,
}

impl DemoScene {
    fn new() -> Self {
        let mut ids = IdAllocator::new();
        let additive = MaterialRef::new(ids.next_material(), 3100);
        let alpha_blend = MaterialRef::new(ids.next_material(), 3000);

        let overlay = CanvasRect::new(ids.next_object(), Surface::overlay())
            .with_rect(40.0, 40.0, 320.0, 180.0)
            .with_alpha(1.0, 0.75);

        let camera = Camera::perspective(Vec3::new(0.0, 1.0, 12.0), 60.0, 16.0 / 9.0, 0.1, 100.0);
        let world = CanvasRect::new(ids.next_object(), Surface::with_camera(RenderMode::WorldSpace, camera))
            .with_rect(-3.0, -2.0, 6.0, 4.0);

        let overlay_emitters = vec![
            Emitter::new(ids.next_object()).with_material(additive),
            Emitter::new(ids.next_object()).with_material(alpha_blend).with_sorting(1, 0),
            Emitter::new(ids.next_object()).with_material(alpha_blend),
            Emitter::new(ids.next_object()),
        ];

        let world_emitters = (0..4)
            .map(|_| Emitter::new(ids.next_object()).with_material(alpha_blend))
            .collect();

        Self {
            overlay,
            world,
            overlay_emitters,
            world_emitters,
        }
    }

    /// Follow a window resize on the world canvas camera
    fn resize(&mut self, screen: ScreenInfo) {
        if let Some(camera) = self.world.surface.as_mut().and_then(|s| s.world_camera.as_mut()) {
            camera.set_aspect_ratio(screen.width / screen.height);
            log::debug!("World canvas view-projection: {:?}", camera.view_projection_matrix());
        }
    }

    /// Orbit the world-space emitters and slide the overlay canvas right
    fn advance(&mut self, frame: u32) {
        let t = frame as f32 * 0.6;
        for (i, emitter) in self.world_emitters.iter_mut().enumerate() {
            let phase = t + i as f32 * std::f32::consts::FRAC_PI_2;
            emitter.transform.position = Vec3::new(phase.cos() * 2.0, 0.0, phase.sin() * 2.0);
        }
        self.overlay = self.overlay.clone().with_rect(40.0 + frame as f32 * 250.0, 40.0, 320.0, 180.0);
    }
}

fn build_geometry(compositor: &mut FrameCompositor, draw: &DrawSet) -> usize {
    let mut vertices = 0;
    for _ in &draw.emitters {
        let mut buffer = Some(compositor.rent_geometry());
        let particles = compositor.particle_scratch(256);
        if let Some(geometry) = buffer.as_mut() {
            for particle in particles.iter().take(8) {
                let [x, y, z] = particle.position;
                let vertex = |dx: f32, dy: f32| UiVertex {
                    position: [x + dx, y + dy, z],
                    color: [255, 255, 255, 255],
                    uv: [dx, dy],
                };
                let quad = [vertex(0.0, 0.0), vertex(0.0, 1.0), vertex(1.0, 1.0), vertex(1.0, 0.0)];
                if geometry.push_quad(quad).is_none() {
                    log::warn!("Geometry buffer index range exhausted");
                    break;
                }
            }
            vertices += geometry.vertices().len();
        }
        compositor.release_geometry(&mut buffer);
    }
    vertices
}

fn ids(emitters: &[Emitter], draw: &DrawSet) -> Vec<u64> {
    draw.emitters.iter().map(|&i| emitters[i].id.0).collect()
}

fn run(config: CompositorConfig) {
    let mut compositor = FrameCompositor::new(config, ScreenInfo::new(1280.0, 720.0));
    let mut scene = DemoScene::new();
    let view = Transform::from_position(Vec3::new(0.0, 1.0, 12.0));

    for frame in 0..FRAMES {
        scene.advance(frame);
        if frame == RESIZE_FRAME {
            let screen = ScreenInfo::new(1920.0, 1080.0);
            compositor.set_screen(screen);
            scene.resize(screen);
        }
        let stamp = compositor.begin_frame();

        let overlay = compositor.compose(&scene.overlay, &mut scene.overlay_emitters, &Transform::identity());
        let world = compositor.compose(&scene.world, &mut scene.world_emitters, &view);

        log::info!(
            "Frame {}: overlay {:?} (alpha {:.2}), world {:?}",
            stamp,
            ids(&scene.overlay_emitters, &overlay),
            overlay.group_alpha,
            ids(&scene.world_emitters, &world)
        );

        let vertices = build_geometry(&mut compositor, &overlay) + build_geometry(&mut compositor, &world);
        log::debug!("Frame {} built {} vertices", stamp, vertices);

        compositor.end_frame();
    }

    compositor.trim();
    compositor.end_frame();
    log::info!("Finished: {:?}", compositor);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_filter(&config.log_level);

    log::info!("Starting compositor demo");
    run(config);
    Ok(())
}
