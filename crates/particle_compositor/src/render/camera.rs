//! # Viewport Camera
//!
//! Camera used to project canvas geometry into normalized viewport space for
//! visibility decisions. Only the projection math lives here; the compositor
//! never renders through it.
//!
//! ## Coordinate System
//! Right-handed, Y-up view space looking down -Z (nalgebra's `look_at_rh`),
//! with OpenGL-style clip space. Viewport space is `[0, 1]^2` with the origin
//! at the bottom-left corner.

use nalgebra::{Orthographic3, Perspective3};

use crate::foundation::math::{safe_reciprocal, Mat4, Point3, Vec3, Vec4};

/// Projection model of a [`Camera`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in radians
        fov_y: f32,
    },
    /// Orthographic projection
    Orthographic {
        /// Half of the vertical view volume height
        half_height: f32,
    },
}

/// Camera with position, orientation and projection parameters
///
/// Matrices are computed on demand. Hosts typically rebuild the camera
/// whenever the scene camera moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera looks at in world space
    pub target: Vec3,

    /// Up vector for camera orientation
    pub up: Vec3,

    /// Projection model
    pub projection: Projection,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to the near clipping plane
    pub near: f32,

    /// Distance to the far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Viewport width / height
    /// * `near` - Near plane distance (must be > 0)
    /// * `far` - Far plane distance (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            projection: Projection::Perspective {
                fov_y: fov_degrees.to_radians(),
            },
            aspect,
            near,
            far,
        }
    }

    /// Create an orthographic camera looking at the origin
    ///
    /// `half_height` is half of the visible world height; the visible width
    /// follows from `aspect`.
    pub fn orthographic(position: Vec3, half_height: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            projection: Projection::Orthographic { half_height },
            aspect,
            near,
            far,
        }
    }

    /// Point the camera at `target` with a custom up vector
    pub fn look_at(mut self, target: Vec3, up: Vec3) -> Self {
        self.target = target;
        self.up = up;
        self
    }

    /// Update the aspect ratio after a viewport resize
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::debug!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// World-to-view transformation matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    /// View-to-clip projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective { fov_y } => {
                Perspective3::new(self.aspect, fov_y, self.near, self.far).to_homogeneous()
            }
            Projection::Orthographic { half_height } => {
                let half_width = half_height * self.aspect;
                Orthographic3::new(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
                .to_homogeneous()
            }
        }
    }

    /// Combined world-to-clip matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world-space point into viewport space.
    ///
    /// X and Y are normalized to `[0, 1]` across the visible area. Z is the
    /// distance in front of the camera along its view direction.
    pub fn world_to_viewport(&self, point: &Point3) -> Vec3 {
        let view = self.view_matrix();
        let eye = view * Vec4::new(point.x, point.y, point.z, 1.0);
        let clip = self.projection_matrix() * eye;

        let inv_w = safe_reciprocal(clip.w);
        let ndc_x = clip.x * inv_w;
        let ndc_y = clip.y * inv_w;

        Vec3::new((ndc_x + 1.0) * 0.5, (ndc_y + 1.0) * 0.5, -eye.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn front_camera() -> Camera {
        Camera::perspective(Vec3::new(0.0, 0.0, 10.0), 90.0, 1.0, 0.1, 100.0)
    }

    #[test]
    fn test_look_target_projects_to_center() {
        let viewport = front_camera().world_to_viewport(&Point3::origin());
        assert_relative_eq!(viewport.x, 0.5, epsilon = 1e-5);
        assert_relative_eq!(viewport.y, 0.5, epsilon = 1e-5);
        assert_relative_eq!(viewport.z, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_frustum_edge_projects_to_viewport_edge() {
        // 90 degree fov at distance 10: half height is 10
        let camera = front_camera();
        let top_right = camera.world_to_viewport(&Point3::new(10.0, 10.0, 0.0));
        assert_relative_eq!(top_right.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(top_right.y, 1.0, epsilon = 1e-5);

        let bottom_left = camera.world_to_viewport(&Point3::new(-10.0, -10.0, 0.0));
        assert_relative_eq!(bottom_left.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(bottom_left.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_orthographic_projection_ignores_distance() {
        let camera = Camera::orthographic(Vec3::new(0.0, 0.0, 10.0), 5.0, 2.0, 0.1, 100.0);
        let near = camera.world_to_viewport(&Point3::new(10.0, 5.0, 5.0));
        let far = camera.world_to_viewport(&Point3::new(10.0, 5.0, -50.0));
        assert_relative_eq!(near.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(near.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(near.x, far.x, epsilon = 1e-5);
        assert_relative_eq!(near.y, far.y, epsilon = 1e-5);
    }

    #[test]
    fn test_look_at_changes_center() {
        let camera = front_camera().look_at(Vec3::new(5.0, 0.0, 0.0), Vec3::y());
        let viewport = camera.world_to_viewport(&Point3::new(5.0, 0.0, 0.0));
        assert_relative_eq!(viewport.x, 0.5, epsilon = 1e-5);
        assert_relative_eq!(viewport.y, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_view_projection_matches_viewport_projection() {
        let camera = front_camera();
        let point = Point3::new(3.0, -2.0, 1.0);
        let clip = camera.view_projection_matrix() * Vec4::new(point.x, point.y, point.z, 1.0);
        let viewport = camera.world_to_viewport(&point);
        assert_relative_eq!((clip.x / clip.w + 1.0) * 0.5, viewport.x, epsilon = 1e-5);
        assert_relative_eq!((clip.y / clip.w + 1.0) * 0.5, viewport.y, epsilon = 1e-5);
    }

    #[test]
    fn test_wider_aspect_pulls_points_toward_center() {
        let mut camera = front_camera();
        let point = Point3::new(10.0, 0.0, 0.0);
        assert_relative_eq!(camera.world_to_viewport(&point).x, 1.0, epsilon = 1e-5);

        camera.set_aspect_ratio(2.0);
        assert_relative_eq!(camera.aspect, 2.0);
        assert_relative_eq!(camera.world_to_viewport(&point).x, 0.75, epsilon = 1e-5);
    }
}
