//! Math utilities and types
//!
//! Provides the small set of math types the compositor needs: nalgebra
//! aliases, a TRS transform, and tolerance helpers used by the sort and
//! visibility decisions.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Relative tolerance used by [`approximately`].
const APPROX_MAX_RELATIVE: f32 = 1e-6;

/// Absolute tolerance floor used by [`approximately`].
const APPROX_EPSILON: f32 = f32::EPSILON * 8.0;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Set the scale, builder style
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point (local to world)
    pub fn transform_point(&self, point: &Point3) -> Point3 {
        let scaled = point.coords.component_mul(&self.scale);
        Point3::from(self.rotation * scaled + self.position)
    }

    /// Map a world-space point into this transform's local space.
    ///
    /// Collapsed scale axes are treated as unit scale instead of producing
    /// infinities, so a flattened view transform still yields finite depths.
    pub fn inverse_transform_point(&self, point: &Point3) -> Point3 {
        let relative = point.coords - self.position;
        let unrotated = self.rotation.inverse_transform_vector(&relative);
        Point3::from(unrotated.component_mul(&safe_inverse(self.scale)))
    }
}

/// Tolerance float equality.
///
/// True when the values differ by no more than a millionth of the larger
/// magnitude, or by a few ULPs near zero.
pub fn approximately(a: f32, b: f32) -> bool {
    approx::relative_eq!(a, b, epsilon = APPROX_EPSILON, max_relative = APPROX_MAX_RELATIVE)
}

/// Clamp a value into `[0, 1]`. NaN maps to 0.
pub fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Reciprocal that maps an approximately-zero input to 1.
pub fn safe_reciprocal(value: f32) -> f32 {
    if approximately(value, 0.0) {
        1.0
    } else {
        1.0 / value
    }
}

/// Per-component [`safe_reciprocal`].
pub fn safe_inverse(v: Vec3) -> Vec3 {
    Vec3::new(safe_reciprocal(v.x), safe_reciprocal(v.y), safe_reciprocal(v.z))
}

/// A scale renders anything only if no axis has collapsed to zero.
pub fn is_scale_visible(scale: Vec3) -> bool {
    0.0 < (scale.x * scale.y * scale.z).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_approximately() {
        assert!(approximately(1.0, 1.0 + 1e-7));
        assert!(approximately(0.0, 0.0));
        assert!(approximately(1_000_000.0, 1_000_000.5));
        assert!(!approximately(1.0, 1.001));
        assert!(!approximately(0.0, 1e-4));
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(0.25), 0.25);
        assert_eq!(clamp01(3.0), 1.0);
        assert_eq!(clamp01(f32::NAN), 0.0);
    }

    #[test]
    fn test_safe_inverse_maps_zero_to_one() {
        let inv = safe_inverse(Vec3::new(2.0, 0.0, -4.0));
        assert_relative_eq!(inv, Vec3::new(0.5, 1.0, -0.25), epsilon = EPSILON);
        assert_eq!(safe_reciprocal(1e-9), 1.0);
    }

    #[test]
    fn test_scale_visibility() {
        assert!(is_scale_visible(Vec3::new(1.0, 1.0, 1.0)));
        assert!(is_scale_visible(Vec3::new(-1.0, 0.5, 2.0)));
        assert!(!is_scale_visible(Vec3::new(1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_inverse_transform_point_roundtrip() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2);
        let transform = Transform::from_position_rotation(Vec3::new(1.0, 2.0, 3.0), rotation)
            .with_scale(Vec3::new(2.0, 2.0, 2.0));

        let local = Point3::new(0.5, -1.0, 4.0);
        let world = transform.transform_point(&local);
        let back = transform.inverse_transform_point(&world);

        assert_relative_eq!(back, local, epsilon = EPSILON);
        assert_relative_eq!(world, transform.to_matrix().transform_point(&local), epsilon = EPSILON);
    }

    #[test]
    fn test_inverse_transform_point_translation_only() {
        let transform = Transform::from_position(Vec3::new(0.0, 0.0, 10.0));
        let local = transform.inverse_transform_point(&Point3::new(0.0, 0.0, 4.0));
        assert_relative_eq!(local.z, -6.0, epsilon = EPSILON);
    }

    #[test]
    fn test_inverse_transform_point_collapsed_scale_is_finite() {
        let transform = Transform::identity().with_scale(Vec3::new(1.0, 1.0, 0.0));
        let local = transform.inverse_transform_point(&Point3::new(1.0, 1.0, 5.0));
        assert!(local.z.is_finite());
        assert_relative_eq!(local.z, 5.0, epsilon = EPSILON);
    }
}
