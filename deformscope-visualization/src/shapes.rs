//! Sphere and cylinder primitives for deformation graph rendering
//!
//! Cylinders follow the usual scene-graph convention: before rotation they
//! extend along +Z, centered on their `center`, spanning `height`. Orienting
//! one along an arbitrary segment means rotating +Z onto the segment
//! direction, which [`segment_rotation`] computes.

use std::f32::consts::PI;

use nalgebra::{Isometry3, Matrix4, Translation3, Unit, UnitQuaternion};

use deformscope_core::{Drawable, Point3f, Vector3f};

/// Axis a cylinder extends along before it is rotated
pub fn canonical_axis() -> Vector3f {
    Vector3f::z()
}

/// Rotation taking the canonical +Z axis onto `direction`
///
/// The axis is `z × direction` and the angle `acos(z · direction / |direction|)`.
/// A zero-length direction yields the identity. A direction pointing along -Z
/// has no unique rotation axis and is rotated by π about +X.
pub fn segment_rotation(direction: &Vector3f) -> UnitQuaternion<f32> {
    let length = direction.norm();
    if length <= f32::EPSILON {
        return UnitQuaternion::identity();
    }

    let z = canonical_axis();
    let cos_angle = (z.dot(direction) / length).clamp(-1.0, 1.0);
    let angle = cos_angle.acos();

    match Unit::try_new(z.cross(direction), length * 1.0e-6) {
        Some(axis) => UnitQuaternion::from_axis_angle(&axis, angle),
        None if cos_angle < 0.0 => UnitQuaternion::from_axis_angle(&Vector3f::x_axis(), PI),
        None => UnitQuaternion::identity(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point3f,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Point3f, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.center.coords) * Matrix4::new_scaling(self.radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    pub center: Point3f,
    pub radius: f32,
    pub height: f32,
    pub rotation: UnitQuaternion<f32>,
}

impl Cylinder {
    /// An unrotated cylinder along +Z
    pub fn new(center: Point3f, radius: f32, height: f32) -> Self {
        Self {
            center,
            radius,
            height,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// A cylinder spanning the segment from `source` to `target`
    ///
    /// Coincident endpoints give a zero-height, unrotated cylinder.
    pub fn between(source: &Point3f, target: &Point3f, radius: f32) -> Self {
        let diff = target - source;
        Self {
            center: nalgebra::center(source, target),
            radius,
            height: diff.norm(),
            rotation: segment_rotation(&diff),
        }
    }

    pub fn with_rotation(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Direction of the cylinder's axis after rotation
    pub fn axis(&self) -> Vector3f {
        self.rotation * canonical_axis()
    }

    /// Centers of the two caps
    pub fn endpoints(&self) -> (Point3f, Point3f) {
        let half = self.axis() * (self.height / 2.0);
        (self.center - half, self.center + half)
    }

    pub fn is_degenerate(&self) -> bool {
        self.height <= f32::EPSILON
    }

    /// Maps the unit cylinder (radius 1, height 1, centered at the origin)
    /// onto this one
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let placement = Isometry3::from_parts(Translation3::from(self.center.coords), self.rotation);
        placement.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&Vector3f::new(self.radius, self.radius, self.height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Cylinder(Cylinder),
}

impl Shape {
    pub fn model_matrix(&self) -> Matrix4<f32> {
        match self {
            Shape::Sphere(sphere) => sphere.model_matrix(),
            Shape::Cylinder(cylinder) => cylinder.model_matrix(),
        }
    }
}

impl Drawable for Shape {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        match self {
            Shape::Sphere(sphere) => {
                let r = Vector3f::repeat(sphere.radius);
                (sphere.center - r, sphere.center + r)
            }
            // Conservative: the caps' centers padded by the radius
            Shape::Cylinder(cylinder) => {
                let (a, b) = cylinder.endpoints();
                let r = Vector3f::repeat(cylinder.radius);
                (a.inf(&b) - r, a.sup(&b) + r)
            }
        }
    }
}

/// A shape drawn in a flat color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDrawable {
    pub shape: Shape,
    pub color: [f32; 4],
}

impl ShapeDrawable {
    pub fn new(shape: Shape, color: [f32; 4]) -> Self {
        Self { shape, color }
    }

    pub fn as_sphere(&self) -> Option<&Sphere> {
        match &self.shape {
            Shape::Sphere(sphere) => Some(sphere),
            Shape::Cylinder(_) => None,
        }
    }

    pub fn as_cylinder(&self) -> Option<&Cylinder> {
        match &self.shape {
            Shape::Cylinder(cylinder) => Some(cylinder),
            Shape::Sphere(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_cylinder_along_z() {
        let cylinder = Cylinder::between(&Point3f::origin(), &Point3f::new(0.0, 0.0, 4.0), 0.2);

        assert_relative_eq!(cylinder.center, Point3f::new(0.0, 0.0, 2.0));
        assert_relative_eq!(cylinder.height, 4.0);
        assert_relative_eq!(cylinder.radius, 0.2);
        assert!(cylinder.rotation.axis_angle().is_none());
        assert_relative_eq!(cylinder.rotation.angle(), 0.0);
    }

    #[test]
    fn test_cylinder_along_x() {
        let cylinder = Cylinder::between(&Point3f::origin(), &Point3f::new(4.0, 0.0, 0.0), 0.2);

        assert_relative_eq!(cylinder.center, Point3f::new(2.0, 0.0, 0.0));
        assert_relative_eq!(cylinder.height, 4.0);

        let (axis, angle) = cylinder.rotation.axis_angle().unwrap();
        assert_relative_eq!(angle, FRAC_PI_2, epsilon = 1e-6);
        assert_relative_eq!(axis.into_inner(), Vector3f::y(), epsilon = 1e-6);
        assert_relative_eq!(cylinder.axis(), Vector3f::x(), epsilon = 1e-6);
    }

    #[test]
    fn test_cylinder_spans_segment() {
        let source = Point3f::new(1.0, -2.0, 0.5);
        let target = Point3f::new(-3.0, 4.0, 2.0);
        let cylinder = Cylinder::between(&source, &target, 0.2);

        let (a, b) = cylinder.endpoints();
        assert_relative_eq!(a, source, epsilon = 1e-5);
        assert_relative_eq!(b, target, epsilon = 1e-5);

        let top = cylinder.model_matrix().transform_point(&Point3f::new(0.0, 0.0, 0.5));
        assert_relative_eq!(top, target, epsilon = 1e-5);
    }

    #[test]
    fn test_cylinder_against_z() {
        let cylinder = Cylinder::between(&Point3f::new(0.0, 0.0, 4.0), &Point3f::origin(), 0.2);

        assert_relative_eq!(cylinder.axis(), -Vector3f::z(), epsilon = 1e-6);
        assert_relative_eq!(cylinder.rotation.angle(), PI, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_length_edge_is_identity() {
        let p = Point3f::new(1.0, 1.0, 1.0);
        let cylinder = Cylinder::between(&p, &p, 0.2);

        assert!(cylinder.is_degenerate());
        assert_eq!(cylinder.height, 0.0);
        assert_eq!(cylinder.center, p);
        assert_eq!(cylinder.rotation, UnitQuaternion::identity());
        assert!(cylinder.model_matrix().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_shape_bounds() {
        let sphere = Shape::Sphere(Sphere::new(Point3f::new(1.0, 2.0, 3.0), 1.0));
        let (min, max) = sphere.bounding_box();
        assert_eq!(min, Point3f::new(0.0, 1.0, 2.0));
        assert_eq!(max, Point3f::new(2.0, 3.0, 4.0));

        let cylinder = Shape::Cylinder(Cylinder::new(Point3f::origin(), 0.5, 2.0));
        let (min, max) = cylinder.bounding_box();
        assert_relative_eq!(min, Point3f::new(-0.5, -0.5, -1.5));
        assert_relative_eq!(max, Point3f::new(0.5, 0.5, 1.5));
    }
}
