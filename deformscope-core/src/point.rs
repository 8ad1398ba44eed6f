//! Point types and related functionality

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use bytemuck::{Pod, Zeroable};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// An 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB channels
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Channels mapped to `[0, 1]` by dividing by 255
    pub fn to_normalized(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

/// A surface sample: position, normal and color
///
/// The normal is expected to be unit length but this is not validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Point {
    pub position: Point3f,
    pub normal: Vector3f,
    pub color: Rgba,
}

unsafe impl Pod for Point {}
unsafe impl Zeroable for Point {}

impl Point {
    pub fn new(position: Point3f, normal: Vector3f, color: Rgba) -> Self {
        Self { position, normal, color }
    }

    /// A white point at `(x, y, z)` with a +Z normal
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3f::new(x, y, z),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn with_normal(mut self, normal: Vector3f) -> Self {
        self.normal = normal;
        self
    }
}

impl Default for Point {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            normal: Vector3f::new(0.0, 0.0, 1.0),
            color: Rgba::WHITE,
        }
    }
}

impl From<Point> for Point3f {
    fn from(point: Point) -> Self {
        point.position
    }
}

impl From<Point3f> for Point {
    fn from(position: Point3f) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_color_normalization() {
        let [r, g, b, a] = Rgba::new(255, 0, 51, 128).to_normalized();
        assert_relative_eq!(r, 1.0);
        assert_relative_eq!(g, 0.0);
        assert_relative_eq!(b, 0.2);
        assert_relative_eq!(a, 128.0 / 255.0);
    }

    #[test]
    fn test_point_defaults() {
        let point = Point::at(1.0, 2.0, 3.0);
        assert_eq!(point.position, Point3f::new(1.0, 2.0, 3.0));
        assert_eq!(point.normal, Vector3f::z());
        assert_eq!(point.color, Rgba::WHITE);
    }

    #[test]
    fn test_point_is_plain_data() {
        assert_eq!(std::mem::size_of::<Point>(), 28);
        let point = Point::at(1.0, 0.0, 0.0).with_color(Rgba::opaque(1, 2, 3));
        let bytes = bytemuck::bytes_of(&point);
        assert_eq!(&bytes[24..], &[1, 2, 3, 255]);
    }
}
