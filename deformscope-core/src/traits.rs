//! Core traits for deformscope

use crate::point::Point3f;
use crate::point_cloud::PointCloud;

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the axis-aligned bounding box of the object as `(min, max)`
    ///
    /// Empty objects report a degenerate box at the origin.
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        nalgebra::center(&min, &max)
    }
}

/// Grow `(min, max)` to contain `p`
pub fn expand_bounds(bounds: Option<(Point3f, Point3f)>, p: Point3f) -> (Point3f, Point3f) {
    match bounds {
        None => (p, p),
        Some((min, max)) => (min.inf(&p), max.sup(&p)),
    }
}

impl<T> Drawable for PointCloud<T>
where
    T: Clone + Copy,
    Point3f: From<T>,
{
    fn bounding_box(&self) -> (Point3f, Point3f) {
        self.points
            .iter()
            .map(|&p| Point3f::from(p))
            .fold(None, |bounds, p| Some(expand_bounds(bounds, p)))
            .unwrap_or((Point3f::origin(), Point3f::origin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    #[test]
    fn test_cloud_bounds() {
        let cloud: PointCloud<Point> = [
            Point::at(-1.0, 2.0, 0.0),
            Point::at(3.0, -2.0, 1.0),
            Point::at(0.0, 0.0, 5.0),
        ]
        .into_iter()
        .collect();

        let (min, max) = cloud.bounding_box();
        assert_eq!(min, Point3f::new(-1.0, -2.0, 0.0));
        assert_eq!(max, Point3f::new(3.0, 2.0, 5.0));
        assert_eq!(cloud.center(), Point3f::new(1.0, 0.0, 2.5));
    }

    #[test]
    fn test_empty_bounds() {
        let cloud: PointCloud<Point> = PointCloud::new();
        assert_eq!(cloud.bounding_box(), (Point3f::origin(), Point3f::origin()));
    }
}
