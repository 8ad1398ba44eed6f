//! Point primitive geometry backed by a vertex buffer

use bytemuck::{Pod, Zeroable};
use deformscope_core::{Point, Point3f, Vector3f};

use crate::scene::StateSet;

/// Vertex data for point cloud rendering
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

/// Component type and count of one vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    Float32x3,
    Float32x4,
}

/// One attribute of the interleaved vertex layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub offset: usize,
    pub shader_location: u32,
    pub format: VertexFormat,
}

impl PointVertex {
    /// Create a vertex from a colored point, normalizing the color to `[0, 1]`
    pub fn from_point(point: &Point) -> Self {
        Self {
            position: point.position.coords.into(),
            normal: point.normal.into(),
            color: point.color.to_normalized(),
        }
    }

    pub fn position(&self) -> Point3f {
        Point3f::from(self.position)
    }

    pub fn normal(&self) -> Vector3f {
        Vector3f::from(self.normal)
    }

    /// Interleaved layout: position, normal, color
    pub fn layout() -> [VertexAttribute; 3] {
        const VEC3: usize = std::mem::size_of::<[f32; 3]>();
        [
            VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: VertexFormat::Float32x3,
            },
            VertexAttribute {
                offset: VEC3,
                shader_location: 1,
                format: VertexFormat::Float32x3,
            },
            VertexAttribute {
                offset: 2 * VEC3,
                shader_location: 2,
                format: VertexFormat::Float32x4,
            },
        ]
    }

    pub const fn stride() -> usize {
        std::mem::size_of::<Self>()
    }
}

/// A draw command over a contiguous range of vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveSet {
    Points { first: usize, count: usize },
}

impl PrimitiveSet {
    pub fn vertex_count(&self) -> usize {
        match *self {
            PrimitiveSet::Points { count, .. } => count,
        }
    }
}

/// Vertex storage hint for the rendering backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Upload once into a vertex buffer object and redraw from it
    VertexBuffer,
    /// Stream from client memory on every draw
    ClientMemory,
}

/// Unconnected points with per-vertex normals and colors
#[derive(Debug, Clone, PartialEq)]
pub struct PointGeometry {
    vertices: Vec<PointVertex>,
    primitive_sets: Vec<PrimitiveSet>,
    state_set: StateSet,
    usage: BufferUsage,
}

impl PointGeometry {
    /// Build geometry with one vertex per point, in iteration order
    ///
    /// A single point primitive set covers every vertex.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let vertices: Vec<PointVertex> = points.into_iter().map(PointVertex::from_point).collect();
        let count = vertices.len();
        Self {
            vertices,
            primitive_sets: vec![PrimitiveSet::Points { first: 0, count }],
            state_set: StateSet::new(),
            usage: BufferUsage::VertexBuffer,
        }
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.state_set.set_point_size(size);
        self
    }

    pub fn with_usage(mut self, usage: BufferUsage) -> Self {
        self.usage = usage;
        self
    }

    pub fn vertices(&self) -> &[PointVertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn primitive_sets(&self) -> &[PrimitiveSet] {
        &self.primitive_sets
    }

    pub fn state_set(&self) -> &StateSet {
        &self.state_set
    }

    pub fn point_size(&self) -> Option<f32> {
        self.state_set.point_size()
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Raw interleaved vertex bytes ready for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use deformscope_core::Rgba;

    #[test]
    fn test_vertex_from_point() {
        let point = Point::new(
            Point3f::new(1.0, 2.0, 3.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Rgba::new(255, 0, 51, 255),
        );
        let vertex = PointVertex::from_point(&point);

        assert_eq!(vertex.position, [1.0, 2.0, 3.0]);
        assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        assert_relative_eq!(vertex.color[0], 1.0);
        assert_relative_eq!(vertex.color[1], 0.0);
        assert_relative_eq!(vertex.color[2], 0.2);
        assert_relative_eq!(vertex.color[3], 1.0);
    }

    #[test]
    fn test_layout_matches_struct() {
        let layout = PointVertex::layout();
        assert_eq!(PointVertex::stride(), 40);
        assert_eq!(layout[1].offset, 12);
        assert_eq!(layout[2].offset, 24);
        assert_eq!(layout[2].format, VertexFormat::Float32x4);
    }

    #[test]
    fn test_geometry_covers_all_vertices() {
        let points = vec![Point::at(0.0, 0.0, 0.0), Point::at(1.0, 0.0, 0.0), Point::at(2.0, 0.0, 0.0)];
        let geometry = PointGeometry::from_points(&points).with_point_size(2.0);

        assert_eq!(geometry.vertex_count(), 3);
        assert_eq!(geometry.primitive_sets(), &[PrimitiveSet::Points { first: 0, count: 3 }]);
        assert_eq!(geometry.point_size(), Some(2.0));
        assert_eq!(geometry.usage(), BufferUsage::VertexBuffer);
        assert_eq!(geometry.as_bytes().len(), 3 * PointVertex::stride());
    }

    #[test]
    fn test_empty_geometry() {
        let geometry = PointGeometry::from_points(&Vec::<Point>::new());
        assert_eq!(geometry.vertex_count(), 0);
        assert_eq!(geometry.primitive_sets()[0].vertex_count(), 0);
        assert!(geometry.as_bytes().is_empty());
    }
}
