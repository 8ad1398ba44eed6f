//! Point cloud data structures and functionality

use crate::error::{Error, Result};
use crate::graph::{DeformationGraph, GraphMap, NodeId};
use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CLOUD_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a point cloud
///
/// Every cloud receives a fresh id when it is created, cloned or
/// deserialized, so two live clouds never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CloudId(u64);

impl CloudId {
    fn fresh() -> Self {
        Self(NEXT_CLOUD_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A deformation graph together with the map placing its nodes on points
///
/// The two are stored as one value, so a cloud has either both or neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Deformation {
    graph: DeformationGraph,
    map: GraphMap,
}

/// A generic point cloud container
///
/// Besides its points, a cloud may own a deformation graph and the map that
/// places each graph node on one of the cloud's points.
#[derive(Debug, Serialize, Deserialize)]
pub struct PointCloud<T> {
    pub points: Vec<T>,
    #[serde(skip, default = "CloudId::fresh")]
    id: CloudId,
    #[serde(default)]
    deformation: Option<Deformation>,
}

/// A point cloud with positions, normals and colors
pub type ColoredPointCloud = PointCloud<Point>;

impl<T> PointCloud<T> {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self::from_points(Vec::new())
    }

    /// Create a new point cloud with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_points(Vec::with_capacity(capacity))
    }

    /// Create a point cloud from a vector of points
    pub fn from_points(points: Vec<T>) -> Self {
        Self {
            points,
            id: CloudId::fresh(),
            deformation: None,
        }
    }

    /// Identity used to track this cloud's renderables
    pub fn id(&self) -> CloudId {
        self.id
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point to the cloud
    pub fn push(&mut self, point: T) {
        self.points.push(point);
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.points.get(index)
    }

    /// Get an iterator over the points
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.points.iter()
    }

    /// Get a mutable iterator over the points
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.points.iter_mut()
    }

    /// Clear all points from the cloud
    ///
    /// The deformation graph is kept; its map may now point past the end.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Attach a deformation graph and its node-to-point map
    pub fn set_deformation(&mut self, graph: DeformationGraph, graph_map: GraphMap) {
        self.deformation = Some(Deformation {
            graph,
            map: graph_map,
        });
    }

    /// Detach and return the deformation graph and its map
    pub fn take_deformation(&mut self) -> Option<(DeformationGraph, GraphMap)> {
        self.deformation
            .take()
            .map(|Deformation { graph, map }| (graph, map))
    }

    pub fn clear_deformation(&mut self) {
        self.deformation = None;
    }

    pub fn has_deformation(&self) -> bool {
        self.deformation.is_some()
    }

    pub fn deformation_graph(&self) -> Option<&DeformationGraph> {
        self.deformation.as_ref().map(|d| &d.graph)
    }

    pub fn deformation_graph_mut(&mut self) -> Option<&mut DeformationGraph> {
        self.deformation.as_mut().map(|d| &mut d.graph)
    }

    pub fn graph_map(&self) -> Option<&GraphMap> {
        self.deformation.as_ref().map(|d| &d.map)
    }

    pub fn graph_map_mut(&mut self) -> Option<&mut GraphMap> {
        self.deformation.as_mut().map(|d| &mut d.map)
    }

    /// Resolve a graph node to the point it sits on
    pub fn point_for_node(&self, node: NodeId) -> Result<&T> {
        let map = self.graph_map().ok_or(Error::MissingGraphMap)?;
        let index = map.get(node).ok_or(Error::UnmappedNode(node))?;
        self.points.get(index).ok_or(Error::PointIndexOutOfRange {
            index,
            len: self.points.len(),
        })
    }
}

impl<T: Clone> Clone for PointCloud<T> {
    fn clone(&self) -> Self {
        Self {
            points: self.points.clone(),
            id: CloudId::fresh(),
            deformation: self.deformation.clone(),
        }
    }
}

impl<T> Default for PointCloud<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for PointCloud<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<T> IndexMut<usize> for PointCloud<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.points[index]
    }
}

impl<T> IntoIterator for PointCloud<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PointCloud<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut PointCloud<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter_mut()
    }
}

impl<T> Extend<T> for PointCloud<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl<T> FromIterator<T> for PointCloud<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_points(Vec::from_iter(iter))
    }
}
