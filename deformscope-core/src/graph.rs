//! Deformation graph and its node-to-point mapping
//!
//! A [`DeformationGraph`] is an undirected graph over a subset of a point
//! cloud's samples. Nodes and edges are addressed by generational handles, so
//! a handle to a removed node never aliases a node added later. The
//! [`GraphMap`] ties every node to the index of the point it sits on.

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SecondaryMap, SlotMap};
use std::ops::Index;

use crate::error::{Error, Result};

new_key_type! {
    /// Handle to a node of a [`DeformationGraph`]
    pub struct NodeId;

    /// Handle to an edge of a [`DeformationGraph`]
    pub struct EdgeId;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct NodeData {
    incident: Vec<EdgeId>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct EdgeData {
    u: NodeId,
    v: NodeId,
}

/// An edge together with its two endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub id: EdgeId,
    pub u: NodeId,
    pub v: NodeId,
}

/// Undirected graph of control nodes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeformationGraph {
    nodes: SlotMap<NodeId, NodeData>,
    edges: SlotMap<EdgeId, EdgeData>,
}

impl DeformationGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with room for the given number of nodes and edges
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(nodes),
            edges: SlotMap::with_capacity_and_key(edges),
        }
    }

    pub fn add_node(&mut self) -> NodeId {
        self.nodes.insert(NodeData::default())
    }

    /// Connect two existing nodes
    ///
    /// Self loops and parallel edges are accepted.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> Result<EdgeId> {
        for node in [u, v] {
            if !self.nodes.contains_key(node) {
                return Err(Error::UnknownNode(node));
            }
        }

        let edge = self.edges.insert(EdgeData { u, v });
        self.nodes[u].incident.push(edge);
        if u != v {
            self.nodes[v].incident.push(edge);
        }
        Ok(edge)
    }

    /// Remove an edge, returning whether it existed
    pub fn remove_edge(&mut self, edge: EdgeId) -> bool {
        let Some(data) = self.edges.remove(edge) else {
            return false;
        };
        for node in [data.u, data.v] {
            if let Some(node) = self.nodes.get_mut(node) {
                node.incident.retain(|&e| e != edge);
            }
        }
        true
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, node: NodeId) -> bool {
        let Some(data) = self.nodes.remove(node) else {
            return false;
        };
        for edge in data.incident {
            self.remove_edge(edge);
        }
        true
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges.contains_key(edge)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every live node exactly once
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys()
    }

    /// Iterate over every live edge exactly once
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges
            .iter()
            .map(|(id, data)| Edge { id, u: data.u, v: data.v })
    }

    pub fn endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        self.edges.get(edge).map(|data| (data.u, data.v))
    }

    /// First endpoint of an edge
    pub fn u(&self, edge: EdgeId) -> Option<NodeId> {
        self.endpoints(edge).map(|(u, _)| u)
    }

    /// Second endpoint of an edge
    pub fn v(&self, edge: EdgeId) -> Option<NodeId> {
        self.endpoints(edge).map(|(_, v)| v)
    }

    /// Nodes adjacent to `node`, once per connecting edge
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|data| data.incident.iter())
            .filter_map(move |&edge| {
                let (u, v) = self.endpoints(edge)?;
                Some(if u == node { v } else { u })
            })
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.nodes.get(node).map_or(0, |data| data.incident.len())
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}

/// Mapping from graph node to the index of its point in the owning cloud
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphMap {
    indices: SecondaryMap<NodeId, usize>,
}

impl GraphMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `node` with a point index, returning the previous index
    pub fn insert(&mut self, node: NodeId, index: usize) -> Option<usize> {
        self.indices.insert(node, index)
    }

    pub fn get(&self, node: NodeId) -> Option<usize> {
        self.indices.get(node).copied()
    }

    pub fn remove(&mut self, node: NodeId) -> Option<usize> {
        self.indices.remove(node)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, usize)> + '_ {
        self.indices.iter().map(|(node, &index)| (node, index))
    }
}

impl Index<NodeId> for GraphMap {
    type Output = usize;

    fn index(&self, node: NodeId) -> &Self::Output {
        &self.indices[node]
    }
}

impl FromIterator<(NodeId, usize)> for GraphMap {
    fn from_iter<I: IntoIterator<Item = (NodeId, usize)>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

impl Extend<(NodeId, usize)> for GraphMap {
    fn extend<I: IntoIterator<Item = (NodeId, usize)>>(&mut self, iter: I) {
        self.indices.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> (DeformationGraph, [NodeId; 3]) {
        let mut graph = DeformationGraph::new();
        let a = graph.add_node();
        let b = graph.add_node();
        let c = graph.add_node();
        graph.add_edge(a, b).unwrap();
        graph.add_edge(b, c).unwrap();
        graph.add_edge(c, a).unwrap();
        (graph, [a, b, c])
    }

    #[test]
    fn test_iteration_is_exhaustive() {
        let (graph, nodes) = triangle();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);

        let visited: Vec<NodeId> = graph.nodes().collect();
        assert_eq!(visited.len(), 3);
        for node in nodes {
            assert!(visited.contains(&node));
        }
        assert_eq!(graph.edges().count(), 3);
    }

    #[test]
    fn test_edge_endpoints() {
        let mut graph = DeformationGraph::new();
        let a = graph.add_node();
        let b = graph.add_node();
        let edge = graph.add_edge(a, b).unwrap();

        assert_eq!(graph.endpoints(edge), Some((a, b)));
        assert_eq!(graph.u(edge), Some(a));
        assert_eq!(graph.v(edge), Some(b));
    }

    #[test]
    fn test_add_edge_unknown_node() {
        let mut graph = DeformationGraph::new();
        let a = graph.add_node();
        let b = graph.add_node();
        graph.remove_node(b);

        assert_eq!(graph.add_edge(a, b), Err(Error::UnknownNode(b)));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_remove_node_drops_incident_edges() {
        let (mut graph, [a, b, c]) = triangle();
        assert!(graph.remove_node(b));

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degree(a), 1);
        assert_eq!(graph.neighbors(a).collect::<Vec<_>>(), vec![c]);
        assert!(!graph.remove_node(b));
    }

    #[test]
    fn test_self_loop() {
        let mut graph = DeformationGraph::new();
        let a = graph.add_node();
        let edge = graph.add_edge(a, a).unwrap();
        assert_eq!(graph.degree(a), 1);
        assert!(graph.remove_edge(edge));
        assert_eq!(graph.degree(a), 0);
    }

    #[test]
    fn test_graph_map() {
        let (graph, [a, b, c]) = triangle();
        let mut map: GraphMap = graph.nodes().zip([4, 7, 9]).collect();

        assert_eq!(map.len(), 3);
        assert_eq!(map[a], 4);
        assert_eq!(map.get(b), Some(7));
        assert_eq!(map.insert(c, 2), Some(9));
        assert_eq!(map.remove(a), Some(4));
        assert_eq!(map.get(a), None);
    }
}
