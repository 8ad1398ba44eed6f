//! Translation of point clouds and deformation graphs into scene subtrees

use deformscope_core::{ColoredPointCloud, Error, Result};
use tracing::warn;

use crate::config::VisualizerConfig;
use crate::geometry::PointGeometry;
use crate::scene::{Geode, Group, Primitive, SceneNode};
use crate::shapes::{Cylinder, Shape, ShapeDrawable, Sphere};

/// Name of the leaf holding a cloud's point geometry
pub const CLOUD_NODE_NAME: &str = "point_cloud";
/// Name of the group holding a graph's node and edge groups
pub const GRAPH_NODE_NAME: &str = "deformation_graph";
/// Child group with one sphere per graph node
pub const NODES_GROUP_NAME: &str = "nodes";
/// Child group with one cylinder per graph edge
pub const EDGES_GROUP_NAME: &str = "edges";

/// Build the leaf rendering every point of `cloud` in index order
pub fn build_point_cloud_node(cloud: &ColoredPointCloud, config: &VisualizerConfig) -> SceneNode {
    let geometry = PointGeometry::from_points(cloud.iter())
        .with_point_size(config.point_size)
        .with_usage(config.buffer_usage());

    Geode::new(CLOUD_NODE_NAME)
        .with_primitive(Primitive::Points(geometry))
        .into()
}

/// Build the `nodes`/`edges` subtree for the cloud's deformation graph
///
/// Fails without touching anything if the cloud has no deformation, or if a
/// node cannot be resolved to one of the cloud's points.
pub fn build_graph_node(cloud: &ColoredPointCloud, config: &VisualizerConfig) -> Result<SceneNode> {
    let graph = cloud.deformation_graph().ok_or(Error::MissingDeformationGraph)?;

    let mut nodes = Group::new(NODES_GROUP_NAME);
    for node in graph.nodes() {
        let point = cloud.point_for_node(node)?;
        let sphere = Sphere::new(point.position, config.node_radius);
        nodes.add_child(
            Geode::new("node").with_primitive(Primitive::Shape(ShapeDrawable::new(
                Shape::Sphere(sphere),
                config.node_color,
            ))),
        );
    }

    let mut edges = Group::new(EDGES_GROUP_NAME);
    for edge in graph.edges() {
        let source = cloud.point_for_node(edge.u)?;
        let target = cloud.point_for_node(edge.v)?;
        let cylinder = Cylinder::between(&source.position, &target.position, config.edge_radius);
        if cylinder.is_degenerate() {
            warn!(edge = ?edge.id, "graph edge has coincident endpoints, drawing it unrotated");
        }
        edges.add_child(
            Geode::new("edge").with_primitive(Primitive::Shape(ShapeDrawable::new(
                Shape::Cylinder(cylinder),
                config.edge_color,
            ))),
        );
    }

    let mut root = Group::new(GRAPH_NODE_NAME);
    root.add_child(nodes);
    root.add_child(edges);
    Ok(root.into())
}
