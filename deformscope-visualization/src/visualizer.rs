//! Keeps a scene root in sync with point clouds and their deformation graphs
//!
//! Rendering state lives in side tables keyed by [`CloudId`], never inside
//! the clouds themselves. An entry exists exactly while its renderable is
//! attached under the root.

use std::collections::HashMap;
use std::rc::Rc;

use deformscope_core::{CloudId, ColoredPointCloud, Result};
use tracing::debug;

use crate::builders::{build_graph_node, build_point_cloud_node};
use crate::config::VisualizerConfig;
use crate::scene::{Group, Mode, ModeValue, SceneNode};

/// Name of the group every renderable is attached to
pub const SCENE_ROOT_NAME: &str = "scene_root";

/// Scene synchronizer for point clouds and deformation graphs
///
/// Adding a cloud or graph that is already present replaces the old
/// renderable: it is detached from the root before the new one is attached,
/// so the root never holds two renderables for one key.
///
/// `update_*` rebuilds from scratch. There is no incremental diffing.
#[derive(Debug)]
pub struct Visualizer {
    scene_root: Group,
    cloud_nodes: HashMap<CloudId, Rc<SceneNode>>,
    graph_nodes: HashMap<CloudId, Rc<SceneNode>>,
    config: VisualizerConfig,
}

impl Visualizer {
    /// Create a visualizer with an empty root and default settings
    pub fn new() -> Self {
        Self::with_config(VisualizerConfig::default())
    }

    /// Create a visualizer whose renderables are built with `config`
    pub fn with_config(config: VisualizerConfig) -> Self {
        Self {
            scene_root: Group::new(SCENE_ROOT_NAME),
            cloud_nodes: HashMap::new(),
            graph_nodes: HashMap::new(),
            config,
        }
    }

    /// Settings used for every renderable built from now on
    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    /// Group every renderable is attached to
    pub fn scene_root(&self) -> &Group {
        &self.scene_root
    }

    /// Render `cloud` as points under the scene root
    pub fn add_point_cloud(&mut self, cloud: &ColoredPointCloud) -> Rc<SceneNode> {
        let node = build_point_cloud_node(cloud, &self.config);
        let node = self.scene_root.add_child(node);
        if let Some(previous) = self.cloud_nodes.insert(cloud.id(), Rc::clone(&node)) {
            self.scene_root.remove_child(&previous);
            debug!(cloud = cloud.id().as_u64(), "replaced point cloud renderable");
        }
        debug!(cloud = cloud.id().as_u64(), points = cloud.len(), "added point cloud");
        node
    }

    /// Detach the cloud's renderable; a cloud never added is ignored
    pub fn remove_point_cloud(&mut self, cloud: &ColoredPointCloud) -> Option<Rc<SceneNode>> {
        self.remove_point_cloud_by_id(cloud.id())
    }

    /// Like [`Visualizer::remove_point_cloud`], for callers that no longer
    /// hold the cloud
    pub fn remove_point_cloud_by_id(&mut self, id: CloudId) -> Option<Rc<SceneNode>> {
        let node = self.cloud_nodes.remove(&id)?;
        self.scene_root.remove_child(&node);
        debug!(cloud = id.as_u64(), "removed point cloud");
        Some(node)
    }

    /// Rebuild the cloud's renderable from its current contents
    pub fn update_point_cloud(&mut self, cloud: &ColoredPointCloud) -> Rc<SceneNode> {
        self.remove_point_cloud(cloud);
        self.add_point_cloud(cloud)
    }

    /// Render the cloud's deformation graph as spheres and cylinders
    ///
    /// On error the scene is left exactly as it was.
    pub fn add_graph(&mut self, cloud: &ColoredPointCloud) -> Result<Rc<SceneNode>> {
        let node = build_graph_node(cloud, &self.config)?;
        let node = self.scene_root.add_child(node);
        if let Some(previous) = self.graph_nodes.insert(cloud.id(), Rc::clone(&node)) {
            self.scene_root.remove_child(&previous);
            debug!(cloud = cloud.id().as_u64(), "replaced graph renderable");
        }
        debug!(
            cloud = cloud.id().as_u64(),
            nodes = cloud.deformation_graph().map_or(0, |g| g.node_count()),
            edges = cloud.deformation_graph().map_or(0, |g| g.edge_count()),
            "added deformation graph"
        );
        Ok(node)
    }

    /// Detach the cloud's graph renderable; a graph never added is ignored
    pub fn remove_graph(&mut self, cloud: &ColoredPointCloud) -> Option<Rc<SceneNode>> {
        self.remove_graph_by_id(cloud.id())
    }

    /// Like [`Visualizer::remove_graph`], for callers that no longer hold
    /// the cloud
    pub fn remove_graph_by_id(&mut self, id: CloudId) -> Option<Rc<SceneNode>> {
        let node = self.graph_nodes.remove(&id)?;
        self.scene_root.remove_child(&node);
        debug!(cloud = id.as_u64(), "removed deformation graph");
        Some(node)
    }

    /// Rebuild the graph's renderable
    ///
    /// The old renderable is removed first, so if the rebuild fails the
    /// graph is no longer shown.
    pub fn update_graph(&mut self, cloud: &ColoredPointCloud) -> Result<Rc<SceneNode>> {
        self.remove_graph(cloud);
        self.add_graph(cloud)
    }

    /// Turn lighting off for the whole scene, protected against overrides
    pub fn close_light(&mut self) {
        self.scene_root
            .state_set_mut()
            .set_mode(Mode::Lighting, ModeValue::OFF.protected());
    }

    /// Whether the cloud's points are currently attached
    pub fn contains_point_cloud(&self, cloud: &ColoredPointCloud) -> bool {
        self.cloud_nodes.contains_key(&cloud.id())
    }

    /// Whether the cloud's graph is currently attached
    pub fn contains_graph(&self, cloud: &ColoredPointCloud) -> bool {
        self.graph_nodes.contains_key(&cloud.id())
    }

    /// Renderable currently showing the cloud's points
    pub fn point_cloud_node(&self, cloud: &ColoredPointCloud) -> Option<&Rc<SceneNode>> {
        self.cloud_nodes.get(&cloud.id())
    }

    /// Renderable currently showing the cloud's graph
    pub fn graph_node(&self, cloud: &ColoredPointCloud) -> Option<&Rc<SceneNode>> {
        self.graph_nodes.get(&cloud.id())
    }

    /// Number of clouds with attached points
    pub fn point_cloud_count(&self) -> usize {
        self.cloud_nodes.len()
    }

    /// Number of clouds with an attached graph
    pub fn graph_count(&self) -> usize {
        self.graph_nodes.len()
    }

    /// Detach every renderable; render state on the root is kept
    pub fn clear(&mut self) {
        for node in self.cloud_nodes.drain().chain(self.graph_nodes.drain()).map(|(_, node)| node) {
            self.scene_root.remove_child(&node);
        }
        debug!("cleared scene");
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}
