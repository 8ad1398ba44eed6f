//! Rendering parameters for the visualizer

use deformscope_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::geometry::BufferUsage;

/// Tan used for graph nodes and edges
pub const GRAPH_COLOR: [f32; 4] = [0.8, 0.8, 0.4, 1.0];

/// Sizes and colors used when building renderables
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```
/// use deformscope_visualization::VisualizerConfig;
///
/// let config = VisualizerConfig::from_toml_str("edge_radius = 0.5").unwrap();
/// assert_eq!(config.edge_radius, 0.5);
/// assert_eq!(config.point_size, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Rasterized size of cloud points
    pub point_size: f32,
    /// Radius of the sphere drawn at each graph node
    pub node_radius: f32,
    /// Radius of the cylinder drawn along each graph edge
    pub edge_radius: f32,
    pub node_color: [f32; 4],
    pub edge_color: [f32; 4],
    /// Keep cloud vertices in a vertex buffer object instead of client memory
    pub use_vertex_buffers: bool,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            point_size: 2.0,
            node_radius: 1.0,
            edge_radius: 0.2,
            node_color: GRAPH_COLOR,
            edge_color: GRAPH_COLOR,
            use_vertex_buffers: true,
        }
    }
}

impl VisualizerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Reject sizes that would produce invisible or inverted primitives
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("point_size", self.point_size),
            ("node_radius", self.node_radius),
            ("edge_radius", self.edge_radius),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!("{name} must be positive, got {value}")));
            }
        }

        for (name, color) in [("node_color", self.node_color), ("edge_color", self.edge_color)] {
            if color.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(Error::Config(format!("{name} channels must lie in [0, 1]")));
            }
        }
        Ok(())
    }

    pub fn buffer_usage(&self) -> BufferUsage {
        if self.use_vertex_buffers {
            BufferUsage::VertexBuffer
        } else {
            BufferUsage::ClientMemory
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = VisualizerConfig::default();
        assert_eq!(config.point_size, 2.0);
        assert_eq!(config.node_radius, 1.0);
        assert_eq!(config.edge_radius, 0.2);
        assert_eq!(config.node_color, [0.8, 0.8, 0.4, 1.0]);
        assert_eq!(config.edge_color, config.node_color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = VisualizerConfig {
            point_size: 4.0,
            use_vertex_buffers: false,
            ..VisualizerConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(VisualizerConfig::from_toml_str(&text).unwrap(), config);
        assert_eq!(config.buffer_usage(), BufferUsage::ClientMemory);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(matches!(
            VisualizerConfig::from_toml_str("node_radius = -1.0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            VisualizerConfig::from_toml_str("edge_color = [2.0, 0.0, 0.0, 1.0]"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            VisualizerConfig::from_toml_str("point_size = \"big\""),
            Err(Error::Config(_))
        ));
    }
}
