//! Visualization of point clouds and deformation graphs
//!
//! This crate turns point clouds and their deformation graphs into a
//! retained scene tree and keeps that tree in sync as the data changes:
//! - Point clouds as point primitives with per-vertex normals and colors
//! - Graph nodes as spheres, graph edges as oriented cylinders
//! - A [`Visualizer`] that adds, removes and rebuilds renderables by cloud identity
//!
//! ```
//! use deformscope_core::{ColoredPointCloud, Point};
//! use deformscope_visualization::Visualizer;
//!
//! let cloud: ColoredPointCloud = vec![Point::at(0.0, 0.0, 0.0), Point::at(1.0, 0.0, 0.0)]
//!     .into_iter()
//!     .collect();
//!
//! let mut visualizer = Visualizer::new();
//! visualizer.add_point_cloud(&cloud);
//! assert_eq!(visualizer.scene_root().num_children(), 1);
//!
//! visualizer.remove_point_cloud(&cloud);
//! assert_eq!(visualizer.scene_root().num_children(), 0);
//! ```

pub mod builders;
pub mod config;
pub mod geometry;
pub mod scene;
pub mod shapes;
pub mod visualizer;

pub use builders::*;
pub use config::*;
pub use geometry::*;
pub use scene::*;
pub use shapes::*;
pub use visualizer::*;
