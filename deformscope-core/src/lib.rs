//! Core data structures and traits for deformscope
//!
//! This crate provides the data the visualizer consumes: colored points with
//! normals, point clouds that may carry a deformation graph, and the graph
//! itself together with its node-to-point mapping.

pub mod point;
pub mod point_cloud;
pub mod graph;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use graph::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix4, UnitQuaternion};
