//! Error types for deformscope

use thiserror::Error;

use crate::graph::NodeId;

/// Main error type for deformscope operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Point cloud has no deformation graph")]
    MissingDeformationGraph,

    #[error("Point cloud has no graph map")]
    MissingGraphMap,

    #[error("Graph node {0:?} has no entry in the graph map")]
    UnmappedNode(NodeId),

    #[error("Graph node {0:?} does not exist")]
    UnknownNode(NodeId),

    #[error("Point index {index} out of range for cloud of {len} points")]
    PointIndexOutOfRange { index: usize, len: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for deformscope operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_capitalized() {
        let errors = [
            Error::MissingDeformationGraph,
            Error::MissingGraphMap,
            Error::UnknownNode(NodeId::default()),
            Error::UnmappedNode(NodeId::default()),
            Error::PointIndexOutOfRange { index: 4, len: 2 },
            Error::Config("point_size must be positive".to_string()),
        ];
        for error in errors {
            let message = error.to_string();
            assert!(message.starts_with(char::is_uppercase), "{message}");
        }
        assert_eq!(
            Error::PointIndexOutOfRange { index: 4, len: 2 }.to_string(),
            "Point index 4 out of range for cloud of 2 points"
        );
    }
}
