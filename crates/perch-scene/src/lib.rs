use thiserror::Error;

mod asset;
mod graph;
mod mesh;
mod normalize;

pub use asset::{AnimationClip, LoadedScene, MeshHit, SceneAsset};
pub use graph::{AudioSource, Node, NodeId, NodeKind, SceneGraph};
pub use mesh::TriMesh;
pub use normalize::{SceneNormalizer, normalized_scale};

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

pub type Result<T> = std::result::Result<T, Error>;
