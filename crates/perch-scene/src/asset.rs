use perch_base::AssetId;
use perch_geometry::{Ray, SquareMatrix, Transform, Vec3, transform_point, transform_vector};

use crate::graph::{Node, NodeId, SceneGraph};

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f64,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadedScene {
    pub graph: Option<SceneGraph>,
    pub clips: Vec<AnimationClip>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeshHit {
    pub mesh_index: usize,
    pub node: NodeId,
    pub distance: f64,
    pub point: Vec3,
}

#[derive(Clone, Debug)]
pub struct SceneAsset {
    id: AssetId,
    graph: SceneGraph,
    meshes: Vec<NodeId>,
    audio_emitters: Vec<NodeId>,
    clips: Vec<AnimationClip>,
    normalized_scale: f64,
    pub transform: Transform,
}

impl SceneAsset {
    pub(crate) fn new(
        graph: SceneGraph,
        meshes: Vec<NodeId>,
        audio_emitters: Vec<NodeId>,
        clips: Vec<AnimationClip>,
        normalized_scale: f64,
    ) -> Self {
        Self {
            id: AssetId::new(),
            graph,
            meshes,
            audio_emitters,
            clips,
            normalized_scale,
            transform: Transform::IDENTITY,
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn meshes(&self) -> &[NodeId] {
        &self.meshes
    }

    pub fn audio_emitters(&self) -> &[NodeId] {
        &self.audio_emitters
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    pub fn normalized_scale(&self) -> f64 {
        self.normalized_scale
    }

    pub fn mesh_node(&self, mesh_index: usize) -> Option<&Node> {
        self.graph.node(*self.meshes.get(mesh_index)?)
    }

    pub fn clip_index_by_name(&self, name: &str) -> Option<usize> {
        self.clips.iter().position(|clip| clip.name == name)
    }

    /// Nearest mesh hit by a world-space ray, including the object transform.
    /// Equal distances keep the mesh that comes first in traversal order.
    pub fn raycast(&self, ray: &Ray) -> Option<MeshHit> {
        let object = self.transform.matrix();
        let world = self.graph.world_matrices();
        let mut best: Option<MeshHit> = None;

        for (mesh_index, &node_id) in self.meshes.iter().enumerate() {
            let Some(mesh) = self.graph.node(node_id).and_then(Node::as_mesh) else {
                continue;
            };
            let Some(inverse) = (object * world[node_id.index()]).invert() else {
                continue;
            };
            let origin = transform_point(&inverse, ray.origin);
            let dir = transform_vector(&inverse, ray.direction);
            // Affine maps keep the ray parameter, so `t` is a world distance.
            let Some((t, _)) = mesh.ray_pick(origin, dir) else {
                continue;
            };
            match &best {
                Some(hit) if t >= hit.distance => {}
                _ => {
                    best = Some(MeshHit {
                        mesh_index,
                        node: node_id,
                        distance: t,
                        point: ray.at(t),
                    })
                }
            }
        }

        best
    }
}
