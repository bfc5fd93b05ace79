use perch_base::LoadError;
use perch_geometry::{Quat, Transform, Vec3};
use perch_scene::{AnimationClip, AudioSource, LoadedScene, Node, NodeId, SceneGraph, TriMesh};
use serde::{Deserialize, Serialize};

use crate::format::AssetFormat;
use crate::registry::AssetLoader;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub clips: Vec<ClipDocument>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeDocument {
    pub name: String,
    #[serde(default)]
    pub parent: Option<usize>,
    #[serde(default)]
    pub translation: Option<[f64; 3]>,
    /// `[w, x, y, z]`
    #[serde(default)]
    pub rotation: Option<[f64; 4]>,
    #[serde(default)]
    pub scale: Option<[f64; 3]>,
    #[serde(default)]
    pub mesh: Option<MeshDocument>,
    #[serde(default)]
    pub audio: Option<AudioDocument>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MeshDocument {
    pub positions: Vec<[f64; 3]>,
    pub faces: Vec<Vec<usize>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AudioDocument {
    pub uri: String,
    #[serde(default)]
    pub looping: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClipDocument {
    pub name: String,
    pub duration: f64,
}

impl NodeDocument {
    fn transform(&self) -> Transform {
        let mut transform = Transform::IDENTITY;
        if let Some(t) = self.translation {
            transform.translation = Vec3::from(t);
        }
        if let Some([w, x, y, z]) = self.rotation {
            transform.rotation = Quat::new(w, x, y, z);
        }
        if let Some(s) = self.scale {
            transform.scale = Vec3::from(s);
        }
        transform
    }

    fn to_node(&self, index: usize) -> Result<Node, LoadError> {
        if self.mesh.is_some() && self.audio.is_some() {
            return Err(LoadError::Malformed(format!(
                "node {index} ({}) declares both mesh and audio",
                self.name
            )));
        }
        let node = if let Some(mesh) = &self.mesh {
            let positions = mesh.positions.iter().copied().map(Vec3::from).collect();
            let mesh = TriMesh::from_polygons(positions, &mesh.faces).map_err(|err| {
                LoadError::Malformed(format!("node {index} ({}): {err}", self.name))
            })?;
            Node::mesh(self.name.clone(), mesh)
        } else if let Some(audio) = &self.audio {
            Node::audio(
                self.name.clone(),
                AudioSource {
                    uri: audio.uri.clone(),
                    looping: audio.looping,
                },
            )
        } else {
            Node::group(self.name.clone())
        };
        Ok(node.with_transform(self.transform()))
    }
}

impl SceneDocument {
    pub fn from_slice(data: &[u8]) -> Result<Self, LoadError> {
        serde_json::from_slice(data).map_err(|err| LoadError::Malformed(err.to_string()))
    }

    pub fn into_scene(self) -> Result<LoadedScene, LoadError> {
        let clips = self
            .clips
            .iter()
            .map(|clip| {
                if !(clip.duration >= 0.0) {
                    return Err(LoadError::Malformed(format!(
                        "clip {} has invalid duration {}",
                        clip.name, clip.duration
                    )));
                }
                Ok(AnimationClip::new(clip.name.clone(), clip.duration))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut nodes = self.nodes.iter().enumerate();
        let Some((_, root_doc)) = nodes.next() else {
            return Ok(LoadedScene { graph: None, clips });
        };
        if root_doc.parent.is_some() {
            return Err(LoadError::Malformed(
                "the first node is the root and cannot have a parent".to_string(),
            ));
        }

        let mut graph = SceneGraph::new(root_doc.to_node(0)?);
        let mut ids: Vec<NodeId> = vec![graph.root()];
        for (index, doc) in nodes {
            let parent = match doc.parent {
                Some(parent) if parent < index => ids[parent],
                Some(parent) => {
                    return Err(LoadError::Malformed(format!(
                        "node {index} ({}) references parent {parent} that is not declared before it",
                        doc.name
                    )));
                }
                None => {
                    return Err(LoadError::Malformed(format!(
                        "node {index} ({}) has no parent; only the first node may be the root",
                        doc.name
                    )));
                }
            };
            let id = graph
                .add_child(parent, doc.to_node(index)?)
                .map_err(|err| LoadError::Malformed(err.to_string()))?;
            ids.push(id);
        }

        Ok(LoadedScene {
            graph: Some(graph),
            clips,
        })
    }
}

pub struct JsonSceneLoader;

impl AssetLoader for JsonSceneLoader {
    fn formats(&self) -> &[AssetFormat] {
        &[AssetFormat::SceneJson]
    }

    fn load(&self, data: &[u8]) -> Result<LoadedScene, LoadError> {
        SceneDocument::from_slice(data)?.into_scene()
    }
}
