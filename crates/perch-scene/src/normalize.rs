use perch_base::DEFAULT_CANONICAL_SIZE;
use perch_geometry::{Aabb, vec3};
use tracing::debug;

use crate::asset::{LoadedScene, SceneAsset};
use crate::graph::{NodeKind, SceneGraph};

pub fn normalized_scale(bounds: Option<Aabb>, canonical_size: f64) -> f64 {
    let Some(bounds) = bounds else {
        return 1.0;
    };
    let max_dim = bounds.max_dimension();
    if !(max_dim > 0.0) || !max_dim.is_finite() {
        return 1.0;
    }
    (canonical_size / max_dim).min(1.0)
}

#[derive(Clone, Copy, Debug)]
pub struct SceneNormalizer {
    canonical_size: f64,
}

impl Default for SceneNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_CANONICAL_SIZE)
    }
}

impl SceneNormalizer {
    pub fn new(canonical_size: f64) -> Self {
        Self { canonical_size }
    }

    pub fn recenter(&self, graph: &mut SceneGraph) -> f64 {
        let bounds = graph.bounds();
        let scale = normalized_scale(bounds, self.canonical_size);
        let center = bounds
            .map(|b| b.center())
            .unwrap_or_else(|| vec3(0.0, 0.0, 0.0));

        let root = graph.root();
        if let Some(node) = graph.node_mut(root) {
            node.transform.translation = (node.transform.translation - center) * scale;
            node.transform.scale = node.transform.scale * scale;
        }
        scale
    }

    pub fn normalize(&self, loaded: LoadedScene) -> Option<SceneAsset> {
        let LoadedScene { graph, clips } = loaded;
        let mut graph = graph?;
        if graph.is_empty() {
            return None;
        }

        let scale = self.recenter(&mut graph);

        let mut meshes = Vec::new();
        let mut audio_emitters = Vec::new();
        for id in graph.traverse() {
            match graph.node(id).map(|node| &node.kind) {
                Some(NodeKind::Mesh(_)) => meshes.push(id),
                Some(NodeKind::Audio(_)) => audio_emitters.push(id),
                _ => {}
            }
        }

        debug!(
            scale,
            meshes = meshes.len(),
            audio = audio_emitters.len(),
            clips = clips.len(),
            "normalized scene"
        );
        Some(SceneAsset::new(graph, meshes, audio_emitters, clips, scale))
    }
}
