use perch_geometry::{Ray, Vec3};
use perch_scene::{NodeId, SceneAsset};
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct SelectionResult {
    pub mesh_index: usize,
    pub node: NodeId,
    pub name: String,
    pub distance: f64,
    pub point: Vec3,
    pub audio: Option<usize>,
    pub clip: Option<usize>,
}

#[derive(Debug, Default)]
pub struct SelectionDispatcher {
    selected: Option<SelectionResult>,
}

impl SelectionDispatcher {
    pub fn select(&mut self, asset: &SceneAsset, ray: &Ray) -> Option<&SelectionResult> {
        let Some(hit) = asset.raycast(ray) else {
            debug!("selection ray missed");
            return None;
        };
        let name = asset
            .mesh_node(hit.mesh_index)
            .map(|node| node.name.clone())
            .unwrap_or_default();
        let audio = (hit.mesh_index < asset.audio_emitters().len()).then_some(hit.mesh_index);
        let clip = asset.clip_index_by_name(&name);
        debug!(
            mesh = hit.mesh_index,
            name = %name,
            distance = hit.distance,
            ?clip,
            "mesh selected"
        );

        self.selected = Some(SelectionResult {
            mesh_index: hit.mesh_index,
            node: hit.node,
            name,
            distance: hit.distance,
            point: hit.point,
            audio,
            clip,
        });
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&SelectionResult> {
        self.selected.as_ref()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perch_geometry::{Transform, vec3};
    use perch_scene::{
        AnimationClip, AudioSource, LoadedScene, Node, Result, SceneGraph, SceneNormalizer, TriMesh,
    };

    fn quad(z: f64) -> Result<TriMesh> {
        TriMesh::from_polygons(
            vec![
                vec3(-0.1, -0.1, z),
                vec3(0.1, -0.1, z),
                vec3(0.1, 0.1, z),
                vec3(-0.1, 0.1, z),
            ],
            &[vec![0, 1, 2, 3]],
        )
    }

    fn asset() -> Result<SceneAsset> {
        let mut graph = SceneGraph::new(Node::group("root"));
        let root = graph.root();
        graph.add_child(root, Node::mesh("Walk", quad(0.1)?))?;
        graph.add_child(root, Node::mesh("Idle", quad(-0.1)?))?;
        graph.add_child(root, Node::audio("chirp", AudioSource::default()))?;
        let scene = LoadedScene {
            graph: Some(graph),
            clips: vec![AnimationClip::new("Idle", 1.0), AnimationClip::new("Walk", 2.0)],
        };
        let mut asset = SceneNormalizer::default()
            .normalize(scene)
            .expect("graph present");
        asset.transform = Transform::from_translation(vec3(0.0, 0.0, -2.0));
        Ok(asset)
    }

    fn forward_ray() -> Ray {
        Ray::new(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, -1.0)).expect("non-zero direction")
    }

    #[test]
    fn nearest_mesh_correlates_audio_and_clip_by_name() -> Result<()> {
        let asset = asset()?;
        let mut selection = SelectionDispatcher::default();

        let result = selection.select(&asset, &forward_ray()).cloned().expect("hit");
        assert_eq!(result.name, "Walk");
        assert_eq!(result.mesh_index, 0);
        assert_eq!(result.audio, Some(0));
        assert_eq!(result.clip, Some(1));
        Ok(())
    }

    #[test]
    fn miss_keeps_previous_selection() -> Result<()> {
        let asset = asset()?;
        let mut selection = SelectionDispatcher::default();
        selection.select(&asset, &forward_ray());

        let away = Ray::new(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0)).expect("non-zero direction");
        assert!(selection.select(&asset, &away).is_none());
        assert_eq!(selection.selected().map(|s| s.name.as_str()), Some("Walk"));

        selection.clear();
        assert!(selection.selected().is_none());
        Ok(())
    }
}
