use perch_geometry::Pose;
use perch_scene::SceneAsset;
use serde::Serialize;

use crate::animation::AnimationMixer;
use crate::audio::AudioDeck;
use crate::placement::PlacementState;
use crate::reticle::Reticle;
use crate::selection::SelectionResult;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AudioEntry {
    pub label: String,
    pub playing: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PanelState {
    pub asset: Option<String>,
    pub placement: PlacementState,
    pub reticle_visible: bool,
    pub animations: Vec<String>,
    pub active_animation: Option<usize>,
    pub audio: Vec<AudioEntry>,
    pub selected_mesh: Option<String>,
    pub object_pose: Option<Pose>,
    pub object_scale: Option<f64>,
}

impl PanelState {
    pub(crate) fn capture(
        asset: Option<&SceneAsset>,
        placement: PlacementState,
        reticle: &Reticle,
        mixer: Option<&AnimationMixer>,
        audio: &AudioDeck,
        selected: Option<&SelectionResult>,
    ) -> Self {
        let animations = asset
            .map(|asset| {
                asset
                    .clips()
                    .iter()
                    .enumerate()
                    .map(|(i, clip)| clip_label(i, &clip.name))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            asset: asset.map(|asset| asset.id().to_string()),
            placement,
            reticle_visible: reticle.is_visible(),
            animations,
            active_animation: mixer.and_then(AnimationMixer::active),
            audio: audio
                .emitters()
                .iter()
                .map(|emitter| AudioEntry {
                    label: emitter.label.clone(),
                    playing: emitter.playing,
                })
                .collect(),
            selected_mesh: selected.map(|s| s.name.clone()),
            object_pose: asset.map(|asset| asset.transform.pose()),
            object_scale: asset.map(|asset| asset.transform.uniform_scale()),
        }
    }
}

fn clip_label(index: usize, name: &str) -> String {
    if name.is_empty() {
        format!("Anim {}", index + 1)
    } else {
        name.to_string()
    }
}
