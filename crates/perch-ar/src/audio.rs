use perch_scene::{NodeId, SceneAsset};
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct EmitterState {
    pub node: NodeId,
    pub label: String,
    pub uri: String,
    pub playing: bool,
    pub volume: f32,
    pub starts: u32,
}

#[derive(Debug, Default)]
pub struct AudioDeck {
    emitters: Vec<EmitterState>,
}

impl AudioDeck {
    pub fn from_asset(asset: &SceneAsset) -> Self {
        let emitters = asset
            .audio_emitters()
            .iter()
            .enumerate()
            .map(|(index, &node)| EmitterState {
                node,
                label: format!("Audio {index}"),
                uri: asset
                    .graph()
                    .node(node)
                    .and_then(|n| n.as_audio())
                    .map(|source| source.uri.clone())
                    .unwrap_or_default(),
                playing: false,
                volume: 0.0,
                starts: 0,
            })
            .collect();
        Self { emitters }
    }

    pub fn play(&mut self, index: usize, volume: f32) -> bool {
        let Some(emitter) = self.emitters.get_mut(index) else {
            return false;
        };
        emitter.playing = true;
        emitter.volume = volume;
        emitter.starts += 1;
        debug!(index, volume, restarts = emitter.starts - 1, "audio started");
        true
    }

    pub fn stop_all(&mut self) {
        for emitter in &mut self.emitters {
            emitter.playing = false;
        }
    }

    pub fn emitters(&self) -> &[EmitterState] {
        &self.emitters
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }
}
