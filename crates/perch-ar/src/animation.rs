use perch_scene::AnimationClip;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveAction {
    clip: usize,
    time: f64,
}

#[derive(Debug)]
pub struct AnimationMixer {
    clips: Vec<AnimationClip>,
    active: Option<ActiveAction>,
}

impl AnimationMixer {
    pub fn new(clips: Vec<AnimationClip>) -> Option<Self> {
        if clips.is_empty() {
            return None;
        }
        Some(Self {
            clips,
            active: None,
        })
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    pub fn play(&mut self, index: usize) -> Option<&AnimationClip> {
        let clip = self.clips.get(index)?;
        self.active = Some(ActiveAction {
            clip: index,
            time: 0.0,
        });
        debug!(clip = index, name = %clip.name, "clip started");
        Some(clip)
    }

    pub fn stop_all_action(&mut self) {
        self.active = None;
    }

    pub fn update(&mut self, dt: f64) {
        if !dt.is_finite() || dt < 0.0 {
            return;
        }
        let Some(action) = self.active.as_mut() else {
            return;
        };
        let duration = self.clips[action.clip].duration;
        action.time += dt;
        if duration > 0.0 {
            action.time %= duration;
        } else {
            action.time = 0.0;
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active.map(|action| action.clip)
    }

    pub fn active_clip(&self) -> Option<&AnimationClip> {
        self.clips.get(self.active()?)
    }

    pub fn time(&self) -> Option<f64> {
        self.active.map(|action| action.time)
    }
}
