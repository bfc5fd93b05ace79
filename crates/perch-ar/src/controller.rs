use perch_base::{AssetId, ControllerConfig, SessionError, SessionId};
use perch_geometry::Camera;
use perch_scene::{LoadedScene, SceneAsset, SceneNormalizer};
use tracing::{debug, info, warn};

use crate::animation::AnimationMixer;
use crate::audio::AudioDeck;
use crate::backend::HitTestBackend;
use crate::events::{ControllerEvent, Frame, InputEvent, SelectSource};
use crate::gesture::{GestureInterpreter, GestureMode};
use crate::hit_test::HitTestService;
use crate::panel::PanelState;
use crate::placement::{PlacementMachine, PlacementState};
use crate::reticle::Reticle;
use crate::selection::{SelectionDispatcher, SelectionResult};

pub struct ArController<B: HitTestBackend> {
    backend: B,
    config: ControllerConfig,
    normalizer: SceneNormalizer,
    session: Option<SessionId>,
    hit_test: HitTestService,
    reticle: Reticle,
    placement: PlacementMachine,
    gestures: GestureInterpreter,
    selection: SelectionDispatcher,
    asset: Option<SceneAsset>,
    mixer: Option<AnimationMixer>,
    audio: AudioDeck,
    pending: Vec<ControllerEvent>,
}

impl<B: HitTestBackend> ArController<B> {
    pub fn new(backend: B, config: ControllerConfig) -> perch_base::Result<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            normalizer: SceneNormalizer::new(config.canonical_size),
            gestures: GestureInterpreter::new(config.min_object_scale, config.max_object_scale),
            config,
            session: None,
            hit_test: HitTestService::default(),
            reticle: Reticle::default(),
            placement: PlacementMachine::default(),
            selection: SelectionDispatcher::default(),
            asset: None,
            mixer: None,
            audio: AudioDeck::default(),
            pending: Vec::new(),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    pub fn hit_test(&self) -> &HitTestService {
        &self.hit_test
    }

    pub fn reticle(&self) -> &Reticle {
        &self.reticle
    }

    pub fn placement_state(&self) -> PlacementState {
        self.placement.state()
    }

    pub fn gesture_mode(&self) -> GestureMode {
        self.gestures.mode()
    }

    pub fn selected(&self) -> Option<&SelectionResult> {
        self.selection.selected()
    }

    pub fn asset(&self) -> Option<&SceneAsset> {
        self.asset.as_ref()
    }

    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.mixer.as_ref()
    }

    pub fn audio(&self) -> &AudioDeck {
        &self.audio
    }

    pub fn begin_session(&mut self, session: SessionId) -> Result<(), SessionError> {
        if !self.backend.supports_hit_test() {
            warn!(%session, "platform has no hit-test support");
            return Err(SessionError::HitTestUnsupported);
        }
        if self.session.is_some() {
            self.end_session()?;
        }
        self.session = Some(session);
        self.hit_test.begin_session(session);
        info!(%session, "AR session started");
        Ok(())
    }

    pub fn end_session(&mut self) -> Result<(), SessionError> {
        let session = self.session.take().ok_or(SessionError::NoActiveSession)?;
        self.reset_session(session);
        Ok(())
    }

    fn reset_session(&mut self, session: SessionId) {
        self.hit_test.end_session(&mut self.backend);
        self.placement.reset();
        self.reticle.hide();
        self.gestures.reset();
        self.pending.push(ControllerEvent::SessionReset { session });
        info!(%session, "AR session ended");
    }

    pub fn load_asset(&mut self, scene: LoadedScene) -> Option<AssetId> {
        self.unload_asset();
        let Some(asset) = self.normalizer.normalize(scene) else {
            warn!("loaded scene has no graph; nothing to place");
            return None;
        };
        let id = asset.id();
        self.mixer = AnimationMixer::new(asset.clips().to_vec());
        self.audio = AudioDeck::from_asset(&asset);
        info!(
            asset = %id,
            scale = asset.normalized_scale(),
            meshes = asset.meshes().len(),
            clips = asset.clips().len(),
            "asset loaded"
        );
        self.asset = Some(asset);
        self.pending.push(ControllerEvent::AssetLoaded { asset: id });
        Some(id)
    }

    pub fn unload_asset(&mut self) {
        let Some(asset) = self.asset.take() else {
            return;
        };
        if let Some(mixer) = self.mixer.as_mut() {
            mixer.stop_all_action();
        }
        self.mixer = None;
        self.audio.stop_all();
        self.audio = AudioDeck::default();
        self.selection.clear();
        self.placement.reset();
        self.gestures.reset();
        self.reticle.hide();
        self.hit_test.rearm();
        debug!(asset = %asset.id(), "asset cleared");
        self.pending.push(ControllerEvent::AssetCleared);
    }

    pub fn play_clip(&mut self, index: usize) -> bool {
        let Some(mixer) = self.mixer.as_mut() else {
            return false;
        };
        if index >= mixer.clips().len() {
            return false;
        }
        mixer.stop_all_action();
        let Some(clip) = mixer.play(index) else {
            return false;
        };
        self.pending.push(ControllerEvent::ClipStarted {
            index,
            name: clip.name.clone(),
        });
        true
    }

    pub fn panel(&self) -> PanelState {
        PanelState::capture(
            self.asset.as_ref(),
            self.placement.state(),
            &self.reticle,
            self.mixer.as_ref(),
            &self.audio,
            self.selection.selected(),
        )
    }

    pub fn tick(&mut self, frame: Frame) -> Vec<ControllerEvent> {
        let Frame {
            elapsed,
            camera,
            events,
        } = frame;

        let mut input = Vec::new();
        for event in events {
            match event {
                InputEvent::HitTestSourceReady { session, source } => {
                    self.hit_test.source_ready(&mut self.backend, session, source);
                }
                InputEvent::HitTestSourceFailed { session, error } => {
                    self.hit_test.source_failed(session, &error);
                }
                InputEvent::SessionEnded { session } => {
                    if self.session == Some(session) {
                        self.session = None;
                        self.reset_session(session);
                    } else {
                        debug!(%session, "ignoring end of inactive session");
                    }
                }
                other => input.push(other),
            }
        }

        let searching = !self.placement.is_placed();
        let outcome = self
            .hit_test
            .update(&mut self.backend, searching, &mut self.pending);
        self.reticle.update(self.placement.state(), &outcome);

        for event in input {
            self.handle_input(event, &camera);
        }
        if self.placement.is_placed() {
            self.reticle.hide();
        }

        if let Some(mixer) = self.mixer.as_mut() {
            mixer.update(elapsed);
        }

        std::mem::take(&mut self.pending)
    }

    fn handle_input(&mut self, event: InputEvent, camera: &Camera) {
        if let InputEvent::Select(source) = event {
            self.select(source, camera);
            return;
        }
        if !self.placement.is_placed() {
            return;
        }
        let Some(asset) = self.asset.as_mut() else {
            return;
        };
        let transform = &mut asset.transform;
        match event {
            InputEvent::PointerDown { pointer, position } => {
                self.gestures.pointer_down(pointer, position, camera, transform)
            }
            InputEvent::PointerMove { pointer, position } => {
                self.gestures.pointer_move(pointer, position, camera, transform)
            }
            InputEvent::PointerUp { pointer } | InputEvent::PointerCancel { pointer } => {
                self.gestures.pointer_up(pointer, camera, transform)
            }
            _ => {}
        }
    }

    fn select(&mut self, source: SelectSource, camera: &Camera) {
        if !self.placement.is_placed() {
            let Some(pose) = self.placement.try_commit(&self.reticle, self.asset.as_mut()) else {
                return;
            };
            self.reticle.hide();
            self.hit_test.teardown(&mut self.backend);
            self.gestures.reset();
            if let Some(asset) = &self.asset {
                self.pending.push(ControllerEvent::Placed {
                    asset: asset.id(),
                    pose,
                });
            }
            return;
        }

        let ray = match source {
            SelectSource::Screen(point) => camera.screen_ray(point),
            SelectSource::Ray(ray) => Some(ray),
        };
        let (Some(ray), Some(asset)) = (ray, self.asset.as_ref()) else {
            return;
        };
        let Some(result) = self.selection.select(asset, &ray).cloned() else {
            return;
        };

        self.pending.push(ControllerEvent::Selected {
            mesh_index: result.mesh_index,
            name: result.name.clone(),
        });
        if let Some(index) = result.audio {
            if self.audio.play(index, self.config.audio_volume) {
                self.pending.push(ControllerEvent::AudioStarted { index });
            }
        }
        if let Some(clip) = result.clip {
            self.play_clip(clip);
        }
    }
}

impl<B: HitTestBackend> Drop for ArController<B> {
    fn drop(&mut self) {
        if self.hit_test.source().is_some() {
            debug!("releasing hit-test source on drop");
        }
        self.hit_test.end_session(&mut self.backend);
    }
}
