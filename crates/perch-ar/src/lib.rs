mod animation;
mod audio;
mod backend;
mod controller;
mod events;
mod gesture;
mod panel;
mod placement;
mod reticle;
mod selection;

pub use animation::AnimationMixer;
pub use audio::{AudioDeck, EmitterState};
pub use backend::{HitTestBackend, HitTestSourceId};
pub use controller::ArController;
pub use events::{ControllerEvent, Frame, InputEvent, PointerId, SelectSource};
pub use gesture::{GestureInterpreter, GestureMode};
pub use hit_test::{HitPose, HitTestOutcome, HitTestService};
pub use panel::{AudioEntry, PanelState};
pub use placement::{PlacementMachine, PlacementState};
pub use reticle::Reticle;
pub use selection::{SelectionDispatcher, SelectionResult};
