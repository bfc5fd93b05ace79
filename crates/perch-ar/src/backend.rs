use perch_base::{SessionError, SessionId};

use crate::hit_test::HitPose;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HitTestSourceId(pub u64);

/// The slice of the AR platform the controller talks to directly.
///
/// Source acquisition is asynchronous on real platforms: `request_hit_test_source`
/// only starts it, and the outcome comes back through
/// `InputEvent::HitTestSourceReady` or `InputEvent::HitTestSourceFailed`.
pub trait HitTestBackend {
    fn supports_hit_test(&self) -> bool;

    fn request_hit_test_source(&mut self, session: SessionId) -> Result<(), SessionError>;

    /// Hits for the current frame, best first.
    fn hit_test(&mut self, source: HitTestSourceId) -> Vec<HitPose>;

    fn release_hit_test_source(&mut self, source: HitTestSourceId);
}
