use crate::hit_test::{HitPose, HitTestOutcome};
use crate::placement::PlacementState;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Reticle {
    pose: Option<HitPose>,
}

impl Reticle {
    pub fn update(&mut self, state: PlacementState, outcome: &HitTestOutcome) {
        self.pose = match (state, outcome) {
            (PlacementState::Searching, HitTestOutcome::Hit(pose)) => Some(*pose),
            _ => None,
        };
    }

    pub fn hide(&mut self) {
        self.pose = None;
    }

    pub fn is_visible(&self) -> bool {
        self.pose.is_some()
    }

    pub fn pose(&self) -> Option<&HitPose> {
        self.pose.as_ref()
    }
}
