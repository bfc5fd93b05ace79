use perch_scene::SceneAsset;
use serde::Serialize;
use tracing::{debug, info};

use crate::hit_test::HitPose;
use crate::reticle::Reticle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementState {
    #[default]
    Searching,
    Placed,
}

#[derive(Debug, Default)]
pub struct PlacementMachine {
    state: PlacementState,
}

impl PlacementMachine {
    pub fn state(&self) -> PlacementState {
        self.state
    }

    pub fn is_placed(&self) -> bool {
        self.state == PlacementState::Placed
    }

    pub fn try_commit(
        &mut self,
        reticle: &Reticle,
        asset: Option<&mut SceneAsset>,
    ) -> Option<HitPose> {
        if self.is_placed() {
            return None;
        }
        let Some(pose) = reticle.pose().copied() else {
            debug!("select ignored: reticle not visible");
            return None;
        };
        let Some(asset) = asset else {
            debug!("select ignored: no asset loaded");
            return None;
        };

        asset.transform.set_pose(&pose);
        self.state = PlacementState::Placed;
        info!(
            asset = %asset.id(),
            x = pose.position.x,
            y = pose.position.y,
            z = pose.position.z,
            "asset placed"
        );
        Some(pose)
    }

    pub fn reset(&mut self) {
        self.state = PlacementState::Searching;
    }
}
