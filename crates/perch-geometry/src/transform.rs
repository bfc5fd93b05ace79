use cgmath::{One, Rad, Rotation3};
use serde::{Deserialize, Serialize};

use crate::{Mat4, Quat, Vec3};

pub const UP: Vec3 = Vec3 {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3 {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        },
        rotation: Quat {
            s: 1.0,
            v: Vec3 {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
        },
        scale: Vec3 {
            x: 1.0,
            y: 1.0,
            z: 1.0,
        },
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from(self.rotation)
            * Mat4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn uniform_scale(&self) -> f64 {
        self.scale.x
    }

    pub fn set_uniform_scale(&mut self, scale: f64) {
        self.scale = Vec3::new(scale, scale, scale);
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.translation,
            orientation: self.rotation,
        }
    }

    pub fn set_pose(&mut self, pose: &Pose) {
        self.translation = pose.position;
        self.rotation = pose.orientation;
    }

    pub fn yawed(rotation: Quat, angle: f64) -> Quat {
        Quat::from_angle_y(Rad(angle)) * rotation
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 0.0),
            orientation: Quat::one(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct PoseRepr {
    position: [f64; 3],
    #[serde(default = "identity_wxyz")]
    orientation: [f64; 4],
}

fn identity_wxyz() -> [f64; 4] {
    [1.0, 0.0, 0.0, 0.0]
}

impl Serialize for Pose {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let q = self.orientation;
        PoseRepr {
            position: self.position.into(),
            orientation: [q.s, q.v.x, q.v.y, q.v.z],
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Pose {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = PoseRepr::deserialize(deserializer)?;
        let [w, x, y, z] = repr.orientation;
        Ok(Self {
            position: repr.position.into(),
            orientation: Quat::new(w, x, y, z),
        })
    }
}

pub fn wrap_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}
