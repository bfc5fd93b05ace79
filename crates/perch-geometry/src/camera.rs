use cgmath::{One, Rad};

use crate::{Quat, Ray, Vec2, Vec3, normalize_or_zero};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.width && point.y <= self.height
    }

    pub fn aspect(&self) -> f64 {
        if self.height <= 0.0 {
            1.0
        } else {
            self.width / self.height
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: Quat,
    pub fov_y: Rad<f64>,
    pub viewport: Viewport,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 0.0),
            orientation: Quat::one(),
            fov_y: Rad(60.0_f64.to_radians()),
            viewport: Viewport::new(1.0, 1.0),
        }
    }
}

impl Camera {
    pub fn forward(&self) -> Vec3 {
        normalize_or_zero(self.orientation * Vec3::new(0.0, 0.0, -1.0))
    }

    pub fn screen_ray(&self, pos: Vec2) -> Option<Ray> {
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return None;
        }
        if !self.viewport.contains(pos) {
            return None;
        }
        let ndc_x = pos.x / self.viewport.width * 2.0 - 1.0;
        let ndc_y = 1.0 - pos.y / self.viewport.height * 2.0;
        let tan_half = (self.fov_y.0 * 0.5).tan();
        let local = Vec3::new(
            ndc_x * tan_half * self.viewport.aspect(),
            ndc_y * tan_half,
            -1.0,
        );
        Ray::new(self.position, self.orientation * local)
    }
}
