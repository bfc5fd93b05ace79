use cgmath::InnerSpace;

use crate::{Vec3, normalize_or_zero};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = normalize_or_zero(direction);
        if direction.magnitude2() == 0.0 {
            return None;
        }
        Some(Self { origin, direction })
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Option<Self> {
        let normal = normalize_or_zero(normal);
        if normal.magnitude2() == 0.0 {
            return None;
        }
        Some(Self { point, normal })
    }

    pub fn distance_along(&self, ray: &Ray) -> Option<f64> {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() <= 1.0e-9 {
            return None;
        }
        let t = (self.point - ray.origin).dot(self.normal) / denom;
        if t < 0.0 { None } else { Some(t) }
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        self.distance_along(ray).map(|t| ray.at(t))
    }
}

/// Moller-Trumbore. `dir` need not be unit length; the returned `t` is in units of `dir`.
pub fn ray_intersect_triangle(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f64> {
    let eps = 1.0e-12;
    let edge1 = b - a;
    let edge2 = c - a;
    let pvec = dir.cross(edge2);
    let det = edge1.dot(pvec);
    if det.abs() < eps {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = origin - a;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(edge1);
    let v = dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(qvec) * inv_det;
    if t > eps { Some(t) } else { None }
}
