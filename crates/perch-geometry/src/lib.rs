pub use cgmath::{Deg, InnerSpace, Rad, Rotation3, SquareMatrix, Zero};

pub type Vec2 = cgmath::Vector2<f64>;
pub type Vec3 = cgmath::Vector3<f64>;
pub type Quat = cgmath::Quaternion<f64>;
pub type Mat4 = cgmath::Matrix4<f64>;

mod aabb;
mod camera;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use camera::{Camera, Viewport};
pub use ray::{Plane, Ray, ray_intersect_triangle};
pub use transform::{Pose, Transform, UP, wrap_angle};

pub fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

pub fn vec3(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3::new(x, y, z)
}

pub fn transform_point(matrix: &Mat4, point: Vec3) -> Vec3 {
    (matrix * point.extend(1.0)).truncate()
}

pub fn transform_vector(matrix: &Mat4, vector: Vec3) -> Vec3 {
    (matrix * vector.extend(0.0)).truncate()
}

pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    let len = v.magnitude();
    if len <= f64::EPSILON { Vec3::zero() } else { v / len }
}

pub fn min_components(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
}

pub fn max_components(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}
