use crate::{Mat4, Vec3, max_components, min_components, transform_point};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min_components(min, max),
            max: max_components(min, max),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bounds = bounds.include(p);
        }
        Some(bounds)
    }

    pub fn include(self, point: Vec3) -> Self {
        Self {
            min: min_components(self.min, point),
            max: max_components(self.max, point),
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min: min_components(self.min, other.min),
            max: max_components(self.max, other.max),
        }
    }

    pub fn merge(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (None, None) => None,
            (Some(value), None) | (None, Some(value)) => Some(value),
            (Some(a), Some(b)) => Some(a.union(b)),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn max_dimension(&self) -> f64 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = self.corners().map(|corner| transform_point(matrix, corner));
        let mut bounds = Self {
            min: corners[0],
            max: corners[0],
        };
        for corner in &corners[1..] {
            bounds = bounds.include(*corner);
        }
        bounds
    }

    /// Slab test. Returns the parametric entry/exit interval clipped to `[0, max_t]`.
    pub fn ray_interval(&self, origin: Vec3, dir: Vec3, max_t: f64) -> Option<(f64, f64)> {
        let mut tmin: f64 = 0.0;
        let mut tmax: f64 = max_t;

        let mut check_axis = |origin: f64, dir: f64, min: f64, max: f64| -> bool {
            if dir.abs() <= 1.0e-12 {
                return origin >= min && origin <= max;
            }
            let inv = 1.0 / dir;
            let t1 = (min - origin) * inv;
            let t2 = (max - origin) * inv;
            tmin = tmin.max(t1.min(t2));
            tmax = tmax.min(t1.max(t2));
            tmax >= tmin
        };

        if !check_axis(origin.x, dir.x, self.min.x, self.max.x) {
            return None;
        }
        if !check_axis(origin.y, dir.y, self.min.y, self.max.y) {
            return None;
        }
        if !check_axis(origin.z, dir.z, self.min.z, self.max.z) {
            return None;
        }
        if tmax < 0.0 {
            return None;
        }
        Some((tmin, tmax))
    }
}
