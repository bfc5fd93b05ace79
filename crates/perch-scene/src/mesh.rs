use std::cmp::Ordering;

use perch_geometry::{Aabb, Vec3, ray_intersect_triangle};

use crate::{Error, Result};

const BVH_LEAF_SIZE: usize = 8;

#[derive(Clone, Debug)]
pub struct TriMesh {
    positions: Vec<Vec3>,
    triangles: Vec<[usize; 3]>,
    pub bounds: Option<Aabb>,
    bvh_nodes: Vec<BvhNode>,
    bvh_indices: Vec<usize>,
}

impl TriMesh {
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[usize; 3]>) -> Result<Self> {
        if let Some(bad) = triangles
            .iter()
            .flatten()
            .find(|&&index| index >= positions.len())
        {
            return Err(Error::InvalidMesh(format!(
                "vertex index {bad} out of range for {} positions",
                positions.len()
            )));
        }

        let bounds = Aabb::from_points(positions.iter().copied());
        let (bvh_nodes, bvh_indices) = build_bvh(&positions, &triangles);
        Ok(Self {
            positions,
            triangles,
            bounds,
            bvh_nodes,
            bvh_indices,
        })
    }

    pub fn from_polygons(positions: Vec<Vec3>, faces: &[Vec<usize>]) -> Result<Self> {
        let mut triangles = Vec::new();
        for face in faces {
            if face.len() < 3 {
                continue;
            }
            for idx in 1..(face.len() - 1) {
                triangles.push([face[0], face[idx], face[idx + 1]]);
            }
        }
        Self::new(positions, triangles)
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.triangles.is_empty()
    }

    pub fn ray_pick(&self, origin: Vec3, dir: Vec3) -> Option<(f64, Vec3)> {
        if self.triangles.is_empty() || self.bvh_nodes.is_empty() {
            return None;
        }

        let mut best_t = f64::INFINITY;
        let mut best_point = None;
        let mut stack = vec![0usize];

        while let Some(node_idx) = stack.pop() {
            let node = &self.bvh_nodes[node_idx];
            if node.bounds.ray_interval(origin, dir, best_t).is_none() {
                continue;
            }

            if node.count > 0 {
                for &tri_idx in &self.bvh_indices[node.start..node.start + node.count] {
                    let [a, b, c] = self.triangles[tri_idx];
                    if let Some(t) = ray_intersect_triangle(
                        origin,
                        dir,
                        self.positions[a],
                        self.positions[b],
                        self.positions[c],
                    ) {
                        if t < best_t {
                            best_t = t;
                            best_point = Some(origin + dir * t);
                        }
                    }
                }
                continue;
            }

            let near = |idx: Option<usize>| {
                idx.and_then(|idx| {
                    self.bvh_nodes[idx]
                        .bounds
                        .ray_interval(origin, dir, best_t)
                        .map(|(tmin, _)| (idx, tmin))
                })
            };
            match (near(node.left), near(node.right)) {
                (Some((left_idx, left_t)), Some((right_idx, right_t))) => {
                    if left_t <= right_t {
                        stack.push(right_idx);
                        stack.push(left_idx);
                    } else {
                        stack.push(left_idx);
                        stack.push(right_idx);
                    }
                }
                (Some((idx, _)), None) | (None, Some((idx, _))) => stack.push(idx),
                (None, None) => {}
            }
        }

        best_point.map(|point| (best_t, point))
    }
}

#[derive(Clone, Copy, Debug)]
struct BvhNode {
    bounds: Aabb,
    left: Option<usize>,
    right: Option<usize>,
    start: usize,
    count: usize,
}

fn build_bvh(positions: &[Vec3], triangles: &[[usize; 3]]) -> (Vec<BvhNode>, Vec<usize>) {
    if triangles.is_empty() || positions.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let mut tri_bounds = Vec::with_capacity(triangles.len());
    let mut centroids = Vec::with_capacity(triangles.len());
    for &[a, b, c] in triangles {
        let (p0, p1, p2) = (positions[a], positions[b], positions[c]);
        tri_bounds.push(Aabb::new(p0, p1).include(p2));
        centroids.push((p0 + p1 + p2) * (1.0 / 3.0));
    }

    let mut indices: Vec<usize> = (0..triangles.len()).collect();
    let mut nodes = Vec::new();
    let mut out_indices = Vec::with_capacity(triangles.len());
    build_bvh_node(
        &mut indices,
        &tri_bounds,
        &centroids,
        &mut nodes,
        &mut out_indices,
    );
    (nodes, out_indices)
}

fn build_bvh_node(
    indices: &mut [usize],
    tri_bounds: &[Aabb],
    centroids: &[Vec3],
    nodes: &mut Vec<BvhNode>,
    out_indices: &mut Vec<usize>,
) -> usize {
    let node_index = nodes.len();
    let bounds = indices[1..]
        .iter()
        .fold(tri_bounds[indices[0]], |acc, &idx| acc.union(tri_bounds[idx]));
    nodes.push(BvhNode {
        bounds,
        left: None,
        right: None,
        start: 0,
        count: 0,
    });

    if indices.len() <= BVH_LEAF_SIZE {
        nodes[node_index].start = out_indices.len();
        nodes[node_index].count = indices.len();
        out_indices.extend_from_slice(indices);
        return node_index;
    }

    let extent = Aabb::from_points(indices.iter().map(|&idx| centroids[idx]))
        .map(|b| b.size())
        .unwrap_or(Vec3::new(0.0, 0.0, 0.0));
    let axis = if extent.x >= extent.y && extent.x >= extent.z {
        0
    } else if extent.y >= extent.z {
        1
    } else {
        2
    };
    indices.sort_unstable_by(|a, b| {
        centroids[*a][axis]
            .partial_cmp(&centroids[*b][axis])
            .unwrap_or(Ordering::Equal)
    });
    let mid = indices.len() / 2;
    let (left, right) = indices.split_at_mut(mid);
    let left_idx = build_bvh_node(left, tri_bounds, centroids, nodes, out_indices);
    let right_idx = build_bvh_node(right, tri_bounds, centroids, nodes, out_indices);
    nodes[node_index].left = Some(left_idx);
    nodes[node_index].right = Some(right_idx);
    node_index
}
