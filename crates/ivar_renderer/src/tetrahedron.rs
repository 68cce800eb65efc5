//! Tetrahedron primitive: four triangles sharing one material.
//!
//! Each face is intersected with the Möller-Trumbore algorithm. Face normals
//! are unit length and point away from the tetrahedron's centroid, so they
//! follow the same front-face convention as the other shapes.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use ivar_math::{Aabb, Interval, Point3, Ray, Vec3};
use std::sync::Arc;

/// Determinant magnitude below which a ray is treated as parallel to a face.
const PARALLEL_EPSILON: f64 = 1e-8;

/// Vertex indices of the four faces.
const FACES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [1, 2, 3], [2, 0, 3]];

/// Intersection of a ray with a single triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TriangleHit {
    pub t: f64,
    pub u: f64,
    pub v: f64,
}

/// Möller-Trumbore ray-triangle intersection.
///
/// Returns `None` when the ray is parallel to the triangle's plane, passes
/// outside the triangle, or meets it outside `ray_t`.
pub(crate) fn intersect_triangle(ray: &Ray, v0: Point3, v1: Point3, v2: Point3, ray_t: Interval) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction().cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < PARALLEL_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin() - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction().dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if !ray_t.surrounds(t) {
        return None;
    }

    Some(TriangleHit { t, u, v })
}

/// A tetrahedron defined by four vertices.
pub struct Tetrahedron {
    vertices: [Point3; 4],
    /// Outward unit normal per face, same order as `FACES`
    normals: [Vec3; 4],
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Tetrahedron {
    /// Create a new tetrahedron. Vertex order does not matter.
    pub fn new(v0: Point3, v1: Point3, v2: Point3, v3: Point3, material: Arc<dyn Material>) -> Self {
        let vertices = [v0, v1, v2, v3];
        let centroid = (v0 + v1 + v2 + v3) / 4.0;

        let normals = FACES.map(|[a, b, c]| {
            let n = (vertices[b] - vertices[a])
                .cross(vertices[c] - vertices[a])
                .normalize_or_zero();
            // Flip toward the side away from the opposite vertex
            if n.dot(vertices[a] - centroid) < 0.0 {
                -n
            } else {
                n
            }
        });

        let bbox = Aabb::from_points(v0.min(v1).min(v2).min(v3), v0.max(v1).max(v2).max(v3));

        Self {
            vertices,
            normals,
            material,
            bbox,
        }
    }

    pub fn vertices(&self) -> &[Point3; 4] {
        &self.vertices
    }
}

impl Hittable for Tetrahedron {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut closest: Option<(TriangleHit, Vec3)> = None;
        let mut window = ray_t;

        for (face, normal) in FACES.into_iter().zip(self.normals) {
            let [a, b, c] = face.map(|i| self.vertices[i]);
            if let Some(hit) = intersect_triangle(ray, a, b, c, window) {
                window = window.with_max(hit.t);
                closest = Some((hit, normal));
            }
        }

        let Some((hit, outward_normal)) = closest else {
            return false;
        };

        rec.t = hit.t;
        rec.p = ray.at(hit.t);
        rec.set_face_normal(ray, outward_normal);
        rec.u = hit.u;
        rec.v = hit.v;
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
