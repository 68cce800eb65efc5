//! Axis-aligned cube (box) primitive.
//!
//! Intersected with the slab method. Directions with a zero component yield
//! infinite slab distances and are handled by IEEE arithmetic alone.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use ivar_math::{Aabb, Interval, Point3, Ray, Vec3};
use std::sync::Arc;

/// An axis-aligned box between two corners.
pub struct Cube {
    min_corner: Point3,
    max_corner: Point3,
    material: Arc<dyn Material>,
}

/// Where a ray enters and leaves the box, with the axis of each face.
#[derive(Debug, Clone, Copy)]
struct SlabSpan {
    t_enter: f64,
    enter_normal: Vec3,
    t_exit: f64,
    exit_normal: Vec3,
}

impl Cube {
    /// Create a cube centered at `center` with the given side length.
    pub fn new(center: Point3, side_length: f64, material: Arc<dyn Material>) -> Self {
        let half = Vec3::splat(side_length.abs() / 2.0);
        Self::from_corners(center - half, center + half, material)
    }

    /// Create a box spanning two opposite corners, in any order.
    pub fn from_corners(a: Point3, b: Point3, material: Arc<dyn Material>) -> Self {
        Self {
            min_corner: a.min(b),
            max_corner: a.max(b),
            material,
        }
    }

    pub fn min_corner(&self) -> Point3 {
        self.min_corner
    }

    pub fn max_corner(&self) -> Point3 {
        self.max_corner
    }

    /// Intersect the ray's line with all three slabs.
    ///
    /// The axis that last raised the entry distance gives the entry face, the
    /// one that last lowered the exit distance gives the exit face. Face
    /// normals point outward.
    fn slabs(&self, ray: &Ray) -> Option<SlabSpan> {
        let origin = ray.origin();
        let direction = ray.direction();

        let mut span = SlabSpan {
            t_enter: f64::NEG_INFINITY,
            enter_normal: Vec3::ZERO,
            t_exit: f64::INFINITY,
            exit_normal: Vec3::ZERO,
        };

        for axis in 0..3 {
            let inv_dir = 1.0 / direction[axis];
            let mut t0 = (self.min_corner[axis] - origin[axis]) * inv_dir;
            let mut t1 = (self.max_corner[axis] - origin[axis]) * inv_dir;
            if inv_dir < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            let sign = if inv_dir > 0.0 { 1.0 } else { -1.0 };

            if t0 > span.t_enter {
                span.t_enter = t0;
                span.enter_normal = axis_unit(axis, -sign);
            }
            if t1 < span.t_exit {
                span.t_exit = t1;
                span.exit_normal = axis_unit(axis, sign);
            }

            if span.t_enter > span.t_exit {
                return None;
            }
        }

        Some(span)
    }

    /// Planar coordinates on the face perpendicular to `normal`, each in [0, 1].
    fn face_uv(&self, p: Point3, normal: Vec3) -> (f64, f64) {
        let extent = self.max_corner - self.min_corner;
        let local = (p - self.min_corner) / extent;
        if normal.x != 0.0 {
            (local.z, local.y)
        } else if normal.y != 0.0 {
            (local.x, local.z)
        } else {
            (local.x, local.y)
        }
    }
}

/// Unit vector along `axis` with the given sign.
fn axis_unit(axis: usize, sign: f64) -> Vec3 {
    let mut v = Vec3::ZERO;
    v[axis] = sign;
    v
}

impl Hittable for Cube {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let Some(span) = self.slabs(ray) else {
            return false;
        };

        // Entry face when it is in range, otherwise the ray starts inside the
        // box and leaves through the exit face.
        let (t, outward_normal) = if ray_t.surrounds(span.t_enter) {
            (span.t_enter, span.enter_normal)
        } else if ray_t.surrounds(span.t_exit) {
            (span.t_exit, span.exit_normal)
        } else {
            return false;
        };

        rec.t = t;
        rec.p = ray.at(t);
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = self.face_uv(rec.p, outward_normal);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.min_corner, self.max_corner)
    }
}
