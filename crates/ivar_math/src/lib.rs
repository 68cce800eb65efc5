//! Ivar math types.
//!
//! Double precision vector algebra on top of glam, plus the small value types
//! the path tracer is built from: intervals, rays and bounding boxes.

pub use glam::{dvec3, DVec3};

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Three component vector used for directions and offsets.
pub type Vec3 = DVec3;

/// A position in world space.
pub type Point3 = DVec3;

/// Tolerance used when deciding whether a vector is degenerate.
pub const NEAR_ZERO: f64 = 1e-8;

/// True when every component of `v` is within [`NEAR_ZERO`] of zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.abs().max_element() < NEAR_ZERO
}
