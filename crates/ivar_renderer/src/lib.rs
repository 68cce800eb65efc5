//! Ivar - CPU Path Tracing
//!
//! A Monte Carlo path tracer: spheres, cubes and tetrahedra shaded with
//! diffuse, metal, glass and emissive materials, seen through a thin-lens
//! camera and rendered in parallel buckets.

mod bucket;
mod bvh;
mod camera;
mod cube;
mod hittable;
mod material;
mod output;
mod renderer;
mod sampling;
mod sphere;
mod tetrahedron;

pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::{Camera, CameraConfig, CameraError, CameraResult, Viewport};
pub use cube::Cube;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Dielectric, Emissive, Lambertian, Material, Metal, ScatterResult};
pub use output::{save_image, write_ppm, OutputError, OutputResult};
pub use renderer::{
    color_to_rgb, linear_to_gamma, pixel_rng, ray_color, render, render_pixel, Background, ImageBuffer,
};
pub use sphere::Sphere;
pub use tetrahedron::Tetrahedron;

/// Re-export the math types the public API is written in.
pub use ivar_math::{Aabb, Interval, Point3, Ray, Vec3};
