//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a hard depth ceiling
//! - Emission added on top of scattered light
//! - Anti-aliasing via multi-sampling
//! - Gamma correction on output
//!
//! Every pixel draws from its own generator seeded from the render seed and
//! the pixel coordinates, so the image does not depend on evaluation order.

use crate::camera::Viewport;
use crate::{Color, HitRecord, Hittable};
use ivar_math::{Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// What a ray sees when it leaves the scene.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// Vertical white-to-blue sky gradient
    #[default]
    Gradient,
    /// A single uniform color
    Solid(Color),
}

impl Background {
    /// Background color for an escaping ray.
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Gradient => sky_gradient(ray),
            Background::Solid(color) => *color,
        }
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function: one scattered ray per bounce,
/// `emitted + attenuation * incoming`, until a miss, an absorbing surface or
/// the depth budget runs out.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, background: Background, rng: &mut dyn RngCore) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();

    if !world.hit(ray, Interval::FORWARD, &mut rec) {
        return background.color(ray);
    }

    let emission = rec.material.emitted(&rec);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        // Absorbed - only the surface's own light remains
        None => emission,
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma corrected 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    const INTENSITY: Interval = Interval::new(0.0, 1.0);
    let quantize = |c: f64| (255.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Random generator for pixel (x, y) of a render seeded with `seed`.
pub fn pixel_rng(seed: u64, x: u32, y: u32) -> StdRng {
    let key = (u64::from(y) << 32) | u64::from(x);
    StdRng::seed_from_u64(seed ^ key.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Render a single pixel: the average of `samples_per_pixel` estimates.
pub fn render_pixel(viewport: &Viewport, world: &dyn Hittable, x: u32, y: u32, rng: &mut dyn RngCore) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..viewport.samples_per_pixel() {
        let ray = viewport.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, viewport.max_depth(), viewport.background(), rng);
    }

    pixel_color / viewport.samples_per_pixel() as f64
}

/// Row-major linear colors, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Gamma corrected RGB bytes, three per pixel, in scan order.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|color| color_to_rgb(*color)).collect()
    }
}

/// Render the entire image on the calling thread.
///
/// Produces exactly the same pixels as the bucketed parallel renderer.
pub fn render(viewport: &Viewport, world: &dyn Hittable, seed: u64) -> ImageBuffer {
    let mut image = ImageBuffer::new(viewport.image_width(), viewport.image_height());

    for y in 0..viewport.image_height() {
        for x in 0..viewport.image_width() {
            let mut rng = pixel_rng(seed, x, y);
            let color = render_pixel(viewport, world, x, y, &mut rng);
            image.set(x, y, color);
        }
    }

    image
}
