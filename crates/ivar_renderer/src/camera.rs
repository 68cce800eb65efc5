//! Camera configuration and ray generation.
//!
//! A [`Camera`] holds the user-facing [`CameraConfig`]. The derived
//! [`Viewport`] (image height, basis vectors, pixel grid, defocus disk) is
//! computed once, lazily, before the first render and is read-only afterwards.

use crate::bucket::{render_parallel, DEFAULT_BUCKET_SIZE};
use crate::renderer::{Background, ImageBuffer};
use crate::sampling::{gen_f64, random_in_unit_disk, sample_square};
use crate::Hittable;
use ivar_math::{near_zero, Point3, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors, reported before any rendering work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("Image width must be at least 1 pixel")]
    InvalidImageWidth,

    #[error("Samples per pixel must be at least 1")]
    InvalidSampleCount,

    #[error("Invalid aspect ratio: {0}")]
    InvalidAspectRatio(f64),

    #[error("Vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f64),

    #[error("Focus distance must be positive, got {0}")]
    InvalidFocusDistance(f64),

    #[error("Defocus angle must be in [0, 180) degrees, got {0}")]
    InvalidDefocusAngle(f64),

    #[error("Camera looks from and at the same point")]
    DegenerateView,

    #[error("Up vector is parallel to the view direction")]
    DegenerateUpVector,
}

pub type CameraResult<T> = Result<T, CameraError>;

/// Flat set of camera and render parameters, as supplied by scene setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Image width over height
    pub aspect_ratio: f64,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Random samples averaged per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,
    /// Vertical field of view in degrees
    pub vfov: f64,
    /// Point the camera looks from
    pub lookfrom: Point3,
    /// Point the camera looks at
    pub lookat: Point3,
    /// Camera-relative "up" direction
    pub vup: Vec3,
    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f64,
    /// Distance from camera to the plane of perfect focus
    pub focus_dist: f64,
    /// What rays that escape the scene see
    pub background: Background,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 400,
            samples_per_pixel: 100,
            max_depth: 50,
            vfov: 90.0,
            lookfrom: Point3::ZERO,
            lookat: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            background: Background::Gradient,
        }
    }
}

impl CameraConfig {
    /// Check the configuration for values no render could succeed with.
    pub fn validate(&self) -> CameraResult<()> {
        if self.image_width == 0 {
            return Err(CameraError::InvalidImageWidth);
        }
        if self.samples_per_pixel == 0 {
            return Err(CameraError::InvalidSampleCount);
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(CameraError::InvalidAspectRatio(self.aspect_ratio));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(CameraError::InvalidFieldOfView(self.vfov));
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return Err(CameraError::InvalidFocusDistance(self.focus_dist));
        }
        if !(self.defocus_angle >= 0.0 && self.defocus_angle < 180.0) {
            return Err(CameraError::InvalidDefocusAngle(self.defocus_angle));
        }
        if near_zero(self.lookfrom - self.lookat) {
            return Err(CameraError::DegenerateView);
        }
        let w = (self.lookfrom - self.lookat).normalize();
        if near_zero(self.vup.cross(w)) {
            return Err(CameraError::DegenerateUpVector);
        }
        Ok(())
    }

    /// Image height implied by the width and aspect ratio, at least 1.
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f64 / self.aspect_ratio) as u32).max(1)
    }
}

/// State derived from a [`CameraConfig`]; everything ray generation needs.
#[derive(Debug, Clone)]
pub struct Viewport {
    image_width: u32,
    image_height: u32,
    samples_per_pixel: u32,
    max_depth: u32,
    background: Background,

    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_angle: f64,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Viewport {
    /// Validate `config` and derive the viewport from it.
    pub fn new(config: &CameraConfig) -> CameraResult<Self> {
        config.validate()?;

        let image_width = config.image_width;
        let image_height = config.image_height();
        let center = config.lookfrom;

        // Calculate viewport dimensions
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * config.focus_dist;
        let viewport_width = viewport_height * config.aspect_ratio;

        // Calculate camera basis vectors
        let w = (config.lookfrom - config.lookat).normalize();
        let u = config.vup.cross(w).normalize();
        let v = w.cross(u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        let pixel_delta_u = viewport_u / image_width as f64;
        let pixel_delta_v = viewport_v / image_height as f64;

        // Upper left pixel center
        let viewport_upper_left = center - config.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = config.focus_dist * (config.defocus_angle / 2.0).to_radians().tan();

        Ok(Self {
            image_width,
            image_height,
            samples_per_pixel: config.samples_per_pixel,
            max_depth: config.max_depth,
            background: config.background,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_angle: config.defocus_angle,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
        })
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn background(&self) -> Background {
        self.background
    }

    /// Camera basis (u right, v up, w backwards).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Center of pixel (i, j), without jitter.
    pub fn pixel_center(&self, i: u32, j: u32) -> Point3 {
        self.pixel00_loc + (i as f64) * self.pixel_delta_u + (j as f64) * self.pixel_delta_v
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The target is jittered within the pixel footprint and the origin is
    /// sampled on the defocus disk (or is the camera center for a pinhole).
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f64) + offset.x) * self.pixel_delta_u
            + ((j as f64) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f64(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone, Default)]
pub struct Camera {
    config: CameraConfig,
    /// Derived state, `None` until initialized
    viewport: Option<Viewport>,
}

impl Camera {
    /// Create a camera from a configuration. Nothing is derived yet.
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            viewport: None,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Replace the configuration, discarding derived state.
    pub fn set_config(&mut self, config: CameraConfig) {
        self.config = config;
        self.viewport = None;
    }

    /// Set image width and aspect ratio.
    pub fn with_resolution(mut self, image_width: u32, aspect_ratio: f64) -> Self {
        self.config.image_width = image_width;
        self.config.aspect_ratio = aspect_ratio;
        self.viewport = None;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.config.samples_per_pixel = samples_per_pixel;
        self.config.max_depth = max_depth;
        self.viewport = None;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, lookfrom: Point3, lookat: Point3, vup: Vec3) -> Self {
        self.config.lookfrom = lookfrom;
        self.config.lookat = lookat;
        self.config.vup = vup;
        self.viewport = None;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.config.vfov = vfov;
        self.config.defocus_angle = defocus_angle;
        self.config.focus_dist = focus_dist;
        self.viewport = None;
        self
    }

    /// Set what escaping rays see.
    pub fn with_background(mut self, background: Background) -> Self {
        self.config.background = background;
        self.viewport = None;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.viewport.is_some()
    }

    /// Derived state, if the camera has been initialized.
    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    /// Validate the configuration and derive the viewport.
    ///
    /// Idempotent: once initialized the cached viewport is returned as is.
    pub fn initialize(&mut self) -> CameraResult<&Viewport> {
        let viewport = match self.viewport.take() {
            Some(viewport) => viewport,
            None => {
                let viewport = Viewport::new(&self.config)?;
                log::debug!(
                    "Camera initialized: {}x{}, {} spp, depth {}, vfov {}, defocus {}",
                    viewport.image_width,
                    viewport.image_height,
                    viewport.samples_per_pixel,
                    viewport.max_depth,
                    self.config.vfov,
                    self.config.defocus_angle
                );
                if viewport.max_depth == 0 {
                    log::warn!("max_depth is 0, every pixel will be black");
                }
                viewport
            }
        };
        Ok(self.viewport.insert(viewport))
    }

    /// Render `world` on all rayon threads, initializing the camera first.
    ///
    /// Output depends only on the configuration, the scene and `seed`.
    pub fn render(&mut self, world: &dyn Hittable, seed: u64) -> CameraResult<ImageBuffer> {
        let viewport = self.initialize()?;
        Ok(render_parallel(viewport, world, seed, DEFAULT_BUCKET_SIZE))
    }
}
