//! Demo scenes: the objects, materials and camera for each `--scene` choice.

use clap::ValueEnum;
use ivar_math::{Point3, Vec3};
use ivar_renderer::{
    Background, CameraConfig, Color, Cube, Dielectric, Emissive, HittableList, Lambertian, Material, Metal, Sphere,
    Tetrahedron,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Glowing sphere between a metal and a glass sphere
    Emissive,
    /// Spheres, a glass bubble, a metal cube and a tetrahedron
    Shapes,
    /// Field of small random spheres around three large ones
    Random,
}

/// Build the scene and its camera. `seed` drives any random placement.
pub fn build(kind: SceneKind, seed: u64) -> (HittableList, CameraConfig) {
    match kind {
        SceneKind::Emissive => emissive(),
        SceneKind::Shapes => shapes(),
        SceneKind::Random => random(seed),
    }
}

/// Camera shared by the small scenes: up and to the left, shallow depth of field.
fn close_up_camera() -> CameraConfig {
    CameraConfig {
        aspect_ratio: 16.0 / 9.0,
        image_width: 400,
        samples_per_pixel: 100,
        max_depth: 50,
        vfov: 30.0,
        lookfrom: Point3::new(-2.0, 2.0, 1.0),
        lookat: Point3::new(0.0, 0.0, -1.0),
        vup: Vec3::Y,
        defocus_angle: 10.0,
        focus_dist: 3.4,
        background: Background::Gradient,
    }
}

fn emissive() -> (HittableList, CameraConfig) {
    let ground = Arc::new(Lambertian::new(Color::new(0.2, 0.8, 0.2)));
    let left = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.3));
    let center = Arc::new(Emissive::new(Color::new(4.0, 2.0, 2.0)));
    let right = Arc::new(Dielectric::new(1.5));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, ground)));
    world.add(Arc::new(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, center)));
    world.add(Arc::new(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.5, left)));
    world.add(Arc::new(Sphere::new(Point3::new(1.0, 0.0, -1.0), 0.5, right)));

    (world, close_up_camera())
}

fn shapes() -> (HittableList, CameraConfig) {
    let ground = Arc::new(Lambertian::new(Color::new(0.2, 0.8, 0.2)));
    let center = Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5)));
    let glass = Arc::new(Dielectric::new(1.5));
    let bubble = Arc::new(Dielectric::new(1.0 / 1.5));
    let right = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 1.0));
    let cube = Arc::new(Metal::new(Color::new(0.95, 0.64, 0.54), 1.0));
    let tetra = Arc::new(Metal::new(Color::new(0.9, 0.2, 0.2), 0.8));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, ground)));
    world.add(Arc::new(Sphere::new(Point3::new(0.0, 0.0, -1.2), 0.5, center)));
    world.add(Arc::new(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.5, glass)));
    world.add(Arc::new(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.4, bubble)));
    world.add(Arc::new(Sphere::new(Point3::new(1.0, 0.0, -1.0), 0.5, right)));
    world.add(Arc::new(Cube::new(Point3::new(-0.5, 0.5, -2.8), 1.0, cube)));
    world.add(Arc::new(Tetrahedron::new(
        Point3::new(1.5, 0.0, -2.5),
        Point3::new(2.0, 0.0, -2.0),
        Point3::new(1.5, 0.0, -3.0),
        Point3::new(1.7, 1.0, -2.5),
        tetra,
    )));

    (world, close_up_camera())
}

fn random(seed: u64) -> (HittableList, CameraConfig) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = HittableList::new();

    let ground = Arc::new(Lambertian::new(Color::splat(0.5)));
    world.add(Arc::new(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0, ground)));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f64 = rng.gen();
            let center = Point3::new(a as f64 + 0.9 * rng.gen::<f64>(), 0.2, b as f64 + 0.9 * rng.gen::<f64>());

            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // Diffuse spheres bounce upward during the exposure
                let albedo = random_color(&mut rng, 0.0, 1.0) * random_color(&mut rng, 0.0, 1.0);
                let material: Arc<dyn Material> = Arc::new(Lambertian::new(albedo));
                let center1 = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                world.add(Arc::new(Sphere::moving(center, center1, 0.2, material)));
            } else if choose_mat < 0.95 {
                let albedo = random_color(&mut rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0..0.5);
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz)))));
            } else {
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5)))));
            }
        }
    }

    world.add(Arc::new(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5)))));
    world.add(Arc::new(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let camera = CameraConfig {
        aspect_ratio: 16.0 / 9.0,
        image_width: 400,
        samples_per_pixel: 100,
        max_depth: 50,
        vfov: 20.0,
        lookfrom: Point3::new(13.0, 2.0, 3.0),
        lookat: Point3::ZERO,
        vup: Vec3::Y,
        defocus_angle: 0.6,
        focus_dist: 10.0,
        background: Background::Gradient,
    };

    (world, camera)
}

fn random_color(rng: &mut StdRng, min: f64, max: f64) -> Color {
    Color::new(rng.gen_range(min..max), rng.gen_range(min..max), rng.gen_range(min..max))
}
