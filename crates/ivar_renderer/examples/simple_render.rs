//! Simple path tracer example.
//!
//! Renders the classic field of random spheres and saves it as PPM.

use ivar_renderer::{
    save_image, BvhNode, Camera, Color, Dielectric, HittableList, Lambertian, Material, Metal, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Ivar Path Tracer - Simple Example");
    println!("=================================");

    let start = std::time::Instant::now();
    let world = BvhNode::from_list(&build_scene());
    println!("Scene built in {:?}", start.elapsed());

    let mut camera = Camera::default()
        .with_resolution(800, 16.0 / 9.0)
        .with_quality(50, 10)
        .with_position(
            Vec3::new(13.0, 2.0, 3.0), // lookfrom
            Vec3::new(0.0, 0.0, 0.0),  // lookat
            Vec3::new(0.0, 1.0, 0.0),  // vup
        )
        .with_lens(20.0, 0.6, 10.0);

    let start = std::time::Instant::now();
    let image = camera.render(&world, 0)?;
    println!("Rendered {}x{} in {:?}", image.width, image.height, start.elapsed());

    let filename = Path::new("output.ppm");
    save_image(&image, filename)?;
    println!("Saved to {}", filename.display());
    Ok(())
}

fn build_scene() -> HittableList {
    let mut world = HittableList::new();
    let mut rng = StdRng::seed_from_u64(2024);

    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
    )));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5)))));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(a as f64 + 0.9 * rng.gen::<f64>(), 0.2, b as f64 + 0.9 * rng.gen::<f64>());
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f64 = rng.gen();
            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                let albedo = Color::new(rng.gen(), rng.gen(), rng.gen()) * Color::new(rng.gen(), rng.gen(), rng.gen());
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                let albedo = Color::new(rng.gen_range(0.5..1.0), rng.gen_range(0.5..1.0), rng.gen_range(0.5..1.0));
                Arc::new(Metal::new(albedo, rng.gen_range(0.0..0.5)))
            } else {
                Arc::new(Dielectric::new(1.5))
            };
            world.add(Arc::new(Sphere::new(center, 0.2, material)));
        }
    }

    println!("Created {} objects", world.len());
    world
}
