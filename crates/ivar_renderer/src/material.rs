//! Material trait for surface scattering.

use crate::hittable::HitRecord;
use crate::sampling::{gen_f64, random_unit_vector};
use ivar_math::{near_zero, Ray, Vec3};
use rand::RngCore;

/// Color type alias (linear RGB, typically 0-1 but emitters may exceed 1)
pub type Color = Vec3;

/// Outcome of a successful scatter: the attenuation to apply and the ray to
/// keep tracing.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

impl ScatterResult {
    pub fn new(attenuation: Color, scattered: Ray) -> Self {
        Self {
            attenuation,
            scattered,
        }
    }
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// Materials are immutable and shared between any number of objects.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `Some` if the ray scatters, or `None` if it is absorbed and the
    /// path ends here.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;

    /// Light emitted by the surface at the hit point.
    ///
    /// Evaluated whether or not `scatter` succeeds. Most materials return black.
    fn emitted(&self, _rec: &HitRecord) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        let scattered = Ray::new(rec.p, scatter_direction, ray_in.time());
        Some(ScatterResult::new(self.albedo, scattered))
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough. Clamped to [0, 1].
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_unit_vector(rng);

        // Fuzz may push the ray below the surface; those rays are absorbed
        if scattered_dir.dot(rec.normal) > 0.0 {
            let scattered = Ray::new(rec.p, scattered_dir, ray_in.time());
            Some(ScatterResult::new(self.albedo, scattered))
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond).
    ///   Values below 1 model an air bubble inside a denser medium.
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f64, ior: f64) -> f64 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f64(rng) {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        let scattered = Ray::new(rec.p, direction, ray_in.time());
        Some(ScatterResult::new(Color::ONE, scattered))
    }
}

/// Light source. Never scatters; reports its radiance through `emitted`.
#[derive(Debug, Clone)]
pub struct Emissive {
    radiance: Color,
}

impl Emissive {
    pub fn new(radiance: Color) -> Self {
        Self { radiance }
    }
}

impl Material for Emissive {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, _rec: &HitRecord) -> Color {
        self.radiance
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface (Snell's law).
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Hit record at the origin with the given (against-the-ray) normal.
    fn record(material: &dyn Material, normal: Vec3, front_face: bool) -> HitRecord<'_> {
        HitRecord {
            p: Vec3::ZERO,
            normal,
            material,
            u: 0.0,
            v: 0.0,
            t: 1.0,
            front_face,
        }
    }

    #[test]
    fn test_lambertian_always_scatters() {
        let material = Lambertian::new(Color::new(0.8, 0.3, 0.1));
        let rec = record(&material, Vec3::Y, true);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 0.25);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..1000 {
            let result = material.scatter(&ray, &rec, &mut rng).expect("lambertian must scatter");
            assert_eq!(result.attenuation, Color::new(0.8, 0.3, 0.1));
            assert!(result.scattered.direction().dot(Vec3::Y) >= 0.0);
            assert!(!near_zero(result.scattered.direction()));
            assert_eq!(result.scattered.time(), 0.25);
        }
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let material = Metal::new(Color::ONE, 0.0);
        let rec = record(&material, Vec3::Y, true);
        let ray = Ray::new_simple(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(2);

        let result = material.scatter(&ray, &rec, &mut rng).expect("mirror reflects");
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-12);
    }

    #[test]
    fn test_metal_absorbs_below_surface() {
        // Normal pointing along the ray: the mirror direction goes into the surface
        let material = Metal::new(Color::ONE, 0.0);
        let rec = record(&material, Vec3::new(0.0, -1.0, 0.0), true);
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(3);

        assert!(material.scatter(&ray, &rec, &mut rng).is_none());
    }

    #[test]
    fn test_metal_fuzz_decides_absorption_by_direction() {
        let material = Metal::new(Color::splat(0.9), 1.0);
        let rec = record(&material, Vec3::Y, true);
        // Grazing incidence so fuzz frequently pushes below the surface
        let ray = Ray::new_simple(Vec3::new(-1.0, 0.01, 0.0), Vec3::new(1.0, -0.01, 0.0));

        let mut absorbed = 0;
        for seed in 0..500 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut replay = StdRng::seed_from_u64(seed);

            let reflected = reflect(ray.direction().normalize(), rec.normal);
            let direction = reflected + material.fuzz() * random_unit_vector(&mut replay);

            match material.scatter(&ray, &rec, &mut rng) {
                Some(result) => {
                    assert!(direction.dot(rec.normal) > 0.0);
                    assert_eq!(result.scattered.direction(), direction);
                }
                None => {
                    assert!(direction.dot(rec.normal) <= 0.0);
                    absorbed += 1;
                }
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_metal_fuzz_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz(), 1.0);
        assert_eq!(Metal::new(Color::ONE, -1.0).fuzz(), 0.0);
    }

    #[test]
    fn test_dielectric_normal_incidence_goes_straight_through() {
        let material = Dielectric::new(1.5);
        let rec = record(&material, Vec3::Z, true);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));

        let mut refracted = 0;
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = material.scatter(&ray, &rec, &mut rng).expect("glass always scatters");
            assert_eq!(result.attenuation, Color::ONE);

            let dir = result.scattered.direction();
            if dir.z < 0.0 {
                refracted += 1;
                assert!((dir - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-9);
            } else {
                assert!((dir - Vec3::Z).length() < 1e-9);
            }
        }
        // Schlick reflectance at normal incidence is 4%
        assert!(refracted > 170);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        // Leaving glass at a steep angle
        let material = Dielectric::new(1.5);
        let rec = record(&material, Vec3::Y, false);
        let ray = Ray::new_simple(Vec3::new(-1.0, 0.2, 0.0), Vec3::new(1.0, -0.2, 0.0));
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..100 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert!(result.scattered.direction().dot(rec.normal) > 0.0);
        }
    }

    #[test]
    fn test_schlick_reflectance() {
        assert!((Dielectric::reflectance(1.0, 1.5) - 0.04).abs() < 1e-12);
        assert!((Dielectric::reflectance(0.0, 1.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_emissive_never_scatters() {
        let material = Emissive::new(Color::new(4.0, 2.0, 2.0));
        let rec = record(&material, Vec3::Y, true);
        let ray = Ray::new_simple(Vec3::Y, -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(material.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(material.emitted(&rec), Color::new(4.0, 2.0, 2.0));
    }

    #[test]
    fn test_non_emissive_materials_emit_black() {
        let lambertian = Lambertian::new(Color::ONE);
        let rec = record(&lambertian, Vec3::Y, true);
        assert_eq!(lambertian.emitted(&rec), Color::ZERO);
        assert_eq!(Metal::new(Color::ONE, 0.1).emitted(&rec), Color::ZERO);
        assert_eq!(Dielectric::new(1.5).emitted(&rec), Color::ZERO);
    }
}
