//! Utils

use image::Rgb;
use nalgebra::Vector3;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
type Vec3 = Vector3<f64>;
use super::Color;

/// A plain-array vector for scene files
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SerdeVector(pub [f64; 3]);
impl From<SerdeVector> for Vec3 {
    fn from(v: SerdeVector) -> Self {
        Vec3::new(v.0[0], v.0[1], v.0[2])
    }
}

/// Compute a random vector inside the unit sphere
///
/// Randomly generate vectors. If the norm is < 1, it is inside the unit sphere.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = gen_random(rng, 3, Some(-1.0), Some(1.0));

        if p.norm().powi(2) < 1.0 {
            return p;
        }
    }
}

/// A random unit-length direction, the Lambertian scatter distribution
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    random_in_unit_sphere(rng).normalize()
}

/// Generate a random vector inside a unit disk
/// This simulates defocus blur
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0);
        if p.norm().powi(2) < 1.0 {
            return p;
        }
    }
}

/// Mirror reflection of v about the normal n
pub fn reflect(v: &Vec3, n: &Vec3) -> Vec3 {
    *v - 2.0 * v.dot(n) * *n
}

/// Refraction of the unit vector uv through a surface with normal n, by the
/// vector decomposition of Snell's law
pub fn refract(uv: &Vec3, n: &Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-*uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (*uv + cos_theta * *n);
    let r_out_parallel = -(1.0 - r_out_perp.norm().powi(2)).abs().sqrt() * *n;
    r_out_perp + r_out_parallel
}

/// Average accumulated samples into one 8-bit pixel
pub fn get_pixel(color: &Color, samples_per_pixel: usize) -> Rgb<u8> {
    let scale = 1.0 / samples_per_pixel as f64;

    // Divide the color by the number of samples and gamma-correct for gamma = 2.0
    let r = scale_color((scale * color[0]).sqrt());
    let g = scale_color((scale * color[1]).sqrt());
    let b = scale_color((scale * color[2]).sqrt());

    Rgb([r, g, b])
}

/// scale the color to between 0 and 255
fn scale_color(val: f64) -> u8 {
    (256.0 * val.min(0.999).max(0.0)) as u8
}

/// Generate Random Vectors
pub fn gen_random(rng: &mut dyn RngCore, len: usize, min: Option<f64>, max: Option<f64>) -> Vec3 {
    Vec3::from_vec(
        (0..len)
            .map(|_| match (min, max) {
                (Some(min), Some(max)) => rng.gen_range(min..max),
                _ => rng.gen(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn reflect_about_vertical_normal() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let n = Vec3::new(0.0, 1.0, 0.0);
        assert!((reflect(&v, &n) - Vec3::new(1.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn refract_head_on_passes_straight_through() {
        let uv = Vec3::new(0.0, 0.0, -1.0);
        let n = Vec3::new(0.0, 0.0, 1.0);
        let refracted = refract(&uv, &n, 1.0 / 1.5);
        assert!((refracted - Vec3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn unit_sphere_samples_stay_inside() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(random_in_unit_sphere(&mut rng).norm() < 1.0);
        }
    }

    #[test]
    fn unit_vector_samples_are_normalized() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert!((random_unit_vector(&mut rng).norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn unit_disk_samples_are_planar() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let p = random_in_unit_disk(&mut rng);
            assert_eq!(p[2], 0.0);
            assert!(p.norm() < 1.0);
        }
    }

    #[test]
    fn pixels_are_averaged_gamma_corrected_and_clamped() {
        // Two samples summing to (2, 0, 8): average, sqrt, clamp, scale
        let color = Color::new(2.0, 0.0, 8.0);
        assert_eq!(get_pixel(&color, 2), Rgb([255, 0, 255]));

        let gray = Color::new(0.5, 0.5, 0.5);
        let px = get_pixel(&gray, 2);
        // sqrt(0.25) = 0.5 -> 128 per channel
        assert_eq!(px, Rgb([128, 128, 128]));
    }
}
