//! Monte-Carlo path tracing library

use std::sync::Arc;

use nalgebra::Vector3;
use rand::RngCore;

pub mod bvh;
pub mod cameras;
pub mod materials;
pub mod objects;
pub mod scenes;
pub mod utils;

use materials::Scatterable;
use objects::Hittable;

pub type Vec3 = Vector3<f64>;
pub type Point = Vec3;
pub type Color = Vec3;
pub type Material = Arc<dyn Scatterable + Send + Sync>;

/// Prelude
pub mod prelude {
    pub use crate::bvh::{Aabb, BvhError, BvhNode};
    pub use crate::cameras::Camera;
    pub use crate::materials::{Dielectric, Lambertian, Metal};
    pub use crate::objects::{
        FlipFace, HittableList, HittableObj, MovingSphere, Sphere,
    };
    pub use crate::{Color, Material, Point, Ray, Vec3};
}

/// The ray in ray tracing
#[derive(Debug)]
pub struct Ray {
    pub orig: Point,
    pub dir: Vec3,
    /// Instant within the shutter window the ray samples, for motion blur
    pub time: f64,
}
impl Ray {
    pub fn new(orig: Point, dir: Vec3, time: f64) -> Self {
        Self { orig, dir, time }
    }

    pub fn get(&self, t: f64) -> Point {
        self.orig + t * self.dir
    }

    /// Radiance carried back along this ray
    ///
    /// Attenuation composes multiplicatively along the scatter chain. An
    /// absorbed ray and an exhausted depth budget both terminate in black; a
    /// miss blends white and blue depending on height of y.
    pub fn get_color(&self, obj: &impl Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
        // If we have exceeded the ray bounce limit, no more light is gathered
        if depth == 0 {
            return Color::zeros();
        }

        // Put a minimum of 0.001 to reduce shadow acne
        if let Some(hr) = obj.try_hit(self, 0.001, f64::INFINITY) {
            if let Some(sr) = hr.material.try_scatter(self, &hr, rng) {
                return sr
                    .attenuation
                    .component_mul(&sr.scattered.get_color(obj, depth - 1, rng));
            }
            return Color::zeros();
        }
        let unit_direction = self.dir.normalize();
        let t = 0.5 * (unit_direction[1] + 1.0);
        (1.0 - t) * Color::new(1.0, 1.0, 1.0) + t * Color::new(0.5, 0.7, 1.0)
    }
}
