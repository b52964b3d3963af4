//! Implementation of materials

use std::sync::Arc;

use crate::{
    objects::HitRecord,
    utils::{self, SerdeVector},
    Color, Material, Ray,
};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Material
pub trait Scatterable {
    /// Decide whether the incoming ray scatters at the hit, and how
    ///
    /// None means the ray was absorbed.
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;
}

/// Scatter Result
#[derive(Debug)]
pub struct ScatterResult {
    /// Attenuation Color
    pub attenuation: Color,
    /// Resulting Scattered Ray
    pub scattered: Ray,
}

/// Config for materials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MaterialConfig {
    Lambertian(LambertianConfig),
    Metal(MetalConfig),
    Dielectric(DielectricConfig),
}

/// Generator from config
pub struct Generator;
impl Generator {
    pub fn from_config(config: MaterialConfig) -> Material {
        match config {
            MaterialConfig::Lambertian(c) => Arc::new(Lambertian::from_config(c)),
            MaterialConfig::Metal(c) => Arc::new(Metal::from_config(c)),
            MaterialConfig::Dielectric(c) => Arc::new(Dielectric::from_config(c)),
        }
    }
}

/// Lambertian Scatterer
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}
impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_config(config: LambertianConfig) -> Self {
        Self::new(config.albedo.into())
    }
}
impl Scatterable for Lambertian {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = hit_record.normal + utils::random_unit_vector(rng);

        // Protect against the normal and the random unit vector being exact opposites
        if scatter_direction.norm() < 1e-8 {
            scatter_direction = hit_record.normal;
        }
        let scattered = Ray::new(hit_record.p, scatter_direction, ray_in.time);
        Some(ScatterResult {
            attenuation: self.albedo,
            scattered,
        })
    }
}

/// Lambertian Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambertianConfig {
    pub albedo: SerdeVector,
}

/// Metal Scatterer
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}
impl Metal {
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.min(1.0),
        }
    }

    pub fn from_config(config: MetalConfig) -> Self {
        Self::new(config.albedo.into(), config.fuzz)
    }
}
impl Scatterable for Metal {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = utils::reflect(&ray_in.dir.normalize(), &hit_record.normal);
        let scattered = Ray::new(
            hit_record.p,
            reflected + self.fuzz * utils::random_in_unit_sphere(rng),
            ray_in.time,
        );
        // A fuzzed reflection that grazes into the surface is extinguished
        if scattered.dir.dot(&hit_record.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered,
            })
        } else {
            None
        }
    }
}

/// Metal Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetalConfig {
    pub albedo: SerdeVector,
    fuzz: f64,
}

/// A Dielectric is a refractive material, such as glass
#[derive(Debug, Clone)]
pub struct Dielectric {
    ir: f64,
}
impl Dielectric {
    pub fn new(ir: f64) -> Self {
        Self { ir }
    }

    pub fn from_config(config: DielectricConfig) -> Self {
        Self { ir: config.ir }
    }

    fn reflectance(cosine: f64, ref_idx: f64) -> f64 {
        // Use Schlick's approximation for reflectance
        let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}
impl Scatterable for Dielectric {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let attenuation = Color::new(1.0, 1.0, 1.0);
        let refraction_ratio = if hit_record.front_face {
            1.0 / self.ir
        } else {
            self.ir
        };

        let unit_direction = ray_in.dir.normalize();
        let cos_theta = (-unit_direction.dot(&hit_record.normal)).min(1.0);
        let sin_theta = (1.0 - cos_theta.powi(2)).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > rng.gen::<f64>()
        {
            utils::reflect(&unit_direction, &hit_record.normal)
        } else {
            utils::refract(&unit_direction, &hit_record.normal, refraction_ratio)
        };

        let scattered = Ray::new(hit_record.p, direction, ray_in.time);
        Some(ScatterResult {
            attenuation,
            scattered,
        })
    }
}

/// Dielectric Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DielectricConfig {
    pub ir: f64,
}
