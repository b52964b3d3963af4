//! Scene descriptions
//!
//! A scene is one camera plus one world list, either deserialized from a
//! config file or produced by one of the builtin constructors.

use std::sync::Arc;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{
    cameras::{Camera, CameraConfig},
    materials::{Dielectric, Lambertian, Metal},
    objects::{HittableList, HittableListConfig, MovingSphere, Sphere},
    utils, Color, Point, Vec3,
};

/// Scene Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub world: HittableListConfig,
}
impl SceneConfig {
    pub fn build(self) -> (Camera, HittableList) {
        (
            Camera::from_config(self.camera),
            HittableList::from_config(self.world),
        )
    }
}

/// The fixed five-sphere arrangement: a diffuse ground, a diffuse and a
/// fuzzy-metal sphere, and a hollow glass shell made by nesting a
/// negative-radius bubble inside a glass sphere
pub fn three_spheres() -> HittableList {
    let mut world = HittableList::default();
    world.add(Arc::new(Sphere::new(
        Point::new(0.0, 0.0, -1.0),
        0.5,
        Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5))),
    )));
    world.add(Arc::new(Sphere::new(
        Point::new(0.0, -100.5, -1.0),
        100.0,
        Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0))),
    )));
    world.add(Arc::new(Sphere::new(
        Point::new(1.0, 0.0, -1.0),
        0.5,
        Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.3)),
    )));
    world.add(Arc::new(Sphere::new(
        Point::new(-1.0, 0.0, -1.0),
        0.5,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Point::new(-1.0, 0.0, -1.0),
        -0.45,
        Arc::new(Dielectric::new(1.5)),
    )));
    world
}

/// A ground plane and a grid of small random spheres under three large ones
///
/// Diffuse spheres drift upward over the shutter window for motion blur.
pub fn random_scene(rng: &mut dyn RngCore) -> HittableList {
    let mut world = HittableList::default();
    world.add(Arc::new(Sphere::new(
        Point::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
    )));

    for a in -10..10 {
        for b in -10..10 {
            let choose_mat = rng.gen::<f64>();
            let center = Point::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );
            if (center - Point::new(4.0, 0.2, 0.0)).norm() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // Diffuse
                let albedo = utils::gen_random(rng, 3, None, None)
                    .component_mul(&utils::gen_random(rng, 3, None, None));
                let final_center = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                world.add(Arc::new(MovingSphere::new(
                    center,
                    final_center,
                    0.0,
                    1.0,
                    0.2,
                    Arc::new(Lambertian::new(albedo)),
                )));
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = utils::gen_random(rng, 3, Some(0.5), Some(1.0));
                let fuzz = rng.gen_range(0.0..0.5);
                world.add(Arc::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Metal::new(albedo, fuzz)),
                )));
            } else {
                // Glass
                world.add(Arc::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Dielectric::new(1.5)),
                )));
            }
        }
    }

    world.add(Arc::new(Sphere::new(
        Point::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Point::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Arc::new(Sphere::new(
        Point::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));
    world
}

/// Camera used when no scene file supplies one
pub fn default_camera(aspect_ratio: f64) -> Camera {
    Camera::new(
        Point::new(13.0, 2.0, 3.0),
        Point::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        20.0,
        aspect_ratio,
        0.0,
        10.0,
        0.0,
        1.0,
    )
}
