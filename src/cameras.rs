//! Cameras and configs for cameras
use crate::utils::{self, SerdeVector};
use crate::{Point, Ray, Vec3};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Camera Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub look_from: SerdeVector,
    pub look_at: SerdeVector,
    pub v_up: SerdeVector,
    pub vertical_fov_deg: f64,
    pub aspect_ratio: f64,
    pub aperture: f64,
    pub focus_distance: f64,
    /// Shutter opens
    #[serde(default)]
    pub time0: f64,
    /// Shutter closes
    #[serde(default)]
    pub time1: f64,
}

/// Camera and related tasks
#[derive(Debug)]
pub struct Camera {
    origin: Point,
    lower_left_corner: Point,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    _w: Vec3,
    lens_radius: f64,
    time0: f64,
    time1: f64,
}
impl Camera {
    pub fn new(
        look_from: Point,
        look_at: Point,
        v_up: Vec3,
        vertical_fov_deg: f64,
        aspect_ratio: f64,
        aperture: f64,
        focus_dist: f64,
        time0: f64,
        time1: f64,
    ) -> Self {
        // Establish the viewport
        let theta = vertical_fov_deg.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        // Calculate the viewing vectors
        let w = (look_from - look_at).normalize();
        let u = (v_up.cross(&w)).normalize();
        let v = w.cross(&u);

        let origin = look_from;
        let horizontal = focus_dist * viewport_width * u;
        let vertical = focus_dist * viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - focus_dist * w;

        let lens_radius = aperture / 2.0;

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            _w: w,
            lens_radius,
            time0,
            time1,
        }
    }

    pub fn from_config(config: CameraConfig) -> Self {
        Self::new(
            config.look_from.into(),
            config.look_at.into(),
            config.v_up.into(),
            config.vertical_fov_deg,
            config.aspect_ratio,
            config.aperture,
            config.focus_distance,
            config.time0,
            config.time1,
        )
    }

    /// One ray through normalized viewport coordinates (s, t)
    ///
    /// The origin is jittered within the lens disk for defocus blur, and the
    /// time sample is drawn uniformly from the shutter window.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * utils::random_in_unit_disk(rng);
        let offset = self.u * rd[0] + self.v * rd[1];

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin - offset,
            rng.gen_range(self.time0..=self.time1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn pinhole(time0: f64, time1: f64) -> Camera {
        Camera::new(
            Point::zeros(),
            Point::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            90.0,
            1.0,
            0.0,
            1.0,
            time0,
            time1,
        )
    }

    #[test]
    fn center_ray_points_at_the_look_target() {
        let camera = pinhole(0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(17);
        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert!((ray.orig - Point::zeros()).norm() < 1e-12);
        assert!((ray.dir.normalize() - Vec3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn ray_times_stay_inside_the_shutter_window() {
        let camera = pinhole(0.25, 0.75);
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..100 {
            let ray = camera.get_ray(0.3, 0.6, &mut rng);
            assert!(ray.time >= 0.25 && ray.time <= 0.75);
        }
    }
}
