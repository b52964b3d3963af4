//! Objects
use std::sync::Arc;

use crate::{
    bvh::Aabb,
    materials::{self, MaterialConfig},
    utils::SerdeVector,
    Material, Point, Ray, Vec3,
};
use serde::{Deserialize, Serialize};

pub type HittableObj = Arc<dyn Hittable + Send + Sync>;

pub trait Hittable {
    /// Nearest intersection strictly inside the open interval (t_min, t_max)
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord>;

    /// A box containing the object over the time window, if one exists
    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb>;
}

#[derive(Default)]
pub struct HittableList(pub Vec<HittableObj>);
impl HittableList {
    pub fn add(&mut self, obj: HittableObj) {
        self.0.push(obj)
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_config(config: HittableListConfig) -> Self {
        let mut s = Self::default();
        for obj_cfg in config.objects {
            match obj_cfg {
                ObjectConfig::Sphere(c) => s.add(Arc::new(Sphere::from_config(c))),
                ObjectConfig::MovingSphere(c) => s.add(Arc::new(MovingSphere::from_config(c))),
            }
        }
        s
    }
}
impl Hittable for HittableList {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let mut closest_so_far = t_max;
        let mut hr_final = None;

        for obj in &self.0 {
            if let Some(hr) = obj.try_hit(ray, t_min, closest_so_far) {
                closest_so_far = hr.t;
                hr_final = Some(hr)
            }
        }
        hr_final
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        if self.0.is_empty() {
            return None;
        }
        let mut output_box: Option<Aabb> = None;

        for obj in &self.0 {
            match obj.try_bounding_box(time0, time1) {
                Some(tmp_box) => {
                    output_box = if let Some(output_box) = output_box {
                        Some(output_box.surrounding_box(&tmp_box))
                    } else {
                        Some(tmp_box)
                    };
                }
                None => return None,
            }
        }
        output_box
    }
}

/// Hittable List Config
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HittableListConfig {
    pub objects: Vec<ObjectConfig>,
}

/// Object config, tagged by primitive kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectConfig {
    Sphere(SphereConfig),
    MovingSphere(MovingSphereConfig),
}

/// Represents a hit
pub struct HitRecord {
    /// Point of intersection
    pub p: Point,
    /// Normal vector, oriented against the incoming ray
    pub normal: Vec3,
    /// Root of intersection
    pub t: f64,
    /// Whether the ray struck the outward-facing side
    pub front_face: bool,
    /// Material, shared with the primitive that was hit
    pub material: Material,
    /// U,V surface coordinates
    pub u: f64,
    /// U,V surface coordinates
    pub v: f64,
}
impl HitRecord {
    pub fn new(
        p: Point,
        t: f64,
        ray: &Ray,
        outward_normal: &Vec3,
        material: Material,
        u: f64,
        v: f64,
    ) -> Self {
        let front_face = ray.dir.dot(outward_normal) < 0.0;
        let mut normal = outward_normal.to_owned();
        if !front_face {
            normal = -normal;
        }
        Self {
            p,
            normal,
            t,
            front_face,
            material,
            u,
            v,
        }
    }
}

pub struct Sphere {
    pub center: Point,
    pub radius: f64,
    pub material: Material,
}
impl Sphere {
    /// A negative radius leaves the surface in place but inverts the outward
    /// normal, which nested inside a positive sphere makes a hollow shell
    pub fn new(center: Point, radius: f64, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn from_config(config: SphereConfig) -> Self {
        Self::new(
            config.center.into(),
            config.radius,
            materials::Generator::from_config(config.material),
        )
    }

    pub fn get_uv(p: &Point) -> (f64, f64) {
        // p: a given point on the sphere of radius one, centered at the origin.
        // u: returned value [0,1] of angle around the Y axis from X=-1.
        // v: returned value [0,1] of angle from Y=-1 to Y=+1.
        //     <1 0 0> yields <0.50 0.50>       <-1  0  0> yields <0.00 0.50>
        //     <0 1 0> yields <0.50 1.00>       < 0 -1  0> yields <0.50 0.00>
        //     <0 0 1> yields <0.25 0.50>       < 0  0 -1> yields <0.75 0.50>
        use std::f64::consts::PI;

        let phi = p[2].atan2(p[0]);
        let theta = p[1].asin();

        let u = 1.0 - (phi + PI) / (2.0 * PI);
        let v = (theta + PI / 2.0) / PI;
        (u, v)
    }
}
impl Hittable for Sphere {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let oc = ray.orig - self.center;
        let a = ray.dir.norm().powi(2);
        let half_b = oc.dot(&ray.dir);
        let c = oc.norm().powi(2) - self.radius.powi(2);
        let discriminant = half_b.powi(2) - a * c;
        if discriminant <= 0.0 {
            return None;
        }

        // Find the nearest root that lies in the acceptable range
        let sqrtd = discriminant.sqrt();
        let mut root = (-half_b - sqrtd) / a;
        if root <= t_min || t_max <= root {
            root = (-half_b + sqrtd) / a;
            if root <= t_min || t_max <= root {
                return None;
            }
        }
        let p = ray.get(root);
        let t = root;
        let outward_normal = ((p - self.center) / self.radius).normalize();
        let (u, v) = Self::get_uv(&outward_normal);
        Some(HitRecord::new(
            p,
            t,
            ray,
            &outward_normal,
            self.material.clone(),
            u,
            v,
        ))
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        let v = Vec3::new(
            self.radius.abs(),
            self.radius.abs(),
            self.radius.abs(),
        );
        Some(Aabb::new(self.center - v, self.center + v))
    }
}

/// Sphere config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SphereConfig {
    pub center: SerdeVector,
    pub radius: f64,
    pub material: MaterialConfig,
}

/// Moving Sphere
///
/// Same surface as Sphere, with the center translated linearly across a
/// time window and evaluated at each ray's time sample
pub struct MovingSphere {
    initial_center: Point,
    final_center: Point,
    initial_time: f64,
    final_time: f64,
    radius: f64,
    material: Material,
}
impl MovingSphere {
    pub fn new(
        initial_center: Point,
        final_center: Point,
        initial_time: f64,
        final_time: f64,
        radius: f64,
        material: Material,
    ) -> Self {
        Self {
            initial_center,
            final_center,
            initial_time,
            final_time,
            radius,
            material,
        }
    }

    pub fn from_config(config: MovingSphereConfig) -> Self {
        Self::new(
            config.initial_center.into(),
            config.final_center.into(),
            config.initial_time,
            config.final_time,
            config.radius,
            materials::Generator::from_config(config.material),
        )
    }

    pub fn center(&self, time: f64) -> Point {
        self.initial_center
            + ((time - self.initial_time) / (self.final_time - self.initial_time))
                * (self.final_center - self.initial_center)
    }
}
impl Hittable for MovingSphere {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let oc = ray.orig - self.center(ray.time);
        let a = ray.dir.norm().powi(2);
        let half_b = oc.dot(&ray.dir);
        let c = oc.norm().powi(2) - self.radius.powi(2);
        let discriminant = half_b.powi(2) - a * c;
        if discriminant <= 0.0 {
            return None;
        }

        // Find the nearest root that lies in the acceptable range
        let sqrtd = discriminant.sqrt();
        let mut root = (-half_b - sqrtd) / a;
        if root <= t_min || t_max <= root {
            root = (-half_b + sqrtd) / a;
            if root <= t_min || t_max <= root {
                return None;
            }
        }
        let p = ray.get(root);
        let t = root;
        let outward_normal = ((p - self.center(ray.time)) / self.radius).normalize();
        let (u, v) = Sphere::get_uv(&outward_normal);
        Some(HitRecord::new(
            p,
            t,
            ray,
            &outward_normal,
            self.material.clone(),
            u,
            v,
        ))
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        let v = Vec3::new(
            self.radius.abs(),
            self.radius.abs(),
            self.radius.abs(),
        );

        let box0 = Aabb::new(self.center(time0) - v, self.center(time0) + v);
        let box1 = Aabb::new(self.center(time1) - v, self.center(time1) + v);

        Some(box0.surrounding_box(&box1))
    }
}

/// Moving Sphere config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingSphereConfig {
    pub initial_center: SerdeVector,
    pub final_center: SerdeVector,
    pub initial_time: f64,
    pub final_time: f64,
    pub radius: f64,
    pub material: MaterialConfig,
}

/// Inverts the reported side of whatever it wraps
///
/// The stored normal is untouched; only the front_face flag flips, so
/// materials see the opposite side of the surface.
pub struct FlipFace {
    obj: HittableObj,
}
impl FlipFace {
    pub fn new(obj: HittableObj) -> Self {
        Self { obj }
    }
}
impl Hittable for FlipFace {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        self.obj.try_hit(ray, t_min, t_max).map(|mut hr| {
            hr.front_face = !hr.front_face;
            hr
        })
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        self.obj.try_bounding_box(time0, time1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::Lambertian;
    use crate::Color;

    fn gray() -> Material {
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)))
    }

    #[test]
    fn sphere_head_on_hit() {
        let sphere = Sphere::new(Point::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let hr = sphere.try_hit(&ray, 0.001, f64::INFINITY).unwrap();
        assert!((hr.t - 0.5).abs() < 1e-12);
        assert!((hr.p - Point::new(0.0, 0.0, -0.5)).norm() < 1e-12);
        assert!((hr.normal - Vec3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
        assert!(hr.front_face);
    }

    #[test]
    fn sphere_miss() {
        let sphere = Sphere::new(Point::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 1.0, 0.0), 0.0);
        assert!(sphere.try_hit(&ray, 0.001, f64::INFINITY).is_none());
    }

    #[test]
    fn hits_outside_the_open_interval_are_rejected() {
        let sphere = Sphere::new(Point::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0), 0.0);
        // Both roots (0.5 and 1.5) sit outside (1.6, inf)
        assert!(sphere.try_hit(&ray, 1.6, f64::INFINITY).is_none());
        // t_max exactly at the near root is not accepted
        assert!(sphere.try_hit(&ray, 0.001, 0.5).is_none());
        // The far root (1.5) is picked up once the near one is excluded
        let hr = sphere.try_hit(&ray, 0.6, f64::INFINITY).unwrap();
        assert!((hr.t - 1.5).abs() < 1e-12);
        assert!(!hr.front_face);
    }

    #[test]
    fn negative_radius_inverts_the_outward_normal() {
        let bubble = Sphere::new(Point::new(0.0, 0.0, -1.0), -0.5, gray());
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let hr = bubble.try_hit(&ray, 0.001, f64::INFINITY).unwrap();
        assert!((hr.t - 0.5).abs() < 1e-12);
        // The outward normal points into the sphere, so the ray sees a back face
        assert!(!hr.front_face);
        assert!((hr.normal - Vec3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn sphere_uv_fixed_points() {
        let cases = [
            (Point::new(1.0, 0.0, 0.0), (0.5, 0.5)),
            (Point::new(-1.0, 0.0, 0.0), (0.0, 0.5)),
            (Point::new(0.0, 1.0, 0.0), (0.5, 1.0)),
            (Point::new(0.0, -1.0, 0.0), (0.5, 0.0)),
            (Point::new(0.0, 0.0, 1.0), (0.25, 0.5)),
            (Point::new(0.0, 0.0, -1.0), (0.75, 0.5)),
        ];
        for (p, (eu, ev)) in cases {
            let (u, v) = Sphere::get_uv(&p);
            assert!((u - eu).abs() < 1e-12, "u mismatch at {p:?}");
            assert!((v - ev).abs() < 1e-12, "v mismatch at {p:?}");
        }
    }

    #[test]
    fn moving_sphere_center_interpolates() {
        let sphere = MovingSphere::new(
            Point::new(0.0, 0.0, -1.0),
            Point::new(2.0, 0.0, -1.0),
            0.0,
            1.0,
            0.5,
            gray(),
        );
        assert!((sphere.center(0.0) - Point::new(0.0, 0.0, -1.0)).norm() < 1e-12);
        assert!((sphere.center(0.5) - Point::new(1.0, 0.0, -1.0)).norm() < 1e-12);
        assert!((sphere.center(1.0) - Point::new(2.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn moving_sphere_hit_depends_on_ray_time() {
        let sphere = MovingSphere::new(
            Point::new(0.0, 0.0, -1.0),
            Point::new(2.0, 0.0, -1.0),
            0.0,
            1.0,
            0.5,
            gray(),
        );
        let early = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let late = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0), 1.0);
        assert!(sphere.try_hit(&early, 0.001, f64::INFINITY).is_some());
        assert!(sphere.try_hit(&late, 0.001, f64::INFINITY).is_none());
    }

    #[test]
    fn moving_sphere_box_spans_both_endpoints() {
        let sphere = MovingSphere::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(2.0, 0.0, 0.0),
            0.0,
            1.0,
            0.5,
            gray(),
        );
        let bbox = sphere.try_bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox.min, Point::new(-0.5, -0.5, -0.5));
        assert_eq!(bbox.max, Point::new(2.5, 0.5, 0.5));
    }

    #[test]
    fn list_returns_the_nearest_hit() {
        let near = Arc::new(Sphere::new(Point::new(0.0, 0.0, -1.0), 0.25, gray()));
        let far = Arc::new(Sphere::new(Point::new(0.0, 0.0, -2.0), 0.25, gray()));
        let near_material = near.material.clone();

        let mut list = HittableList::default();
        list.add(far);
        list.add(near);

        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let hr = list.try_hit(&ray, 0.001, f64::INFINITY).unwrap();
        assert!((hr.t - 0.75).abs() < 1e-12);
        assert!(Arc::ptr_eq(&hr.material, &near_material));
    }

    #[test]
    fn empty_list_has_no_bounding_box() {
        assert!(HittableList::default().try_bounding_box(0.0, 1.0).is_none());
    }

    #[test]
    fn list_box_is_the_union_of_children() {
        let mut list = HittableList::default();
        list.add(Arc::new(Sphere::new(Point::new(-2.0, 0.0, 0.0), 1.0, gray())));
        list.add(Arc::new(Sphere::new(Point::new(3.0, 1.0, 0.0), 0.5, gray())));
        let bbox = list.try_bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox.min, Point::new(-3.0, -1.0, -1.0));
        assert_eq!(bbox.max, Point::new(3.5, 1.5, 1.0));
    }

    #[test]
    fn flip_face_only_toggles_the_flag() {
        let sphere: HittableObj = Arc::new(Sphere::new(Point::new(0.0, 0.0, -1.0), 0.5, gray()));
        let flipped = FlipFace::new(sphere);
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let hr = flipped.try_hit(&ray, 0.001, f64::INFINITY).unwrap();
        assert!(!hr.front_face);
        assert!((hr.normal - Vec3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
        assert!(flipped.try_bounding_box(0.0, 1.0).is_some());
    }
}
