//! Axis-Aligned Bounding Boxes and Bounding Volume Hierarchies
//!
//! For optimizing computations

use std::cmp::Ordering;
use std::sync::Arc;

use crate::objects::{HitRecord, Hittable, HittableList, HittableObj};
use crate::{Point, Ray};
use rand::{Rng, RngCore};
use thiserror::Error;

/// Construction-time failures
///
/// A tree with an undefined box cannot answer queries, so construction
/// reports these instead of proceeding; nothing renders after one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BvhError {
    /// A child could not report a finite box for the requested time window
    #[error("no bounding box in bvh constructor")]
    MissingBoundingBox,
    /// A tree over zero primitives has no defined bounds
    #[error("cannot build a bvh from an empty list")]
    EmptyList,
}

/// Axis-Aligned Bounding Box
///
/// A data structure to bound many objects to speed up computations
#[derive(Debug, Clone)]
pub struct Aabb {
    pub min: Point,
    pub max: Point,
}
impl Aabb {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Whether the box is hit by a ray between the time range
    ///
    /// Original implementation from the paper. A zero direction component
    /// divides to signed infinity, leaving that axis unconstrained.
    pub fn hit_orig(&self, r: &Ray, mut t_min: f64, mut t_max: f64) -> bool {
        for a in 0..3 {
            let t0 =
                ((self.min[a] - r.orig[a]) / r.dir[a]).min((self.max[a] - r.orig[a]) / r.dir[a]);
            let t1 =
                ((self.min[a] - r.orig[a]) / r.dir[a]).max((self.max[a] - r.orig[a]) / r.dir[a]);

            t_min = t0.max(t_min);
            t_max = t1.min(t_max);
            if t_max <= t_min {
                return false;
            }
        }
        true
    }

    /// Whether the box is hit by a ray between the time range
    ///
    /// Improved implementation
    pub fn hit(&self, r: &Ray, mut t_min: f64, mut t_max: f64) -> bool {
        for a in 0..3 {
            let inv_d = 1.0 / r.dir[a];
            let mut t0 = (self.min[a] - r.orig[a]) * inv_d;
            let mut t1 = (self.max[a] - r.orig[a]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = if t0 > t_min { t0 } else { t_min };
            t_max = if t1 < t_max { t1 } else { t_max };
            if t_max <= t_min {
                return false;
            }
        }
        true
    }

    /// Compute the surrounding AABB between this and another
    pub fn surrounding_box(&self, other: &Aabb) -> Aabb {
        let small = Point::new(
            self.min[0].min(other.min[0]),
            self.min[1].min(other.min[1]),
            self.min[2].min(other.min[2]),
        );
        let big = Point::new(
            self.max[0].max(other.max[0]),
            self.max[1].max(other.max[1]),
            self.max[2].max(other.max[2]),
        );
        Aabb::new(small, big)
    }
}

/// Bounding Volume Hierarchy
///
/// Binary tree over the primitives of a list. A leaf over a single
/// primitive aliases it into both child slots; the node box is the union
/// of the children's boxes, cached at construction.
pub struct BvhNode {
    left: HittableObj,
    right: HittableObj,
    bbox: Aabb,
}
impl BvhNode {
    /// Build a tree over every object of the list
    ///
    /// The list is consumed and its objects are reordered while splitting.
    pub fn new(
        mut list: HittableList,
        time0: f64,
        time1: f64,
        rng: &mut dyn RngCore,
    ) -> Result<Self, BvhError> {
        if list.is_empty() {
            return Err(BvhError::EmptyList);
        }
        Self::split_tree(&mut list.0, time0, time1, rng)
    }

    /// Split the tree
    ///
    /// Randomly choose an axis, sort the primitives, put half in each subtree
    fn split_tree(
        objects: &mut [HittableObj],
        time0: f64,
        time1: f64,
        rng: &mut dyn RngCore,
    ) -> Result<Self, BvhError> {
        let axis = rng.gen_range(0..3);

        let (left, right) = match objects {
            [only] => {
                // A single object fills both child slots with the same handle
                (only.clone(), only.clone())
            }
            [first, second] => {
                if box_compare(first, second, axis)? == Ordering::Less {
                    (first.clone(), second.clone())
                } else {
                    (second.clone(), first.clone())
                }
            }
            _ => {
                // The sort comparator cannot surface a missing box, so
                // validate every object before ordering the slice
                if objects
                    .iter()
                    .any(|obj| obj.try_bounding_box(0.0, 0.0).is_none())
                {
                    return Err(BvhError::MissingBoundingBox);
                }
                objects.sort_by(|a, b| box_compare(a, b, axis).unwrap_or(Ordering::Equal));

                let mid = objects.len() / 2;
                let (lower, upper) = objects.split_at_mut(mid);
                let left: HittableObj = Arc::new(Self::split_tree(lower, time0, time1, rng)?);
                let right: HittableObj = Arc::new(Self::split_tree(upper, time0, time1, rng)?);
                (left, right)
            }
        };

        let box_left = left
            .try_bounding_box(time0, time1)
            .ok_or(BvhError::MissingBoundingBox)?;
        let box_right = right
            .try_bounding_box(time0, time1)
            .ok_or(BvhError::MissingBoundingBox)?;
        Ok(Self {
            left,
            right,
            bbox: box_left.surrounding_box(&box_right),
        })
    }
}
impl Hittable for BvhNode {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        if !self.bbox.hit(ray, t_min, t_max) {
            return None;
        }
        // Narrowing the right query to the left hit distance means the right
        // subtree cannot return anything farther than what left already found
        let hit_left = self.left.try_hit(ray, t_min, t_max);
        let t_max = hit_left.as_ref().map_or(t_max, |hr| hr.t);
        self.right.try_hit(ray, t_min, t_max).or(hit_left)
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        Some(self.bbox.clone())
    }
}

/// Compare boxes from two HittableObjs along one axis
fn box_compare(a: &HittableObj, b: &HittableObj, axis: usize) -> Result<Ordering, BvhError> {
    match (a.try_bounding_box(0.0, 0.0), b.try_bounding_box(0.0, 0.0)) {
        (Some(box_a), Some(box_b)) => Ok(box_a.min[axis]
            .partial_cmp(&box_b.min[axis])
            .unwrap_or(Ordering::Equal)),
        _ => Err(BvhError::MissingBoundingBox),
    }
}
