//! Hittable trait and HitRecord for ray-object intersection.

use crate::{MaterialId, Ray};
use glint_math::Vec3;

/// Record of a ray-object intersection.
///
/// Created fresh for every query and written only by intersection routines.
/// Within one closest-hit query `t` only ever decreases.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Whether anything was hit
    pub did_hit: bool,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Surface normal at intersection (outward / as stored, never flipped)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: MaterialId,
}

impl Default for HitRecord {
    fn default() -> Self {
        Self {
            did_hit: false,
            t: f32::MAX,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: MaterialId::DEFAULT,
        }
    }
}

impl HitRecord {
    /// An empty record whose working distance starts at `t`.
    pub fn starting_at(t: f32) -> Self {
        Self {
            t,
            ..Self::default()
        }
    }
}

/// Trait for objects that can be hit by rays.
///
/// Every primitive answers two kinds of query: `hit` fills a record for
/// shading, `hit_any` only reports whether anything blocks the ray and is
/// used for shadow rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the ray's `[t_min, t_max)` range.
    ///
    /// Returns true if hit, and fills in the hit record.
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool;

    /// Boolean-mode test. Never writes a record.
    fn hit_any(&self, ray: &Ray) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_is_a_miss_at_max() {
        let rec = HitRecord::default();
        assert!(!rec.did_hit);
        assert_eq!(rec.t, f32::MAX);
    }

    #[test]
    fn test_starting_at() {
        let rec = HitRecord::starting_at(7.5);
        assert!(!rec.did_hit);
        assert_eq!(rec.t, 7.5);
    }
}
