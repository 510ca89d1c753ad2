//! Infinite plane primitive.

use crate::{
    hittable::{HitRecord, Hittable},
    MaterialId, Ray,
};
use glint_math::Vec3;

/// An infinite plane through `origin` with unit `normal`.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub origin: Vec3,
    pub normal: Vec3,
    pub material: MaterialId,
}

impl Plane {
    /// Create a new plane. The normal is normalized here.
    pub fn new(origin: Vec3, normal: Vec3, material: MaterialId) -> Self {
        Self {
            origin,
            normal: normal.normalize(),
            material,
        }
    }

    fn intersect(&self, ray: &Ray) -> Option<f32> {
        // Parallel rays divide by zero; the resulting inf/NaN fails `accepts`
        let t = (self.origin - ray.origin()).dot(self.normal) / ray.direction().dot(self.normal);
        ray.accepts(t).then_some(t)
    }
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        let Some(t) = self.intersect(ray) else {
            return false;
        };

        // Only nearer hits may overwrite the record
        if t >= rec.t {
            return false;
        }

        rec.did_hit = true;
        rec.t = t;
        rec.point = ray.at(t);
        rec.normal = self.normal;
        rec.material = self.material;

        true
    }

    fn hit_any(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }
}
