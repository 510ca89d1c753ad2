//! Sphere primitive for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    MaterialId, Ray,
};
use glint_math::Vec3;

/// A sphere primitive.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: MaterialId,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Solve for the accepted ray parameter, if any.
    ///
    /// Takes the nearer root, falling back to the farther one when the nearer
    /// is behind `t_min` (ray starting inside the sphere). Tangent rays miss.
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant <= 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        let mut root = (h - sqrtd) / a;
        if root < ray.t_min {
            root = (h + sqrtd) / a;
        }

        ray.accepts(root).then_some(root)
    }
}

impl Hittable for Sphere {
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
        rec.normal = (rec.point - self.center) / self.radius;
        rec.material = self.material;

        true
    }

    fn hit_any(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere() -> Sphere {
        Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, MaterialId::DEFAULT)
    }

    #[test]
    fn test_sphere_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(sphere().hit(&ray, &mut rec));
        assert!(rec.did_hit);
        assert!((rec.t - 4.0).abs() < 0.001);
        assert!((rec.normal - Vec3::NEG_Z).length() < 0.001);
    }

    #[test]
    fn test_sphere_hit_point_on_surface() {
        let s = sphere();
        let origins = [
            Vec3::new(0.3, -0.2, 0.0),
            Vec3::new(-2.0, 1.0, -3.0),
            Vec3::new(4.0, 4.0, 5.0),
        ];

        for origin in origins {
            // Aim slightly off-centre so both roots are distinct
            let target = s.center + Vec3::new(0.2, 0.1, -0.3);
            let ray = Ray::new(origin, (target - origin).normalize());
            let mut rec = HitRecord::default();

            assert!(s.hit(&ray, &mut rec));
            let distance = (ray.at(rec.t) - s.center).length();
            assert!((distance - s.radius).abs() < 1e-4, "distance {}", distance);

            // Nearer root: the point faces back toward the ray origin
            assert!(rec.normal.dot(ray.direction) < 0.0);
        }
    }

    #[test]
    fn test_sphere_inside_takes_far_root() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(sphere().hit(&ray, &mut rec));
        assert!((rec.t - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_sphere_respects_t_max() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z).with_t_max(4.0);
        assert!(!sphere().hit_any(&ray));

        let ray = Ray::new(Vec3::ZERO, Vec3::Z).with_t_max(4.5);
        assert!(sphere().hit_any(&ray));
    }

    #[test]
    fn test_sphere_keeps_nearer_record() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let mut rec = HitRecord::starting_at(2.0);

        assert!(!sphere().hit(&ray, &mut rec));
        assert!(!rec.did_hit);
        assert_eq!(rec.t, 2.0);
    }

    #[test]
    fn test_sphere_miss() {
        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let mut rec = HitRecord::default();

        assert!(!sphere().hit(&ray, &mut rec));
        assert!(!rec.did_hit);
    }

    #[test]
    fn test_sphere_behind_ray_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(!sphere().hit_any(&ray));
    }

    #[test]
    fn test_sphere_tangent_misses() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::Z);
        assert!(!sphere().hit_any(&ray));
    }
}
