//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{
    hittable::{HitRecord, Hittable},
    MaterialId, Ray,
};
use glint_math::Vec3;

/// Which faces of a triangle are eligible for intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    FrontFaceCulling,
    BackFaceCulling,
    #[default]
    NoCulling,
}

/// Which query a triangle test is serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Query {
    Closest,
    Any,
}

/// A triangle primitive.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// Vertices
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    /// Face normal (unit length, consistent with the v0 -> v1 -> v2 winding)
    pub normal: Vec3,
    pub cull_mode: CullMode,
    pub material: MaterialId,
}

impl Triangle {
    /// Create a new triangle from three vertices, deriving the face normal
    /// from the winding.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, cull_mode: CullMode, material: MaterialId) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self::with_normal(v0, v1, v2, normal, cull_mode, material)
    }

    /// Create a triangle with a pre-computed face normal.
    pub fn with_normal(
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
        normal: Vec3,
        cull_mode: CullMode,
        material: MaterialId,
    ) -> Self {
        Self {
            v0,
            v1,
            v2,
            normal,
            cull_mode,
            material,
        }
    }

    /// Centroid of the three vertices.
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Cull policy, checked before the barycentric solve.
    ///
    /// The two query kinds deliberately use opposite conventions: shadow
    /// queries drop opposing hits under `FrontFaceCulling`, closest-hit
    /// queries drop them under `BackFaceCulling`.
    fn is_culled(&self, ray: &Ray, query: Query) -> bool {
        let opposing = self.normal.dot(ray.direction()) < 0.0;
        match (self.cull_mode, query) {
            (CullMode::NoCulling, _) => false,
            (CullMode::FrontFaceCulling, Query::Any) => opposing,
            (CullMode::BackFaceCulling, Query::Any) => false,
            (CullMode::BackFaceCulling, Query::Closest) => opposing,
            (CullMode::FrontFaceCulling, Query::Closest) => false,
        }
    }

    /// Möller-Trumbore solve. Returns `(t, u, v)` for a hit inside the
    /// triangle with `t` in `[t_min, t_max]`.
    fn intersect(&self, ray: &Ray, query: Query) -> Option<(f32, f32, f32)> {
        if self.is_culled(ray, query) {
            return None;
        }

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);

        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);

        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);

        if t < ray.t_min || t > ray.t_max {
            return None;
        }

        Some((t, u, v))
    }

    /// Barycentric coordinates `(u, v)` of a closest-hit query, if it hits.
    pub fn barycentric(&self, ray: &Ray) -> Option<(f32, f32)> {
        self.intersect(ray, Query::Closest).map(|(_, u, v)| (u, v))
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        let Some((t, _, _)) = self.intersect(ray, Query::Closest) else {
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
        self.intersect(ray, Query::Any).is_some()
    }
}
