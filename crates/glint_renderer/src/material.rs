//! Materials: how a surface point responds to a single light.

use crate::brdf;
use crate::hittable::HitRecord;
use glint_math::Vec3;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Index of a material inside its owning scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaterialId(pub usize);

impl MaterialId {
    /// The material every scene is created with.
    pub const DEFAULT: MaterialId = MaterialId(0);
}

/// Trait for materials that describe how light reflects off a surface.
///
/// `light_dir` points from the surface toward the light and `view_dir` from
/// the surface toward the viewer. Both are unit length.
pub trait Material: Send + Sync {
    /// Evaluate the reflectance for one light at a hit point.
    fn shade(&self, hit: &HitRecord, light_dir: Vec3, view_dir: Vec3) -> Color;
}

/// Flat color that ignores lighting entirely.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    pub color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Material for SolidColor {
    fn shade(&self, _hit: &HitRecord, _light_dir: Vec3, _view_dir: Vec3) -> Color {
        self.color
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, Copy)]
pub struct Lambert {
    pub color: Color,
    /// Diffuse reflection coefficient
    pub kd: f32,
}

impl Lambert {
    pub fn new(color: Color, kd: f32) -> Self {
        Self { color, kd }
    }
}

impl Material for Lambert {
    fn shade(&self, _hit: &HitRecord, _light_dir: Vec3, _view_dir: Vec3) -> Color {
        brdf::lambert(self.kd, self.color)
    }
}

/// Lambert diffuse plus a Phong highlight.
#[derive(Debug, Clone, Copy)]
pub struct LambertPhong {
    pub color: Color,
    pub kd: f32,
    /// Specular reflection coefficient
    pub ks: f32,
    /// Phong exponent (glossiness)
    pub exponent: f32,
}

impl LambertPhong {
    pub fn new(color: Color, kd: f32, ks: f32, exponent: f32) -> Self {
        Self {
            color,
            kd,
            ks,
            exponent,
        }
    }
}

impl Material for LambertPhong {
    fn shade(&self, hit: &HitRecord, light_dir: Vec3, view_dir: Vec3) -> Color {
        let reflected = brdf::reflect(light_dir, hit.normal);
        brdf::lambert(self.kd, self.color) + brdf::phong(self.ks, self.exponent, reflected, view_dir)
    }
}

/// The individual microfacet terms of a Cook-Torrance evaluation.
#[derive(Debug, Clone, Copy)]
pub struct CookTorranceTerms {
    /// Normal distribution (GGX)
    pub distribution: f32,
    /// Fresnel reflectance (Schlick)
    pub fresnel: Color,
    /// Shadowing-masking (Smith)
    pub geometry: f32,
}

/// Cook-Torrance microfacet material with a metalness workflow.
#[derive(Debug, Clone, Copy)]
pub struct CookTorrance {
    pub albedo: Color,
    /// 0 = dielectric, 1 = metal
    pub metalness: f32,
    /// Near 0 = mirror-like, 1 = fully rough
    pub roughness: f32,
}

impl CookTorrance {
    /// Reflectance at normal incidence for dielectrics.
    pub const DIELECTRIC_F0: f32 = 0.04;

    /// Smallest roughness kept by `new`. A perfectly smooth GGX lobe has no
    /// finite peak.
    pub const MIN_ROUGHNESS: f32 = 1e-3;

    pub fn new(albedo: Color, metalness: f32, roughness: f32) -> Self {
        Self {
            albedo,
            metalness: metalness.clamp(0.0, 1.0),
            roughness: roughness.clamp(Self::MIN_ROUGHNESS, 1.0),
        }
    }

    /// Reflectance at normal incidence, blended from dielectric to albedo.
    pub fn f0(&self) -> Color {
        Color::splat(Self::DIELECTRIC_F0).lerp(self.albedo, self.metalness)
    }

    /// Evaluate the D, F and G terms for normal `n`.
    pub fn terms(&self, n: Vec3, light_dir: Vec3, view_dir: Vec3) -> CookTorranceTerms {
        let h = (view_dir + light_dir).normalize_or_zero();
        CookTorranceTerms {
            distribution: brdf::ggx_distribution(n, h, self.roughness),
            fresnel: brdf::fresnel_schlick(self.f0(), h, view_dir),
            geometry: brdf::smith_geometry(n, view_dir, light_dir, self.roughness),
        }
    }
}

impl Material for CookTorrance {
    fn shade(&self, hit: &HitRecord, light_dir: Vec3, view_dir: Vec3) -> Color {
        let n = hit.normal;
        let CookTorranceTerms {
            distribution,
            fresnel,
            geometry,
        } = self.terms(n, light_dir, view_dir);

        let denom = 4.0 * n.dot(view_dir).max(0.0) * n.dot(light_dir).max(0.0) + 1e-4;
        let specular = fresnel * (distribution * geometry / denom);

        let kd = (Color::ONE - fresnel) * (1.0 - self.metalness);
        let diffuse = brdf::lambert_tinted(kd, self.albedo);

        diffuse + specular
    }
}
