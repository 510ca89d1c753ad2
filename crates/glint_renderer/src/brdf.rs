//! Reflectance terms used by the materials.
//!
//! All vectors are unit length and point away from the surface: `l` toward
//! the light, `v` toward the viewer.

use crate::material::Color;
use glint_math::Vec3;
use std::f32::consts::PI;

/// Lambertian diffuse term with a scalar diffuse coefficient.
#[inline]
pub fn lambert(kd: f32, albedo: Color) -> Color {
    albedo * kd / PI
}

/// Lambertian diffuse term with a per-channel diffuse coefficient.
#[inline]
pub fn lambert_tinted(kd: Color, albedo: Color) -> Color {
    albedo * kd / PI
}

/// Phong specular lobe, broadcast to all channels.
#[inline]
pub fn phong(ks: f32, exponent: f32, reflected: Vec3, view: Vec3) -> Color {
    Color::splat(ks * reflected.dot(view).max(0.0).powf(exponent))
}

/// Mirror `l` about `n`.
#[inline]
pub fn reflect(l: Vec3, n: Vec3) -> Vec3 {
    2.0 * n.dot(l) * n - l
}

/// Schlick's approximation of the Fresnel reflectance.
#[inline]
pub fn fresnel_schlick(f0: Color, h: Vec3, v: Vec3) -> Color {
    let cos_theta = h.dot(v).max(0.0);
    f0 + (Color::ONE - f0) * (1.0 - cos_theta).powi(5)
}

/// GGX / Trowbridge-Reitz normal distribution.
///
/// Finite for every roughness. At zero roughness the lobe collapses and the
/// peak at `h == n` evaluates to 0 rather than 0/0.
pub fn ggx_distribution(n: Vec3, h: Vec3, roughness: f32) -> f32 {
    let alpha = roughness * roughness;
    let n_dot_h = n.dot(h);
    let denom = n_dot_h * n_dot_h * (alpha - 1.0) + 1.0;
    alpha / (PI * denom * denom).max(f32::MIN_POSITIVE)
}

/// Schlick-GGX masking term for a single direction.
pub fn schlick_ggx_geometry(n: Vec3, v: Vec3, roughness: f32) -> f32 {
    let k = (roughness + 1.0) * (roughness + 1.0) / 8.0;
    let n_dot_v = n.dot(v).max(0.0);
    n_dot_v / (n_dot_v * (1.0 - k) + k)
}

/// Smith shadowing-masking: product of the view and light terms.
pub fn smith_geometry(n: Vec3, v: Vec3, l: Vec3, roughness: f32) -> f32 {
    schlick_ggx_geometry(n, v, roughness) * schlick_ggx_geometry(n, l, roughness)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lambert_energy() {
        let c = lambert(1.0, Color::ONE);
        assert!((c.x - 1.0 / PI).abs() < 1e-6);

        let tinted = lambert_tinted(Color::new(1.0, 0.5, 0.0), Color::ONE);
        assert!((tinted.y - 0.5 / PI).abs() < 1e-6);
        assert_eq!(tinted.z, 0.0);
    }

    #[test]
    fn test_reflect_about_normal() {
        let l = Vec3::new(1.0, 1.0, 0.0).normalize();
        let r = reflect(l, Vec3::Y);
        assert!((r - Vec3::new(-1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_phong_peak_and_back() {
        assert!((phong(0.5, 8.0, Vec3::Y, Vec3::Y).x - 0.5).abs() < 1e-6);
        assert_eq!(phong(0.5, 8.0, Vec3::Y, Vec3::NEG_Y), Color::ZERO);
    }

    #[test]
    fn test_fresnel_normal_incidence_is_f0() {
        let f0 = Color::new(0.04, 0.5, 0.9);
        let f = fresnel_schlick(f0, Vec3::Z, Vec3::Z);
        assert!((f - f0).length() < 1e-6);
    }

    #[test]
    fn test_fresnel_grazing_goes_to_one() {
        for f0 in [Color::splat(0.04), Color::new(0.97, 0.96, 0.91), Color::ZERO] {
            let f = fresnel_schlick(f0, Vec3::Z, Vec3::X);
            assert!((f - Color::ONE).length() < 1e-6);
        }
    }

    #[test]
    fn test_ggx_peaks_at_normal() {
        let n = Vec3::Y;
        let off = Vec3::new(0.3, 1.0, 0.0).normalize();
        for roughness in [0.2, 0.5, 0.9] {
            assert!(ggx_distribution(n, n, roughness) > ggx_distribution(n, off, roughness));
        }
    }

    #[test]
    fn test_ggx_smooth_surface_is_finite() {
        let n = Vec3::Y;
        assert_eq!(ggx_distribution(n, n, 0.0), 0.0);
        assert!(ggx_distribution(n, n, 1e-3).is_finite());
        assert!(ggx_distribution(n, n, 1e-3) > ggx_distribution(n, n, 0.1));
    }

    #[test]
    fn test_geometry_terms_bounded() {
        let n = Vec3::Y;
        let v = Vec3::new(0.5, 1.0, 0.0).normalize();
        let l = Vec3::new(-0.2, 1.0, 0.4).normalize();
        for roughness in [0.0, 0.3, 1.0] {
            let g = smith_geometry(n, v, l, roughness);
            assert!((0.0..=1.0).contains(&g));
        }

        // Below the horizon is fully masked
        assert_eq!(schlick_ggx_geometry(n, Vec3::NEG_Y, 0.5), 0.0);
    }
}
