//! Light sources.

use crate::material::Color;
use glint_math::Vec3;

/// A light source. Lights have no area, so shadows are hard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Omnidirectional light at a position, falling off with distance squared.
    Point {
        origin: Vec3,
        intensity: f32,
        color: Color,
    },
    /// Light arriving from infinitely far away along `direction`.
    Directional {
        direction: Vec3,
        intensity: f32,
        color: Color,
    },
}

impl Light {
    pub fn point(origin: Vec3, intensity: f32, color: Color) -> Self {
        Self::Point {
            origin,
            intensity,
            color,
        }
    }

    pub fn directional(direction: Vec3, intensity: f32, color: Color) -> Self {
        Self::Directional {
            direction,
            intensity,
            color,
        }
    }

    /// Unit direction from `target` toward the light and the distance to it.
    ///
    /// Directional lights are infinitely far away; their distance is `f32::MAX`.
    pub fn direction_from(&self, target: Vec3) -> (Vec3, f32) {
        match *self {
            Light::Point { origin, .. } => {
                let to_light = origin - target;
                let distance = to_light.length();
                (to_light / distance, distance)
            }
            Light::Directional { direction, .. } => (-direction.normalize(), f32::MAX),
        }
    }

    /// Radiance arriving at `target`.
    pub fn radiance(&self, target: Vec3) -> Color {
        match *self {
            Light::Point {
                origin,
                intensity,
                color,
            } => color * (intensity / (origin - target).length_squared()),
            Light::Directional {
                intensity, color, ..
            } => color * intensity,
        }
    }
}
