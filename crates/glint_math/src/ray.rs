use crate::Vec3;

/// A ray in 3D space with origin, direction, and a parametric range.
///
/// Rays are used for raytracing - they represent a line starting at `origin`
/// and traveling in `direction`. Only hits with `t_min <= t < t_max` count.
/// The direction is expected to be normalized by the caller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub t_min: f32,
    pub t_max: f32,
}

impl Ray {
    /// Default near bound, keeps secondary rays from re-hitting their own surface.
    pub const DEFAULT_T_MIN: f32 = 0.0001;

    /// Default far bound. Finite so that `t < t_max` rejects infinities.
    pub const DEFAULT_T_MAX: f32 = f32::MAX;

    /// Create a new ray with the default parametric range.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            t_min: Self::DEFAULT_T_MIN,
            t_max: Self::DEFAULT_T_MAX,
        }
    }

    /// Create a ray with an explicit parametric range.
    pub fn with_range(origin: Vec3, direction: Vec3, t_min: f32, t_max: f32) -> Self {
        Self {
            origin,
            direction,
            t_min,
            t_max,
        }
    }

    /// Return a copy of this ray with a different far bound.
    #[inline]
    pub fn with_t_max(mut self, t_max: f32) -> Self {
        self.t_max = t_max;
        self
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Returns true if `t` lies in `[t_min, t_max)`.
    ///
    /// NaN and infinities compare false, so non-finite parameters are rejected.
    #[inline]
    pub fn accepts(&self, t: f32) -> bool {
        t >= self.t_min && t < self.t_max
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
