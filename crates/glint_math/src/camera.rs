use glam::{Mat4, Vec3};

/// Pinhole camera in a left-handed frame (+Z forward, +Y up).
///
/// Input handling and pose updates live outside this crate; the renderer
/// only reads `origin`, the field of view, and `camera_to_world()`.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub origin: Vec3,
    pub forward: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
}

impl Camera {
    /// Create a new camera looking down +Z
    pub fn new(origin: Vec3, fov_degrees: f32) -> Self {
        Self {
            origin,
            forward: Vec3::Z,
            fov_degrees,
        }
    }

    /// Point the camera at a target.
    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.forward = (target - self.origin).normalize_or(Vec3::Z);
        self
    }

    /// Tangent of half the field of view, the image plane half-height at distance 1.
    pub fn fov_scale(&self) -> f32 {
        (self.fov_degrees.to_radians() / 2.0).tan()
    }

    /// Build the camera-to-world basis: columns are right, up, forward, origin.
    pub fn camera_to_world(&self) -> Mat4 {
        let forward = self.forward.normalize_or(Vec3::Z);

        // Looking straight up or down leaves world-up parallel to forward
        let right = Vec3::Y.cross(forward).normalize_or(Vec3::X);
        let up = forward.cross(right).normalize();

        Mat4::from_cols(
            right.extend(0.0),
            up.extend(0.0),
            forward.extend(0.0),
            self.origin.extend(1.0),
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 90.0)
    }
}
