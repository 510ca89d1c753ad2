// Transform utilities for Mat4
//
// Extends glam::Mat4 with the helpers mesh pose updates need.
// Note: glam::Mat4 already provides transform_point3(), transform_vector3() and inverse()

use crate::Aabb;
use glam::{Mat3, Mat4, Vec3};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Matrix that maps surface normals (inverse-transpose of the upper 3x3).
    ///
    /// Non-uniform scale would skew normals if they were transformed like
    /// ordinary vectors.
    fn normal_matrix(&self) -> Mat3;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(*self).inverse().transpose()
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }

        let (lo, hi) = (aabb.min(), aabb.max());
        let corners = (0..8).map(|i| {
            Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            )
        });

        Aabb::enclosing(corners.map(|corner| self.transform_point3(corner)))
    }
}
