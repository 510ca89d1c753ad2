//! Indexed triangle geometry for the Glint scene.
//!
//! `MeshData` is the renderer-agnostic form a mesh takes after ingestion:
//! positions, index triples and one normal per face. The renderer builds its
//! posed, cached `TriangleMesh` from it.

use glint_math::{Aabb, Vec3};
use thiserror::Error;

/// Structural problems with an index buffer.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("Index count {0} is not a multiple of 3")]
    IndexCount(usize),

    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// A triangle mesh: vertex positions, index triples and per-face normals.
///
/// Face normals follow the vertex winding: `normalize((v1 - v0) x (v2 - v0))`.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Face normals (one per triangle)
    pub normals: Vec<Vec3>,

    /// Axis-aligned bounding box of the positions
    pub bounds: Aabb,
}

impl MeshData {
    /// Create a mesh from positions and indices, validating the indices and
    /// precomputing face normals.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        let mut mesh = Self {
            bounds: Aabb::enclosing(positions.iter().copied()),
            positions,
            indices,
            normals: Vec::new(),
        };
        mesh.validate()?;
        mesh.compute_face_normals();
        Ok(mesh)
    }

    /// Check that indices form whole triangles and stay inside the vertex array.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IndexCount(self.indices.len()));
        }

        let vertex_count = self.positions.len();
        match self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            Some(&index) => Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            }),
            None => Ok(()),
        }
    }

    /// Recompute one normal per face from the vertex winding.
    ///
    /// Degenerate faces get a zero normal; they can never be hit since the
    /// intersection test rejects zero-area triangles.
    pub fn compute_face_normals(&mut self) {
        let mut degenerate = 0usize;

        self.normals = self
            .indices
            .chunks_exact(3)
            .map(|face| {
                let p0 = self.positions[face[0] as usize];
                let p1 = self.positions[face[1] as usize];
                let p2 = self.positions[face[2] as usize];

                let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
                if normal == Vec3::ZERO {
                    degenerate += 1;
                }
                normal
            })
            .collect();

        if degenerate > 0 {
            log::warn!(
                "{} of {} faces are degenerate (zero area)",
                degenerate,
                self.triangle_count()
            );
        }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
