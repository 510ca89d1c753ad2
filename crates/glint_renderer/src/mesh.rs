//! Posed triangle meshes with cached world-space geometry.
//!
//! A mesh keeps its geometry in local space plus a translation / rotation /
//! scale pose. Hit tests only ever read the cached world-space positions,
//! face normals and bounding box, so after any pose change the caches must be
//! refreshed with `update_transforms()` (or `Scene::commit()`) before the
//! next query. Pose setters mark the mesh dirty and the renderer refuses to
//! draw a scene holding a dirty mesh.

use crate::{
    hittable::{HitRecord, Hittable},
    CullMode, MaterialId, Ray, Triangle,
};
use glint_core::MeshData;
use glint_math::{Aabb, Mat4, Mat4Ext, Quat, Vec3};

/// A triangle mesh placed in the world by a pose transform.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    // Local-space geometry
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    local_bounds: Aabb,

    cull_mode: CullMode,
    material: MaterialId,

    // Pose
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,

    // Cached world-space data, valid when `dirty` is false
    world: Mat4,
    transformed_positions: Vec<Vec3>,
    transformed_normals: Vec<Vec3>,
    world_bounds: Aabb,
    dirty: bool,
}

impl TriangleMesh {
    /// Create an empty mesh at the origin.
    pub fn new(cull_mode: CullMode, material: MaterialId) -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            local_bounds: Aabb::EMPTY,
            cull_mode,
            material,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            world: Mat4::IDENTITY,
            transformed_positions: Vec::new(),
            transformed_normals: Vec::new(),
            world_bounds: Aabb::EMPTY,
            dirty: false,
        }
    }

    /// Create a mesh from loaded geometry. Caches are computed immediately.
    pub fn from_data(data: MeshData, cull_mode: CullMode, material: MaterialId) -> Self {
        let mut mesh = Self::new(cull_mode, material);
        mesh.local_bounds = data.bounds;
        mesh.positions = data.positions;
        mesh.normals = data.normals;
        mesh.indices = data.indices;
        mesh.update_transforms();
        mesh
    }

    /// Append a triangle's vertices in local space. Marks the mesh dirty.
    ///
    /// The stored normal is recomputed from the winding, not copied.
    pub fn append_triangle(&mut self, triangle: &Triangle) {
        let base = self.positions.len() as u32;
        let vertices = [triangle.v0, triangle.v1, triangle.v2];

        self.positions.extend_from_slice(&vertices);
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
        self.normals.push(
            (triangle.v1 - triangle.v0)
                .cross(triangle.v2 - triangle.v0)
                .normalize_or_zero(),
        );

        let added = Aabb::enclosing(vertices);
        self.local_bounds = if self.local_bounds.is_empty() {
            added
        } else {
            Aabb::surrounding(&self.local_bounds, &added)
        };
        self.dirty = true;
    }

    /// Set the translation part of the pose. Marks the mesh dirty.
    pub fn translate(&mut self, translation: Vec3) {
        self.translation = translation;
        self.dirty = true;
    }

    /// Set the rotation to `yaw` radians about +Y. Marks the mesh dirty.
    pub fn rotate_y(&mut self, yaw: f32) {
        self.rotation = Quat::from_rotation_y(yaw);
        self.dirty = true;
    }

    /// Set the per-axis scale. Marks the mesh dirty.
    pub fn scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty = true;
    }

    /// Recompute the world transform, the cached world positions and normals,
    /// and the world bounding box.
    pub fn update_transforms(&mut self) {
        self.world = Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation);

        let world = self.world;
        self.transformed_positions.clear();
        self.transformed_positions
            .extend(self.positions.iter().map(|&p| world.transform_point3(p)));

        let normal_matrix = world.normal_matrix();
        self.transformed_normals.clear();
        self.transformed_normals.extend(
            self.normals
                .iter()
                .map(|&n| (normal_matrix * n).normalize_or_zero()),
        );

        self.world_bounds = world.transform_aabb(&self.local_bounds);
        self.dirty = false;

        log::debug!(
            "Mesh transforms updated: {} triangles, bounds {:?}",
            self.triangle_count(),
            self.world_bounds
        );
    }

    /// True when the pose changed since the last `update_transforms()`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn cull_mode(&self) -> CullMode {
        self.cull_mode
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn world_transform(&self) -> Mat4 {
        self.world
    }

    pub fn world_bounds(&self) -> Aabb {
        self.world_bounds
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate the faces as world-space triangles.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices
            .chunks_exact(3)
            .zip(&self.transformed_normals)
            .map(move |(face, &normal)| {
                Triangle::with_normal(
                    self.transformed_positions[face[0] as usize],
                    self.transformed_positions[face[1] as usize],
                    self.transformed_positions[face[2] as usize],
                    normal,
                    self.cull_mode,
                    self.material,
                )
            })
    }

    /// Test every face without the bounding-box pre-filter.
    fn scan(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        let mut hit_anything = false;
        for triangle in self.triangles() {
            // Each accepted hit lowers rec.t, so later faces must be nearer
            if triangle.hit(ray, rec) {
                hit_anything = true;
            }
        }
        hit_anything
    }
}

impl Hittable for TriangleMesh {
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        if !self.world_bounds.hit(ray) {
            return false;
        }
        self.scan(ray, rec)
    }

    fn hit_any(&self, ray: &Ray) -> bool {
        if !self.world_bounds.hit(ray) {
            return false;
        }
        self.triangles().any(|triangle| triangle.hit_any(ray))
    }
}
