//! Scene: owns geometry, materials, lights and the camera.
//!
//! Geometry is stored in append-only arenas and referred to by index
//! handles. Material ids are checked when geometry is added, so a scene never
//! holds a primitive whose material does not exist.

use crate::{
    hittable::{HitRecord, Hittable},
    material::{Color, Material, MaterialId, SolidColor},
    CullMode, Light, Plane, Ray, Sphere, TriangleMesh,
};
use glint_math::{Camera, Vec3};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SphereId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaneId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightId(pub usize);

/// Errors raised while building a scene.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("material {id:?} does not exist (scene has {count} materials)")]
    InvalidMaterial { id: MaterialId, count: usize },
}

/// A renderable scene.
pub struct Scene {
    camera: Camera,
    materials: Vec<Box<dyn Material>>,
    spheres: Vec<Sphere>,
    planes: Vec<Plane>,
    meshes: Vec<TriangleMesh>,
    lights: Vec<Light>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Camera::default())
    }
}

impl Scene {
    /// Create an empty scene. Material 0 is a solid red fallback.
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            materials: vec![Box::new(SolidColor::new(Color::new(1.0, 0.0, 0.0)))],
            spheres: Vec::new(),
            planes: Vec::new(),
            meshes: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Take ownership of a material and return its id.
    pub fn add_material(&mut self, material: impl Material + 'static) -> MaterialId {
        self.materials.push(Box::new(material));
        MaterialId(self.materials.len() - 1)
    }

    /// Look up a material.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this scene. Geometry is validated on
    /// insertion, so a hit never carries such an id.
    pub fn material(&self, id: MaterialId) -> &dyn Material {
        match self.materials.get(id.0) {
            Some(material) => material.as_ref(),
            None => panic!(
                "material {:?} out of range ({} materials)",
                id,
                self.materials.len()
            ),
        }
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    fn check_material(&self, id: MaterialId) -> Result<(), SceneError> {
        if id.0 < self.materials.len() {
            Ok(())
        } else {
            Err(SceneError::InvalidMaterial {
                id,
                count: self.materials.len(),
            })
        }
    }

    pub fn add_sphere(
        &mut self,
        center: Vec3,
        radius: f32,
        material: MaterialId,
    ) -> Result<SphereId, SceneError> {
        self.check_material(material)?;
        self.spheres.push(Sphere::new(center, radius, material));
        Ok(SphereId(self.spheres.len() - 1))
    }

    pub fn add_plane(
        &mut self,
        origin: Vec3,
        normal: Vec3,
        material: MaterialId,
    ) -> Result<PlaneId, SceneError> {
        self.check_material(material)?;
        self.planes.push(Plane::new(origin, normal, material));
        Ok(PlaneId(self.planes.len() - 1))
    }

    /// Add an empty mesh to be filled with `append_triangle`.
    pub fn add_triangle_mesh(
        &mut self,
        cull_mode: CullMode,
        material: MaterialId,
    ) -> Result<MeshId, SceneError> {
        self.add_mesh(TriangleMesh::new(cull_mode, material))
    }

    /// Add a prepared mesh.
    pub fn add_mesh(&mut self, mesh: TriangleMesh) -> Result<MeshId, SceneError> {
        self.check_material(mesh.material())?;
        log::info!("Added mesh with {} triangles", mesh.triangle_count());
        self.meshes.push(mesh);
        Ok(MeshId(self.meshes.len() - 1))
    }

    pub fn add_light(&mut self, light: Light) -> LightId {
        self.lights.push(light);
        LightId(self.lights.len() - 1)
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn meshes(&self) -> &[TriangleMesh] {
        &self.meshes
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn sphere(&self, id: SphereId) -> Option<&Sphere> {
        self.spheres.get(id.0)
    }

    pub fn plane(&self, id: PlaneId) -> Option<&Plane> {
        self.planes.get(id.0)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&TriangleMesh> {
        self.meshes.get(id.0)
    }

    /// Mutable access for posing a mesh. Call `commit()` afterwards.
    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut TriangleMesh> {
        self.meshes.get_mut(id.0)
    }

    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id.0)
    }

    /// Refresh the cached world data of every mesh whose pose changed.
    pub fn commit(&mut self) {
        let mut refreshed = 0;
        for mesh in self.meshes.iter_mut().filter(|m| m.is_dirty()) {
            mesh.update_transforms();
            refreshed += 1;
        }
        if refreshed > 0 {
            log::debug!("Committed {} mesh pose change(s)", refreshed);
        }
    }

    /// True when no mesh has a pending pose change.
    pub fn is_committed(&self) -> bool {
        self.meshes.iter().all(|m| !m.is_dirty())
    }

    /// Find the nearest surface along a ray.
    ///
    /// The search range shrinks to the best hit so far, so the result does
    /// not depend on the order primitives were added.
    pub fn closest_hit(&self, ray: &Ray) -> HitRecord {
        let mut closest = HitRecord::starting_at(ray.t_max);
        let mut ray = *ray;

        for plane in &self.planes {
            if plane.hit(&ray, &mut closest) {
                ray.t_max = closest.t;
            }
        }
        for sphere in &self.spheres {
            if sphere.hit(&ray, &mut closest) {
                ray.t_max = closest.t;
            }
        }
        for mesh in &self.meshes {
            if mesh.hit(&ray, &mut closest) {
                ray.t_max = closest.t;
            }
        }

        closest
    }

    /// True if a sphere or mesh blocks the ray. Planes never cast shadows.
    pub fn any_hit(&self, ray: &Ray) -> bool {
        self.spheres.iter().any(|s| s.hit_any(ray)) || self.meshes.iter().any(|m| m.hit_any(ray))
    }
}
