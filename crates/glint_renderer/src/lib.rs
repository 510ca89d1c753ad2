//! Glint Renderer - CPU direct-lighting ray tracer.
//!
//! Casts one primary ray per pixel, finds the closest hit among spheres,
//! planes and triangle meshes, and shades it against every light with a
//! single shadow ray each. Frames are rendered on a fixed worker pool.

mod brdf;
mod dispatch;
mod hittable;
mod light;
mod material;
mod mesh;
mod plane;
mod renderer;
mod scene;
mod sphere;
mod triangle;

pub use brdf::{
    fresnel_schlick, ggx_distribution, lambert, lambert_tinted, phong, reflect,
    schlick_ggx_geometry, smith_geometry,
};
pub use dispatch::{partition, WorkerPool};
pub use hittable::{HitRecord, Hittable};
pub use light::Light;
pub use material::{
    Color, CookTorrance, CookTorranceTerms, Lambert, LambertPhong, Material, MaterialId,
    SolidColor,
};
pub use mesh::TriangleMesh;
pub use plane::Plane;
pub use renderer::{
    max_to_one, pack_color, unpack_color, FrameBuffer, LightingMode, RenderConfig, RenderError, Renderer,
};
pub use scene::{LightId, MeshId, PlaneId, Scene, SceneError, SphereId};
pub use sphere::Sphere;
pub use triangle::{CullMode, Triangle};

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{Aabb, Camera, Mat4, Ray, Vec3};
