//! Built-in scenes.

use anyhow::{Context, Result};
use glint_core::MeshData;
use glint_math::{Camera, Vec3};
use glint_renderer::{
    Color, CookTorrance, CullMode, Lambert, Light, MaterialId, MeshId, Scene, SceneError,
    Triangle, TriangleMesh,
};
use std::f32::consts::TAU;
use std::path::Path;

/// A scene plus the meshes that spin when it is animated.
pub struct Preset {
    pub name: &'static str,
    pub scene: Scene,
    spinning: Vec<MeshId>,
}

impl Preset {
    /// Pose the scene for time `t` seconds and commit the change.
    pub fn animate(&mut self, t: f32) {
        let yaw = (t.cos() + 1.0) / 2.0 * TAU;
        for &id in &self.spinning {
            if let Some(mesh) = self.scene.mesh_mut(id) {
                mesh.rotate_y(yaw);
            }
        }
        self.scene.commit();
    }
}

fn camera() -> Camera {
    Camera::new(Vec3::new(0.0, 3.0, -9.0), 45.0)
}

/// Five walls of a box open toward the camera.
fn add_room(scene: &mut Scene, material: MaterialId) -> Result<(), SceneError> {
    scene.add_plane(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, material)?; // back
    scene.add_plane(Vec3::ZERO, Vec3::Y, material)?; // bottom
    scene.add_plane(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, material)?; // top
    scene.add_plane(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_X, material)?; // right
    scene.add_plane(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, material)?; // left
    Ok(())
}

fn add_lights(scene: &mut Scene) {
    scene.add_light(Light::point(Vec3::new(0.0, 5.0, 5.0), 50.0, Color::new(1.0, 0.61, 0.45)));
    scene.add_light(Light::point(Vec3::new(-2.5, 5.0, -5.0), 70.0, Color::new(1.0, 0.8, 0.45)));
    scene.add_light(Light::point(Vec3::new(2.5, 2.5, -5.0), 50.0, Color::new(0.34, 0.47, 0.68)));
}

/// Metal and plastic spheres at three roughnesses, plus one triangle per
/// cull mode.
pub fn reference() -> Result<Preset, SceneError> {
    let mut scene = Scene::new(camera());

    let metal = Color::new(0.972, 0.960, 0.915);
    let plastic = Color::splat(0.75);
    let wall = scene.add_material(Lambert::new(Color::new(0.49, 0.57, 0.57), 1.0));
    let white = scene.add_material(Lambert::new(Color::ONE, 1.0));

    add_room(&mut scene, wall)?;

    let columns = [-1.75, 0.0, 1.75];
    let roughness = [1.0, 0.6, 0.1];
    for (&x, &r) in columns.iter().zip(&roughness) {
        let metal_id = scene.add_material(CookTorrance::new(metal, 1.0, r));
        scene.add_sphere(Vec3::new(x, 1.0, 0.0), 0.75, metal_id)?;
    }
    for (&x, &r) in columns.iter().zip(&roughness) {
        let plastic_id = scene.add_material(CookTorrance::new(plastic, 0.0, r));
        scene.add_sphere(Vec3::new(x, 3.0, 0.0), 0.75, plastic_id)?;
    }

    // Clockwise seen from the camera
    let base = Triangle::new(
        Vec3::new(-0.75, 1.5, 0.0),
        Vec3::new(0.75, 0.0, 0.0),
        Vec3::new(-0.75, 0.0, 0.0),
        CullMode::NoCulling,
        white,
    );
    let cull_modes = [
        CullMode::BackFaceCulling,
        CullMode::FrontFaceCulling,
        CullMode::NoCulling,
    ];

    let mut spinning = Vec::new();
    for (&x, &cull_mode) in columns.iter().zip(&cull_modes) {
        let mut mesh = TriangleMesh::new(cull_mode, white);
        mesh.append_triangle(&base);
        mesh.translate(Vec3::new(x, 4.5, 0.0));
        mesh.update_transforms();
        spinning.push(scene.add_mesh(mesh)?);
    }

    add_lights(&mut scene);

    Ok(Preset {
        name: "reference",
        scene,
        spinning,
    })
}

/// A loaded mesh, scaled up, sitting in the room.
pub fn bunny_from_data(data: MeshData) -> Result<Preset, SceneError> {
    let mut scene = Scene::new(camera());

    let wall = scene.add_material(Lambert::new(Color::new(0.49, 0.57, 0.57), 1.0));
    let white = scene.add_material(Lambert::new(Color::ONE, 1.0));
    add_room(&mut scene, wall)?;

    let mut mesh = TriangleMesh::from_data(data, CullMode::BackFaceCulling, white);
    mesh.scale(Vec3::splat(2.0));
    mesh.update_transforms();
    let id = scene.add_mesh(mesh)?;

    add_lights(&mut scene);

    Ok(Preset {
        name: "bunny",
        scene,
        spinning: vec![id],
    })
}

pub fn bunny(obj: &Path) -> Result<Preset> {
    let data = glint_core::load_obj(obj)
        .with_context(|| format!("failed to load mesh {}", obj.display()))?;
    Ok(bunny_from_data(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_renderer::{RenderConfig, Renderer};
    use std::io::Cursor;

    const TETRAHEDRON: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
f 1 3 2
f 1 2 4
f 1 4 3
f 2 3 4
";

    #[test]
    fn test_reference_contents() {
        let preset = reference().unwrap();
        let scene = &preset.scene;

        assert_eq!(scene.spheres().len(), 6);
        assert_eq!(scene.planes().len(), 5);
        assert_eq!(scene.meshes().len(), 3);
        assert_eq!(scene.lights().len(), 3);
        assert!(scene.is_committed());

        let modes: Vec<CullMode> = scene.meshes().iter().map(|m| m.cull_mode()).collect();
        assert_eq!(
            modes,
            vec![
                CullMode::BackFaceCulling,
                CullMode::FrontFaceCulling,
                CullMode::NoCulling
            ]
        );
    }

    #[test]
    fn test_animate_commits() {
        let mut preset = reference().unwrap();
        preset.animate(1.3);
        assert!(preset.scene.is_committed());

        // A quarter turn about Y swings the triangle's x extent into z
        preset.animate((-0.5_f32).acos());
        let bounds = preset.scene.meshes()[2].world_bounds();
        assert!(bounds.z.size() > 1.0);
    }

    #[test]
    fn test_bunny_from_obj_text() {
        let data = glint_core::parse_obj(&mut Cursor::new(TETRAHEDRON)).unwrap();
        let preset = bunny_from_data(data).unwrap();

        let mesh = &preset.scene.meshes()[0];
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.cull_mode(), CullMode::BackFaceCulling);
        assert!((mesh.world_bounds().max() - Vec3::splat(2.0)).length() < 1e-3);
    }

    #[test]
    fn test_bunny_missing_file() {
        assert!(bunny(Path::new("does/not/exist.obj")).is_err());
    }

    #[test]
    fn test_reference_renders_something() {
        let preset = reference().unwrap();
        let config = RenderConfig::default().with_resolution(32, 24).with_workers(2);
        let frame = Renderer::new(config).unwrap().render_frame(&preset.scene).unwrap();

        let lit = frame.pixels.iter().filter(|&&p| p & 0x00FF_FFFF != 0).count();
        assert!(lit > frame.pixels.len() / 2);
    }
}
