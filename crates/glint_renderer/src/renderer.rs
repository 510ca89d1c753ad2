//! Direct-lighting renderer.
//!
//! Each pixel casts one primary ray. At the nearest hit every light is tested
//! with a single shadow ray and its contribution accumulated according to the
//! current `LightingMode`. There are no bounces.

use crate::{
    dispatch::WorkerPool,
    material::Color,
    scene::{MeshId, Scene},
    Ray,
};
use glint_math::{Camera, Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use thiserror::Error;

/// Which term of the lighting equation ends up in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightingMode {
    /// Lambert cosine only
    ObservedArea,
    /// Incoming light only
    Radiance,
    /// Material response only
    Brdf,
    /// radiance * brdf * cosine
    #[default]
    Combined,
}

impl LightingMode {
    /// The next mode in display order.
    pub fn next(self) -> Self {
        match self {
            LightingMode::Combined => LightingMode::ObservedArea,
            LightingMode::ObservedArea => LightingMode::Radiance,
            LightingMode::Radiance => LightingMode::Brdf,
            LightingMode::Brdf => LightingMode::Combined,
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Whether lights can be blocked by geometry
    pub shadows_enabled: bool,
    pub lighting_mode: LightingMode,
    /// Worker threads, 0 = one per core
    pub workers: usize,
    /// Distance along the normal that shadow rays start from
    pub shadow_bias: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            shadows_enabled: true,
            lighting_mode: LightingMode::Combined,
            workers: 0,
            shadow_bias: 0.01,
        }
    }
}

impl RenderConfig {
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_shadows(mut self, enabled: bool) -> Self {
        self.shadows_enabled = enabled;
        self
    }

    pub fn with_lighting_mode(mut self, mode: LightingMode) -> Self {
        self.lighting_mode = mode;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_shadow_bias(mut self, bias: f32) -> Self {
        self.shadow_bias = bias;
        self
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Errors that abort a frame before any pixel is written.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("buffer holds {actual} pixels but the frame needs {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("mesh {0:?} was moved without committing the scene")]
    StaleMesh(MeshId),

    #[error("failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Scale a color down so no channel exceeds 1, keeping its hue.
pub fn max_to_one(color: Color) -> Color {
    let max = color.max_element();
    if max > 1.0 {
        color / max
    } else {
        color
    }
}

/// Quantize a color to 8 bits per channel as `0xFF_RR_GG_BB`.
///
/// Channels are truncated and saturate at 0 and 255.
pub fn pack_color(color: Color) -> u32 {
    let r = (color.x * 255.0) as u8 as u32;
    let g = (color.y * 255.0) as u8 as u32;
    let b = (color.z * 255.0) as u8 as u32;
    0xFF00_0000 | (r << 16) | (g << 8) | b
}

/// Inverse of `pack_color`, up to quantization.
pub fn unpack_color(pixel: u32) -> Color {
    let r = (pixel >> 16) & 0xFF;
    let g = (pixel >> 8) & 0xFF;
    let b = pixel & 0xFF;
    Color::new(r as f32, g as f32, b as f32) / 255.0
}

/// Per-frame primary ray setup.
struct Projection {
    camera_to_world: Mat4,
    origin: Vec3,
    width: usize,
    inv_width: f32,
    inv_height: f32,
    aspect: f32,
    fov_scale: f32,
}

impl Projection {
    fn new(camera: &Camera, config: &RenderConfig) -> Self {
        Self {
            camera_to_world: camera.camera_to_world(),
            origin: camera.origin,
            width: config.width.max(1) as usize,
            inv_width: 1.0 / config.width.max(1) as f32,
            inv_height: 1.0 / config.height.max(1) as f32,
            aspect: config.aspect_ratio(),
            fov_scale: camera.fov_scale(),
        }
    }

    /// Primary ray through the centre of the pixel at flat index `index`.
    fn ray(&self, index: usize) -> Ray {
        let px = (index % self.width) as f32;
        let py = (index / self.width) as f32;

        let x = (2.0 * (px + 0.5) * self.inv_width - 1.0) * self.aspect * self.fov_scale;
        let y = (1.0 - 2.0 * (py + 0.5) * self.inv_height) * self.fov_scale;

        let direction = self
            .camera_to_world
            .transform_vector3(Vec3::new(x, y, 1.0))
            .normalize();
        Ray::new(self.origin, direction)
    }
}

/// Multi-threaded direct-lighting renderer.
pub struct Renderer {
    config: RenderConfig,
    pool: WorkerPool,
}

impl Renderer {
    /// Create a renderer and start its worker threads.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        let pool = WorkerPool::new(config.workers)?;
        log::info!(
            "Renderer ready: {}x{}, {} workers, {:?}",
            config.width,
            config.height,
            pool.workers(),
            config.lighting_mode
        );
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn shadows_enabled(&self) -> bool {
        self.config.shadows_enabled
    }

    pub fn lighting_mode(&self) -> LightingMode {
        self.config.lighting_mode
    }

    pub fn toggle_shadows(&mut self) {
        self.config.shadows_enabled = !self.config.shadows_enabled;
        log::info!("Shadows {}", if self.config.shadows_enabled { "on" } else { "off" });
    }

    pub fn cycle_lighting_mode(&mut self) {
        self.config.lighting_mode = self.config.lighting_mode.next();
        log::info!("Lighting mode: {:?}", self.config.lighting_mode);
    }

    /// Render one frame into `buffer`, row-major, `width * height` pixels.
    pub fn render(&self, scene: &Scene, buffer: &mut [u32]) -> Result<(), RenderError> {
        let expected = self.config.pixel_count();
        if buffer.len() != expected {
            return Err(RenderError::BufferSize {
                expected,
                actual: buffer.len(),
            });
        }
        if let Some(index) = scene.meshes().iter().position(|m| m.is_dirty()) {
            return Err(RenderError::StaleMesh(MeshId(index)));
        }

        let start = Instant::now();
        let projection = Projection::new(scene.camera(), &self.config);

        self.pool.run(buffer, |first, pixels| {
            for (offset, pixel) in pixels.iter_mut().enumerate() {
                let ray = projection.ray(first + offset);
                *pixel = pack_color(max_to_one(self.shade(scene, &ray)));
            }
        });

        log::debug!("Frame rendered in {:.2?}", start.elapsed());
        Ok(())
    }

    /// Render one frame into a new frame buffer.
    pub fn render_frame(&self, scene: &Scene) -> Result<FrameBuffer, RenderError> {
        let mut frame = FrameBuffer::new(self.config.width, self.config.height);
        self.render(scene, &mut frame.pixels)?;
        Ok(frame)
    }

    /// Linear color seen along a primary ray, before clamping.
    fn shade(&self, scene: &Scene, ray: &Ray) -> Color {
        let hit = scene.closest_hit(ray);
        if !hit.did_hit {
            return Color::ZERO;
        }

        let material = scene.material(hit.material);
        let view_dir = -ray.direction();
        let start = hit.point + hit.normal * self.config.shadow_bias;

        let mut color = Color::ZERO;
        for light in scene.lights() {
            let (light_dir, distance) = light.direction_from(start);

            if self.config.shadows_enabled {
                let shadow_ray = Ray::new(start, light_dir).with_t_max(distance);
                if scene.any_hit(&shadow_ray) {
                    continue;
                }
            }

            let cosine = hit.normal.dot(light_dir);
            match self.config.lighting_mode {
                LightingMode::ObservedArea => {
                    if cosine > 0.0 {
                        color += Color::splat(cosine);
                    }
                }
                LightingMode::Radiance => color += light.radiance(start),
                LightingMode::Brdf => color += material.shade(&hit, light_dir, view_dir),
                LightingMode::Combined => {
                    if cosine > 0.0 {
                        let brdf = material.shade(&hit, light_dir, view_dir);
                        color += light.radiance(start) * brdf * cosine;
                    }
                }
            }
        }

        color
    }
}

/// A rendered frame of packed `0xFF_RR_GG_BB` pixels.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    /// Create a new frame buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0xFF00_0000; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Convert to an 8-bit RGB image.
    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let pixel = self.get(x, y);
            image::Rgb([(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8])
        })
    }

    /// Save to disk; the format follows the file extension (PNG, BMP, ...).
    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        let path = path.as_ref();
        self.to_image().save(path)?;
        log::info!("Saved {}x{} frame to {}", self.width, self.height, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CookTorrance, CullMode, Lambert, Light, Material, MaterialId, SolidColor, Triangle};
    use std::collections::HashSet;
    use std::f32::consts::PI;

    /// Floor plane with a sphere hovering over it, lit from above.
    fn shadow_scene() -> Scene {
        let camera = Camera::new(Vec3::new(0.0, 6.0, -6.0), 60.0).looking_at(Vec3::ZERO);
        let mut scene = Scene::new(camera);

        let grey = scene.add_material(Lambert::new(Color::splat(0.8), 1.0));
        scene.add_plane(Vec3::ZERO, Vec3::Y, grey).unwrap();
        scene.add_sphere(Vec3::new(0.0, 1.5, 0.0), 1.0, grey).unwrap();
        scene.add_light(Light::point(Vec3::new(0.0, 6.0, 0.0), 40.0, Color::ONE));
        scene
    }

    /// Camera at the origin looking down +Z at a wall two units away.
    fn wall_scene(material: impl Material + 'static) -> Scene {
        let mut scene = Scene::new(Camera::new(Vec3::ZERO, 60.0));
        let id = scene.add_material(material);
        scene.add_plane(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z, id).unwrap();
        scene
    }

    fn render_single_pixel(scene: &Scene, mode: LightingMode, shadows: bool) -> u32 {
        let config = RenderConfig::default()
            .with_resolution(1, 1)
            .with_workers(1)
            .with_lighting_mode(mode)
            .with_shadows(shadows)
            .with_shadow_bias(0.0);
        Renderer::new(config).unwrap().render_frame(scene).unwrap().pixels[0]
    }

    fn occluded_pixels(renderer: &Renderer, scene: &Scene) -> HashSet<usize> {
        let projection = Projection::new(scene.camera(), renderer.config());
        let bias = renderer.config().shadow_bias;

        (0..renderer.config().pixel_count())
            .filter(|&i| {
                let hit = scene.closest_hit(&projection.ray(i));
                if !hit.did_hit {
                    return false;
                }
                let start = hit.point + hit.normal * bias;
                scene.lights().iter().any(|light| {
                    let (dir, distance) = light.direction_from(start);
                    scene.any_hit(&Ray::new(start, dir).with_t_max(distance))
                })
            })
            .collect()
    }

    #[test]
    fn test_lighting_mode_cycle() {
        let mut mode = LightingMode::Combined;
        let mut seen = Vec::new();
        for _ in 0..4 {
            mode = mode.next();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            vec![
                LightingMode::ObservedArea,
                LightingMode::Radiance,
                LightingMode::Brdf,
                LightingMode::Combined
            ]
        );
    }

    #[test]
    fn test_pack_unpack() {
        assert_eq!(pack_color(Color::new(1.0, 0.0, 0.0)), 0xFFFF_0000);
        assert_eq!(pack_color(Color::new(0.0, 1.0, 0.0)), 0xFF00_FF00);
        assert_eq!(pack_color(Color::ZERO), 0xFF00_0000);

        // Truncation, not rounding
        assert_eq!(pack_color(Color::splat(0.999)) & 0xFF, 254);

        let c = unpack_color(0xFF80_4020);
        assert!((c - Color::new(128.0, 64.0, 32.0) / 255.0).length() < 1e-6);
    }

    #[test]
    fn test_max_to_one_keeps_hue() {
        let c = max_to_one(Color::new(4.0, 2.0, 1.0));
        assert_eq!(c, Color::new(1.0, 0.5, 0.25));

        let dim = Color::new(0.2, 0.4, 0.6);
        assert_eq!(max_to_one(dim), dim);
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r#"{ "width": 320, "lighting_mode": "Brdf" }"#).unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 480);
        assert_eq!(config.lighting_mode, LightingMode::Brdf);
        assert!(config.shadows_enabled);
        assert_eq!(config.shadow_bias, 0.01);
    }

    #[test]
    fn test_center_ray_follows_camera_forward() {
        let config = RenderConfig::default().with_resolution(3, 3);
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), 90.0);
        let projection = Projection::new(&camera, &config);

        let center = projection.ray(4);
        assert_eq!(center.origin(), camera.origin);
        assert!((center.direction() - Vec3::Z).length() < 1e-5);

        // Top-left pixel looks up and to the left
        let corner = projection.ray(0);
        assert!(corner.direction().x < 0.0);
        assert!(corner.direction().y > 0.0);
    }

    #[test]
    fn test_buffer_size_mismatch() {
        let renderer = Renderer::new(RenderConfig::default().with_resolution(4, 4).with_workers(2)).unwrap();
        let mut buffer = vec![0u32; 15];
        let err = renderer.render(&Scene::default(), &mut buffer).unwrap_err();
        assert!(matches!(err, RenderError::BufferSize { expected: 16, actual: 15 }));
    }

    #[test]
    fn test_stale_mesh_refused() {
        let mut scene = Scene::default();
        let id = scene.add_triangle_mesh(CullMode::NoCulling, MaterialId::DEFAULT).unwrap();
        scene
            .mesh_mut(id)
            .unwrap()
            .append_triangle(&Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, CullMode::NoCulling, MaterialId::DEFAULT));

        let renderer = Renderer::new(RenderConfig::default().with_resolution(4, 4).with_workers(2)).unwrap();
        let mut buffer = vec![0u32; 16];
        let err = renderer.render(&scene, &mut buffer).unwrap_err();
        assert!(matches!(err, RenderError::StaleMesh(MeshId(0))));

        scene.commit();
        assert!(renderer.render(&scene, &mut buffer).is_ok());
    }

    #[test]
    fn test_solid_color_fills_pixels() {
        let mut scene = Scene::new(Camera::new(Vec3::ZERO, 60.0));
        let blue = scene.add_material(SolidColor::new(Color::new(0.0, 0.0, 1.0)));
        scene.add_plane(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, blue).unwrap();
        scene.add_light(Light::directional(Vec3::Z, 1.0, Color::ONE));

        let config = RenderConfig::default()
            .with_resolution(8, 6)
            .with_workers(3)
            .with_lighting_mode(LightingMode::Brdf);
        let renderer = Renderer::new(config).unwrap();
        let frame = renderer.render_frame(&scene).unwrap();

        assert!(frame.pixels.iter().all(|&p| p == 0xFF00_00FF));
    }

    #[test]
    fn test_toggle_shadows_changes_only_occluded_pixels() {
        let _ = env_logger::builder().is_test(true).try_init();

        let scene = shadow_scene();
        let config = RenderConfig::default().with_resolution(48, 32).with_workers(4);
        let mut renderer = Renderer::new(config).unwrap();

        let with_shadows = renderer.render_frame(&scene).unwrap();
        renderer.toggle_shadows();
        assert!(!renderer.shadows_enabled());
        let without_shadows = renderer.render_frame(&scene).unwrap();

        let changed: HashSet<usize> = with_shadows
            .pixels
            .iter()
            .zip(&without_shadows.pixels)
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect();
        let occluded = occluded_pixels(&renderer, &scene);

        assert!(!changed.is_empty(), "the sphere should shadow the floor");
        assert!(changed.is_subset(&occluded));
    }

    #[test]
    fn test_render_is_deterministic_across_worker_counts() {
        let scene = shadow_scene();
        let frames: Vec<FrameBuffer> = [1, 3, 7]
            .into_iter()
            .map(|workers| {
                let config = RenderConfig::default().with_resolution(20, 10).with_workers(workers);
                Renderer::new(config).unwrap().render_frame(&scene).unwrap()
            })
            .collect();

        assert_eq!(frames[0].pixels, frames[1].pixels);
        assert_eq!(frames[0].pixels, frames[2].pixels);
    }

    #[test]
    fn test_frame_to_image() {
        let mut frame = FrameBuffer::new(2, 1);
        frame.pixels[1] = 0xFF10_2030;
        let image = frame.to_image();
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(image.get_pixel(1, 0).0, [0x10, 0x20, 0x30]);
    }

    #[test]
    fn test_lighting_mode_values() {
        // Intensity 4 at distance 2 delivers unit radiance head-on
        let mut scene = wall_scene(Lambert::new(Color::ONE, 0.5));
        scene.add_light(Light::point(Vec3::ZERO, 4.0, Color::ONE));

        let white = pack_color(Color::ONE);
        let brdf = pack_color(Color::splat(0.5 / PI));

        assert_eq!(render_single_pixel(&scene, LightingMode::ObservedArea, true), white);
        assert_eq!(render_single_pixel(&scene, LightingMode::Radiance, true), white);
        assert_eq!(render_single_pixel(&scene, LightingMode::Brdf, true), brdf);
        assert_eq!(render_single_pixel(&scene, LightingMode::Combined, true), brdf);
    }

    #[test]
    fn test_combined_scales_by_radiance_and_cosine() {
        // Radiance 0.5 from a light 60 degrees off the normal
        let mut scene = wall_scene(Lambert::new(Color::ONE, 1.0));
        let light_dir = Vec3::new((60.0_f32).to_radians().sin(), 0.0, -0.5);
        scene.add_light(Light::directional(-light_dir, 0.5, Color::ONE));

        let expected = pack_color(Color::splat(0.5 / PI * 0.5));
        assert_eq!(render_single_pixel(&scene, LightingMode::Combined, true), expected);
    }

    #[test]
    fn test_shadow_ray_stops_at_light() {
        let mut scene = wall_scene(Lambert::new(Color::ONE, 1.0));
        // Behind the camera, on the line from the wall through the origin
        scene.add_sphere(Vec3::new(0.0, 0.0, -3.0), 0.5, MaterialId::DEFAULT).unwrap();
        scene.add_light(Light::point(Vec3::ZERO, 4.0, Color::ONE));
        let lit = pack_color(Color::ONE);

        // Sphere beyond the light
        assert_eq!(render_single_pixel(&scene, LightingMode::ObservedArea, true), lit);

        // Light moved past the sphere
        let mut blocked = wall_scene(Lambert::new(Color::ONE, 1.0));
        blocked.add_sphere(Vec3::new(0.0, 0.0, -3.0), 0.5, MaterialId::DEFAULT).unwrap();
        blocked.add_light(Light::point(Vec3::new(0.0, 0.0, -6.0), 64.0, Color::ONE));
        assert_eq!(render_single_pixel(&blocked, LightingMode::ObservedArea, true), 0xFF00_0000);
        assert_eq!(render_single_pixel(&blocked, LightingMode::ObservedArea, false), lit);
    }

    #[test]
    fn test_smooth_cook_torrance_highlight_is_not_black() {
        let mut scene = wall_scene(CookTorrance::new(Color::splat(0.75), 0.0, 0.0));
        scene.add_light(Light::directional(Vec3::Z, 1.0, Color::ONE));

        let pixel = render_single_pixel(&scene, LightingMode::Combined, true);
        assert_ne!(pixel & 0x00FF_FFFF, 0);
    }
}
