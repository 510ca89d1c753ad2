use anyhow::{Context, Result};
use glint_renderer::{RenderConfig, Renderer};
use std::path::Path;
use std::time::Instant;

mod args;
mod scenes;

use args::{Options, ScenePreset};

/// Animation time step between frames, in seconds.
const FRAME_TIME: f32 = 1.0 / 30.0;

fn load_config(path: &Path) -> Result<RenderConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn run(options: &Options) -> Result<()> {
    let mut config = match &options.config {
        Some(path) => load_config(path)?,
        None => RenderConfig::default(),
    };
    if options.no_shadows {
        config.shadows_enabled = false;
    }

    let mut preset = match options.scene {
        ScenePreset::Reference => scenes::reference()?,
        ScenePreset::Bunny => scenes::bunny(&options.obj)?,
    };
    log::info!("Loaded {} scene", preset.name);

    let renderer = Renderer::new(config)?;
    let start = Instant::now();

    for frame in 0..options.frames {
        preset.animate(frame as f32 * FRAME_TIME);

        let image = renderer.render_frame(&preset.scene)?;
        let path = options.frame_path(frame);
        image
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    log::info!(
        "Rendered {} frame(s) in {:.2?}",
        options.frames,
        start.elapsed()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let options = args::parse(std::env::args().skip(1))?;
    run(&options)
}
