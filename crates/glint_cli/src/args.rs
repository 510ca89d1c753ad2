//! Command-line argument parsing.

use anyhow::{anyhow, bail, Context, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const USAGE: &str = "Usage: glint [config.json] [--scene reference|bunny] [--obj path] \
[--frames n] [--out file] [--no-shadows]";

/// Which built-in scene to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePreset {
    Reference,
    Bunny,
}

impl FromStr for ScenePreset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "reference" => Ok(ScenePreset::Reference),
            "bunny" => Ok(ScenePreset::Bunny),
            other => Err(anyhow!("unknown scene '{}' (expected reference or bunny)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// JSON render configuration
    pub config: Option<PathBuf>,
    pub scene: ScenePreset,
    /// Mesh used by the bunny scene
    pub obj: PathBuf,
    pub frames: u32,
    pub out: PathBuf,
    pub no_shadows: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config: None,
            scene: ScenePreset::Reference,
            obj: PathBuf::from("resources/lowpoly_bunny.obj"),
            frames: 1,
            out: PathBuf::from("glint.png"),
            no_shadows: false,
        }
    }
}

impl Options {
    /// Output path for a frame. Single-frame runs write `out` as given,
    /// animations number each frame before the extension.
    pub fn frame_path(&self, frame: u32) -> PathBuf {
        if self.frames <= 1 {
            return self.out.clone();
        }

        let stem = self
            .out
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "glint".to_string());
        let name = match self.out.extension() {
            Some(ext) => format!("{}_{:04}.{}", stem, frame, ext.to_string_lossy()),
            None => format!("{}_{:04}", stem, frame),
        };
        self.out.with_file_name(name)
    }
}

fn value_for(flag: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| anyhow!("{} needs a value\n{}", flag, USAGE))
}

/// Parse arguments, excluding the program name.
pub fn parse<I>(args: I) -> Result<Options>
where
    I: IntoIterator<Item = String>,
{
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scene" => options.scene = value_for(&arg, args.next())?.parse()?,
            "--obj" => options.obj = PathBuf::from(value_for(&arg, args.next())?),
            "--out" => options.out = PathBuf::from(value_for(&arg, args.next())?),
            "--frames" => {
                let value = value_for(&arg, args.next())?;
                options.frames = value
                    .parse()
                    .with_context(|| format!("invalid frame count '{}'", value))?;
            }
            "--no-shadows" => options.no_shadows = true,
            "-h" | "--help" => bail!("{}", USAGE),
            flag if flag.starts_with("--") => bail!("unknown option {}\n{}", flag, USAGE),
            path => {
                if options.config.is_some() {
                    bail!("more than one config file given\n{}", USAGE);
                }
                options.config = Some(Path::new(path).to_path_buf());
            }
        }
    }

    if options.frames == 0 {
        bail!("--frames must be at least 1");
    }
    Ok(options)
}
