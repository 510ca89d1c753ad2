//! Wavefront OBJ ingestion.
//!
//! Only positions and faces are read. Faces are triangulated, every object in
//! the file is merged into one `MeshData`, and normals are recomputed per face
//! from the winding, ignoring any `vn` records.

use std::io::BufRead;
use std::path::Path;

use glint_math::Vec3;
use thiserror::Error;

use crate::mesh::{MeshData, MeshError};

/// Errors that can occur while loading an OBJ file.
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("OBJ load error: {0}")]
    Load(#[from] tobj::LoadError),

    #[error("Invalid mesh: {0}")]
    Mesh(#[from] MeshError),

    #[error("No geometry found in OBJ file")]
    NoGeometry,
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Load an OBJ file from disk.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<MeshData, ObjError> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(path, &load_options())?;

    let mesh = merge_models(&models)?;
    log::info!(
        "Loaded {}: {} models, {} vertices, {} triangles",
        path.display(),
        models.len(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse OBJ text from any buffered reader. `mtllib` references are not followed.
pub fn parse_obj<R: BufRead>(reader: &mut R) -> Result<MeshData, ObjError> {
    let (models, _materials) = tobj::load_obj_buf(reader, &load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;
    merge_models(&models)
}

fn merge_models(models: &[tobj::Model]) -> Result<MeshData, ObjError> {
    let mut positions = Vec::new();
    let mut indices = Vec::new();

    for model in models {
        let base = positions.len() as u32;
        positions.extend(
            model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2])),
        );
        indices.extend(model.mesh.indices.iter().map(|&i| base + i));
        log::debug!(
            "OBJ model '{}': {} indices",
            model.name,
            model.mesh.indices.len()
        );
    }

    if indices.is_empty() {
        return Err(ObjError::NoGeometry);
    }

    Ok(MeshData::new(positions, indices)?)
}
