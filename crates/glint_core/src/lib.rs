//! Glint Core - geometry data and mesh ingestion.
//!
//! This crate provides:
//!
//! - **Mesh data**: `MeshData`, an indexed triangle list with per-face normals
//! - **OBJ support**: loading Wavefront OBJ files into `MeshData`
//!
//! # Example
//!
//! ```ignore
//! use glint_core::load_obj;
//!
//! let bunny = load_obj("resources/lowpoly_bunny.obj")?;
//! println!("Loaded {} triangles", bunny.triangle_count());
//! ```

pub mod mesh;
pub mod obj;

// Re-export commonly used types
pub use mesh::{MeshData, MeshError};
pub use obj::{load_obj, parse_obj, ObjError};
