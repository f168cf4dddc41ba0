//! Mesh export: the host writes the OBJ, we append the object's Y-up world
//! matrix as a trailing `TRANSFORM` line.

pub mod obj;

pub use obj::{MeshExporter, OBJ_EXTENSION, TRANSFORM_KEYWORD};
