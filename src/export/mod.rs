//! Output writers used by the CLI
//!
//! Heightmaps go out as a 16-bit PNG, a raw little-endian `.r16` dump and a
//! `.meta.toml` sidecar. Terrain tiles go out as a grid PNG or an OBJ mesh,
//! and a batch additionally gets a `layout.toml` with placement and
//! neighbours.

pub mod heightmap;
pub mod obj;
pub mod grid;
pub mod layout;

pub use heightmap::{write_heightmap_files, write_heightmap_png, write_metadata, write_raw16, HeightmapFiles};
pub use obj::{write_obj, write_obj_to};
pub use grid::write_grid_png;
pub use layout::{layout_document, write_layout};

use std::io;

/// Wraps a TOML serialization error as an I/O error
pub(crate) fn toml_error(e: toml::ser::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}
