//! Geographic referencing
//!
//! Pixel scale, tiepoint, GeoKey and NoData tags resolved into a
//! `GeoReference` that travels next to the decoded heightmap.

pub mod georeference;
pub mod tag_reader;

pub use georeference::GeoReference;
pub use tag_reader::{parse_no_data, read_geo_reference};
