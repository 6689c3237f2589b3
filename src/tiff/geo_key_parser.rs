//! GeoKey directory parsing
//!
//! The GeoKeyDirectoryTag (34735) is an array of u16 values: a 4-value
//! header (version, revision, minor revision, key count) followed by one
//! 4-value entry per key (key id, tag location, count, value or offset).

use log::debug;

use crate::tiff::constants::geo_keys;

/// A single GeoKey entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoKeyEntry {
    pub key_id: u16,
    /// 0 when the value is stored inline in `value_offset`
    pub tiff_tag_location: u16,
    pub count: u16,
    pub value_offset: u16,
}

impl GeoKeyEntry {
    pub fn new(key_id: u16, tiff_tag_location: u16, count: u16, value_offset: u16) -> Self {
        GeoKeyEntry {
            key_id,
            tiff_tag_location,
            count,
            value_offset,
        }
    }
}

/// Parser for the GeoKey directory
pub struct GeoKeyParser;

impl GeoKeyParser {
    /// Parses the entries of a GeoKey directory
    ///
    /// Reads as many entries as the header announces, stopping early at the
    /// first entry that would run past the end of `values`.
    pub fn parse_geo_key_directory(values: &[u16]) -> Vec<GeoKeyEntry> {
        let width = geo_keys::ENTRY_WIDTH;
        if values.len() < width {
            return Vec::new();
        }

        let key_count = values[3] as usize;
        debug!("GeoKey directory: version={}, revision={}.{}, keys={}",
               values[0], values[1], values[2], key_count);

        let mut entries = Vec::with_capacity(key_count.min(values.len() / width));
        let mut offset = width;
        for _ in 0..key_count {
            if offset + width > values.len() {
                break;
            }
            let entry = GeoKeyEntry::new(values[offset], values[offset + 1], values[offset + 2], values[offset + 3]);
            debug!("GeoKey: id={}, location={}, count={}, value={}",
                   entry.key_id, entry.tiff_tag_location, entry.count, entry.value_offset);
            entries.push(entry);
            offset += width;
        }

        entries
    }

    /// EPSG code of the projected coordinate system, 0 when absent
    ///
    /// The value field of the first ProjectedCSTypeGeoKey is taken as the
    /// code whatever its tag location says.
    pub fn epsg_code(values: &[u16]) -> u16 {
        Self::parse_geo_key_directory(values)
            .into_iter()
            .find(|entry| entry.key_id == geo_keys::PROJECTED_CS_TYPE)
            .map(|entry| entry.value_offset)
            .unwrap_or(0)
    }
}
