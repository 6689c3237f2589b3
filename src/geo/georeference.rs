//! Geo-reference record
//!
//! Placement of a raster in map space, assuming a north-up grid whose
//! origin is the upper-left pixel corner.

use std::fmt;

/// Map placement and metadata of one raster
#[derive(Debug, Clone, PartialEq)]
pub struct GeoReference {
    /// Map units per pixel along X
    pub pixel_size_x: f64,
    /// Map units per pixel along Y
    pub pixel_size_y: f64,
    /// Map X of the upper-left pixel corner
    pub origin_x: f64,
    /// Map Y of the upper-left pixel corner
    pub origin_y: f64,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    /// EPSG code of the projected coordinate system, 0 when unknown
    pub epsg_code: u16,
    pub has_no_data: bool,
    pub no_data_value: f64,
    /// True when the source carried a pixel scale or a tiepoint
    pub georeferenced: bool,
}

impl Default for GeoReference {
    fn default() -> Self {
        GeoReference::from_parts(1.0, 1.0, 0.0, 0.0, 0, 0)
    }
}

impl GeoReference {
    /// Derives bounds from pixel size, origin and raster dimensions
    pub fn from_parts(
        pixel_size_x: f64,
        pixel_size_y: f64,
        origin_x: f64,
        origin_y: f64,
        width: u32,
        height: u32,
    ) -> Self {
        GeoReference {
            pixel_size_x,
            pixel_size_y,
            origin_x,
            origin_y,
            min_x: origin_x,
            max_x: origin_x + pixel_size_x * width as f64,
            min_y: origin_y - pixel_size_y * height as f64,
            max_y: origin_y,
            epsg_code: 0,
            has_no_data: false,
            no_data_value: 0.0,
            georeferenced: false,
        }
    }

    /// Map-space extent along X
    pub fn span_x(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Map-space extent along Y
    pub fn span_y(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// The minimum (south-west) map corner
    pub fn min_corner(&self) -> (f64, f64) {
        (self.min_x, self.min_y)
    }
}

impl fmt::Display for GeoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pixel size: {} x {}", self.pixel_size_x, self.pixel_size_y)?;
        writeln!(f, "Origin: ({}, {})", self.origin_x, self.origin_y)?;
        writeln!(f, "Bounds: X [{}, {}], Y [{}, {}]", self.min_x, self.max_x, self.min_y, self.max_y)?;
        if self.epsg_code != 0 {
            writeln!(f, "EPSG: {}", self.epsg_code)?;
        } else {
            writeln!(f, "EPSG: unknown")?;
        }
        if self.has_no_data {
            writeln!(f, "NoData: {}", self.no_data_value)?;
        }
        if !self.georeferenced {
            writeln!(f, "(no georeferencing tags, defaults applied)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_north_up() {
        let geo = GeoReference::from_parts(10.0, 5.0, 1000.0, 2000.0, 100, 40);
        assert_eq!(geo.min_x, 1000.0);
        assert_eq!(geo.max_x, 2000.0);
        assert_eq!(geo.max_y, 2000.0);
        assert_eq!(geo.min_y, 1800.0);
        assert_eq!(geo.span_x(), 1000.0);
        assert_eq!(geo.span_y(), 200.0);
    }

    #[test]
    fn test_default_is_unit_grid_at_origin() {
        let geo = GeoReference::default();
        assert_eq!((geo.pixel_size_x, geo.pixel_size_y), (1.0, 1.0));
        assert_eq!(geo.min_corner(), (0.0, 0.0));
        assert!(!geo.georeferenced);
    }
}
