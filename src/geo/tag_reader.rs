//! GeoTIFF tag reader
//!
//! Builds a `GeoReference` from the auxiliary tags of a raster source
//! without touching pixel data. Every tag is optional: a missing or short
//! tag falls back to its default.

use log::{debug, info};

use crate::geo::georeference::GeoReference;
use crate::raster::source::RasterSource;
use crate::tiff::constants::tags;
use crate::tiff::geo_key_parser::GeoKeyParser;

/// Pixel size from ModelPixelScaleTag, if it holds at least two values
pub fn read_pixel_scale(source: &dyn RasterSource) -> Option<(f64, f64)> {
    let values = source.tag(tags::MODEL_PIXEL_SCALE_TAG).as_f64s();
    (values.len() >= 2).then(|| (values[0], values[1]))
}

/// Model coordinate of the first tiepoint, if a full group of six exists
pub fn read_tiepoint_origin(source: &dyn RasterSource) -> Option<(f64, f64)> {
    let values = source.tag(tags::MODEL_TIEPOINT_TAG).as_f64s();
    (values.len() >= 6).then(|| (values[3], values[4]))
}

/// EPSG code from the GeoKey directory, 0 when absent
pub fn read_epsg_code(source: &dyn RasterSource) -> u16 {
    GeoKeyParser::epsg_code(&source.tag(tags::GEO_KEY_DIRECTORY_TAG).as_u16s())
}

/// Parses a GDAL NoData string
pub fn parse_no_data(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Reads the full geo-reference for a raster of `width` x `height` pixels
pub fn read_geo_reference(source: &dyn RasterSource, width: u32, height: u32) -> GeoReference {
    let pixel_scale = read_pixel_scale(source);
    let origin = read_tiepoint_origin(source);

    let (pixel_size_x, pixel_size_y) = pixel_scale.unwrap_or((1.0, 1.0));
    let (origin_x, origin_y) = origin.unwrap_or((0.0, 0.0));

    let mut geo = GeoReference::from_parts(pixel_size_x, pixel_size_y, origin_x, origin_y, width, height);
    geo.georeferenced = pixel_scale.is_some() || origin.is_some();
    geo.epsg_code = read_epsg_code(source);

    let no_data = source.tag(tags::GDAL_NODATA);
    if let Some(text) = no_data.as_str() {
        match parse_no_data(text) {
            Some(value) => {
                geo.has_no_data = true;
                geo.no_data_value = value;
            }
            None => debug!("Ignoring unparseable NoData value {:?}", text),
        }
    }

    info!("Pixel size: {} x {}, origin: ({}, {}), EPSG: {}",
          geo.pixel_size_x, geo.pixel_size_y, geo.origin_x, geo.origin_y, geo.epsg_code);
    geo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiff::{TiffBuilder, TiffSource};

    fn source(builder: TiffBuilder) -> TiffSource {
        TiffSource::from_bytes(builder.build().unwrap()).unwrap()
    }

    #[test]
    fn test_full_geo_reference() {
        let src = source(
            TiffBuilder::new(100, 50)
                .pixel_scale(2.0, 2.0)
                .tiepoint(385000.0, 6672000.0)
                .epsg(3067)
                .no_data("-9999"),
        );
        let geo = read_geo_reference(&src, 100, 50);

        assert!(geo.georeferenced);
        assert_eq!(geo.epsg_code, 3067);
        assert_eq!(geo.min_x, 385000.0);
        assert_eq!(geo.max_x, 385200.0);
        assert_eq!(geo.max_y, 6672000.0);
        assert_eq!(geo.min_y, 6671900.0);
        assert!(geo.has_no_data);
        assert_eq!(geo.no_data_value, -9999.0);
    }

    #[test]
    fn test_defaults_without_tags() {
        let geo = read_geo_reference(&source(TiffBuilder::new(4, 3)), 4, 3);
        assert!(!geo.georeferenced);
        assert_eq!((geo.pixel_size_x, geo.pixel_size_y), (1.0, 1.0));
        assert_eq!((geo.origin_x, geo.origin_y), (0.0, 0.0));
        assert_eq!((geo.min_y, geo.max_x), (-3.0, 4.0));
        assert_eq!(geo.epsg_code, 0);
        assert!(!geo.has_no_data);
    }

    #[test]
    fn test_short_tags_fall_back() {
        use crate::tiff::FieldData;

        let src = source(
            TiffBuilder::new(2, 2)
                .tag(tags::MODEL_PIXEL_SCALE_TAG, FieldData::Doubles(vec![5.0]))
                .tag(tags::MODEL_TIEPOINT_TAG, FieldData::Doubles(vec![0.0, 0.0, 0.0, 10.0, 20.0])),
        );
        assert_eq!(read_pixel_scale(&src), None);
        assert_eq!(read_tiepoint_origin(&src), None);
    }

    #[test]
    fn test_unparseable_no_data() {
        let geo = read_geo_reference(&source(TiffBuilder::new(2, 2).no_data("n/a")), 2, 2);
        assert!(!geo.has_no_data);
    }

    #[test]
    fn test_parse_no_data() {
        assert_eq!(parse_no_data("-9999"), Some(-9999.0));
        assert_eq!(parse_no_data(" 3.4028235e38 "), Some(3.4028235e38));
        assert_eq!(parse_no_data("n/a"), None);
        assert_eq!(parse_no_data(""), None);
    }
}
