//! Elevation decoding entry point
//!
//! Validates the header and dispatches to the strip or tile path. A
//! rejected header produces no grid at all.

use log::info;

use crate::errors::TerrainResult;
use crate::raster::elevation::ElevationGrid;
use crate::raster::source::RasterSource;
use crate::raster::strip_reader::StripDecoder;
use crate::raster::tile_reader::TileDecoder;

/// Decodes the full raster into an elevation grid, source row y at output row `height - 1 - y`
pub fn decode_elevation(source: &mut dyn RasterSource) -> TerrainResult<ElevationGrid> {
    let header = source.header().clone();
    header.validate()?;

    let handler = source.byte_order().create_handler();
    let mut grid = ElevationGrid::new(header.width as usize, header.height as usize);

    match header.tiling {
        Some(layout) => {
            info!("Decoding tiled raster ({}x{} tiles)", layout.tile_width, layout.tile_height);
            TileDecoder::new(&header, layout, handler.as_ref()).extract(source, &mut grid);
        }
        None => {
            info!("Decoding striped raster ({} rows per strip)", header.rows_per_strip);
            StripDecoder::new(&header, handler.as_ref()).extract(source, &mut grid);
        }
    }

    Ok(grid)
}
