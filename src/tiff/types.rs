//! Parsed container layout

use crate::io::byte_order::ByteOrder;
use crate::tiff::ifd::IFD;

/// Header facts and the directory chain of one TIFF file
#[derive(Debug)]
pub struct TiffContainer {
    /// Directories in chain order; the first is the full-resolution image
    pub ifds: Vec<IFD>,
    pub is_big_tiff: bool,
    pub byte_order: ByteOrder,
}

impl TiffContainer {
    pub fn new(is_big_tiff: bool, byte_order: ByteOrder) -> Self {
        TiffContainer {
            ifds: Vec::new(),
            is_big_tiff,
            byte_order,
        }
    }

    /// The full-resolution image directory
    pub fn main_ifd(&self) -> Option<&IFD> {
        self.ifds.first()
    }

    pub fn ifd_count(&self) -> usize {
        self.ifds.len()
    }

    /// Directories after the first (overviews, masks, thumbnails)
    pub fn secondary_ifds(&self) -> &[IFD] {
        self.ifds.get(1..).unwrap_or(&[])
    }
}
