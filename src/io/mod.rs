//! I/O utilities for raster sources
//!
//! This module provides the reader trait and the byte order strategies
//! used by the TIFF container reader and the sample decoders.

pub mod seekable;
pub mod byte_order;
