//! Seekable reader trait
//!
//! The container reader only needs `Read + Seek`; files are slurped into
//! memory and wrapped in a `Cursor`, tests hand in cursors directly.

use std::io::{Read, Seek};

/// Trait for readers that can both read and seek
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
