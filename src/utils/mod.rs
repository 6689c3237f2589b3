//! Utility modules for common functionality
//!
//! This module provides various utility functions and types used throughout the application.

pub mod progress;
pub(crate) mod ifd_utils;
pub(crate) mod format_utils;
