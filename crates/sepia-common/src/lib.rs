//! Common utilities for the Sepia stylesheet engine.
//!
//! This crate provides shared infrastructure used by all engine components:
//! - **Warning System** - deduplicated warnings for unsupported input

pub mod warning;
