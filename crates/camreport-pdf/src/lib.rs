//! PDF report assembly for camera snapshots.
//!
//! This crate provides:
//! - Deterministic rendering of capture results into a paginated A4 report
//! - A cover page with project metadata and optional logo
//! - Placeholder blocks for failed captures

pub mod assembler;
pub mod error;
pub mod layout;

mod document;
mod image_data;

pub use assembler::assemble;
pub use error::{ReportError, ReportResult};
