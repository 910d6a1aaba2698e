//! HTTP client for the VMS snapshot API.
//!
//! This crate provides:
//! - Connection probing and camera listing
//! - Live and archive snapshot retrieval with Basic auth
//! - Normalization of every failure into a classified error

pub mod client;
pub mod error;

pub use client::{Snapshot, VmsClient, DEFAULT_TIMEOUT};
pub use error::{VmsError, VmsResult};
