//! Domain layer for checkstyle rule reporting
//!
//! Architecture: Domain Model - audit events as produced by checkstyle, plus the crate's error type
//! - Independent of input formats and output rendering

pub mod events;

pub use events::*;
