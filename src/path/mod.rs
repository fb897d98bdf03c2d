//! # Path Output
//!
//! - **writer**: Phase A/B print-head path assembly (`PathWriter`, `PathRecord`)
//! - **svg**: optional per-layer SVG preview rendering

pub mod svg;
pub mod writer;

pub use writer::{PathRecord, PathWriter};
