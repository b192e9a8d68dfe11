//! CLI command implementations

pub mod batch;
pub mod fx;
pub mod mix;
pub mod validate;
pub mod watermark;

mod files;
