//! Data models: document formats, extracted records, batch statistics and
//! configuration.

pub mod config;
pub mod record;
pub mod stats;
