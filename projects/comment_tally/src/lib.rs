//! Per-author comment counts for a GitHub repository's issues
//!
//! - CLI/env configuration in `config`
//! - page fetch + decode glue in `source` and `decoder`
//! - pagination loop in `driver`, accumulation in `tally`
//! - plain-text output in `report`

pub mod config;
pub mod decoder;
pub mod driver;
pub mod report;
pub mod source;
pub mod tally;
