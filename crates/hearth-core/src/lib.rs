//! Shared data model for the Hearth client crates.
//!
//! Contains the wire types exchanged with the household aggregation backend
//! plus the small time helpers used for client-stamped message timestamps.

pub mod time_utils;
pub mod types;

pub use time_utils::now_rfc3339;
pub use types::*;
