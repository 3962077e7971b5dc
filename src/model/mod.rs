//! Wire types for the masterclass handlers
//!
//! `dtos` holds request bodies, `structs` the decoded responses.

pub mod dtos;
pub mod structs;
