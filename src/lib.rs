//! picost library
//!
//! Cost models for IBM Power Virtual Server instances: billable monthly
//! quantities and price-lookup keys, a local rate card, and breakdown reports.

pub mod catalog;
pub mod config;
pub mod error;
pub mod plan;
pub mod report;
pub mod resources;
pub mod schema;
pub mod usage;
pub mod validation;

// Re-export commonly used types
pub use error::{PicostError, Result};
pub use resources::pi_instance::{PiInstance, PiInstanceUsage};
pub use schema::{CostLine, PriceSelector, Resource};
