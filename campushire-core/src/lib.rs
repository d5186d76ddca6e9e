//! CampusHire Core - Shared domain types and utilities
//!
//! This module defines the user/role domain types and the logging setup shared
//! by the CampusHire auth crates.

pub mod logging;
pub mod types;

pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
