//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analytics;
pub mod transactions;
pub mod upload;

// Re-export all handlers for use in router
pub use analytics::*;
pub use transactions::*;
pub use upload::*;
