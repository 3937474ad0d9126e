//! CLI command implementations
//!
//! - `analyze`: per-question results
//! - `report`: collection summary with a success-rate gate
//! - `detect`: rule detection on free text
//! - `schema`: JSON schemas of the input and output types
//! - `util`: shared argument and output helpers

pub mod analyze;
pub mod detect;
pub mod report;
pub mod schema;
pub mod util;

// Re-export all command functions for convenient access
pub use analyze::cmd_analyze;
pub use detect::cmd_detect;
pub use report::cmd_report;
pub use schema::cmd_schema;
