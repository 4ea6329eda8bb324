//! Command logic shared by the CLI handlers.
//!
//! Each `*Logic` type owns one data-changing use case: it validates input,
//! talks to the database and writes the audit line. Rendering stays in the
//! CLI layer.

pub mod add;
pub mod del;
pub mod edit;
pub mod log;
pub mod plan;
pub mod status;
