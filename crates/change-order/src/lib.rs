//! Rule evaluation core for three-track change-order claims.
//!
//! The [`workflows::change_order`] module holds the pure calculators (preclusion,
//! totals, resolution, subsidiary triggers) and the status guidance engine. The
//! remaining modules carry the ambient configuration, telemetry, and error types
//! used by the command-line front end.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
