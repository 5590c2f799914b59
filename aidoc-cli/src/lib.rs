//! AIDOC CLI library: schema rendering, offline validation and logging setup
//! behind the `aidoc` binary.

pub mod commands;
pub mod render;
pub mod telemetry;

pub use commands::{ExportFormat, Outcome};
