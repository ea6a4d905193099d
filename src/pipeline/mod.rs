//! Pipeline entry points

pub mod orchestrator;

pub use orchestrator::{run_exports, run_library, run_repair, PipelineResult};
