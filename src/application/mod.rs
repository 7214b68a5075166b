//! Application layer: runtime setup and the export loop.

pub mod orchestrator;
pub mod runtime;
