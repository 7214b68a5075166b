//! Ports: the traits the orchestrator talks to.

pub mod apex_export_port;
pub mod artifact_port;
