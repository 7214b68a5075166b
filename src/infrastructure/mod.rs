//! Adapters: concrete implementations of the ports.

pub mod local_storage;
pub mod oracle;
