//! Domain layer: entities, errors and naming rules with no I/O of their own.

pub mod entities;
pub mod errors;
pub mod naming;
