//! Core types for tool dispatch.

pub mod errors;

pub use errors::{DispatchError, ExecError, StagingError, ValidationError};
