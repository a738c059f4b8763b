//! Runtime settings for the server.
//!
//! Settings describe how the server runs (which executables, where to stage,
//! how long to wait); credentials live in [`crate::credentials`].

mod model;

pub use model::{DEFAULT_CLI_PROGRAM, DEFAULT_NPM_PROGRAM, DEFAULT_TIMEOUT, ServerSettings};
