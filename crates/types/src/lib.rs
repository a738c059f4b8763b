//! Shared type definitions for the Codehooks MCP server.
//!
//! These types are deliberately free of I/O so that the registry, the
//! executor and the dispatcher can agree on one vocabulary without pulling in
//! the process or transport layers.

mod arguments;
mod credentials;
mod exec;
mod schema;

pub use arguments::{ArgValue, ValidatedArguments};
pub use credentials::{Credentials, CredentialsUpdate, DEFAULT_SPACE};
pub use exec::{ExecOutput, OutputFormat};
pub use schema::{FieldKind, FieldSpec, StagedFile, ToolSchema};
