//! Model Context Protocol server that proxies a fixed tool catalog to the
//! Codehooks command-line client.
//!
//! A tool call flows through the [`dispatch::Dispatcher`]: credentials are
//! checked, arguments are validated against the tool's schema, the tool's
//! strategy plans a command, file payloads are staged, and the
//! [`executor::CommandExecutor`] runs the CLI with the admin token appended
//! and redacted from everything it returns.

pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod executor;
pub mod registry;
pub mod server;
pub mod staging;
pub mod types;

pub use config::ServerSettings;
pub use credentials::CredentialStore;
pub use dispatch::{Dispatcher, ToolOutput};
pub use executor::{CommandExecutor, CommandLine, CommandRunner, Invocation, ProcessRunner};
pub use registry::{ToolDescriptor, ToolKind, ToolRegistry};
pub use server::{CohoMcpCore, McpHttpServer, RunningMcpHttpServer, resolve_bind_address};
pub use staging::StagingArea;
pub use types::{DispatchError, ExecError, StagingError, ValidationError};
