mod core;
mod http;
mod log_payload;

pub use core::CohoMcpCore;
pub use http::{McpHttpServer, RunningMcpHttpServer, resolve_bind_address};
