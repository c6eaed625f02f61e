//! Shared infrastructure: error types and CLI arguments

pub mod cli;
pub mod error;

pub use cli::{CommonArgs, ToolArgs, ToolCommand};
pub use error::{RshError, RshResult};
