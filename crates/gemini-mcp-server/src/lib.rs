// crates/gemini-mcp-server/src/lib.rs
// Gemini second-opinion consultation exposed as MCP tools

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod error;
pub mod gemini;
pub mod mcp;
pub mod tools;

pub use error::{GeminiError, Result};
