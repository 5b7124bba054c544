//! Claude Messages API client.
//!
//! Used by the SEO optimizer to draft keywords and product copy. Only the
//! non-streaming endpoint is needed: one prompt in, one text answer out.

mod client;
mod error;
mod types;

pub use client::ClaudeClient;
pub use error::ClaudeError;
pub use types::{ChatRequest, ChatResponse, ContentBlock, Message, Role, StopReason, Usage};
