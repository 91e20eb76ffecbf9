//! Generic client for OpenAI-compatible chat APIs.
//!
//! The fast cloud provider and the local/offline server both speak the
//! chat-completions format; this module provides one client for either,
//! differing only in base URL and authentication.

mod client;
mod dto;

pub use client::ChatClient;
pub use dto::{ChatChoice, ChatMessage, ChatRequest, ChatResponse, ResponseFormat};
