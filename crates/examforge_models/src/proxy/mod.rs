//! Client for the server-side generation proxy.
//!
//! The proxy accepts `POST /ai/generate` with `{model, contents, config}`
//! and answers with a `{success, data, error}` envelope. It serves both the
//! primary slot (strict structured-output mode) and the deep-reasoning slot
//! (structured mode off, fenced-block instruction appended instead).

mod client;
mod driver;
mod dto;

pub use client::ProxyClient;
pub use driver::ProxyDriver;
pub use dto::{
    ContentPart, ContentPayload, InlineBlob, ProxyEnvelope, ProxyGenerationConfig, ProxyRequest,
    encode_inline,
};
