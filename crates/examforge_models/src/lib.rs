//! Provider integrations and response parsing for Examforge.
//!
//! Two wire formats cover all four provider slots:
//!
//! - [`proxy`]: the server-side generation proxy
//!   (`POST {model, contents, config}` returning a `{success, data, error}`
//!   envelope). Serves the primary and deep-reasoning slots.
//! - [`openai_compat`]: the OpenAI chat-completions format, used by the
//!   fast cloud provider and the local/offline server.
//!
//! The [`parse`] module turns raw generative output, which may contain
//! prose, markdown fencing, or partial JSON, into normalized question
//! items.

pub mod openai_compat;
pub mod parse;
pub mod proxy;

pub use openai_compat::ChatClient;
pub use parse::{
    PaperMeta, PaperSkeleton, RawNonMcq, parse_paper_skeleton, parse_questions, parse_value,
    questions_from_value, sanitize,
};
pub use proxy::{ProxyClient, ProxyDriver};
