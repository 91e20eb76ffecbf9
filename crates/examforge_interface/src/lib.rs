//! Trait definitions for the Examforge generation orchestration library.

mod driver;
mod store;

pub use driver::GenerationDriver;
pub use store::ContentStore;
