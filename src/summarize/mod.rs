//! Summary generation: prompt construction and the model runtime client.

pub mod prompt;
pub mod runtime;

pub use prompt::build_prompt;
pub use runtime::{Generation, RuntimeClient, FALLBACK_SUMMARY};
