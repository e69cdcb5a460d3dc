//! # dossier-llm
//!
//! Language-model completion capability for Dossier.
//!
//! - [`CompletionClient`]: `complete(system, prompt, schema) -> object`, with
//!   an OpenAI-compatible implementation over `reqwest`.
//! - [`StructuredCompleter`]: resolves a prompt by slug, renders it, calls the
//!   client, and validates the output against a registered schema.
//! - [`prompts`]: the prompt-configuration collaborator (built-ins, TOML
//!   overrides, TTL cache).

pub mod client;
mod error;
mod http;
pub mod prompts;
pub mod structured;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use client::{CompletionClient, CompletionRequest, OpenAiClient};
pub use error::LlmError;
pub use prompts::{
    BuiltinPrompts, CachedPromptSource, PromptSource, PromptTemplate, RenderedPrompt,
    TomlPromptDirectory,
};
pub use structured::StructuredCompleter;
