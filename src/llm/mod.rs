pub mod client;
pub mod error;
pub mod types;

pub use client::{GeminiClient, LlmClient, OpenAiClient};
pub use error::LlmError;
pub use types::Message;
