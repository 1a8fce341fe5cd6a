//! AI integration module
//!
//! This module turns a cleaned diff and commit list into PR content:
//! - Prompt construction
//! - Direct Gemini calls or relayed calls
//! - Response validation

pub mod gemini;
pub mod generator;
pub mod prompts;
pub mod relay_client;
pub mod response;

pub use gemini::GeminiClient;
pub use generator::{DirectGenerator, ModelClient, PrGenerator};
pub use prompts::PromptBuilder;
pub use relay_client::RelayClient;
pub use response::GenerationResult;
