//! prplease - PR title and description generation
//!
//! This library provides the diff sanitizer, the prompt and response
//! handling around Gemini, the relay service and the CLI that ties them
//! together.

pub mod ai;
pub mod cli;
pub mod core;
pub mod diff;
pub mod error;
pub mod relay;

pub use error::{PrPleaseError, Result};
