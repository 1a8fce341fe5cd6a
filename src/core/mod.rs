//! Core functionality for prplease
//!
//! This module contains shared business logic including:
//! - Client settings persistence
//! - API key obfuscation
//! - The caller-facing generation pipeline

pub mod config;
pub mod obfuscation;
pub mod pipeline;

pub use config::{GenerationMode, Settings};
pub use pipeline::{Pipeline, PrRequest};
