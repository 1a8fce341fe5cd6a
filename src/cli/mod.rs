//! CLI module for prplease
//!
//! This module contains all CLI command definitions and handlers using clap.

pub mod commands;
pub mod config;
pub mod generate;
pub mod ping;
pub mod serve;

pub use commands::{Cli, Commands};
