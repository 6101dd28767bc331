//! Core components, types, and utilities for the betty-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The persona preamble and canned prompts.
//! - Common types and result handling.

pub mod config;
pub mod prompts;
pub mod types;
