//! Core components, types, and utilities for the opslog-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The built-in wizard step table.
//! - Common types and result handling.

pub mod config;
pub mod defaults;
pub mod types;
