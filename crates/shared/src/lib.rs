//! Shared types and configuration for Khazna.
//!
//! This crate provides common building blocks used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Money rounding helpers with decimal precision
//! - Configuration management

pub mod config;
pub mod types;

pub use config::CoreConfig;
