//! # Pantry Support
//!
//! Shared utilities for the Pantry DI crates.
//!
//! This crate provides:
//! - Text rendering for error messages
//! - Key similarity suggestions

pub mod rendering;
