//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Clipboard
//! - Error types

pub mod clipboard;
pub mod error;
