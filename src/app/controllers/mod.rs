//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models and services:
//! - Undo/redo history and edit debouncing
//! - The editing session

pub mod history;
pub mod session;
