//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - Script execution and console capture
//! - Document persistence
//! - Share links
//! - Console highlighting

pub mod highlight;
pub mod sandbox;
pub mod share;
pub mod store;
