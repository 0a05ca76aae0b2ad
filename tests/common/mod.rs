//! Common test utilities and helpers
//!
//! This module provides shared test infrastructure including:
//! - Test fixtures and factories
//! - Test database setup

pub mod factories;

pub use factories::*;
pub use fixtures::*;
