//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Logging utilities
//! - Error reporting sinks for recoverable failures

pub mod math;
pub mod logging;
pub mod error_reporter;
