//! Application Layer - Use cases and port definitions.
//!
//! This layer orchestrates the domain against external systems through
//! the port interfaces it defines.

/// Port interfaces for external systems.
pub mod ports;

/// Application use cases.
pub mod use_cases;
