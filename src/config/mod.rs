//! Configuration module for catalog scraping
//!
//! This module provides the `ScrapeConfig` struct and its type-safe builder
//! for configuring both pipeline stages with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{ScrapeConfigBuilder, WithEndpoint};
pub use types::{BrowserEndpoint, Credentials, PaginationAbsence, ScrapeConfig};
