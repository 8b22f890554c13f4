// src/models/mod.rs

//! Domain models for the crawler application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod dataset;
mod stats;

// Re-export all public types
pub use config::{Config, CrawlerConfig, PathsConfig, ResourceConfig, StatsConfig};
pub use dataset::{Dataset, Page, Resource};
pub use stats::{CorpusRow, StatKind, StatRow, StatTable};
