//! Service layer for the crawler application.
//!
//! This module contains the business logic for:
//! - Resource link detection (`ResourceChecker`)
//! - Page layout extraction (`parsers`)
//! - Layout classification and dispatch (`Dispatcher`)
//! - Page fetching (`PageCrawler`)

mod dispatcher;
mod pages;
pub mod parsers;
mod resources;

pub use dispatcher::{Dispatcher, Fingerprint, Variant};
pub use pages::{PageCrawler, ScrapeOutcome};
pub use resources::{ResourceChecker, ResourcePredicate};
