// src/lib.rs

//! edcrawler library
//!
//! Extracts dataset resources from education data portal pages and
//! aggregates scraper output into crawl statistics.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
