//! Parse-and-aggregate layer for expense statistics.
//!
//! Responsible for acquiring the raw text, extracting expense records from
//! it, aggregating them into monthly, yearly and per-label statistics, and
//! running the combined analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod parser;
pub mod reader;

pub use expense_core as core;
