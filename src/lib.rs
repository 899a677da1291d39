//! # Tabjobs - Batch Transforms for Tabular Records
//!
//! Tabjobs reads customer and product tables from delimited text, applies a
//! fixed per-row or per-column rule, and writes the result as CSV and/or a
//! workbook. Five jobs share the same shape:
//!
//! ```text
//! Table Loader ──> Rule ──> (Reporter) ──> Table Writer
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use tabjobs::config::NameJobConfig;
//! use tabjobs::jobs;
//!
//! # fn example() -> tabjobs::error::Result<()> {
//! let config = NameJobConfig {
//!     input: "customers.csv".into(),
//!     output: "out/customers.xlsx".into(),
//!     ..NameJobConfig::default()
//! };
//! let outcome = jobs::names::run(&config)?;
//! println!("Formatted: {}", outcome.formatted.join(", "));
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`table`]: the loader, writers and column helpers over polars
//!   `DataFrame`s
//! - [`rules`]: title-casing, tallying, membership tiers, product
//!   normalization, chunking
//! - [`report`]: category statistics
//! - [`jobs`]: the five end-to-end jobs
//! - [`config`]: per-job configuration with JSON overrides
//! - [`error`]: error types and handling utilities
//! - [`logging`]: console logger setup
//!
//! ## Rules Never Mutate Their Input
//!
//! Each rule borrows a `DataFrame` and returns a new one, so rules compose
//! and can be tested in isolation:
//!
//! ```
//! use polars::prelude::*;
//! use tabjobs::rules::format_columns;
//! use tabjobs::table::text_values;
//!
//! let df = df! { "First Name" => ["jOHN o'brien"] }?;
//! let result = format_columns(&df, &["First Name".to_owned()])?;
//! assert_eq!(text_values(&result.table, "First Name")?, [Some("John O'Brien".to_owned())]);
//! assert_eq!(text_values(&df, "First Name")?, [Some("jOHN o'brien".to_owned())]);
//! # Ok::<(), tabjobs::error::JobError>(())
//! ```

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod jobs;
pub mod logging;
pub mod report;
pub mod rules;
pub mod table;
