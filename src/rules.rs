//! Per-row and per-column rules.
//!
//! Each rule takes a table by reference and returns a new one alongside what
//! it did. Columns a rule expects but the table lacks are skipped with a
//! warning; only the category tally treats its column as required.

pub mod casing;
pub mod categories;
pub mod membership;
pub mod names;
pub mod products;
pub mod split;

pub use categories::{Tally, tally_column};
pub use membership::{MembershipResult, MembershipRule, Tier};
pub use names::{NameFormatResult, format_columns};
pub use products::{ProductResult, ProductRule};
pub use split::{chunk_count, split_rows};

fn warn_missing(column: &str) {
    log::warn!("Column '{column}' not found, skipping");
}
