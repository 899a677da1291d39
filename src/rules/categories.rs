use crate::error::{JobError, Result};
use crate::table::{column_names, has_column, has_text};
use polars::prelude::*;

/// Occurrence counts per distinct value, ranked by descending count. Equal
/// counts keep the order in which the values first appear.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    ranked: Vec<(String, usize)>,
    total: usize,
}

impl Tally {
    pub fn count(&self, value: &str) -> usize {
        self.ranked
            .iter()
            .find(|(v, _)| v == value)
            .map_or(0, |(_, n)| *n)
    }

    /// Number of values counted.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct values.
    pub fn distinct(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn ranked(&self) -> &[(String, usize)] {
        &self.ranked
    }
}

/// Counts the non-blank values of `column`. Values are compared exactly,
/// so case and surrounding whitespace make distinct categories.
pub fn tally_column(df: &DataFrame, column: &str) -> Result<Tally> {
    if !has_column(df, column) {
        return Err(JobError::ColumnNotFound {
            column: column.to_owned(),
            available: column_names(df),
        });
    }

    let counts = df
        .clone()
        .lazy()
        .select([col(column).cast(DataType::String).alias("Category")])
        .filter(has_text("Category"))
        .group_by_stable([col("Category")])
        .agg([len().alias("Count")])
        .sort(
            ["Count"],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .collect()?;

    let categories = counts.column("Category")?.as_materialized_series().clone();
    let totals = counts
        .column("Count")?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;

    let ranked: Vec<(String, usize)> = categories
        .str()?
        .into_iter()
        .zip(totals.u64()?)
        .filter_map(|(category, n)| {
            Some((category?.to_owned(), usize::try_from(n?).unwrap_or(usize::MAX)))
        })
        .collect();
    let total = ranked.iter().map(|(_, n)| n).sum();
    Ok(Tally { ranked, total })
}
