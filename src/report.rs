//! Category statistics built from a [`Tally`].

use crate::error::{JobError, Result};
use crate::rules::categories::Tally;
use polars::prelude::*;
use std::fmt;

pub const TOP_N: usize = 10;
/// Above this many distinct values the full listing is left out.
pub const FULL_LISTING_LIMIT: usize = 20;

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    /// `100 * count / total`, rounded to two decimals.
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryReport {
    pub column: String,
    pub rows_read: usize,
    pub valid_rows: usize,
    pub ranked: Vec<CategoryShare>,
}

fn share_of(count: usize, total: usize) -> f64 {
    100.0 * count as f64 / total as f64
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

impl CategoryReport {
    /// # Errors
    ///
    /// [`JobError::NoData`] when the tally is empty.
    pub fn from_tally(column: &str, rows_read: usize, tally: &Tally) -> Result<Self> {
        if tally.is_empty() {
            return Err(JobError::NoData(format!(
                "column '{column}' has no non-blank values"
            )));
        }
        let total = tally.total();
        let ranked = tally
            .ranked()
            .iter()
            .map(|(category, count)| CategoryShare {
                category: category.clone(),
                count: *count,
                percentage: round2(share_of(*count, total)),
            })
            .collect();
        Ok(Self {
            column: column.to_owned(),
            rows_read,
            valid_rows: total,
            ranked,
        })
    }

    pub fn distinct(&self) -> usize {
        self.ranked.len()
    }

    pub fn most_frequent(&self) -> Option<&CategoryShare> {
        self.ranked.first()
    }

    pub fn top(&self, n: usize) -> &[CategoryShare] {
        self.ranked.get(..n.min(self.ranked.len())).unwrap_or_default()
    }

    pub fn shows_full_listing(&self) -> bool {
        self.distinct() <= FULL_LISTING_LIMIT
    }

    /// The ranked tally as a `Category, Count, Percentage` table.
    pub fn to_table(&self) -> Result<DataFrame> {
        let categories: Vec<&str> = self.ranked.iter().map(|s| s.category.as_str()).collect();
        let counts = self
            .ranked
            .iter()
            .map(|s| u64::try_from(s.count))
            .collect::<std::result::Result<Vec<u64>, _>>()
            .map_err(|e| JobError::Other(format!("Count out of range: {e}")))?;
        let percentages: Vec<f64> = self.ranked.iter().map(|s| s.percentage).collect();

        let df = DataFrame::new(vec![
            Column::from(Series::new("Category".into(), categories)),
            Column::from(Series::new("Count".into(), counts)),
            Column::from(Series::new("Percentage".into(), percentages)),
        ])?;
        Ok(df)
    }

    /// Human-readable statistics block.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CategoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        writeln!(f, "CATEGORY STATISTICS: {}", self.column)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Distinct categories: {}", self.distinct())?;
        writeln!(f, "Rows analysed: {}", self.valid_rows)?;
        if let Some(top) = self.most_frequent() {
            writeln!(
                f,
                "Most frequent category: {} ({} rows)",
                top.category, top.count
            )?;
        }

        writeln!(f, "\nTOP {TOP_N} CATEGORIES:")?;
        writeln!(f, "{}", "-".repeat(40))?;
        for (i, share) in self.top(TOP_N).iter().enumerate() {
            writeln!(
                f,
                "{:2}. {:<30} | {:3} ({:5.1}%)",
                i + 1,
                share.category,
                share.count,
                share.percentage
            )?;
        }

        if self.shows_full_listing() {
            writeln!(f, "\nALL CATEGORIES:")?;
            writeln!(f, "{}", "-".repeat(50))?;
            for share in &self.ranked {
                writeln!(
                    f,
                    "{:<35} | {:3} ({:5.1}%)",
                    share.category, share.count, share.percentage
                )?;
            }
        }
        Ok(())
    }
}
