use crate::error::Result;
use crate::table::{count_where, has_column, has_text};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tier {
    pub label: String,
    pub price: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MembershipRule {
    /// Any non-blank value in one of these makes the row a family.
    pub family_indicator_columns: Vec<String>,
    pub type_column: String,
    pub price_column: String,
    pub individual: Tier,
    pub family: Tier,
}

impl Default for MembershipRule {
    fn default() -> Self {
        Self {
            family_indicator_columns: ["Spouse Name", "Child 1", "Child 2", "Child 3"]
                .map(str::to_owned)
                .to_vec(),
            type_column: "Membership Type".to_owned(),
            price_column: "Membership Price".to_owned(),
            individual: Tier {
                label: "Individual".to_owned(),
                price: 50.0,
            },
            family: Tier {
                label: "Family".to_owned(),
                price: 80.0,
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct MembershipResult {
    pub table: DataFrame,
    pub family_rows: usize,
    pub individual_rows: usize,
    /// Indicator columns the table does not have.
    pub missing_indicators: Vec<String>,
}

impl MembershipRule {
    /// True where any indicator column present in `df` holds a non-blank
    /// value. Absent indicator columns are ignored.
    pub fn is_family(&self, df: &DataFrame) -> Expr {
        self.family_indicator_columns
            .iter()
            .filter(|c| has_column(df, c))
            .map(|c| has_text(c))
            .reduce(|a, b| a.or(b))
            .unwrap_or_else(|| lit(false))
    }

    /// Appends the tier label and price columns to a copy of `df`.
    pub fn apply(&self, df: &DataFrame) -> Result<MembershipResult> {
        let missing_indicators: Vec<String> = self
            .family_indicator_columns
            .iter()
            .filter(|c| !has_column(df, c))
            .cloned()
            .collect();
        for column in &missing_indicators {
            log::debug!("Family indicator column '{column}' not present, ignoring");
        }

        let is_family = self.is_family(df);
        let family_rows = count_where(df, is_family.clone())?;
        let table = df
            .clone()
            .lazy()
            .with_columns([
                when(is_family.clone())
                    .then(lit(self.family.label.clone()))
                    .otherwise(lit(self.individual.label.clone()))
                    .alias(self.type_column.as_str()),
                when(is_family)
                    .then(lit(self.family.price))
                    .otherwise(lit(self.individual.price))
                    .alias(self.price_column.as_str()),
            ])
            .collect()?;

        Ok(MembershipResult {
            individual_rows: table.height().saturating_sub(family_rows),
            table,
            family_rows,
            missing_indicators,
        })
    }
}
