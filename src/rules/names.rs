use super::casing::title_case;
use super::warn_missing;
use crate::error::Result;
use crate::table::map_text_column;
use polars::prelude::DataFrame;

#[derive(Clone, Debug)]
pub struct NameFormatResult {
    pub table: DataFrame,
    pub formatted: Vec<String>,
    pub missing: Vec<String>,
}

/// Title-cases every listed column present in `df`. Absent columns are
/// reported in `missing` and otherwise ignored; nulls and empty strings pass
/// through.
pub fn format_columns(df: &DataFrame, columns: &[String]) -> Result<NameFormatResult> {
    let mut current = df.clone();
    let mut formatted = Vec::new();
    let mut missing = Vec::new();

    for column in columns {
        let mapped = map_text_column(&current, column, title_case)?;
        match mapped {
            Some((next, changed)) => {
                log::debug!("Formatted column '{column}' ({changed} values changed)");
                current = next;
                formatted.push(column.clone());
            }
            None => {
                warn_missing(column);
                missing.push(column.clone());
            }
        }
    }

    Ok(NameFormatResult {
        table: current,
        formatted,
        missing,
    })
}
