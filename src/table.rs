//! Tables are polars [`DataFrame`]s.
//!
//! Column order comes from the input header and rows are positional. Rules
//! never mutate the frame they are given: they clone it (cheap, columns are
//! reference counted) and replace or append columns on the copy, so every
//! rule can be tested on its own.

pub mod io;

pub use io::{Encoding, LoadOptions, LoadSummary, load_table, write_csv, write_table, write_xlsx};

use crate::error::Result;
use polars::prelude::*;

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

/// True where the column holds something other than null or whitespace.
/// Non-text columns are compared through their string form.
pub fn has_text(name: &str) -> Expr {
    col(name)
        .cast(DataType::String)
        .str()
        .strip_chars(lit(NULL))
        .neq(lit(""))
        .fill_null(lit(false))
}

/// Number of rows where `predicate` holds.
pub fn count_where(df: &DataFrame, predicate: Expr) -> Result<usize> {
    let counted = df
        .clone()
        .lazy()
        .select([predicate.cast(DataType::UInt64).sum().alias("count")])
        .collect()?;
    let n = counted
        .column("count")?
        .as_materialized_series()
        .u64()?
        .get(0)
        .unwrap_or(0);
    Ok(usize::try_from(n).unwrap_or(usize::MAX))
}

/// Applies `f` to every non-null value of a text column.
///
/// Returns the new frame and how many values `f` changed, or `None` when the
/// column is absent. Columns that are not text are returned unchanged.
pub fn map_text_column<F>(df: &DataFrame, name: &str, mut f: F) -> Result<Option<(DataFrame, usize)>>
where
    F: FnMut(&str) -> String,
{
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    if !column.dtype().is_string() {
        return Ok(Some((df.clone(), 0)));
    }

    let mut changed = 0;
    let mapped: StringChunked = column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|value| {
            value.map(|s| {
                let out = f(s);
                if out != s {
                    changed += 1;
                }
                out
            })
        })
        .collect();

    let mut out = df.clone();
    out.replace(name, mapped.with_name(name.into()))?;
    Ok(Some((out, changed)))
}

/// Values of a column as text, nulls as `None`.
pub fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_owned))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df! {
            "name" => ["ana", "luis", "eva"],
            "city" => [Some("Lima"), None, Some("  ")],
            "age" => [31i64, 40, 27],
        }
        .expect("valid frame")
    }

    #[test]
    fn test_map_text_column_leaves_source_untouched() -> Result<()> {
        let df = sample();
        let (upper, changed) =
            map_text_column(&df, "name", |s| s.to_uppercase())?.expect("column exists");

        assert_eq!(changed, 3);
        assert_eq!(text_values(&upper, "name")?[0].as_deref(), Some("ANA"));
        assert_eq!(text_values(&df, "name")?[0].as_deref(), Some("ana"));
        assert_eq!(column_names(&upper), ["name", "city", "age"]);
        assert!(map_text_column(&df, "zip", str::to_owned)?.is_none());
        Ok(())
    }

    #[test]
    fn test_map_text_column_skips_nulls_and_numbers() -> Result<()> {
        let df = sample();
        let (mapped, changed) =
            map_text_column(&df, "city", |s| s.trim().to_owned())?.expect("column exists");
        assert_eq!(changed, 1);
        assert_eq!(
            text_values(&mapped, "city")?,
            [Some("Lima".to_owned()), None, Some(String::new())]
        );

        let (same, changed) = map_text_column(&df, "age", |_| "x".to_owned())?.expect("exists");
        assert_eq!(changed, 0);
        assert!(same.column("age")?.dtype().is_integer());
        Ok(())
    }

    #[test]
    fn test_count_where_has_text() -> Result<()> {
        let df = sample();
        assert_eq!(count_where(&df, has_text("city"))?, 1);
        assert_eq!(count_where(&df, has_text("age"))?, 3);
        assert_eq!(count_where(&df, lit(false))?, 0);
        assert!(has_column(&df, "age"));
        assert!(!has_column(&df, "zip"));
        Ok(())
    }
}
