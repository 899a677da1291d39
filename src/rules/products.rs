use super::casing::{is_all_uppercase, title_case};
use super::warn_missing;
use crate::error::Result;
use crate::table::{count_where, has_column, map_text_column};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProductRule {
    pub name_column: String,
    /// Category path such as `All / Shoes`.
    pub category_column: String,
    pub tag_column: String,
    pub code_column: String,
    /// Matched case-insensitively against the start of the category path.
    pub root_prefix: String,
    /// Written over the tag column of every root-category row.
    pub tag: String,
    /// The code is cut at the first occurrence of this token.
    pub code_token: String,
    /// Characters stripped from the end of a cut code.
    pub trailing_separators: String,
}

impl Default for ProductRule {
    fn default() -> Self {
        Self {
            name_column: "name".to_owned(),
            category_column: "categ_id".to_owned(),
            tag_column: "product_tag_ids".to_owned(),
            code_column: "default_code".to_owned(),
            root_prefix: "All /".to_owned(),
            tag: "Embassy Store".to_owned(),
            code_token: "PRO".to_owned(),
            trailing_separators: " -_#:/".to_owned(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ProductResult {
    pub table: DataFrame,
    pub names_recased: usize,
    pub rows_tagged: usize,
    pub codes_truncated: usize,
    /// Columns the table lacks; their step was skipped.
    pub skipped: Vec<String>,
}

/// All-uppercase names become title case; anything else is left alone.
pub fn normalize_name(name: &str) -> String {
    if is_all_uppercase(name) {
        title_case(name)
    } else {
        name.to_owned()
    }
}

/// True where the category path starts with `root_prefix`, ignoring case
/// and leading whitespace. Nulls never match.
pub fn is_root_category(column: &str, root_prefix: &str) -> Expr {
    col(column)
        .cast(DataType::String)
        .str()
        .strip_chars(lit(NULL))
        .str()
        .to_lowercase()
        .str()
        .starts_with(lit(root_prefix.to_lowercase()))
        .fill_null(lit(false))
}

/// Drops everything from the first `token` on, then trailing separators.
/// Codes without the token are returned as is.
pub fn truncate_code(code: &str, token: &str, separators: &str) -> String {
    if token.is_empty() {
        return code.to_owned();
    }
    match code.find(token) {
        Some(idx) => code
            .get(..idx)
            .unwrap_or_default()
            .trim_end_matches(|c: char| separators.contains(c))
            .to_owned(),
        None => code.to_owned(),
    }
}

impl ProductRule {
    /// Runs the three steps in order: name casing, root-category tagging,
    /// code truncation. A step whose column is absent is skipped.
    pub fn apply(&self, df: &DataFrame) -> Result<ProductResult> {
        let mut skipped = Vec::new();
        let mut current = df.clone();

        let mut names_recased = 0;
        let recased = map_text_column(&current, &self.name_column, normalize_name)?;
        match recased {
            Some((next, changed)) => {
                current = next;
                names_recased = changed;
            }
            None => {
                warn_missing(&self.name_column);
                skipped.push(self.name_column.clone());
            }
        }

        let mut rows_tagged = 0;
        if has_column(&current, &self.category_column) {
            let is_root = is_root_category(&self.category_column, &self.root_prefix);
            rows_tagged = count_where(&current, is_root.clone())?;
            let existing = if has_column(&current, &self.tag_column) {
                col(self.tag_column.as_str()).cast(DataType::String)
            } else {
                lit(NULL).cast(DataType::String)
            };
            current = current
                .lazy()
                .with_column(
                    when(is_root)
                        .then(lit(self.tag.clone()))
                        .otherwise(existing)
                        .alias(self.tag_column.as_str()),
                )
                .collect()?;
        } else {
            warn_missing(&self.category_column);
            skipped.push(self.category_column.clone());
        }

        let mut codes_truncated = 0;
        let truncated = map_text_column(&current, &self.code_column, |code| {
            truncate_code(code, &self.code_token, &self.trailing_separators)
        })?;
        match truncated {
            Some((next, changed)) => {
                current = next;
                codes_truncated = changed;
            }
            None => {
                warn_missing(&self.code_column);
                skipped.push(self.code_column.clone());
            }
        }

        Ok(ProductResult {
            table: current,
            names_recased,
            rows_tagged,
            codes_truncated,
            skipped,
        })
    }
}
