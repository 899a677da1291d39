//! Job configuration.
//!
//! Every job has a config struct whose `Default` reproduces the stock setup
//! (paths relative to the working directory, column names, labels, prices).
//! A JSON file can override any subset of fields; missing keys keep their
//! defaults. Rule fields sit at the top level next to the paths:
//!
//! ```json
//! {
//!   "input": "customers.csv",
//!   "family_indicator_columns": ["Spouse Name", "Child 1"],
//!   "family": { "label": "Family", "price": 95 }
//! }
//! ```

use crate::error::{JobError, Result};
use crate::rules::{MembershipRule, ProductRule};
use crate::table::LoadOptions;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CUSTOMERS_CSV: &str = "../data/customers list (1).xlsx - Clientes (1).csv";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CategoryJobConfig {
    pub input: PathBuf,
    pub column: String,
    pub output_csv: PathBuf,
    pub output_xlsx: PathBuf,
    pub load: LoadOptions,
}

impl Default for CategoryJobConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(CUSTOMERS_CSV),
            column: "Company".to_owned(),
            output_csv: PathBuf::from("../data/exported/categories_analysis.csv"),
            output_xlsx: PathBuf::from("../data/exported/categories_analysis.xlsx"),
            load: LoadOptions::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MembershipJobConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub rule: MembershipRule,
    pub load: LoadOptions,
}

impl Default for MembershipJobConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(CUSTOMERS_CSV),
            output: PathBuf::from("../data/clientes_con_membresia.xlsx"),
            rule: MembershipRule::default(),
            load: LoadOptions::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NameJobConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Columns to title-case.
    pub columns: Vec<String>,
    pub load: LoadOptions,
}

impl Default for NameJobConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(CUSTOMERS_CSV),
            output: PathBuf::from("../data/clientes_formateados.xlsx"),
            columns: [
                "Last Name",
                "First Name",
                "Spouse Name",
                "Child 1",
                "Child 2",
                "Child 3",
            ]
            .map(str::to_owned)
            .to_vec(),
            load: LoadOptions::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ProductJobConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub rule: ProductRule,
    pub load: LoadOptions,
}

impl Default for ProductJobConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("../data/Product (product.template) (1).csv"),
            output: PathBuf::from("../data/exported/products_normalized.xlsx"),
            rule: ProductRule::default(),
            load: LoadOptions::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SplitJobConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub rows_per_file: usize,
    /// Chunk files are named `<prefix><n>.csv`, counting from 1.
    pub prefix: String,
    pub load: LoadOptions,
}

impl Default for SplitJobConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("../data/products_normalized.xlsx - Sheet1.csv"),
            output_dir: PathBuf::from("../data/exported/chunks"),
            rows_per_file: crate::rules::split::DEFAULT_ROWS_PER_CHUNK,
            prefix: "products_chunk_".to_owned(),
            load: LoadOptions::default(),
        }
    }
}

/// Reads a job config from a JSON file, or returns the defaults when no
/// path is given.
///
/// # Errors
///
/// Returns [`JobError::Config`] if the file cannot be read or parsed.
pub fn load_job_config<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };
    let content = std::fs::read_to_string(path).map_err(|e| {
        JobError::Config(format!("Failed to read config file {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| JobError::Config(format!("Invalid config file {}: {e}", path.display())))
}

/// Pretty JSON for a config, suitable as a starting point for edits.
pub fn to_pretty_json<T: Serialize>(config: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}
