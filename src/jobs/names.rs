use crate::config::NameJobConfig;
use crate::error::Result;
use crate::rules::format_columns;
use crate::table::{LoadSummary, load_table, write_table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameOutcome {
    pub load: LoadSummary,
    pub formatted: Vec<String>,
    pub missing: Vec<String>,
}

/// Title-cases the configured name columns and writes the table.
pub fn run(config: &NameJobConfig) -> Result<NameOutcome> {
    let (table, load) = load_table(&config.input, &config.load)?;
    let result = format_columns(&table, &config.columns)?;
    if result.formatted.is_empty() {
        log::warn!("None of the configured name columns were found");
    }
    write_table(&result.table, &config.output)?;
    log::info!(
        "Formatted {} column(s), saved to {}",
        result.formatted.len(),
        config.output.display()
    );

    Ok(NameOutcome {
        load,
        formatted: result.formatted,
        missing: result.missing,
    })
}
