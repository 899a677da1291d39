use crate::config::ProductJobConfig;
use crate::error::Result;
use crate::table::{LoadSummary, load_table, write_table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOutcome {
    pub load: LoadSummary,
    pub names_recased: usize,
    pub rows_tagged: usize,
    pub codes_truncated: usize,
    pub skipped: Vec<String>,
}

/// Normalizes product names, tags and codes and writes the table.
pub fn run(config: &ProductJobConfig) -> Result<ProductOutcome> {
    let (table, load) = load_table(&config.input, &config.load)?;
    let result = config.rule.apply(&table)?;
    write_table(&result.table, &config.output)?;
    log::info!(
        "Normalized {} products, saved to {}",
        result.table.height(),
        config.output.display()
    );

    Ok(ProductOutcome {
        load,
        names_recased: result.names_recased,
        rows_tagged: result.rows_tagged,
        codes_truncated: result.codes_truncated,
        skipped: result.skipped,
    })
}
