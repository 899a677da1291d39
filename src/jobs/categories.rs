use crate::config::CategoryJobConfig;
use crate::error::Result;
use crate::report::CategoryReport;
use crate::rules::tally_column;
use crate::table::{LoadSummary, load_table, write_csv, write_xlsx};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CategoryOutcome {
    pub load: LoadSummary,
    pub report: CategoryReport,
    pub outputs: Vec<PathBuf>,
}

/// Tallies the configured column and writes the ranked result to the CSV
/// and workbook outputs.
pub fn run(config: &CategoryJobConfig) -> Result<CategoryOutcome> {
    let (table, load) = load_table(&config.input, &config.load)?;
    log::info!(
        "Analysing column '{}' of {} ({} rows)",
        config.column,
        config.input.display(),
        load.rows
    );

    let tally = tally_column(&table, &config.column)?;
    let report = CategoryReport::from_tally(&config.column, table.height(), &tally)?;
    let results = report.to_table()?;

    write_csv(&results, &config.output_csv)?;
    write_xlsx(&results, &config.output_xlsx)?;
    log::info!(
        "Wrote {} categories to {} and {}",
        report.distinct(),
        config.output_csv.display(),
        config.output_xlsx.display()
    );

    Ok(CategoryOutcome {
        load,
        report,
        outputs: vec![config.output_csv.clone(), config.output_xlsx.clone()],
    })
}
