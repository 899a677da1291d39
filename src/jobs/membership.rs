use crate::config::MembershipJobConfig;
use crate::error::Result;
use crate::table::{LoadSummary, load_table, write_table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipOutcome {
    pub load: LoadSummary,
    pub family_rows: usize,
    pub individual_rows: usize,
    pub missing_indicators: Vec<String>,
    pub columns_written: usize,
}

/// Appends membership type and price columns and writes the table.
pub fn run(config: &MembershipJobConfig) -> Result<MembershipOutcome> {
    let (table, load) = load_table(&config.input, &config.load)?;
    let result = config.rule.apply(&table)?;
    write_table(&result.table, &config.output)?;
    log::info!(
        "Assigned {} family and {} individual memberships, saved to {}",
        result.family_rows,
        result.individual_rows,
        config.output.display()
    );

    Ok(MembershipOutcome {
        load,
        family_rows: result.family_rows,
        individual_rows: result.individual_rows,
        missing_indicators: result.missing_indicators,
        columns_written: result.table.width(),
    })
}
