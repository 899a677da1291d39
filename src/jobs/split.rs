use crate::config::SplitJobConfig;
use crate::error::{JobError, Result, ResultExt as _};
use crate::rules::split_rows;
use crate::table::{LoadOptions, LoadSummary, load_table, write_csv};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFile {
    pub path: PathBuf,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcome {
    pub load: LoadSummary,
    pub chunks: Vec<ChunkFile>,
}

/// Writes the input as `<prefix>1.csv`, `<prefix>2.csv`, ... under the
/// output directory. An input with a header and no rows writes nothing.
pub fn run(config: &SplitJobConfig) -> Result<SplitOutcome> {
    if config.rows_per_file == 0 {
        return Err(JobError::Config(
            "rows_per_file must be greater than 0".to_owned(),
        ));
    }
    let options = LoadOptions {
        require_rows: false,
        ..config.load.clone()
    };
    let (table, load) = load_table(&config.input, &options)?;
    if table.height() == 0 {
        log::warn!("{} has no rows, nothing to split", config.input.display());
        return Ok(SplitOutcome {
            load,
            chunks: Vec::new(),
        });
    }

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    let mut chunks = Vec::new();
    for (i, chunk) in split_rows(&table, config.rows_per_file)?.iter().enumerate() {
        let path = config
            .output_dir
            .join(format!("{}{}.csv", config.prefix, i + 1));
        write_csv(chunk, &path)?;
        log::debug!("Saved {} ({} rows)", path.display(), chunk.height());
        chunks.push(ChunkFile {
            path,
            rows: chunk.height(),
        });
    }
    log::info!(
        "Split {} rows into {} file(s)",
        table.height(),
        chunks.len()
    );

    Ok(SplitOutcome { load, chunks })
}
