use crate::error::{JobError, Result};
use polars::prelude::DataFrame;

pub const DEFAULT_ROWS_PER_CHUNK: usize = 1000;

/// `ceil(rows / chunk_size)`; zero rows make zero chunks.
pub fn chunk_count(rows: usize, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    rows.div_ceil(chunk_size)
}

/// Splits `df` into consecutive chunks of at most `chunk_size` rows, each
/// carrying the full header.
///
/// # Errors
///
/// [`JobError::Config`] if `chunk_size` is zero.
pub fn split_rows(df: &DataFrame, chunk_size: usize) -> Result<Vec<DataFrame>> {
    if chunk_size == 0 {
        return Err(JobError::Config(
            "rows per chunk must be greater than 0".to_owned(),
        ));
    }
    (0..df.height())
        .step_by(chunk_size)
        .map(|start| {
            let offset = i64::try_from(start)
                .map_err(|_err| JobError::Other(format!("Row offset {start} out of range")))?;
            Ok(df.slice(offset, chunk_size))
        })
        .collect()
}
