use crate::error::{JobError, Result, ResultExt as _};
use polars::prelude::*;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Tokens read as missing values (the usual spreadsheet and dataframe NA markers).
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoadOptions {
    pub delimiter: char,
    pub na_values: Vec<String>,
    /// A header with no data rows counts as an empty input.
    pub require_rows: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            na_values: DEFAULT_NA_VALUES.iter().map(|s| (*s).to_owned()).collect(),
            require_rows: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Encoding {
    Utf8,
    Utf8Bom,
    Latin1,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Utf8 => "UTF-8",
            Self::Utf8Bom => "UTF-8 (BOM)",
            Self::Latin1 => "Latin-1",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadSummary {
    pub encoding: Encoding,
    pub rows: usize,
    pub columns: usize,
}

/// Reads a delimited file with a header row into a [`DataFrame`].
///
/// Every field is read as text first; a column whose values all parse as
/// numbers (and none of which has a leading zero) becomes numeric.
///
/// # Errors
///
/// - [`JobError::InputMissing`] if `path` does not exist
/// - [`JobError::InputEmpty`] if the file has no header, or no data rows
///   while `require_rows` is set
/// - [`JobError::InputMalformed`] if a quoted field never closes, a record is
///   wider than the header, or the reader rejects the text
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<(DataFrame, LoadSummary)> {
    if !path.exists() {
        return Err(JobError::InputMissing(path.to_path_buf()));
    }
    let separator = u8::try_from(options.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            JobError::Config(format!(
                "Delimiter must be a single ASCII character, got {:?}",
                options.delimiter
            ))
        })?;

    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let (text, encoding) = decode(bytes);
    if encoding == Encoding::Latin1 {
        log::warn!("{} is not valid UTF-8, decoded as Latin-1", path.display());
    }
    if text.trim().is_empty() {
        return Err(JobError::InputEmpty(path.to_path_buf()));
    }

    let malformed = |detail: String| JobError::InputMalformed {
        path: path.to_path_buf(),
        detail,
    };
    check_structure(&text, options.delimiter).map_err(malformed)?;

    let null_values = options
        .na_values
        .iter()
        .map(|s| PlSmallStr::from(s.as_str()))
        .collect();
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(separator)
                .with_null_values(Some(NullValues::AllColumns(null_values))),
        )
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()
        .map_err(|e| malformed(e.to_string()))?;
    let df = try_parse_numeric_columns(df)?;

    if options.require_rows && df.height() == 0 {
        return Err(JobError::InputEmpty(path.to_path_buf()));
    }

    let summary = LoadSummary {
        encoding,
        rows: df.height(),
        columns: df.width(),
    };
    log::debug!(
        "Loaded {} ({encoding}): {} rows, {} columns",
        path.display(),
        summary.rows,
        summary.columns
    );
    Ok((df, summary))
}

fn decode(bytes: Vec<u8>) -> (String, Encoding) {
    let (bytes, had_bom) = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => (rest.to_vec(), true),
        None => (bytes, false),
    };
    match String::from_utf8(bytes) {
        Ok(text) if had_bom => (text, Encoding::Utf8Bom),
        Ok(text) => (text, Encoding::Utf8),
        Err(err) => {
            let text = err.into_bytes().into_iter().map(char::from).collect();
            (text, Encoding::Latin1)
        }
    }
}

/// Walks the records the way the reader splits them and rejects a quoted
/// field that runs to the end of the text, or a record with more fields than
/// the header. Blank lines are ignored.
fn check_structure(text: &str, delimiter: char) -> std::result::Result<(), String> {
    let mut width: Option<usize> = None;
    let mut line = 1;
    let mut record_line = 1;
    let mut quote_line = 1;
    let mut fields = 1;
    let mut has_content = false;
    let mut in_quotes = false;
    let mut at_field_start = true;

    let mut end_record = |fields: usize, line: usize| match width {
        None => {
            width = Some(fields);
            Ok(())
        }
        Some(width) if fields > width => Err(format!(
            "Expected {width} fields in line {line}, saw {fields}"
        )),
        Some(_) => Ok(()),
    };

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => line += 1,
                _ => {}
            }
            continue;
        }
        match c {
            '\n' => {
                if has_content {
                    end_record(fields, record_line)?;
                }
                line += 1;
                record_line = line;
                fields = 1;
                has_content = false;
                at_field_start = true;
            }
            '\r' => {}
            '"' if at_field_start => {
                in_quotes = true;
                quote_line = line;
                has_content = true;
                at_field_start = false;
            }
            c if c == delimiter => {
                fields += 1;
                has_content = true;
                at_field_start = true;
            }
            _ => {
                has_content = true;
                at_field_start = false;
            }
        }
    }

    if in_quotes {
        return Err(format!("EOF inside string starting at line {quote_line}"));
    }
    if has_content {
        end_record(fields, record_line)?;
    }
    Ok(())
}

fn has_leading_zero(value: &str) -> bool {
    let digits = value.trim().trim_start_matches(['-', '+']);
    digits.len() > 1
        && digits.starts_with('0')
        && digits.as_bytes().get(1).is_some_and(u8::is_ascii_digit)
}

/// Turns text columns into Int64 or Float64 when every value parses.
/// Columns with codes like `007` and all-null columns stay text.
pub fn try_parse_numeric_columns(df: DataFrame) -> Result<DataFrame> {
    let mut df = df;
    let schema = df.schema().clone();

    for (name, dtype) in schema.iter() {
        if !dtype.is_string() {
            continue;
        }
        let series = df.column(name.as_str())?.as_materialized_series().rechunk();
        let values = series.str()?;
        if values.null_count() == values.len() || values.into_iter().flatten().any(has_leading_zero)
        {
            continue;
        }
        let parsed = series
            .strict_cast(&DataType::Int64)
            .or_else(|_| series.strict_cast(&DataType::Float64));
        if let Ok(parsed) = parsed {
            df.replace(name.as_str(), parsed)?;
        }
    }
    Ok(df)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Writes `df` as comma-delimited UTF-8 with a header row. Nulls are written
/// as empty fields.
pub fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
    let mut df = df.clone();
    CsvWriter::new(file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("Failed to write CSV file {}", path.display()))?;
    Ok(())
}

/// Writes `df` to a single-sheet workbook with a bold header row. Numeric
/// columns become number cells, everything else text; nulls stay empty.
pub fn write_xlsx(df: &DataFrame, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (idx, column) in df.get_columns().iter().enumerate() {
        let col = column_number(idx)?;
        sheet.write_string_with_format(0, col, column.name().as_str(), &header_format)?;
        write_column(sheet, col, column.as_materialized_series())?;
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save workbook {}", path.display()))?;
    Ok(())
}

fn write_column(sheet: &mut Worksheet, col: u16, series: &Series) -> Result<()> {
    let dtype = series.dtype();
    if dtype.is_primitive_numeric() {
        let numbers = series.cast(&DataType::Float64)?;
        for (r, value) in numbers.f64()?.into_iter().enumerate() {
            if let Some(n) = value.filter(|n| n.is_finite()) {
                sheet.write_number(row_number(r)?, col, n)?;
            }
        }
    } else if dtype.is_bool() {
        for (r, value) in series.bool()?.into_iter().enumerate() {
            if let Some(b) = value {
                sheet.write_boolean(row_number(r)?, col, b)?;
            }
        }
    } else {
        let text = series.cast(&DataType::String)?;
        for (r, value) in text.str()?.into_iter().enumerate() {
            if let Some(s) = value {
                sheet.write_string(row_number(r)?, col, s)?;
            }
        }
    }
    Ok(())
}

/// Sheet row for data row `r` (row 0 is the header).
fn row_number(r: usize) -> Result<u32> {
    u32::try_from(r + 1)
        .map_err(|_err| JobError::Spreadsheet(format!("Row {r} exceeds the sheet limit")))
}

fn column_number(idx: usize) -> Result<u16> {
    u16::try_from(idx)
        .map_err(|_err| JobError::Spreadsheet(format!("Column {idx} exceeds the sheet limit")))
}

/// Picks the writer from the file extension (`.csv` or `.xlsx`).
pub fn write_table(df: &DataFrame, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => write_csv(df, path),
        "xlsx" => write_xlsx(df, path),
        _ => Err(JobError::UnsupportedFormat(path.to_path_buf())),
    }
}
