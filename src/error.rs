//! Centralized error handling for the tabular jobs.
//!
//! Every stage returns [`Result`], whose error type [`JobError`] keeps the
//! failure kinds a job needs to tell apart: the input file is absent, empty
//! or malformed, a required column is missing, or writing the output failed.
//!
//! ```
//! use tabjobs::error::JobError;
//!
//! fn describe(err: &JobError) -> &'static str {
//!     match err {
//!         JobError::InputMissing(_) => "no such file",
//!         JobError::InputEmpty(_) => "nothing to read",
//!         JobError::InputMalformed { .. } => "bad delimited text",
//!         _ => "other failure",
//!     }
//! }
//! ```
//!
//! The `ResultExt` trait adds `.context()` to any `Result` whose error
//! converts into [`JobError`]:
//!
//! ```no_run
//! use tabjobs::error::ResultExt as _;
//!
//! fn read_settings() -> tabjobs::error::Result<String> {
//!     std::fs::read_to_string("settings.json").context("Failed to read settings")
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

/// Main error type for job operations.
#[derive(Debug)]
pub enum JobError {
    /// The input path does not exist.
    InputMissing(PathBuf),

    /// The input exists but holds no header or no data rows.
    InputEmpty(PathBuf),

    /// The input is not structurally valid delimited text.
    InputMalformed { path: PathBuf, detail: String },

    /// A column the job cannot do without is absent.
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    /// The data left nothing to work on after cleaning.
    NoData(String),

    /// The output path has an extension no writer handles.
    UnsupportedFormat(PathBuf),

    /// Configuration errors
    Config(String),

    /// I/O errors (file operations)
    Io(std::io::Error),

    /// Workbook serialization errors
    Spreadsheet(String),

    /// DataFrame operation errors
    DataProcessing(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputMissing(path) => write!(f, "Input file does not exist: {}", path.display()),
            Self::InputEmpty(path) => write!(f, "Input file is empty: {}", path.display()),
            Self::InputMalformed { path, detail } => {
                write!(f, "Failed to parse {}: {detail}", path.display())
            }
            Self::ColumnNotFound { column, available } => write!(
                f,
                "Column '{column}' does not exist. Available columns: {}",
                available.join(", ")
            ),
            Self::NoData(msg) => write!(f, "No data: {msg}"),
            Self::UnsupportedFormat(path) => {
                write!(f, "Unsupported output format: {}", path.display())
            }
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Spreadsheet(msg) => write!(f, "Spreadsheet error: {msg}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for JobError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for JobError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<polars::error::PolarsError> for JobError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for JobError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Spreadsheet(err.to_string())
    }
}

impl From<serde_json::Error> for JobError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

/// Result type alias for job operations.
pub type Result<T> = std::result::Result<T, JobError>;

/// Prefixes an error message with what the caller was doing.
///
/// The wrapped error becomes [`JobError::Other`] carrying
/// `"<context>: <error>"`, so the original kind is only kept in the text.
/// Use it for plain I/O steps; return the specific kinds (`InputMissing`,
/// `ColumnNotFound`, ...) directly where callers need to match on them.
pub trait ResultExt<T> {
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Like [`ResultExt::context`], building the message only on error.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

fn wrap(context: &str, err: JobError) -> JobError {
    JobError::Other(format!("{context}: {err}"))
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<JobError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap(&msg.into(), e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(&f(), e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = JobError::ColumnNotFound {
            column: "Company".to_owned(),
            available: vec!["Name".to_owned(), "City".to_owned()],
        };
        assert_eq!(
            err.to_string(),
            "Column 'Company' does not exist. Available columns: Name, City"
        );
    }

    #[test]
    fn test_polars_errors_convert() {
        let err: JobError = polars::error::PolarsError::ColumnNotFound("sku".into()).into();
        assert!(matches!(err, JobError::DataProcessing(_)));
        assert!(err.to_string().contains("sku"));
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "out.xlsx",
        ));

        let err = result
            .context("Failed to write workbook")
            .expect_err("error is kept");
        assert!(matches!(err, JobError::Other(_)));
        assert!(err.to_string().starts_with("Failed to write workbook: I/O error"));
    }
}
