//! Integration tests for the five jobs
//!
//! Each test runs a job end to end on a fixture in `testdata/`, writing into
//! a scratch directory, and reads the CSV output back through the loader.

use polars::prelude::*;
use std::io::Read as _;
use std::path::{Path, PathBuf};
use tabjobs::config::{
    CategoryJobConfig, MembershipJobConfig, NameJobConfig, ProductJobConfig, SplitJobConfig,
};
use tabjobs::error::{JobError, Result};
use tabjobs::jobs;
use tabjobs::table::{LoadOptions, column_names, load_table, text_values};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from("testdata").join(name)
}

fn reload(path: &Path) -> Result<DataFrame> {
    let options = LoadOptions {
        require_rows: false,
        ..LoadOptions::default()
    };
    Ok(load_table(path, &options)?.0)
}

fn text_column(df: &DataFrame, column: &str) -> Vec<String> {
    text_values(df, column)
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect()
}

fn number_column(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    let series = df.column(column)?.as_materialized_series();
    assert!(series.dtype().is_primitive_numeric(), "{column} is {}", series.dtype());
    let numbers = series.cast(&DataType::Float64)?;
    Ok(numbers.f64()?.into_iter().collect())
}

#[test]
fn test_categories_job() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = CategoryJobConfig {
        input: fixture("customers.csv"),
        output_csv: dir.path().join("exported/categories.csv"),
        output_xlsx: dir.path().join("exported/categories.xlsx"),
        ..CategoryJobConfig::default()
    };

    let outcome = jobs::categories::run(&config)?;
    assert_eq!(outcome.load.rows, 7);
    assert_eq!(outcome.report.rows_read, 7);
    assert_eq!(outcome.report.valid_rows, 6);
    assert_eq!(outcome.report.distinct(), 3);
    assert_eq!(
        outcome.report.most_frequent().map(|s| (s.category.as_str(), s.count)),
        Some(("Acme", 3))
    );
    assert!(config.output_xlsx.exists());

    let results = reload(&config.output_csv)?;
    assert_eq!(column_names(&results), ["Category", "Count", "Percentage"]);
    assert_eq!(text_column(&results, "Category"), ["Acme", "Globex", "Initech"]);
    assert_eq!(number_column(&results, "Count")?, [Some(3.0), Some(2.0), Some(1.0)]);
    assert_eq!(
        number_column(&results, "Percentage")?,
        [Some(50.0), Some(33.33), Some(16.67)]
    );
    Ok(())
}

#[test]
fn test_categories_job_requires_column() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = CategoryJobConfig {
        input: fixture("customers.csv"),
        column: "Segment".to_owned(),
        output_csv: dir.path().join("c.csv"),
        output_xlsx: dir.path().join("c.xlsx"),
        ..CategoryJobConfig::default()
    };

    let err = jobs::categories::run(&config).expect_err("column is absent");
    assert!(matches!(err, JobError::ColumnNotFound { .. }));
    assert!(!config.output_csv.exists(), "nothing written on failure");
    Ok(())
}

#[test]
fn test_membership_job() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = MembershipJobConfig {
        input: fixture("customers.csv"),
        output: dir.path().join("membership.csv"),
        ..MembershipJobConfig::default()
    };

    let outcome = jobs::membership::run(&config)?;
    assert_eq!(outcome.family_rows, 3);
    assert_eq!(outcome.individual_rows, 4);
    assert!(outcome.missing_indicators.is_empty());

    let table = reload(&config.output)?;
    assert_eq!(table.height(), 7);
    assert_eq!(column_names(&table).last().map(String::as_str), Some("Membership Price"));
    assert_eq!(
        text_column(&table, "Membership Type"),
        ["Individual", "Family", "Family", "Individual", "Individual", "Family", "Individual"]
    );
    let prices: Vec<Option<f64>> = [50.0, 80.0, 80.0, 50.0, 50.0, 80.0, 50.0]
        .into_iter()
        .map(Some)
        .collect();
    assert_eq!(number_column(&table, "Membership Price")?, prices);
    Ok(())
}

#[test]
fn test_membership_job_writes_workbook() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = MembershipJobConfig {
        input: fixture("customers.csv"),
        output: dir.path().join("nested/clients.xlsx"),
        ..MembershipJobConfig::default()
    };
    jobs::membership::run(&config)?;
    assert!(config.output.exists());
    Ok(())
}

#[test]
fn test_names_job() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut columns = NameJobConfig::default().columns;
    columns.push("Nickname".to_owned());
    let config = NameJobConfig {
        input: fixture("customers.csv"),
        output: dir.path().join("names.csv"),
        columns,
        ..NameJobConfig::default()
    };

    let outcome = jobs::names::run(&config)?;
    assert_eq!(outcome.formatted.len(), 6);
    assert_eq!(outcome.missing, ["Nickname"]);

    let table = reload(&config.output)?;
    assert_eq!(table.height(), 7);
    assert_eq!(
        text_column(&table, "First Name"),
        ["John", "Maria", "Ana", "Luis", "Eva", "Raúl", "Carla"]
    );
    assert_eq!(
        text_column(&table, "Last Name"),
        ["O'Brien", "García", "De La Cruz", "Pérez", "Smith", "Núñez, Jr", "O'Neil-Brown"]
    );
    assert_eq!(text_column(&table, "Email").first().map(String::as_str), Some("john@acme.com"));

    // Formatting already formatted data changes nothing.
    let again = NameJobConfig {
        input: config.output.clone(),
        output: dir.path().join("names_again.csv"),
        ..config.clone()
    };
    jobs::names::run(&again)?;
    let twice = reload(&again.output)?;
    assert!(twice.equals_missing(&table));
    Ok(())
}

#[test]
fn test_products_job() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = ProductJobConfig {
        input: fixture("products.csv"),
        output: dir.path().join("products.csv"),
        ..ProductJobConfig::default()
    };

    let outcome = jobs::products::run(&config)?;
    assert_eq!(outcome.names_recased, 2);
    assert_eq!(outcome.rows_tagged, 3);
    assert_eq!(outcome.codes_truncated, 3);
    assert!(outcome.skipped.is_empty());

    let table = reload(&config.output)?;
    assert_eq!(table.height(), 5);
    assert_eq!(
        text_column(&table, "name"),
        ["Nike Air Max", "Nike Air Max", "Camiseta Básica", "Gorra Sport", ""]
    );
    assert_eq!(
        text_column(&table, "product_tag_ids"),
        ["Embassy Store", "Keep Me", "Embassy Store", "", "Embassy Store"]
    );
    assert_eq!(
        text_column(&table, "default_code"),
        ["ABC", "XYZ-123", "CAM_01", "GOR", ""]
    );
    assert_eq!(
        number_column(&table, "list_price")?,
        [Some(120.0), Some(99.5), Some(15.0), Some(8.0), Some(0.0)]
    );
    Ok(())
}

#[test]
fn test_split_job_partitions_rows() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = SplitJobConfig {
        input: fixture("customers.csv"),
        output_dir: dir.path().join("chunks"),
        rows_per_file: 3,
        prefix: "part_".to_owned(),
        ..SplitJobConfig::default()
    };

    let outcome = jobs::split::run(&config)?;
    let rows: Vec<usize> = outcome.chunks.iter().map(|c| c.rows).collect();
    assert_eq!(rows, [3, 3, 1]);
    assert_eq!(
        outcome.chunks.last().map(|c| c.path.clone()),
        Some(config.output_dir.join("part_3.csv"))
    );

    let original = reload(&config.input)?;
    let mut rejoined = DataFrame::empty_with_schema(&original.schema());
    for chunk in &outcome.chunks {
        let part = reload(&chunk.path)?;
        assert_eq!(column_names(&part), column_names(&original));
        rejoined.vstack_mut(&part)?;
    }
    assert!(rejoined.equals_missing(&original));
    Ok(())
}

#[test]
fn test_split_job_header_only_writes_nothing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = SplitJobConfig {
        input: fixture("header_only.csv"),
        output_dir: dir.path().join("chunks"),
        ..SplitJobConfig::default()
    };

    let outcome = jobs::split::run(&config)?;
    assert!(outcome.chunks.is_empty());
    assert!(!config.output_dir.exists());
    Ok(())
}

#[test]
fn test_split_job_rejects_zero_rows_per_file() {
    let config = SplitJobConfig {
        input: fixture("customers.csv"),
        rows_per_file: 0,
        ..SplitJobConfig::default()
    };
    assert!(matches!(jobs::split::run(&config), Err(JobError::Config(_))));
}

#[test]
fn test_input_failures() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config_for = |name: &str| NameJobConfig {
        input: fixture(name),
        output: dir.path().join("never.xlsx"),
        ..NameJobConfig::default()
    };

    assert!(matches!(
        jobs::names::run(&config_for("does_not_exist.csv")),
        Err(JobError::InputMissing(_))
    ));
    assert!(matches!(
        jobs::names::run(&config_for("empty.csv")),
        Err(JobError::InputEmpty(_))
    ));
    assert!(matches!(
        jobs::names::run(&config_for("header_only.csv")),
        Err(JobError::InputEmpty(_))
    ));
    assert!(matches!(
        jobs::names::run(&config_for("ragged.csv")),
        Err(JobError::InputMalformed { .. })
    ));
    match jobs::names::run(&config_for("unterminated_quote.csv")) {
        Err(JobError::InputMalformed { detail, .. }) => {
            assert_eq!(detail, "EOF inside string starting at line 2");
        }
        other => panic!("expected malformed input, got {other:?}"),
    }
    assert!(!dir.path().join("never.xlsx").exists());
    Ok(())
}

#[test]
fn test_products_workbook_keeps_numbers_numeric() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = ProductJobConfig {
        input: fixture("products.csv"),
        output: dir.path().join("products.xlsx"),
        ..ProductJobConfig::default()
    };
    jobs::products::run(&config)?;

    let mut archive = ::zip::ZipArchive::new(std::fs::File::open(&config.output)?)?;
    let mut sheet = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")?
        .read_to_string(&mut sheet)?;

    let cell = |reference: &str| -> String {
        let start = sheet
            .find(&format!("<c r=\"{reference}\""))
            .unwrap_or_else(|| panic!("cell {reference} missing"));
        let rest = sheet.get(start..).unwrap_or_default();
        let end = rest.find("</c>").unwrap_or(rest.len());
        rest.get(..end).unwrap_or_default().to_owned()
    };

    // list_price (column E) is a number cell, default_code (D) a string.
    let price = cell("E2");
    assert!(price.contains("<v>120</v>"), "{price}");
    assert!(!price.contains("t=\"s\""), "{price}");
    assert!(cell("D2").contains("t=\"s\""));
    Ok(())
}
