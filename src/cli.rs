use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabjobs::config::{
    CategoryJobConfig, MembershipJobConfig, NameJobConfig, ProductJobConfig, SplitJobConfig,
    load_job_config, to_pretty_json,
};
use tabjobs::jobs;
use tabjobs::table::LoadSummary;

#[derive(Parser)]
#[command(
    name = "tabjobs",
    about = "Batch transforms for customer and product tables"
)]
pub struct Cli {
    /// Print the effective job configuration as JSON instead of running the job
    #[arg(long, global = true)]
    pub dump_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct SourceArgs {
    /// JSON file overriding the job defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Input CSV file
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count how often each value of a column occurs
    Categories {
        #[command(flatten)]
        source: SourceArgs,

        /// Column to analyse
        #[arg(long)]
        column: Option<String>,

        /// CSV file for the ranked categories
        #[arg(long)]
        output_csv: Option<PathBuf>,

        /// Workbook for the ranked categories
        #[arg(long)]
        output_xlsx: Option<PathBuf>,
    },
    /// Add membership type and price columns based on family fields
    Membership {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file (.xlsx or .csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Title-case name columns
    Names {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file (.xlsx or .csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column to format; repeat to list several. Replaces the configured list.
        #[arg(long = "column")]
        columns: Vec<String>,
    },
    /// Normalize product names, root-category tags and codes
    Products {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file (.xlsx or .csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Split a CSV into files of at most N rows
    Split {
        #[command(flatten)]
        source: SourceArgs,

        /// Directory for the chunk files
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,

        /// Maximum rows per chunk file
        #[arg(short = 'n', long)]
        rows_per_file: Option<usize>,

        /// File name prefix for the chunks
        #[arg(long)]
        prefix: Option<String>,
    },
}

pub fn run_command(cli: Cli) -> Result<()> {
    let dump = cli.dump_config;
    match cli.command {
        Commands::Categories {
            source,
            column,
            output_csv,
            output_xlsx,
        } => {
            let mut config: CategoryJobConfig = base_config(&source)?;
            override_opt(&mut config.column, column);
            override_opt(&mut config.output_csv, output_csv);
            override_opt(&mut config.output_xlsx, output_xlsx);
            if dump {
                return print_config(&config);
            }
            handle_categories(&config)
        }
        Commands::Membership { source, output } => {
            let mut config: MembershipJobConfig = base_config(&source)?;
            override_opt(&mut config.output, output);
            if dump {
                return print_config(&config);
            }
            handle_membership(&config)
        }
        Commands::Names {
            source,
            output,
            columns,
        } => {
            let mut config: NameJobConfig = base_config(&source)?;
            override_opt(&mut config.output, output);
            if !columns.is_empty() {
                config.columns = columns;
            }
            if dump {
                return print_config(&config);
            }
            handle_names(&config)
        }
        Commands::Products { source, output } => {
            let mut config: ProductJobConfig = base_config(&source)?;
            override_opt(&mut config.output, output);
            if dump {
                return print_config(&config);
            }
            handle_products(&config)
        }
        Commands::Split {
            source,
            output_dir,
            rows_per_file,
            prefix,
        } => {
            let mut config: SplitJobConfig = base_config(&source)?;
            override_opt(&mut config.output_dir, output_dir);
            override_opt(&mut config.rows_per_file, rows_per_file);
            override_opt(&mut config.prefix, prefix);
            if dump {
                return print_config(&config);
            }
            handle_split(&config)
        }
    }
}

trait HasInput {
    fn input_mut(&mut self) -> &mut PathBuf;
}

macro_rules! impl_has_input {
    ($($ty:ty),*) => {
        $(impl HasInput for $ty {
            fn input_mut(&mut self) -> &mut PathBuf {
                &mut self.input
            }
        })*
    };
}

impl_has_input!(
    CategoryJobConfig,
    MembershipJobConfig,
    NameJobConfig,
    ProductJobConfig,
    SplitJobConfig
);

/// Defaults, then the config file, then `--input`.
fn base_config<T>(source: &SourceArgs) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default + HasInput,
{
    let mut config: T = load_job_config(source.config.as_deref()).context("Failed to load config")?;
    if let Some(input) = &source.input {
        *config.input_mut() = input.clone();
    }
    Ok(config)
}

fn override_opt<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn print_config<T: Serialize>(config: &T) -> Result<()> {
    println!("{}", to_pretty_json(config)?);
    Ok(())
}

fn banner(title: &str, lines: &[(&str, &Path)]) {
    println!("{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
    for (label, path) in lines {
        println!("{label:<8} {}", path.display());
    }
    println!("{}", "-".repeat(60));
}

fn print_load(input: &Path, load: &LoadSummary) {
    println!(
        "Read {}: {} rows, {} columns ({})",
        input.display(),
        load.rows,
        load.columns,
        load.encoding
    );
}

fn print_missing(columns: &[String]) {
    for column in columns {
        println!("Warning: column '{column}' not found in the file");
    }
}

fn handle_categories(config: &CategoryJobConfig) -> Result<()> {
    banner(
        "CATEGORY ANALYZER",
        &[
            ("Input:", config.input.as_path()),
            ("CSV:", config.output_csv.as_path()),
            ("XLSX:", config.output_xlsx.as_path()),
        ],
    );
    println!("Column: {}", config.column);

    let outcome = jobs::categories::run(config)?;
    print_load(&config.input, &outcome.load);
    println!(
        "Valid values: {} of {} rows",
        outcome.report.valid_rows, outcome.report.rows_read
    );
    println!();
    print!("{}", outcome.report.render());
    println!();
    for path in &outcome.outputs {
        println!("Saved: {}", path.display());
    }
    println!("Analysis completed successfully.");
    Ok(())
}

fn handle_membership(config: &MembershipJobConfig) -> Result<()> {
    banner(
        "MEMBERSHIP ASSIGNER (INDIVIDUAL/FAMILY)",
        &[
            ("Input:", config.input.as_path()),
            ("Output:", config.output.as_path()),
        ],
    );

    let outcome = jobs::membership::run(config)?;
    print_load(&config.input, &outcome.load);
    if !outcome.missing_indicators.is_empty() {
        println!(
            "Indicator columns not in the file (ignored): {}",
            outcome.missing_indicators.join(", ")
        );
    }
    println!(
        "{}: {} rows, {}: {} rows",
        config.rule.family.label,
        outcome.family_rows,
        config.rule.individual.label,
        outcome.individual_rows
    );
    println!("Saved: {}", config.output.display());
    println!("Membership columns added successfully.");
    Ok(())
}

fn handle_names(config: &NameJobConfig) -> Result<()> {
    banner(
        "NAME FORMATTER",
        &[
            ("Input:", config.input.as_path()),
            ("Output:", config.output.as_path()),
        ],
    );

    let outcome = jobs::names::run(config)?;
    print_load(&config.input, &outcome.load);
    print_missing(&outcome.missing);
    if outcome.formatted.is_empty() {
        println!("Warning: no columns were formatted");
    } else {
        println!("Formatted columns: {}", outcome.formatted.join(", "));
    }
    println!("Summary:");
    println!("  - Rows processed: {}", outcome.load.rows);
    println!("  - Total columns: {}", outcome.load.columns);
    println!("  - Columns formatted: {}", outcome.formatted.len());
    println!("Saved: {}", config.output.display());
    Ok(())
}

fn handle_products(config: &ProductJobConfig) -> Result<()> {
    banner(
        "PRODUCT NORMALIZER",
        &[
            ("Input:", config.input.as_path()),
            ("Output:", config.output.as_path()),
        ],
    );

    let outcome = jobs::products::run(config)?;
    print_load(&config.input, &outcome.load);
    print_missing(&outcome.skipped);
    println!("Names re-cased: {}", outcome.names_recased);
    println!("Rows tagged '{}': {}", config.rule.tag, outcome.rows_tagged);
    println!("Codes truncated: {}", outcome.codes_truncated);
    println!("Saved: {}", config.output.display());
    Ok(())
}

fn handle_split(config: &SplitJobConfig) -> Result<()> {
    banner(
        "CSV SPLITTER",
        &[
            ("Input:", config.input.as_path()),
            ("Output:", config.output_dir.as_path()),
        ],
    );
    println!("Rows per file: {}", config.rows_per_file);

    let outcome = jobs::split::run(config)?;
    print_load(&config.input, &outcome.load);
    if outcome.chunks.is_empty() {
        println!("The file has no rows, nothing to split.");
        return Ok(());
    }
    for chunk in &outcome.chunks {
        println!("Saved: {} ({} rows)", chunk.path.display(), chunk.rows);
    }
    println!("Split into {} file(s).", outcome.chunks.len());
    Ok(())
}
