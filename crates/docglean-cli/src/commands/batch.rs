//! Batch command - extract fields from many PDFs into one table.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use docglean_core::{BatchAggregator, BatchError, DocumentOutcome, ResultTable};

use super::{build_registry, build_resolver, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output CSV file
    #[arg(short, long, default_value = "extracted.csv")]
    output: PathBuf,

    /// Use the generic PII pattern set instead of the invoice fields
    #[arg(long)]
    pii: bool,

    /// Field rules file overriding the built-in set
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Print the table to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let registry = build_registry(&config, args.rules.as_deref(), args.pii)?;
    let resolver = build_resolver(&config);
    let aggregator = BatchAggregator::new(&registry)
        .with_resolver(resolver)
        .with_max_pages(config.pdf.max_pages);

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching PDF files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut outcomes: Vec<DocumentOutcome> = Vec::with_capacity(files.len());
    for path in &files {
        outcomes.push(aggregator.process_path(path));
        pb.inc(1);
    }
    pb.finish_with_message("Complete");

    let report = match aggregator.aggregate(outcomes) {
        Ok(report) => report,
        Err(BatchError::Empty(failures)) => {
            eprintln!(
                "{} Nothing could be extracted from the supplied files.",
                style("✗").red()
            );
            for failure in &failures {
                eprintln!("  - {}", failure);
            }
            anyhow::bail!("no documents could be processed");
        }
    };

    let csv = table_to_csv(&report.table)?;
    if args.stdout {
        println!("{}", csv);
    } else {
        fs::write(&args.output, csv)?;
        println!(
            "{} Table written to {}",
            style("✓").green(),
            args.output.display()
        );
    }

    // Flag near-empty records so a scan-only PDF does not pass silently.
    for record in report.table.records() {
        if record.is_empty() {
            println!(
                "{} {} yielded no field values (no text layer?)",
                style("!").yellow(),
                record.source_file
            );
        }
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        files.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(report.table.len()).green(),
        style(report.failures.len()).red()
    );

    if !report.failures.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for failure in &report.failures {
            println!("  - {}", failure);
        }
    }

    debug!("Batch finished in {:?}", start.elapsed());

    Ok(())
}

/// Serialize a result table to CSV: header row, one row per record,
/// missing values as blank cells.
pub fn table_to_csv(table: &ResultTable) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
