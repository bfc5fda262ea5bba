//! Extract command - pull field values from a single PDF file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info, warn};

use docglean_core::{DocumentRecord, PdfExtractor, PdfSource, ResultTable};

use super::{build_registry, build_resolver, load_config};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Use the generic PII pattern set instead of the invoice fields
    #[arg(long)]
    pii: bool,

    /// Field rules file overriding the built-in set
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Show raw matches alongside cleaned values
    #[arg(long)]
    show_raw: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (header row plus one record row)
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let registry = build_registry(&config, args.rules.as_deref(), args.pii)?;
    let resolver = build_resolver(&config);

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let data = fs::read(&args.input)?;
    let extractor = PdfExtractor::from_bytes(&data)?;
    debug!("PDF has {} pages", extractor.page_count());

    let mut document = extractor.extract_document()?;
    document.limit_pages(config.pdf.max_pages);
    if document.text.len() < config.pdf.min_text_length {
        warn!(
            "document has little or no embedded text ({} chars); results may be empty",
            document.text.len()
        );
    }

    let source_file = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.display().to_string());

    let record = resolver.resolve_record(&registry, &source_file, &document.text);

    if record.is_empty() {
        eprintln!(
            "{} No fields could be extracted from {}",
            style("!").yellow(),
            args.input.display()
        );
    }

    let output = format_record(&record, args.format, args.show_raw)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_record(
    record: &DocumentRecord,
    format: OutputFormat,
    show_raw: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => {
            let table = ResultTable::from_records(vec![record.clone()]);
            super::batch::table_to_csv(&table)
        }
        OutputFormat::Text => Ok(format_record_text(record, show_raw)),
    }
}

fn format_record_text(record: &DocumentRecord, show_raw: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("Source: {}\n", record.source_file));
    for field in record.fields() {
        let value = field.cleaned_value.as_deref().unwrap_or("-");
        output.push_str(&format!("  {}: {}\n", field.field_name, value));
        if show_raw {
            if let Some(raw) = &field.raw_match {
                output.push_str(&format!("    raw: {}\n", raw));
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use docglean_core::{BatchAggregator, FieldRegistry};

    use super::*;

    #[test]
    fn test_text_format_shows_every_field() {
        let registry = FieldRegistry::invoice_fields();
        let record = BatchAggregator::new(&registry)
            .process_text("a.pdf", "Invoice No: 10002345\nTotal Due: £9.99\n");

        let text = format_record_text(&record, false);

        assert!(text.contains("Source: a.pdf"));
        assert!(text.contains("document_number: 10002345"));
        assert!(text.contains("total_due: 9.99"));
        // Unmatched fields still show up, as absent.
        assert!(text.contains("sold_to_party: -"));
    }
}
