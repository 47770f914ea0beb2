// Command-line front end for the claim form extraction pipeline

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bituach_forms::extraction::{CompletionModel, CompletionRequest, Extraction};
use bituach_forms::models::{FormRecord, ValidationReport};
use bituach_forms::utils::BoxError;
use bituach_forms::validation::RecordValidator;
use bituach_forms::{ExtractorConfig, FormError, FormProcessor};
use clap::{Parser, Subcommand};
use log::info;

#[derive(Parser)]
#[command(name = "bituach-forms", version, about = "Extract and validate Bituach Leumi claim form fields")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate an extracted record (JSON) and print the report
    Validate {
        record: PathBuf,
    },
    /// Run a captured model response through the full extraction pipeline
    Extract {
        /// Raw OCR text of the scanned form
        #[arg(long)]
        ocr: PathBuf,
        /// Model completion captured for that text
        #[arg(long)]
        response: PathBuf,
        /// JSON extractor config
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the extracted record here
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Answers every request with the same captured completion.
struct ReplayModel {
    response: String,
}

impl CompletionModel for ReplayModel {
    fn complete(&self, _request: &CompletionRequest) -> Result<String, BoxError> {
        Ok(self.response.clone())
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(2)
        }
    }
}

// Returns whether every field passed validation
fn run(cli: Cli) -> Result<bool, FormError> {
    match cli.command {
        Command::Validate { record } => {
            let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&record)?)?;
            let record = FormRecord::from_json(&value);
            let report = RecordValidator::validate(&record);
            print_report(&report);
            Ok(report.is_empty())
        }
        Command::Extract {
            ocr,
            response,
            config,
            output,
        } => {
            let config = match config {
                Some(path) => ExtractorConfig::from_file(path)?,
                None => ExtractorConfig::default(),
            }
            .apply_env()?;

            let model = ReplayModel {
                response: fs::read_to_string(&response)?,
            };
            let ocr_text = fs::read_to_string(&ocr)?;
            info!("Processing {} ({} characters of OCR text)", ocr.display(), ocr_text.chars().count());

            let processed = FormProcessor::new(model, config)?.process(&ocr_text)?;
            let json = serde_json::to_string_pretty(processed.record())?;

            println!("EXTRACTED RECORD:");
            println!("{}", json);
            print_changes(&processed.extraction);
            print_report(&processed.report);

            if let Some(path) = output {
                write_record(&path, &json)?;
            }
            Ok(processed.is_valid())
        }
    }
}

fn print_changes(extraction: &Extraction) {
    for change in &extraction.recovered {
        println!("  Recovered {} from OCR text: '{}' -> '{}'", change.field, change.before, change.after);
    }
    for change in &extraction.corrections {
        println!("  Corrected {}: '{}' -> '{}'", change.field, change.before, change.after);
    }
}

fn print_report(report: &ValidationReport) {
    println!("\nFIELD VALIDATION:");
    if report.is_empty() {
        println!("  All fields passed validation");
        return;
    }

    for (path, issues) in report.iter() {
        for issue in issues {
            match &issue.suggestion {
                Some(suggestion) => println!("  - {}: {} (suggested: {})", path, issue.message, suggestion),
                None => println!("  - {}: {}", path, issue.message),
            }
        }
    }
}

fn write_record(path: &Path, json: &str) -> Result<(), FormError> {
    fs::write(path, json)?;
    info!("Wrote extracted record to {}", path.display());
    Ok(())
}
