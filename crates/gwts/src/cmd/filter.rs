use serde::Serialize;

use gwts_frame::{
    ErrorFrequency, Filter, FilterConfig, FilterCounts, LogReader, LogWriter, WrittenFile,
    DEFAULT_TIMESTAMP_TOKENS,
};

use crate::cmd::{resolve_markers, FilterArgs};
use crate::config::FileConfig;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{new_table, print_json, OutputFormat};

const DEFAULT_TOP_ERRORS: usize = 10;

#[derive(Debug, Serialize)]
struct FileEntry {
    category: &'static str,
    path: String,
    entries: usize,
}

#[derive(Debug, Serialize)]
struct ErrorEntry {
    payload: String,
    count: usize,
}

#[derive(Debug, Serialize)]
struct FilterSummary {
    input: String,
    timestamp_tokens: usize,
    lines: usize,
    valid: usize,
    nine_x: usize,
    five_five: usize,
    errors: usize,
    malformed: usize,
    checksum_mismatches: usize,
    nine_x_unique: usize,
    five_five_unique: usize,
    files: Vec<FileEntry>,
    top_errors: Vec<ErrorEntry>,
}

pub fn run(args: FilterArgs, format: OutputFormat, config: &FileConfig) -> CliResult<i32> {
    let timestamp_tokens = args
        .timestamp_tokens
        .or(config.timestamp_tokens)
        .unwrap_or(DEFAULT_TIMESTAMP_TOKENS);
    let top_errors = args
        .top_errors
        .or(config.top_errors)
        .unwrap_or(DEFAULT_TOP_ERRORS);
    let markers = resolve_markers(args.markers, config)?;

    let input = args.input.display().to_string();
    let reader = LogReader::open(&args.input)
        .map_err(|err| frame_error(&format!("failed opening {input}"), err))?;
    let output = Filter::new(FilterConfig {
        timestamp_tokens,
        markers,
    })
    .run(reader)
    .map_err(|err| frame_error(&format!("failed reading {input}"), err))?;

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)
            .map_err(|err| io_error(&format!("failed creating {}", dir.display()), err))?;
    }
    let writer = LogWriter::for_input(&args.input, args.out_dir.as_deref());
    let written = writer
        .write_all(&output)
        .map_err(|err| frame_error("failed writing category files", err))?;

    let summary = summarize(
        input,
        timestamp_tokens,
        output.counts(),
        &written,
        output.error_frequencies(top_errors),
    );
    print_summary(&summary, format);
    Ok(SUCCESS)
}

fn summarize(
    input: String,
    timestamp_tokens: usize,
    counts: FilterCounts,
    written: &[WrittenFile],
    frequencies: Vec<ErrorFrequency>,
) -> FilterSummary {
    FilterSummary {
        input,
        timestamp_tokens,
        lines: counts.lines,
        valid: counts.valid,
        nine_x: counts.nine_x,
        five_five: counts.five_five,
        errors: counts.errors,
        malformed: counts.malformed,
        checksum_mismatches: counts.checksum_mismatches,
        nine_x_unique: counts.nine_x_unique,
        five_five_unique: counts.five_five_unique,
        files: written
            .iter()
            .map(|file| FileEntry {
                category: file.category.suffix(),
                path: file.path.display().to_string(),
                entries: file.entries,
            })
            .collect(),
        top_errors: frequencies
            .into_iter()
            .map(|f| ErrorEntry {
                payload: f.payload,
                count: f.count,
            })
            .collect(),
    }
}

fn print_summary(summary: &FilterSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Table => {
            let mut files = new_table(vec!["CATEGORY", "ENTRIES", "PATH"]);
            for file in &summary.files {
                files.add_row(vec![
                    file.category.to_string(),
                    file.entries.to_string(),
                    file.path.clone(),
                ]);
            }
            println!("{files}");

            if !summary.top_errors.is_empty() {
                let mut errors = new_table(vec!["COUNT", "PAYLOAD"]);
                for err in &summary.top_errors {
                    errors.add_row(vec![err.count.to_string(), err.payload.clone()]);
                }
                println!("{errors}");
            }
        }
        OutputFormat::Pretty => {
            println!("gwts filter {}\n", summary.input);
            println!("  lines        {}", summary.lines);
            println!(
                "  valid        {} (9X {}, 55 {})",
                summary.valid, summary.nine_x, summary.five_five
            );
            println!(
                "  errors       {} (malformed {}, checksum {})",
                summary.errors, summary.malformed, summary.checksum_mismatches
            );
            println!(
                "  unique       9X {}, 55 {}",
                summary.nine_x_unique, summary.five_five_unique
            );
            for file in &summary.files {
                println!("  wrote {:>6}  {}", file.entries, file.path);
            }
            for err in &summary.top_errors {
                println!("  reject x{:<4} {}", err.count, err.payload);
            }
        }
        OutputFormat::Raw => {
            for file in &summary.files {
                println!("{}", file.path);
            }
        }
    }
}
