//! Recording pipeline: tokenize, classify, validate, partition, deduplicate.

use std::collections::{BTreeSet, HashMap};
use std::io::BufRead;

use crate::codec::{decode_tokens, Frame};
use crate::config::FilterConfig;
use crate::dedup::{dedup_55, Deduplicator};
use crate::error::{FrameError, Result};
use crate::family::ProtocolFamily;
use crate::reader::LogReader;
use crate::tokenizer::split_line;

/// A log line holding a valid frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    pub timestamp: Vec<String>,
    pub family: ProtocolFamily,
    pub frame: Frame,
}

impl Record {
    /// Timestamp tokens followed by the canonical frame text.
    pub fn to_line(&self) -> String {
        let mut out = self.timestamp.join(" ");
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&self.frame.to_hex());
        out
    }
}

/// A log line that failed classification or checksum verification.
///
/// Tokens are preserved verbatim, timestamp included.
#[derive(Debug)]
pub struct RecordingError {
    pub line: usize,
    pub tokens: Vec<String>,
    pub timestamp_tokens: usize,
    pub cause: FrameError,
}

impl RecordingError {
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }

    /// The tokens after the timestamp prefix.
    pub fn payload_text(&self) -> String {
        let start = self.timestamp_tokens.min(self.tokens.len());
        self.tokens[start..].join(" ")
    }
}

/// Per-category totals of a filter run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCounts {
    pub lines: usize,
    pub valid: usize,
    pub nine_x: usize,
    pub five_five: usize,
    pub errors: usize,
    pub malformed: usize,
    pub checksum_mismatches: usize,
    pub nine_x_unique: usize,
    pub five_five_unique: usize,
}

/// How often one rejected payload occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorFrequency {
    pub payload: String,
    pub count: usize,
}

/// Everything a filter run produces.
#[derive(Debug)]
pub struct FilterOutput {
    /// Lines processed, blank ones included.
    pub lines: usize,
    /// Valid frames of both families, in input order.
    pub records: Vec<Record>,
    /// Rejected lines, in input order.
    pub errors: Vec<RecordingError>,
    /// Delay-folded distinct 9X frames.
    pub nine_x_unique: BTreeSet<Frame>,
    /// Distinct 55 frames.
    pub five_five_unique: BTreeSet<Frame>,
}

impl FilterOutput {
    /// Valid records of one family.
    pub fn by_family(&self, family: ProtocolFamily) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter().filter(move |r| r.family == family)
    }

    pub fn counts(&self) -> FilterCounts {
        FilterCounts {
            lines: self.lines,
            valid: self.records.len(),
            nine_x: self.by_family(ProtocolFamily::NineX).count(),
            five_five: self.by_family(ProtocolFamily::FiveFive).count(),
            errors: self.errors.len(),
            malformed: self.errors.iter().filter(|e| e.cause.is_malformed()).count(),
            checksum_mismatches: self
                .errors
                .iter()
                .filter(|e| e.cause.is_checksum_mismatch())
                .count(),
            nine_x_unique: self.nine_x_unique.len(),
            five_five_unique: self.five_five_unique.len(),
        }
    }

    /// The `limit` most frequent rejected payloads, most frequent first.
    ///
    /// Repeats usually point at collisions, but a payload broadcast many times
    /// may be a command family nobody is scanning for yet.
    pub fn error_frequencies(&self, limit: usize) -> Vec<ErrorFrequency> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for err in &self.errors {
            *counts.entry(err.payload_text()).or_default() += 1;
        }

        let mut ranked: Vec<ErrorFrequency> = counts
            .into_iter()
            .map(|(payload, count)| ErrorFrequency { payload, count })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.payload.cmp(&b.payload)));
        ranked.truncate(limit);
        ranked
    }
}

/// Accumulates classified lines of one recording.
pub struct Filter {
    timestamp_tokens: usize,
    dedup: Deduplicator,
    lines: usize,
    records: Vec<Record>,
    errors: Vec<RecordingError>,
}

impl Filter {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            timestamp_tokens: config.timestamp_tokens,
            dedup: Deduplicator::new(config.markers),
            lines: 0,
            records: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Classify one log line.
    ///
    /// Returns the family when the line holds a valid frame. Rejected lines are
    /// kept as [`RecordingError`]s, blank lines among them.
    pub fn push_line(&mut self, number: usize, text: &str) -> Option<ProtocolFamily> {
        let line = split_line(text, self.timestamp_tokens);
        self.lines += 1;

        match decode_tokens(&line.payload) {
            Ok(checked) => {
                let family = checked.family;
                self.records.push(Record {
                    line: number,
                    timestamp: line.timestamp.iter().map(|t| t.to_string()).collect(),
                    family,
                    frame: checked.frame,
                });
                Some(family)
            }
            Err(cause) => {
                tracing::debug!(line = number, error = %cause, "rejected recording line");
                self.errors.push(RecordingError {
                    line: number,
                    tokens: line.tokens().map(str::to_string).collect(),
                    timestamp_tokens: line.timestamp.len(),
                    cause,
                });
                None
            }
        }
    }

    /// Consume every line of `reader`, then finish.
    ///
    /// Only I/O failures abort the run; bad lines become recording errors.
    pub fn run<R: BufRead>(mut self, reader: LogReader<R>) -> Result<FilterOutput> {
        for line in reader {
            let line = line?;
            self.push_line(line.number, &line.text);
        }
        Ok(self.finish())
    }

    /// Partition and deduplicate everything pushed so far.
    pub fn finish(self) -> FilterOutput {
        let nine_x_unique = self.dedup.dedup_9x(
            self.records
                .iter()
                .filter(|r| r.family == ProtocolFamily::NineX)
                .map(|r| &r.frame),
        );
        let five_five_unique = dedup_55(
            self.records
                .iter()
                .filter(|r| r.family == ProtocolFamily::FiveFive)
                .map(|r| &r.frame),
        );

        let output = FilterOutput {
            lines: self.lines,
            records: self.records,
            errors: self.errors,
            nine_x_unique,
            five_five_unique,
        };

        let counts = output.counts();
        tracing::info!(
            lines = counts.lines,
            valid = counts.valid,
            nine_x = counts.nine_x,
            five_five = counts.five_five,
            errors = counts.errors,
            nine_x_unique = counts.nine_x_unique,
            five_five_unique = counts.five_five_unique,
            "filtered recording"
        );
        output
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}
