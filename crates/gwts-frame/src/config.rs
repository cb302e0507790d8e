use crate::marker::MarkerTable;

/// Timestamp width of recordings made with the usual capture setup
/// (`2015-08-30 15:34:20.250`).
pub const DEFAULT_TIMESTAMP_TOKENS: usize = 2;

/// Controls how a recording is split and folded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Leading whitespace-separated tokens treated as an opaque timestamp.
    pub timestamp_tokens: usize,
    /// Delay markers stripped before 9X deduplication.
    pub markers: MarkerTable,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            timestamp_tokens: DEFAULT_TIMESTAMP_TOKENS,
            markers: MarkerTable::default(),
        }
    }
}
