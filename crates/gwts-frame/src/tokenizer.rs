//! Splits a log line into its timestamp prefix and payload tokens.

/// One whitespace-tokenized log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedLine<'a> {
    /// Opaque leading tokens (date, time, ...).
    pub timestamp: Vec<&'a str>,
    /// Recorded frame tokens.
    pub payload: Vec<&'a str>,
}

impl<'a> TokenizedLine<'a> {
    /// All tokens in their original order.
    pub fn tokens(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.timestamp.iter().chain(self.payload.iter()).copied()
    }
}

/// Split `line` so that the first `timestamp_tokens` tokens form the timestamp.
///
/// Lines shorter than the timestamp width yield an empty payload.
pub fn split_line(line: &str, timestamp_tokens: usize) -> TokenizedLine<'_> {
    let mut tokens = line.split_whitespace();
    let timestamp: Vec<&str> = tokens.by_ref().take(timestamp_tokens).collect();
    let payload: Vec<&str> = tokens.collect();
    TokenizedLine { timestamp, payload }
}
