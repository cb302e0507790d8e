use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{FrameError, Result};

const INITIAL_LINE_CAPACITY: usize = 256;

/// One line of a recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// 1-based line number in the source.
    pub number: usize,
    /// Line text without the trailing newline.
    pub text: String,
}

/// Reads recording lines from any `BufRead` source.
///
/// Every line is yielded, blank ones included; a blank line is a frame too
/// short to pass validation. Bytes that are not valid UTF-8 are replaced
/// rather than failing the read, so a corrupted capture line still reaches the
/// classifier and ends up in the error set.
pub struct LogReader<R> {
    inner: R,
    buf: Vec<u8>,
    number: usize,
}

impl<R: BufRead> LogReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(INITIAL_LINE_CAPACITY),
            number: 0,
        }
    }

    /// Read the next line. Returns `Ok(None)` at EOF.
    pub fn read_line(&mut self) -> Result<Option<LogLine>> {
        self.buf.clear();
        let read = self
            .inner
            .read_until(b'\n', &mut self.buf)
            .map_err(FrameError::Io)?;
        if read == 0 {
            return Ok(None);
        }
        self.number += 1;

        let text = String::from_utf8_lossy(&self.buf);
        let text = text.trim_end_matches(['\r', '\n']);
        if text.trim().is_empty() {
            tracing::trace!(line = self.number, "blank line");
        }

        Ok(Some(LogLine {
            number: self.number,
            text: text.to_string(),
        }))
    }
}

impl LogReader<BufReader<File>> {
    /// Open a recording file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for LogReader<R> {
    type Item = Result<LogLine>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_line().transpose()
    }
}
