use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::codec::Frame;
use crate::error::Result;
use crate::family::ProtocolFamily;
use crate::filter::{FilterOutput, Record, RecordingError};

/// Stem used when the input path has no file name.
const FALLBACK_STEM: &str = "recording";

/// Output lists produced from one recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Valid lines of both families, timestamps kept.
    All,
    /// Valid 9X lines, timestamps kept.
    NineX,
    /// Valid 55 lines, timestamps kept.
    FiveFive,
    /// Distinct 55 frames.
    FiveFiveNoRepeats,
    /// Distinct delay-free 9X frames.
    NineXNoRepeats,
    /// Rejected lines, verbatim.
    Errors,
}

impl Category {
    /// Every category, in the order files are written.
    pub const ALL: [Category; 6] = [
        Category::All,
        Category::NineX,
        Category::FiveFive,
        Category::FiveFiveNoRepeats,
        Category::NineXNoRepeats,
        Category::Errors,
    ];

    /// File-name suffix (`<stem>_<suffix>.txt`).
    pub fn suffix(self) -> &'static str {
        match self {
            Category::All => "9X_And_55",
            Category::NineX => "9X",
            Category::FiveFive => "55",
            Category::FiveFiveNoRepeats => "55_No_Repeats",
            Category::NineXNoRepeats => "9X_No_Repeats",
            Category::Errors => "Errors",
        }
    }

    /// Text lines of this category, unsorted.
    pub fn lines(self, output: &FilterOutput) -> Vec<String> {
        match self {
            Category::All => output.records.iter().map(Record::to_line).collect(),
            Category::NineX => output
                .by_family(ProtocolFamily::NineX)
                .map(Record::to_line)
                .collect(),
            Category::FiveFive => output
                .by_family(ProtocolFamily::FiveFive)
                .map(Record::to_line)
                .collect(),
            Category::FiveFiveNoRepeats => output.five_five_unique.iter().map(Frame::to_hex).collect(),
            Category::NineXNoRepeats => output.nine_x_unique.iter().map(Frame::to_hex).collect(),
            Category::Errors => output.errors.iter().map(RecordingError::text).collect(),
        }
    }
}

/// Write `lines` sorted lexicographically, one per line.
///
/// Returns the number of lines written.
pub fn write_sorted<W, I, S>(dst: &mut W, lines: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut lines: Vec<String> = lines.into_iter().map(Into::into).collect();
    lines.sort();
    for line in &lines {
        dst.write_all(line.as_bytes())?;
        dst.write_all(b"\n")?;
    }
    dst.flush()?;
    Ok(lines.len())
}

/// A category file written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub category: Category,
    pub path: PathBuf,
    pub entries: usize,
}

/// Writes category files next to (or on behalf of) one recording.
#[derive(Debug, Clone)]
pub struct LogWriter {
    dir: PathBuf,
    stem: String,
}

impl LogWriter {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
        }
    }

    /// Name outputs after `input`, placing them in `out_dir` or beside the input.
    pub fn for_input(input: &Path, out_dir: Option<&Path>) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_STEM.to_string());
        let dir = match out_dir {
            Some(dir) => dir.to_path_buf(),
            None => input
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };
        Self::new(dir, stem)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Output path of one category.
    pub fn path_for(&self, category: Category) -> PathBuf {
        self.dir
            .join(format!("{}_{}.txt", self.stem, category.suffix()))
    }

    /// Write one category file, replacing any previous contents.
    pub fn write_category<I, S>(&self, category: Category, lines: I) -> Result<WrittenFile>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = self.path_for(category);
        let mut out = BufWriter::new(File::create(&path)?);
        let entries = write_sorted(&mut out, lines)?;
        tracing::debug!(path = %path.display(), entries, "wrote {}", category.suffix());
        Ok(WrittenFile {
            category,
            path,
            entries,
        })
    }

    /// Write every category of a filter run.
    pub fn write_all(&self, output: &FilterOutput) -> Result<Vec<WrittenFile>> {
        Category::ALL
            .iter()
            .map(|&category| self.write_category(category, category.lines(output)))
            .collect()
    }
}
