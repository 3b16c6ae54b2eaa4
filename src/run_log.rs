use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::AppResult;

/// Append-only run log backed by a plain text file.
///
/// Opening the log appends a blank separator line and captures the file's
/// line count at that point. Replay emits only lines appended after the
/// captured offset, so historical runs never leak into this run's console
/// output.
pub struct RunLog {
    path: PathBuf,
    start_line: usize,
}

impl RunLog {
    pub fn open(path: &Path) -> AppResult<Self> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file)?;

        let contents = fs::read_to_string(path)?;
        let start_line = contents.lines().count();

        Ok(Self {
            path: path.to_path_buf(),
            start_line,
        })
    }

    /// Line offset captured at open time, before any of this run's lines
    /// were written.
    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn append(&self, line: &str) -> AppResult<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// Writes every line appended since the log was opened, in order.
    pub fn replay(&self, out: &mut dyn Write) -> AppResult<()> {
        let contents = fs::read_to_string(&self.path)?;
        for line in contents.lines().skip(self.start_line) {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}
