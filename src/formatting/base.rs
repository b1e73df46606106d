//! The base contract for report formatters
//!
//! A formatter's lifecycle is fixed: construction, `after_init`, `start`,
//! any number of `handle` calls, `stop`. Every hook except `format` has a
//! default implementation delegating to the embedded [`OutputSink`], which
//! decides between the configured output file and stdout.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::violation::Violation;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("formatter I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Where formatted report lines go.
///
/// With a filename configured, `start` opens the file and every line is
/// written there. Without one, lines go to stdout and no file is ever
/// created.
#[derive(Debug)]
pub struct OutputSink {
    filename: Option<PathBuf>,
    file: Option<File>,
    newline: String,
}

impl OutputSink {
    pub fn new(filename: Option<PathBuf>) -> Self {
        Self {
            filename,
            file: None,
            newline: "\n".to_string(),
        }
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Overrides the line terminator appended to each written line
    pub fn set_newline(&mut self, newline: impl Into<String>) {
        self.newline = newline.into();
    }

    /// Opens the output file when one is configured
    pub fn start(&mut self) -> Result<(), FormatError> {
        if let Some(filename) = &self.filename {
            self.file = Some(File::create(filename)?);
        }
        Ok(())
    }

    /// Writes `line` plus the line terminator to the open file, or to
    /// stdout when no file is configured
    pub fn write(&mut self, line: &str) -> Result<(), FormatError> {
        match self.file.as_mut() {
            Some(file) => {
                file.write_all(line.as_bytes())?;
                file.write_all(self.newline.as_bytes())?;
            }
            None => println!("{line}"),
        }
        Ok(())
    }

    /// Closes the output file if one is open
    pub fn stop(&mut self) -> Result<(), FormatError> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }
}

impl Default for OutputSink {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Contract every report formatter implements.
///
/// `format` is the one method without a default: every formatter defines
/// the shape of its output lines. The lifecycle hooks fall through to the
/// formatter's [`OutputSink`].
pub trait Formatter: Send {
    /// The sink this formatter writes through
    fn sink(&mut self) -> &mut OutputSink;

    /// Hook running right after construction. Default: nothing.
    fn after_init(&mut self) {}

    /// Prepares the formatter to receive input
    fn start(&mut self) -> Result<(), FormatError> {
        self.sink().start()
    }

    /// Formats one violation into an output line
    fn format(&mut self, violation: &Violation) -> String;

    /// Writes an already-formatted line
    fn write(&mut self, line: &str) -> Result<(), FormatError> {
        self.sink().write(line)
    }

    /// Handles one reported violation: format, then write
    fn handle(&mut self, violation: &Violation) -> Result<(), FormatError> {
        let line = self.format(violation);
        self.write(&line)
    }

    /// Cleans up after reporting is finished
    fn stop(&mut self) -> Result<(), FormatError> {
        self.sink().stop()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    struct Upper {
        sink: OutputSink,
    }

    impl Formatter for Upper {
        fn sink(&mut self) -> &mut OutputSink {
            &mut self.sink
        }

        fn format(&mut self, violation: &Violation) -> String {
            format!("{} {}", violation.code, violation.message.to_uppercase())
        }
    }

    #[test]
    fn without_filename_no_file_is_created() {
        let dir = TempDir::new().unwrap();
        let mut formatter = Upper {
            sink: OutputSink::new(None),
        };

        formatter.start().unwrap();
        assert!(!formatter.sink().is_open());

        formatter
            .handle(&Violation::new("L001", "line too long", 1, 80))
            .unwrap();
        formatter
            .handle(&Violation::new("L002", "trailing whitespace", 2, 10))
            .unwrap();
        formatter.stop().unwrap();

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn with_filename_lines_land_in_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        let mut formatter = Upper {
            sink: OutputSink::new(Some(path.clone())),
        };

        formatter.start().unwrap();
        assert!(formatter.sink().is_open());

        formatter
            .handle(&Violation::new("L001", "line too long", 1, 80))
            .unwrap();
        formatter
            .handle(&Violation::new("L002", "trailing whitespace", 2, 10))
            .unwrap();
        formatter.stop().unwrap();

        assert!(!formatter.sink().is_open());
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "L001 LINE TOO LONG\nL002 TRAILING WHITESPACE\n");
    }

    #[test]
    fn newline_override_is_honored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        let mut sink = OutputSink::new(Some(path.clone()));
        sink.set_newline("\r\n");

        sink.start().unwrap();
        sink.write("one line").unwrap();
        sink.stop().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "one line\r\n");
    }

    #[test]
    fn stop_without_start_is_harmless() {
        let mut sink = OutputSink::new(None);
        sink.stop().unwrap();
        assert!(!sink.is_open());
    }
}
