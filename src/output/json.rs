//! JSON report writer for duplicate groups.
//!
//! # Output Schema
//!
//! ```json
//! {
//!     "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824": [
//!         {
//!             "Size": 5,
//!             "LastModified": "2024-03-01T12:00:00+01:00",
//!             "Filename": "x.txt",
//!             "Path": "/a/x.txt",
//!             "Checksum": "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
//!         },
//!         {
//!             "Size": 5,
//!             "LastModified": "2024-03-02T08:30:00+01:00",
//!             "Filename": "y.txt",
//!             "Path": "/b/y.txt",
//!             "Checksum": "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
//!         }
//!     ]
//! }
//! ```
//!
//! Only checksums with two or more files appear. No duplicates gives `{}`.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::DuplicateGroups;
//! use dupescan::output::json::{read_report, JsonOutput};
//! use std::path::Path;
//!
//! let groups = DuplicateGroups::default();
//! JsonOutput::new(&groups).write_file(Path::new("/tmp/result.json")).unwrap();
//! assert_eq!(read_report(Path::new("/tmp/result.json")).unwrap(), groups);
//! ```

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::duplicates::DuplicateGroups;

/// Default indentation width in spaces.
pub const DEFAULT_INDENT: usize = 4;

/// Errors raised while writing or reading a report.
#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    /// The groups could not be serialized.
    #[error("unable to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The serialized report was not valid UTF-8.
    #[error("serialized result is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// The report file could not be written.
    #[error("error while writing result file {path}: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The report file could not be read.
    #[error("error while reading result file {path}: {source}")]
    Read {
        /// Source path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The report file is not a valid report.
    #[error("invalid result file {path}: {source}")]
    Parse {
        /// Source path
        path: PathBuf,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },
}

/// Indented JSON rendering of [`DuplicateGroups`].
#[derive(Debug, Clone, Copy)]
pub struct JsonOutput<'a> {
    groups: &'a DuplicateGroups,
    indent: usize,
}

impl<'a> JsonOutput<'a> {
    /// Create a writer with the default 4-space indentation.
    #[must_use]
    pub fn new(groups: &'a DuplicateGroups) -> Self {
        Self {
            groups,
            indent: DEFAULT_INDENT,
        }
    }

    /// Use a different indentation width.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Serialize to an indented JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    ///
    /// # Example
    ///
    /// ```
    /// use dupescan::duplicates::DuplicateGroups;
    /// use dupescan::output::json::JsonOutput;
    ///
    /// let groups = DuplicateGroups::default();
    /// assert_eq!(JsonOutput::new(&groups).to_json().unwrap(), "{}");
    /// ```
    pub fn to_json(&self) -> Result<String, OutputError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Serialize into any writer.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Serialize`] if serialization or the
    /// underlying writer fails.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), OutputError> {
        let indent = " ".repeat(self.indent);
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = Serializer::with_formatter(writer, formatter);
        self.groups.serialize(&mut serializer)?;
        Ok(())
    }

    /// Write the report to `path`, replacing any existing file.
    ///
    /// On Unix the file is created with mode `0644` (before umask).
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Write`] if the file cannot be created or
    /// written, or [`OutputError::Serialize`] if serialization fails.
    pub fn write_file(&self, path: &Path) -> Result<(), OutputError> {
        let data = self.to_json()?;
        let write_err = |source: std::io::Error| OutputError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let mut file = options.open(path).map_err(write_err)?;
        file.write_all(data.as_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)?;

        log::debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

/// Parse a report file back into [`DuplicateGroups`].
///
/// # Errors
///
/// Returns [`OutputError::Read`] if the file cannot be read and
/// [`OutputError::Parse`] if its content is not a valid report.
pub fn read_report(path: &Path) -> Result<DuplicateGroups, OutputError> {
    let content = std::fs::read_to_string(path).map_err(|source| OutputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| OutputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
