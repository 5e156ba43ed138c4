use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use thiserror::Error;

// ---------------------------------------------------------------------------
// PlotError – everything that can stop a plotting run
// ---------------------------------------------------------------------------

/// All failures are terminal: the process reports and exits.
#[derive(Debug, Error)]
pub enum PlotError {
    /// No arguments at all were given on the command line.
    #[error("no arguments given")]
    Usage,

    /// The input table is missing a required column or holds a bad cell.
    #[error("{}: {message}", path.display())]
    DataFormat { path: PathBuf, message: String },

    /// A path flag was not supplied, so there is nothing to open or create.
    #[error("no path given for {flag}")]
    MissingPath { flag: &'static str },

    /// Reading the input or writing the output failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output extension names an image format we cannot write.
    #[error("{}: unsupported output format '.{extension}'", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The chart backend failed while drawing or encoding.
    #[error("rendering chart: {0}")]
    Render(String),
}

/// Coarse error classes surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    DataFormat,
    Io,
    Render,
}

impl PlotError {
    pub fn data_format(path: &Path, message: impl Into<String>) -> Self {
        PlotError::DataFormat {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn io(path: &Path, source: io::Error) -> Self {
        PlotError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PlotError::Usage => ErrorKind::Usage,
            PlotError::DataFormat { .. } => ErrorKind::DataFormat,
            PlotError::MissingPath { .. }
            | PlotError::Io { .. }
            | PlotError::UnsupportedFormat { .. } => ErrorKind::Io,
            PlotError::Render(_) => ErrorKind::Render,
        }
    }

    /// Process exit status for this error.
    ///
    /// `2` is shared with the argument parser's own usage errors.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(match self.kind() {
            ErrorKind::Usage => 1,
            ErrorKind::DataFormat => 2,
            ErrorKind::Io => 3,
            ErrorKind::Render => 4,
        })
    }
}
