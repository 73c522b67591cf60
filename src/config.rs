use std::{
    ffi::OsStr,
    fmt,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use clap::ValueEnum;

use crate::error::BatchError;

/// Column separator accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Separator {
    #[default]
    Comma,
    Semicolon,
}

impl Separator {
    pub fn as_byte(self) -> u8 {
        match self {
            Separator::Comma => b',',
            Separator::Semicolon => b';',
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Separator::Comma => f.write_str("comma"),
            Separator::Semicolon => f.write_str("semicolon"),
        }
    }
}

/// Immutable description of one conversion, built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub filepath: PathBuf,
    pub separator: Separator,
    pub pretty: bool,
}

impl InputSpec {
    pub fn new(filepath: impl Into<PathBuf>, separator: Separator, pretty: bool) -> Self {
        Self {
            filepath: filepath.into(),
            separator,
            pretty,
        }
    }

    /// Where the JSON output for this input goes.
    pub fn output_path(&self) -> PathBuf {
        output_path(&self.filepath)
    }
}

/// Checks that `path` names an existing `.csv` file.
///
/// # Errors
/// `BatchError::Validation` when the extension is not `csv` or the file does
/// not exist.
pub fn check_if_valid_file(path: &Path) -> Result<(), BatchError> {
    if path.extension() != Some(OsStr::new("csv")) {
        return Err(BatchError::Validation(format!(
            "file {} is not CSV",
            path.display()
        )));
    }

    match fs::metadata(path) {
        Err(error) if error.kind() == ErrorKind::NotFound => Err(BatchError::Validation(
            format!("file {} does not exist", path.display()),
        )),
        _ => Ok(()),
    }
}

/// The input path with its `.csv` extension replaced by `.json`, in the same directory.
pub fn output_path(csv_path: &Path) -> PathBuf {
    csv_path.with_extension("json")
}
