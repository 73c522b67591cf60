use std::{ffi::OsString, path::PathBuf};

use clap::Parser;

use crate::{
    config::{InputSpec, Separator},
    error::BatchError,
};

/// Convert a CSV file into a JSON array of objects, one per row.
///
/// The output is written next to the input, with `.csv` replaced by `.json`.
#[derive(Parser, Debug)]
#[command(name = "csv2json", version)]
pub struct Cli {
    /// Column separator
    #[arg(long, value_enum, default_value_t = Separator::Comma)]
    pub separator: Separator,

    /// Prettify JSON output
    #[arg(long)]
    pub pretty: bool,

    /// CSV file to convert
    #[arg(value_name = "csvFile")]
    pub csv_file: PathBuf,
}

impl Cli {
    pub fn into_input_spec(self) -> InputSpec {
        InputSpec::new(self.csv_file, self.separator, self.pretty)
    }
}

/// Parses command-line arguments (program name first) into an [`InputSpec`].
///
/// Help and version requests come back as `Err` too; callers check
/// [`clap::Error::kind`] to tell them apart from real usage errors.
pub fn parse_args<I, T>(args: I) -> Result<InputSpec, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map(Cli::into_input_spec)
}

/// Condenses a clap error into a one-line usage error.
pub fn usage_error(error: &clap::Error) -> BatchError {
    let rendered = error.to_string();
    let summary = rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.strip_prefix("error:").unwrap_or(line).trim().to_string())
        .unwrap_or_else(|| "invalid arguments".to_string());

    BatchError::Usage(summary)
}
