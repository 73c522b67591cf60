/// This module provides the CSV item reader used as the pipeline source.
pub mod csv;

/// This module provides the JSON item writer used as the pipeline sink.
pub mod json;
