use log::info;

use crate::{
    config::InputSpec,
    core::pipeline::{Pipeline, PipelineExecution},
    error::BatchError,
    item::{csv::csv_reader::CsvItemReaderBuilder, json::json_writer::JsonItemWriterBuilder},
};

/// Converts the CSV file described by `spec` into a JSON file next to it.
///
/// The reader is built first so that an unreadable header leaves no output
/// file behind.
///
/// # Errors
/// Any fatal reader or writer error. Rows whose length does not match the
/// header are skipped and counted in [`PipelineExecution::skip_count`].
pub async fn convert(spec: &InputSpec) -> Result<PipelineExecution, BatchError> {
    let reader = CsvItemReaderBuilder::new()
        .separator(spec.separator)
        .from_path(&spec.filepath)?;

    let output = spec.output_path();
    let writer = JsonItemWriterBuilder::new()
        .pretty_formatter(spec.pretty)
        .from_path(&output)?;

    info!("Writing JSON file {}...", output.display());
    let execution = Pipeline::new(reader, writer).execute().await?;
    info!("Completed!");

    Ok(execution)
}
