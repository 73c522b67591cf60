/// Reader and writer traits shared by every pipeline stage.
pub mod item;

/// Concurrent reader/writer orchestration.
pub mod pipeline;

/// Header list and record types flowing through the pipeline.
pub mod record;
