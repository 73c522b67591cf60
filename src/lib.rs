#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # csv2json

 Streaming conversion of CSV files into JSON arrays.

 A conversion is a two-stage pipeline. A reader parses the header row of the
 input and turns every following row into a [`Record`](core::record::Record);
 a writer serializes records one by one into a JSON array. Both stages run
 concurrently and hand records over through a single-slot channel, so memory
 use does not grow with the size of the input.

 ## Core Concepts

- **ItemReader:** the source side of the pipeline, one record at a time.
- **ItemWriter:** the sink side; frames the output (`open`, `update`, `close`)
  and serializes each record (`write`).
- **Pipeline:** runs a reader and a writer on two tasks and waits for the
  writer's completion signal.

 Rows whose number of cells differs from the header are logged and skipped.
 Every other error is fatal.

 ## Getting Started

```rust
# use csv2json::{
#     core::pipeline::Pipeline,
#     item::{csv::csv_reader::CsvItemReaderBuilder, json::json_writer::JsonItemWriterBuilder},
#     BatchError,
# };
# #[tokio::main]
# async fn main() -> Result<(), BatchError> {
let csv = "year,make,model
1948,Porsche,356
1995,Peugeot,205";

let reader = CsvItemReaderBuilder::new()
    .delimiter(b',')
    .from_reader(csv.as_bytes())?;

let output = std::env::temp_dir().join("cars.json");
let writer = JsonItemWriterBuilder::new()
    .pretty_formatter(true)
    .from_path(&output)?;

let execution = Pipeline::new(reader, writer).execute().await?;
assert_eq!(execution.write_count, 2);
# Ok(())
# }
```

 From the command line:

```text
csv2json [--separator=comma|semicolon] [--pretty] <csvFile>
```
 */

/// Command-line parsing into an [`config::InputSpec`]
pub mod cli;

/// Conversion settings and input validation
pub mod config;

/// End-to-end file conversion
pub mod converter;

/// Core module for pipeline operations
pub mod core;

/// Error types for conversions
pub mod error;

#[doc(inline)]
pub use error::*;

/// Greeting demo used by the `greet` binary
pub mod greet;

/// Item readers and writers (csv reader, json writer)
pub mod item;
