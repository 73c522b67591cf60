//! CSV support for reading tabular data.
//!
//! [`csv_reader::CsvItemReader`] parses a delimited source whose first row
//! names the columns and yields one [`Record`](crate::core::record::Record)
//! per data row. It is configured through [`csv_reader::CsvItemReaderBuilder`]
//! and implements the [`ItemReader`](crate::core::item::ItemReader) trait, so
//! it can feed a [`Pipeline`](crate::core::pipeline::Pipeline).
//!
//! # Features
//!
//! - Comma, semicolon or any single-byte delimiter
//! - Standard CSV quoting, `\n`, `\r` and `\r\n` line endings
//! - Rows with the wrong number of cells are logged and skipped
//! - Streaming: one row is parsed at a time
//!
//! # Examples
//!
//! ```
//! use csv2json::item::csv::csv_reader::CsvItemReaderBuilder;
//! use csv2json::core::item::ItemReader;
//!
//! let csv_data = "\
//! city,country,pop
//! Boston,United States,4628910
//! Concord,United States,42695
//! ";
//!
//! let reader = CsvItemReaderBuilder::new()
//!     .delimiter(b',')
//!     .from_reader(csv_data.as_bytes())
//!     .unwrap();
//!
//! let mut cities = Vec::new();
//! while let Some(record) = reader.read().unwrap() {
//!     cities.push(record.get("city").unwrap().to_string());
//! }
//!
//! assert_eq!(cities, vec!["Boston", "Concord"]);
//! ```

/// A module providing facilities for reading CSV data records.
pub mod csv_reader;
