//! JSON support for writing structured data.
//!
//! [`json_writer::JsonItemWriter`] serializes items one at a time into a
//! single JSON array. It handles the opening and closing brackets and the
//! separators between elements, and supports compact and pretty-printed
//! output. Items only need to implement `serde::Serialize`.
//!
//! # Examples
//!
//! ```
//! use csv2json::core::item::ItemWriter;
//! use csv2json::core::record::{HeaderList, Record};
//! use csv2json::item::json::json_writer::JsonItemWriterBuilder;
//!
//! let headers = HeaderList::new(vec!["id".to_string(), "name".to_string()]).unwrap();
//! let record = Record::from_fields(&headers, vec!["1".to_string(), "Alice".to_string()]).unwrap();
//!
//! let mut buffer = Vec::new();
//! {
//!     let writer = JsonItemWriterBuilder::new()
//!         .pretty_formatter(true)
//!         .from_writer(&mut buffer);
//!
//!     ItemWriter::<Record>::open(&writer).unwrap();
//!     ItemWriter::<Record>::update(&writer, true).unwrap();
//!     writer.write(&record).unwrap();
//!     ItemWriter::<Record>::close(&writer).unwrap();
//! }
//!
//! let json = String::from_utf8(buffer).unwrap();
//! assert_eq!(json, "[\n   {\n      \"id\": \"1\",\n      \"name\": \"Alice\"\n   }\n]");
//! ```

/// A module providing facilities for writing JSON data records.
pub mod json_writer;
