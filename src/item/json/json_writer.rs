use std::{
    cell::RefCell,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::Serialize;
use serde_json::{Serializer, ser::PrettyFormatter};

use crate::{
    BatchError,
    core::item::{ItemWriter, ItemWriterResult},
};

const DEFAULT_INDENT: &[u8] = b"   ";

/// A JSON item writer that streams items into a single JSON array.
///
/// `open` writes the opening bracket, `update` writes the separator before
/// every item but the first, `write` serializes one item and `close` writes
/// the closing bracket and flushes.
///
/// In pretty mode each element sits on its own lines, indented by one
/// `indent` step, with nested levels indented by further steps:
///
/// ```text
/// [
///    {
///       "COL1": "1"
///    },
///    {
///       "COL1": "4"
///    }
/// ]
/// ```
pub struct JsonItemWriter<W: Write> {
    stream: RefCell<BufWriter<W>>,
    use_pretty_formatter: bool,
    indent: Box<[u8]>,
}

impl<W: Write> JsonItemWriter<W> {
    fn new(wtr: W, use_pretty_formatter: bool, indent: Box<[u8]>) -> Self {
        Self {
            stream: RefCell::new(BufWriter::new(wtr)),
            use_pretty_formatter,
            indent,
        }
    }

    fn break_line(&self) -> &'static [u8] {
        if self.use_pretty_formatter { b"\n" } else { b"" }
    }

    fn write_bytes(&self, bytes: &[u8]) -> ItemWriterResult {
        self.stream
            .borrow_mut()
            .write_all(bytes)
            .map_err(|error| BatchError::ItemWriter(error.to_string()))
    }

    fn to_json<R: Serialize>(&self, item: &R) -> Result<Vec<u8>, BatchError> {
        if !self.use_pretty_formatter {
            return serde_json::to_vec(item)
                .map_err(|error| BatchError::ItemWriter(error.to_string()));
        }

        let mut buffer = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(&self.indent));
        item.serialize(&mut serializer)
            .map_err(|error| BatchError::ItemWriter(error.to_string()))?;

        // Shift every line of the element one indent step to the right.
        let mut shifted = Vec::with_capacity(buffer.len() + self.indent.len() * 4);
        for (index, line) in buffer.split(|byte| *byte == b'\n').enumerate() {
            if index > 0 {
                shifted.push(b'\n');
            }
            shifted.extend_from_slice(&self.indent);
            shifted.extend_from_slice(line);
        }
        Ok(shifted)
    }
}

impl<W: Write, R: Serialize> ItemWriter<R> for JsonItemWriter<W> {
    fn write(&self, item: &R) -> ItemWriterResult {
        let json = self.to_json(item)?;
        self.write_bytes(&json)
    }

    fn flush(&self) -> ItemWriterResult {
        self.stream
            .borrow_mut()
            .flush()
            .map_err(|error| BatchError::ItemWriter(error.to_string()))
    }

    fn open(&self) -> ItemWriterResult {
        self.write_bytes(b"[")?;
        self.write_bytes(self.break_line())
    }

    fn update(&self, is_first_item: bool) -> ItemWriterResult {
        if is_first_item {
            return Ok(());
        }
        self.write_bytes(b",")?;
        self.write_bytes(self.break_line())
    }

    fn close(&self) -> ItemWriterResult {
        self.write_bytes(self.break_line())?;
        self.write_bytes(b"]")?;
        ItemWriter::<R>::flush(self)
    }
}

/// Builder for [`JsonItemWriter`].
///
/// # Examples
///
/// ```
/// use csv2json::item::json::json_writer::JsonItemWriterBuilder;
/// use csv2json::core::item::ItemWriter;
///
/// let mut buffer = Vec::new();
/// {
///     let writer = JsonItemWriterBuilder::new().from_writer(&mut buffer);
///     ItemWriter::<u32>::open(&writer).unwrap();
///     ItemWriter::<u32>::update(&writer, true).unwrap();
///     writer.write(&1u32).unwrap();
///     ItemWriter::<u32>::update(&writer, false).unwrap();
///     writer.write(&2u32).unwrap();
///     ItemWriter::<u32>::close(&writer).unwrap();
/// }
///
/// assert_eq!(String::from_utf8(buffer).unwrap(), "[1,2]");
/// ```
pub struct JsonItemWriterBuilder {
    indent: Box<[u8]>,
    pretty_formatter: bool,
}

impl Default for JsonItemWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonItemWriterBuilder {
    pub fn new() -> Self {
        Self {
            indent: Box::from(DEFAULT_INDENT),
            pretty_formatter: false,
        }
    }

    /// Sets one indentation step for pretty output (three spaces by default).
    pub fn indent(mut self, indent: &[u8]) -> Self {
        self.indent = Box::from(indent);
        self
    }

    pub fn pretty_formatter(mut self, yes: bool) -> Self {
        self.pretty_formatter = yes;
        self
    }

    /// Creates (or truncates) the file at `path` and writes into it.
    ///
    /// # Errors
    /// Returns `BatchError::ItemWriter` if the file cannot be created.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<JsonItemWriter<File>, BatchError> {
        let file = File::create(path.as_ref()).map_err(|error| {
            BatchError::ItemWriter(format!("{}: {}", path.as_ref().display(), error))
        })?;

        Ok(self.from_writer(file))
    }

    pub fn from_writer<W: Write>(self, wtr: W) -> JsonItemWriter<W> {
        JsonItemWriter::new(wtr, self.pretty_formatter, self.indent)
    }
}
