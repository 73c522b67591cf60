use csv::{ByteRecord, ByteRecordsIntoIter, ReaderBuilder, Terminator, Trim};
use log::{debug, warn};
use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::Read,
    path::Path,
};

use crate::{
    config::Separator,
    core::{
        item::{ItemReader, ItemReaderResult},
        record::{HeaderList, Record},
    },
    error::BatchError,
};

/// A CSV item reader that turns every data row into a [`Record`].
///
/// The first row of the source is consumed when the reader is built and
/// becomes the [`HeaderList`]. Each following row is paired with it; rows
/// whose cell count differs from the header are logged and skipped, so every
/// record returned by [`ItemReader::read`] carries exactly the header's keys.
///
/// # Implementation Details
///
/// - Uses a `RefCell` around the CSV record iterator so `read` can take `&self`
/// - Parsing is flexible: short and long rows are reported by the reader
///   itself rather than failing inside the `csv` crate
/// - Cells are kept verbatim, no trimming
/// - Bytes that are not valid UTF-8 are replaced with U+FFFD instead of
///   aborting the run
///
/// # Examples
///
/// ```
/// use csv2json::item::csv::csv_reader::CsvItemReaderBuilder;
/// use csv2json::core::item::ItemReader;
///
/// let data = "\
/// name,value
/// foo,123
/// broken
/// bar,456
/// ";
///
/// let reader = CsvItemReaderBuilder::new()
///     .from_reader(data.as_bytes())
///     .unwrap();
///
/// let record = reader.read().unwrap().unwrap();
/// assert_eq!(record.get("name"), Some("foo"));
///
/// // "broken" has a single cell and is skipped
/// let record = reader.read().unwrap().unwrap();
/// assert_eq!(record.get("value"), Some("456"));
///
/// assert!(reader.read().unwrap().is_none());
/// assert_eq!(reader.skip_count(), 1);
/// ```
pub struct CsvItemReader<R> {
    headers: HeaderList,
    records: RefCell<ByteRecordsIntoIter<R>>,
    skip_count: Cell<usize>,
}

impl<R: Read> CsvItemReader<R> {
    fn new(mut records: ByteRecordsIntoIter<R>) -> Result<Self, BatchError> {
        let headers = match records.next() {
            Some(Ok(row)) => HeaderList::new(decode_cells(&row))?,
            Some(Err(error)) => {
                return Err(BatchError::MalformedInput(format!(
                    "unable to read header row: {error}"
                )));
            }
            None => {
                return Err(BatchError::MalformedInput(
                    "missing header row".to_string(),
                ));
            }
        };

        debug!("Header row: {:?}", headers);

        Ok(CsvItemReader {
            headers,
            records: RefCell::new(records),
            skip_count: Cell::new(0),
        })
    }

    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    /// Number of rows dropped so far because their length did not match the header.
    pub fn skip_count(&self) -> usize {
        self.skip_count.get()
    }
}

impl<R: Read> ItemReader<Record> for CsvItemReader<R> {
    /// Reads the next well-formed row.
    ///
    /// # Returns
    /// - `Ok(Some(record))` for the next row matching the header
    /// - `Ok(None)` at end of input
    /// - `Err(BatchError::ItemReader(_))` if the underlying source fails
    fn read(&self) -> ItemReaderResult<Record> {
        loop {
            let row = match self.records.borrow_mut().next() {
                Some(Ok(row)) => row,
                Some(Err(error)) => return Err(BatchError::ItemReader(error.to_string())),
                None => return Ok(None),
            };

            let line = row.position().map(|position| position.line()).unwrap_or_default();

            match Record::from_fields(&self.headers, decode_cells(&row)) {
                Ok(record) => return Ok(Some(record)),
                Err(error) if error.is_recoverable() => {
                    self.skip_count.set(self.skip_count.get() + 1);
                    warn!("Line {}: {:?} Error: {}", line, decode_cells(&row), error);
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn skip_count(&self) -> usize {
        self.skip_count.get()
    }
}

fn decode_cells(row: &ByteRecord) -> Vec<String> {
    row.iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect()
}

/// A builder for configuring CSV item reading.
///
/// # Default Configuration
///
/// - Delimiter: comma (,)
/// - Terminator: CRLF, which accepts `\r`, `\n` and `\r\n`
///
/// # Examples
///
/// ```
/// use csv2json::item::csv::csv_reader::CsvItemReaderBuilder;
/// use csv2json::config::Separator;
///
/// let reader = CsvItemReaderBuilder::new()
///     .separator(Separator::Semicolon)
///     .from_reader("name;age\nAlice;30".as_bytes())
///     .unwrap();
///
/// assert_eq!(reader.headers().len(), 2);
/// ```
pub struct CsvItemReaderBuilder {
    delimiter: u8,
    terminator: Terminator,
}

impl Default for CsvItemReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvItemReaderBuilder {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            terminator: Terminator::CRLF,
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the delimiter from a command-line separator choice.
    pub fn separator(self, separator: Separator) -> Self {
        self.delimiter(separator.as_byte())
    }

    pub fn terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// Creates a `CsvItemReader` from any `Read` source and consumes its header row.
    ///
    /// # Errors
    /// Returns `BatchError::MalformedInput` when the header row is missing,
    /// unreadable, empty or contains duplicated names.
    pub fn from_reader<R: Read>(self, rdr: R) -> Result<CsvItemReader<R>, BatchError> {
        let rdr = self.reader_builder().from_reader(rdr);

        CsvItemReader::new(rdr.into_byte_records())
    }

    /// Opens `path` and creates a `CsvItemReader` over it.
    ///
    /// # Errors
    /// Returns `BatchError::ItemReader` if the file cannot be opened, and the
    /// same header errors as [`CsvItemReaderBuilder::from_reader`].
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvItemReader<File>, BatchError> {
        let rdr = self
            .reader_builder()
            .from_path(path.as_ref())
            .map_err(|error| {
                BatchError::ItemReader(format!("{}: {}", path.as_ref().display(), error))
            })?;

        CsvItemReader::new(rdr.into_byte_records())
    }

    fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .trim(Trim::None)
            .delimiter(self.delimiter)
            .terminator(self.terminator)
            .has_headers(false) // the header row is consumed by CsvItemReader::new
            .flexible(true);
        builder
    }
}
