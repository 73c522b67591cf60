use crate::error::BatchError;

/// Result of a single read: `Ok(None)` once the source is exhausted.
pub type ItemReaderResult<R> = Result<Option<R>, BatchError>;

/// Result of a writer operation.
pub type ItemWriterResult = Result<(), BatchError>;

/// A source that yields items one at a time.
pub trait ItemReader<R> {
    fn read(&self) -> ItemReaderResult<R>;

    /// Number of input rows dropped so far without being returned.
    fn skip_count(&self) -> usize {
        0
    }
}

/// A sink that receives items one at a time.
///
/// The pipeline calls `open` once, then `update` and `write` for every item,
/// and finally `close`. `update` receives `true` only for the first item so
/// that framing writers can emit separators between items.
pub trait ItemWriter<W> {
    fn write(&self, item: &W) -> ItemWriterResult;
    fn flush(&self) -> ItemWriterResult;
    fn open(&self) -> ItemWriterResult {
        Ok(())
    }
    fn update(&self, _is_first_item: bool) -> ItemWriterResult {
        Ok(())
    }
    fn close(&self) -> ItemWriterResult {
        Ok(())
    }
}
