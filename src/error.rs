use thiserror::Error;

#[derive(Error, Debug)]
/// Conversion error
pub enum BatchError {
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    RowSkip(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("write failed: {0}")]
    ItemWriter(String),

    #[error("read failed: {0}")]
    ItemReader(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("pipeline task failed: {0}")]
    Task(String),
}

impl BatchError {
    /// Whether the error only concerns a single row and processing may go on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BatchError::RowSkip(_))
    }
}

#[cfg(test)]
mod tests {
    use super::BatchError;

    #[test]
    fn only_row_skips_are_recoverable() {
        let skip = BatchError::RowSkip("line does not match headers format".to_string());
        assert!(skip.is_recoverable());
        assert_eq!(skip.to_string(), "line does not match headers format");

        assert!(!BatchError::ItemWriter("disk full".to_string()).is_recoverable());
        assert!(!BatchError::Usage("bad flag".to_string()).is_recoverable());
    }

    #[test]
    fn io_failures_read_as_plain_messages() {
        assert_eq!(
            BatchError::ItemReader("unexpected EOF".to_string()).to_string(),
            "read failed: unexpected EOF"
        );
        assert_eq!(
            BatchError::ItemWriter("disk full".to_string()).to_string(),
            "write failed: disk full"
        );
    }
}
