use std::time::{Duration, Instant};

use log::{debug, info};
use tokio::{
    sync::{mpsc, oneshot},
    task::{self, JoinHandle},
};

use crate::{
    core::{
        item::{ItemReader, ItemWriter},
        record::Record,
    },
    error::BatchError,
};

/// Number of records that may sit in the handoff channel. A single slot keeps
/// the reader at most one record ahead of the writer.
const HANDOFF_CAPACITY: usize = 1;

/// Summary of a finished pipeline run.
#[derive(Debug)]
pub struct PipelineExecution {
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
    /// Records handed to the writer.
    pub read_count: usize,
    /// Input rows dropped by the reader.
    pub skip_count: usize,
    /// Records serialized by the writer.
    pub write_count: usize,
}

/// Two-stage producer/consumer pipeline.
///
/// The reader and the writer each run on their own blocking task and talk
/// through a bounded channel. The reader closes the channel once its source
/// is exhausted; the writer drains it, closes its sink and then fires a
/// one-shot completion signal that [`Pipeline::execute`] waits on.
///
/// A fatal read error travels through the same channel. The writer stops on
/// it without closing its sink, so a failed run never leaves behind output
/// that looks complete.
///
/// # Examples
///
/// ```no_run
/// use csv2json::core::pipeline::Pipeline;
/// use csv2json::item::csv::csv_reader::CsvItemReaderBuilder;
/// use csv2json::item::json::json_writer::JsonItemWriterBuilder;
///
/// # async fn run() -> Result<(), csv2json::BatchError> {
/// let reader = CsvItemReaderBuilder::new().delimiter(b';').from_path("cars.csv")?;
/// let writer = JsonItemWriterBuilder::new().from_path("cars.json")?;
///
/// let execution = Pipeline::new(reader, writer).execute().await?;
/// println!("{} records written", execution.write_count);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<Rd, Wr> {
    reader: Rd,
    writer: Wr,
}

impl<Rd, Wr> Pipeline<Rd, Wr>
where
    Rd: ItemReader<Record> + Send + 'static,
    Wr: ItemWriter<Record> + Send + 'static,
{
    pub fn new(reader: Rd, writer: Wr) -> Self {
        Self { reader, writer }
    }

    /// Runs both stages to completion.
    ///
    /// Any failure drops the completion signal; the error is then taken from
    /// the writer task, which also carries errors forwarded by the reader.
    pub async fn execute(self) -> Result<PipelineExecution, BatchError> {
        let start = Instant::now();
        debug!("Start of pipeline");

        let Pipeline { reader, writer } = self;
        let (sender, receiver) = mpsc::channel::<Result<Record, BatchError>>(HANDOFF_CAPACITY);
        let (done_sender, done) = oneshot::channel::<usize>();

        let reading = task::spawn_blocking(move || read_records(reader, sender));
        let writing = task::spawn_blocking(move || write_records(writer, receiver, done_sender));

        let write_count = match done.await {
            Ok(write_count) => write_count,
            Err(_) => {
                let failure = match join(writing).await {
                    Err(error) => error,
                    Ok(_) => BatchError::Task("writer ended without completing".to_string()),
                };
                // The reader notices the closed channel on its next send.
                if let Err(error) = join(reading).await {
                    debug!("Reader stopped after writer failure: {}", error);
                }
                return Err(failure);
            }
        };

        join(writing).await?;
        let (read_count, skip_count) = join(reading).await?;

        let end = Instant::now();
        info!(
            "Pipeline completed: {} read, {} skipped, {} written in {:?}",
            read_count,
            skip_count,
            write_count,
            end - start
        );

        Ok(PipelineExecution {
            start,
            end,
            duration: end - start,
            read_count,
            skip_count,
            write_count,
        })
    }
}

async fn join<T>(handle: JoinHandle<Result<T, BatchError>>) -> Result<T, BatchError> {
    handle
        .await
        .map_err(|error| BatchError::Task(error.to_string()))?
}

fn read_records<Rd>(
    reader: Rd,
    sender: mpsc::Sender<Result<Record, BatchError>>,
) -> Result<(usize, usize), BatchError>
where
    Rd: ItemReader<Record>,
{
    debug!("Start reading");
    let mut read_count = 0;

    loop {
        let item = match reader.read() {
            Ok(Some(record)) => Ok(record),
            Ok(None) => break,
            Err(error) => Err(error),
        };
        let failed = item.is_err();

        if sender.blocking_send(item).is_err() {
            return Err(BatchError::Task(
                "writer hung up before end of input".to_string(),
            ));
        }
        if failed {
            debug!("Reading stopped on error after {} records", read_count);
            return Ok((read_count, reader.skip_count()));
        }
        read_count += 1;
    }

    // Dropping the only sender is the end-of-input signal.
    drop(sender);
    debug!("End reading: {} records", read_count);

    Ok((read_count, reader.skip_count()))
}

fn write_records<Wr>(
    writer: Wr,
    mut receiver: mpsc::Receiver<Result<Record, BatchError>>,
    done: oneshot::Sender<usize>,
) -> Result<usize, BatchError>
where
    Wr: ItemWriter<Record>,
{
    debug!("Start writing");
    writer.open()?;

    let mut write_count = 0;
    while let Some(item) = receiver.blocking_recv() {
        // A forwarded read error leaves the sink unterminated.
        let record = item?;
        writer.update(write_count == 0)?;
        writer.write(&record)?;
        write_count += 1;
    }

    writer.close()?;
    drop(writer);
    debug!("End writing: {} records", write_count);

    if done.send(write_count).is_err() {
        debug!("Completion signal had no listener");
    }

    Ok(write_count)
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use super::Pipeline;
    use crate::{
        core::{
            item::{ItemReader, ItemReaderResult, ItemWriter, ItemWriterResult},
            record::{HeaderList, Record},
        },
        error::BatchError,
    };

    struct VecReader {
        items: RefCell<VecDeque<Result<Record, BatchError>>>,
        skipped: usize,
    }

    impl VecReader {
        fn new(items: Vec<Result<Record, BatchError>>) -> Self {
            Self {
                items: RefCell::new(items.into()),
                skipped: 0,
            }
        }
    }

    impl ItemReader<Record> for VecReader {
        fn read(&self) -> ItemReaderResult<Record> {
            self.items.borrow_mut().pop_front().transpose()
        }

        fn skip_count(&self) -> usize {
            self.skipped
        }
    }

    #[derive(Default, Clone)]
    struct Journal(Arc<Mutex<Vec<String>>>);

    impl Journal {
        fn push(&self, entry: String) {
            self.0.lock().unwrap().push(entry);
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct JournalWriter {
        journal: Journal,
        fail_on: Option<String>,
    }

    impl ItemWriter<Record> for JournalWriter {
        fn write(&self, item: &Record) -> ItemWriterResult {
            let id = item.get("id").unwrap_or_default().to_string();
            if self.fail_on.as_deref() == Some(id.as_str()) {
                return Err(BatchError::ItemWriter(format!("cannot write {id}")));
            }
            self.journal.push(format!("write {id}"));
            Ok(())
        }

        fn flush(&self) -> ItemWriterResult {
            Ok(())
        }

        fn open(&self) -> ItemWriterResult {
            self.journal.push("open".to_string());
            Ok(())
        }

        fn update(&self, is_first_item: bool) -> ItemWriterResult {
            if !is_first_item {
                self.journal.push("separator".to_string());
            }
            Ok(())
        }

        fn close(&self) -> ItemWriterResult {
            self.journal.push("close".to_string());
            Ok(())
        }
    }

    fn records(ids: &[&str]) -> Vec<Result<Record, BatchError>> {
        let headers = HeaderList::new(vec!["id".to_string()]).unwrap();
        ids.iter()
            .map(|id| Record::from_fields(&headers, vec![id.to_string()]))
            .collect()
    }

    #[tokio::test]
    async fn delivers_records_in_source_order() {
        let journal = Journal::default();
        let mut reader = VecReader::new(records(&["1", "2", "3"]));
        reader.skipped = 2;
        let writer = JournalWriter {
            journal: journal.clone(),
            fail_on: None,
        };

        let execution = Pipeline::new(reader, writer).execute().await.unwrap();

        assert_eq!(execution.read_count, 3);
        assert_eq!(execution.write_count, 3);
        assert_eq!(execution.skip_count, 2);
        assert_eq!(
            journal.entries(),
            vec![
                "open",
                "write 1",
                "separator",
                "write 2",
                "separator",
                "write 3",
                "close"
            ]
        );
    }

    #[tokio::test]
    async fn empty_source_still_opens_and_closes_the_sink() {
        let journal = Journal::default();
        let writer = JournalWriter {
            journal: journal.clone(),
            fail_on: None,
        };

        let execution = Pipeline::new(VecReader::new(Vec::new()), writer)
            .execute()
            .await
            .unwrap();

        assert_eq!(execution.write_count, 0);
        assert_eq!(journal.entries(), vec!["open", "close"]);
    }

    #[tokio::test]
    async fn writer_failure_aborts_the_run() {
        let journal = Journal::default();
        let writer = JournalWriter {
            journal: journal.clone(),
            fail_on: Some("2".to_string()),
        };

        let result = Pipeline::new(VecReader::new(records(&["1", "2", "3", "4"])), writer)
            .execute()
            .await;

        assert!(matches!(result, Err(BatchError::ItemWriter(_))));
        assert!(!journal.entries().contains(&"close".to_string()));
    }

    #[tokio::test]
    async fn reader_failure_stops_the_writer_before_close() {
        let journal = Journal::default();
        let writer = JournalWriter {
            journal: journal.clone(),
            fail_on: None,
        };
        let mut items = records(&["1", "2"]);
        items.push(Err(BatchError::ItemReader("unexpected EOF".to_string())));
        items.extend(records(&["3"]));

        let result = Pipeline::new(VecReader::new(items), writer).execute().await;

        assert!(matches!(result, Err(BatchError::ItemReader(_))));
        assert_eq!(
            journal.entries(),
            vec!["open", "write 1", "separator", "write 2"]
        );
    }
}
