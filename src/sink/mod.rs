//! Output sink: one JSON object per line, plus a title echo on stdout.
//!
//! Each record is flushed as soon as it is written, so a crawl that aborts
//! halfway leaves every record harvested so far on disk.

use std::path::{Path, PathBuf};

use futures::{Stream, StreamExt};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::AppResult;
use crate::models::{record_title, AnimeRecord};

/// Line-delimited JSON writer for anime records
pub struct JsonLinesWriter {
    out: BufWriter<File>,
    path: PathBuf,
    echo: bool,
    written: usize,
}

impl JsonLinesWriter {
    /// Create (or truncate) the output file. Titles are echoed to stdout.
    pub async fn create(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).await?;
        Ok(Self {
            out: BufWriter::new(file),
            path,
            echo: true,
            written: 0,
        })
    }

    /// Turn the stdout title echo on or off.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Append one record and flush it to disk.
    pub async fn write(&mut self, record: &AnimeRecord) -> AppResult<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        self.out.write_all(line.as_bytes()).await?;
        self.out.flush().await?;
        self.written += 1;

        if self.echo {
            println!("{}", record_title(record));
        }
        Ok(())
    }
}

/// Write every record of `records` in order and return how many were
/// written. The first error, from the stream or from writing, is returned
/// as is; records written before it stay in the file.
pub async fn drain<S>(records: S, writer: &mut JsonLinesWriter) -> AppResult<usize>
where
    S: Stream<Item = AppResult<AnimeRecord>>,
{
    futures::pin_mut!(records);
    while let Some(record) = records.next().await {
        writer.write(&record?).await?;
    }
    tracing::info!(path = %writer.path().display(), records = writer.written(), "Output complete");
    Ok(writer.written())
}
