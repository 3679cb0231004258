//! Append-only JSON Lines files.
//!
//! One record per line. Batches land with a single write so a failed batch
//! leaves no partial records behind.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::StorageError;

/// Appends records to a JSONL file, creating it and its directory on demand.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `records` and append them in one write.
    ///
    /// Nothing is written if any record fails to serialize.
    pub fn append_batch(&self, records: &[T]) -> Result<usize, StorageError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut buf = Vec::new();
        for record in records {
            serde_json::to_writer(&mut buf, record)?;
            buf.push(b'\n');
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&buf)?;
        file.flush()?;

        debug!(
            "Appended {} records ({} bytes) to {:?}",
            records.len(),
            buf.len(),
            self.path
        );
        Ok(records.len())
    }
}

/// Records read from a JSONL file, plus the count of lines that did not parse.
#[derive(Debug)]
pub struct JsonlContents<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

/// Reads every record from a JSONL file.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Read all records. A missing file reads as empty.
    ///
    /// Blank lines are ignored; lines that do not parse are counted in
    /// `skipped` and logged.
    pub fn read_all(&self) -> Result<JsonlContents<T>, StorageError> {
        let mut contents = JsonlContents {
            records: Vec::new(),
            skipped: 0,
        };

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(contents),
            Err(e) => return Err(e.into()),
        };

        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(record) => contents.records.push(record),
                Err(e) => {
                    contents.skipped += 1;
                    warn!("{:?} line {}: {}", self.path, idx + 1, e);
                }
            }
        }

        Ok(contents)
    }
}
