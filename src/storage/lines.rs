//! Append-only line stores
//!
//! Both output stores are plain text files with one entry per line: the
//! resource-link store holds absolute URLs, the dataset store holds one JSON
//! object per line. Every entry is written with a single `write_all` on an
//! unbuffered handle opened in append mode, so a crash can at worst lose the
//! entry being written.

use crate::storage::traits::{RecordSink, ResourceSink, StorageResult};
use crate::storage::DatasetRecord;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// How an output store is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Keep existing entries and append after them
    Append,
    /// Discard existing entries
    Truncate,
}

impl OpenMode {
    pub fn from_fresh(fresh: bool) -> Self {
        if fresh {
            Self::Truncate
        } else {
            Self::Append
        }
    }
}

/// Opens `path` for appending, creating parent directories as needed
///
/// A store whose last line was cut short by an interrupted write gets a
/// terminating newline first, so the next entry starts on its own line.
fn open_append(path: &Path, mode: OpenMode) -> StorageResult<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    if mode == OpenMode::Truncate {
        File::create(path)?;
    }

    let mut file = OpenOptions::new()
        .read(true)
        .create(true)
        .append(true)
        .open(path)?;

    if ends_mid_line(&mut file)? {
        tracing::warn!("Terminating partial last line in {}", path.display());
        file.write_all(b"\n")?;
        file.flush()?;
    }

    Ok(file)
}

/// Returns true when the file is non-empty and its last byte is not a newline
fn ends_mid_line(file: &mut File) -> StorageResult<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

fn write_line(file: &mut File, line: &str) -> StorageResult<()> {
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    file.write_all(buf.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Resource-link store: one absolute URL per line
#[derive(Debug)]
pub struct LinkFile {
    path: PathBuf,
    file: File,
}

impl LinkFile {
    pub fn open(path: &Path, mode: OpenMode) -> StorageResult<Self> {
        let file = open_append(path, mode)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResourceSink for LinkFile {
    fn persist_resource(&mut self, url: &str) -> StorageResult<()> {
        write_line(&mut self.file, url)
    }
}

/// Reads the resource-link store
///
/// Lines are trimmed and blank lines skipped; order is preserved and
/// duplicates are kept (callers decide how to collapse them).
pub fn read_links(path: &Path) -> StorageResult<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Dataset store: one JSON record per line
#[derive(Debug)]
pub struct DatasetFile {
    path: PathBuf,
    file: File,
}

impl DatasetFile {
    pub fn open(path: &Path, mode: OpenMode) -> StorageResult<Self> {
        let file = open_append(path, mode)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for DatasetFile {
    fn append_record(&mut self, record: &DatasetRecord) -> StorageResult<()> {
        let line = serde_json::to_string(record)?;
        write_line(&mut self.file, &line)
    }
}

/// Records read back from a dataset store
#[derive(Debug, Default)]
pub struct StoredRecords {
    pub records: Vec<DatasetRecord>,

    /// Lines that were not valid records (left in place, never rewritten)
    pub malformed_lines: usize,
}

/// Reads the dataset store, tolerating malformed lines
pub fn read_records(path: &Path) -> StorageResult<StoredRecords> {
    let content = std::fs::read_to_string(path)?;
    let mut stored = StoredRecords::default();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<DatasetRecord>(line) {
            Ok(record) => stored.records.push(record),
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed record at {}:{}: {}",
                    path.display(),
                    index + 1,
                    e
                );
                stored.malformed_lines += 1;
            }
        }
    }

    Ok(stored)
}
