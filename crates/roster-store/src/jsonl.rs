//! JSONL storage: one line per record.
//!
//! Records are written in pre-order, so reading the file back and inserting
//! line by line rebuilds the same tree, chain shape included.

use crate::record::Record;
use crate::tree::OrderedStore;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

pub fn read_records(reader: impl BufRead) -> Result<Vec<Record>, JsonlError> {
    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| JsonlError::Io(line_no + 1, e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record: Record = serde_json::from_str(trimmed)
            .map_err(|e| JsonlError::Parse(line_no + 1, e.to_string()))?;
        records.push(record);
    }
    Ok(records)
}

pub fn write_records<'a>(
    writer: &mut impl Write,
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<(), JsonlError> {
    for record in records {
        let line =
            serde_json::to_string(record).map_err(|e| JsonlError::Serialize(e.to_string()))?;
        writeln!(writer, "{line}").map_err(|e| JsonlError::Io(0, e.to_string()))?;
    }
    Ok(())
}

pub fn read_records_from_path(path: impl AsRef<Path>) -> Result<Vec<Record>, JsonlError> {
    let path = path.as_ref();
    let text = read_substrate(path)?;
    read_records(text.as_bytes())
}

pub fn write_records_to_path<'a>(
    path: impl AsRef<Path>,
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<(), JsonlError> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, records)?;
    write_atomic(path, &buffer)
}

/// Load a store from JSONL, inserting records in file order.
///
/// A repeated key is reported as a parse error carrying the offending
/// record's position in the file.
pub fn load_store(path: impl AsRef<Path>) -> Result<OrderedStore, JsonlError> {
    let path = path.as_ref();
    let mut store = OrderedStore::new();
    for (index, record) in read_records_from_path(path)?.into_iter().enumerate() {
        let key = record.key();
        store
            .insert(record)
            .map_err(|e| JsonlError::Parse(index + 1, format!("record {key}: {e}")))?;
    }
    info!(path = %path.display(), records = store.len(), "store loaded");
    Ok(store)
}

pub fn save_store(path: impl AsRef<Path>, store: &OrderedStore) -> Result<(), JsonlError> {
    let path = path.as_ref();
    write_records_to_path(path, store.pre_order())?;
    info!(path = %path.display(), records = store.len(), "store saved");
    Ok(())
}

/// Read a whole file as text.
///
/// NUL bytes and invalid UTF-8 are reported as [`JsonlError::Corrupt`]; a
/// record file is never binary.
pub fn read_substrate(path: &Path) -> Result<String, JsonlError> {
    let bytes = fs::read(path).map_err(io_at(path))?;
    if bytes.contains(&0) {
        return Err(JsonlError::Corrupt(format!(
            "{}: contains NUL byte(s)",
            path.display()
        )));
    }
    String::from_utf8(bytes).map_err(|e| {
        JsonlError::Corrupt(format!(
            "{}: non-UTF-8 payload at byte {}",
            path.display(),
            e.utf8_error().valid_up_to()
        ))
    })
}

/// Replace `path` with `bytes`. Readers see either the old file or the
/// new one, never a partial write.
pub fn write_atomic(path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), JsonlError> {
    let path = path.as_ref();
    let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = parent {
        fs::create_dir_all(dir).map_err(io_at(dir))?;
    }

    let staging = staging_path(path);
    if let Err(error) = write_synced(&staging, bytes).and_then(|()| {
        fs::rename(&staging, path).map_err(io_at(path))
    }) {
        let _ = fs::remove_file(&staging);
        return Err(error);
    }

    // Persist the rename itself.
    if let Some(dir) = parent {
        File::open(dir)
            .and_then(|handle| handle.sync_all())
            .map_err(io_at(dir))?;
    }
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), JsonlError> {
    let mut file = File::create(path).map_err(io_at(path))?;
    file.write_all(bytes)
        .and_then(|()| file.sync_all())
        .map_err(io_at(path))
}

/// Sibling of `path`, unique per process and write.
fn staging_path(path: &Path) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(format!(".{}-{stamp}.partial", std::process::id()));
    PathBuf::from(name)
}

fn io_at(path: &Path) -> impl Fn(std::io::Error) -> JsonlError + '_ {
    move |e| JsonlError::Io(0, format!("{}: {e}", path.display()))
}

#[derive(Debug, thiserror::Error)]
pub enum JsonlError {
    #[error("line {0}: I/O error: {1}")]
    Io(usize, String),

    #[error("line {0}: parse error: {1}")]
    Parse(usize, String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("corrupted substrate: {0}")]
    Corrupt(String),
}
