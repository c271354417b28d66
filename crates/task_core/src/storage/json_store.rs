use crate::error::AppError;
use crate::model::{FieldError, Note, Record, Task};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_TASKS_FILE: &str = "tasks.json";
pub const DEFAULT_NOTES_FILE: &str = "notes.json";

const TEMP_PREFIX: &str = ".tasks-";
const TEMP_SUFFIX: &str = ".tmp";

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    load_records(path)
}

pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    save_records(path, tasks)
}

pub fn load_notes(path: &Path) -> Result<Vec<Note>, AppError> {
    load_records(path)
}

pub fn save_notes(path: &Path, notes: &[Note]) -> Result<(), AppError> {
    save_records(path, notes)
}

/// Reads every record in `path`. A missing file is an empty store; any
/// record that fails to parse fails the whole load.
pub fn load_records<R: Record>(path: &Path) -> Result<Vec<R>, AppError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), kind = R::KIND, "store file missing, starting empty");
            return Ok(Vec::new());
        }
        Err(err) => return Err(AppError::storage(path, err)),
    };

    let document: Value = serde_json::from_str(&content)
        .map_err(|err| AppError::malformed_document(path, format!("invalid JSON: {err}")))?;
    let Value::Array(items) = document else {
        return Err(AppError::malformed_document(
            path,
            "expected a JSON array of records",
        ));
    };

    let mut records = Vec::with_capacity(items.len());
    let mut seen = HashSet::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let record = R::from_value(item).map_err(|err| malformed_record(path, index, err))?;
        if !seen.insert(record.id()) {
            let duplicate = FieldError::new("id", format!("duplicate id {}", record.id()));
            return Err(malformed_record(path, index, duplicate));
        }
        records.push(record);
    }

    debug!(path = %path.display(), kind = R::KIND, count = records.len(), "loaded records");
    Ok(records)
}

/// Replaces the contents of `path` with `records`, atomically.
pub fn save_records<R: Record>(path: &Path, records: &[R]) -> Result<(), AppError> {
    let mut content = serde_json::to_string_pretty(records)
        .map_err(|err| AppError::storage(path, io::Error::from(err)))?;
    content.push('\n');
    write_atomic(path, content.as_bytes())?;

    debug!(path = %path.display(), kind = R::KIND, count = records.len(), "saved records");
    Ok(())
}

/// Next identifier for a new record: one past the largest in use, or 1.
/// Fails once the largest id is `u64::MAX`; ids are never reused.
pub fn next_id<R: Record>(records: &[R]) -> Result<u64, AppError> {
    match records.iter().map(Record::id).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or(AppError::IdsExhausted { kind: R::KIND, max }),
    }
}

pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    write_atomic_with(path, bytes, |_| Ok(()))
}

/// Writes to a sibling temporary file, syncs it, runs `before_replace`,
/// then renames it over `path`. The temporary file is deleted on every
/// path that does not end in the rename.
fn write_atomic_with<F>(path: &Path, bytes: &[u8], before_replace: F) -> Result<(), AppError>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let dir = parent_dir(path);
    fs::create_dir_all(&dir).map_err(|err| AppError::storage(&dir, err))?;

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(&dir)
        .map_err(|err| AppError::storage(path, err))?;
    // Keep the mode of a file being replaced; new files stay owner-only.
    if let Ok(existing) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|err| AppError::storage(path, err))?;
    }
    temp.write_all(bytes)
        .map_err(|err| AppError::storage(path, err))?;
    temp.as_file()
        .sync_all()
        .map_err(|err| AppError::storage(path, err))?;

    before_replace(temp.path()).map_err(|err| AppError::storage(path, err))?;

    temp.persist(path)
        .map_err(|err| AppError::storage(path, err.error))?;
    sync_dir(&dir).map_err(|err| AppError::storage(&dir, err))?;

    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

fn malformed_record(path: &Path, index: usize, err: FieldError) -> AppError {
    AppError::MalformedRecord {
        path: path.to_path_buf(),
        index: Some(index),
        field: err.field.map(str::to_string),
        reason: err.reason,
    }
}
