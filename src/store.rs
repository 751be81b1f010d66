// Record stores for issued signatures: one in memory, one backed by a JSON file.
// Both list newest first; entries created in the same instant keep
// "later insert first" order.

use crate::error::{Error, Result};
use crate::services::{Entry, NewEntry, RecordStore};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

fn stamp(entry: NewEntry) -> Entry {
    Entry {
        id: Uuid::new_v4(),
        name: entry.name,
        email: entry.email,
        signature_image: entry.signature_image,
        qr_code: entry.qr_code,
        created_at: Utc::now(),
    }
}

/// Rows are kept in insert order; listing walks them backwards.
fn newest_first(rows: &[Entry]) -> Vec<Entry> {
    let mut out: Vec<Entry> = rows.iter().rev().cloned().collect();
    // stable: equal timestamps stay in reverse-insert order
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

/// Take the row out, handing back its slot so a failed write can put it back.
fn remove(rows: &mut Vec<Entry>, id: Uuid) -> Result<(usize, Entry)> {
    let idx = rows
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    Ok((idx, rows.remove(idx)))
}

#[derive(Default)]
pub struct MemoryStore {
    rows: Vec<Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn insert(&mut self, entry: NewEntry) -> Result<Entry> {
        let row = stamp(entry);
        self.rows.push(row.clone());
        Ok(row)
    }

    fn list_ordered_by_created_desc(&self) -> Result<Vec<Entry>> {
        Ok(newest_first(&self.rows))
    }

    fn delete_by_id(&mut self, id: Uuid) -> Result<()> {
        remove(&mut self.rows, id).map(|_| ())
    }
}

/// Same semantics as `MemoryStore`, rewritten to disk after every change.
pub struct JsonFileStore {
    path: PathBuf,
    rows: Vec<Entry>,
}

impl JsonFileStore {
    /// Open (or start) a store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let rows = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Vec::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        println!("[store] opened {} ({} entries)", path.display(), rows.len());
        Ok(Self { path, rows })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.rows)?)?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn insert(&mut self, entry: NewEntry) -> Result<Entry> {
        let row = stamp(entry);
        self.rows.push(row.clone());
        if let Err(e) = self.flush() {
            self.rows.pop();
            return Err(e);
        }
        Ok(row)
    }

    fn list_ordered_by_created_desc(&self) -> Result<Vec<Entry>> {
        Ok(newest_first(&self.rows))
    }

    fn delete_by_id(&mut self, id: Uuid) -> Result<()> {
        let (idx, row) = remove(&mut self.rows, id)?;
        if let Err(e) = self.flush() {
            self.rows.insert(idx, row);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> NewEntry {
        NewEntry {
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            signature_image: "data:image/png;base64,AAAA".into(),
            qr_code: "data:image/png;base64,BBBB".into(),
        }
    }

    #[test]
    fn memory_store_lists_newest_first() {
        let mut s = MemoryStore::new();
        let a = s.insert(entry("A")).unwrap();
        let b = s.insert(entry("B")).unwrap();
        let c = s.insert(entry("C")).unwrap();
        let ids: Vec<_> = s.list_ordered_by_created_desc().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[test]
    fn delete_removes_and_unknown_id_fails() {
        let mut s = MemoryStore::new();
        let a = s.insert(entry("A")).unwrap();
        s.delete_by_id(a.id).unwrap();
        assert!(s.list_ordered_by_created_desc().unwrap().is_empty());
        assert!(matches!(s.delete_by_id(a.id), Err(Error::NotFound(_))));
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("signatures.json");

        let mut s = JsonFileStore::open(&path).unwrap();
        let a = s.insert(entry("A")).unwrap();
        let b = s.insert(entry("B")).unwrap();
        s.delete_by_id(a.id).unwrap();
        drop(s);

        let s = JsonFileStore::open(&path).unwrap();
        let rows = s.list_ordered_by_created_desc().unwrap();
        assert_eq!(rows, vec![b]);
    }

    #[test]
    fn failed_delete_keeps_the_row_listed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signatures.json");
        let mut s = JsonFileStore::open(&path).unwrap();
        let a = s.insert(entry("A")).unwrap();

        // A directory where the file was makes the rewrite fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(matches!(s.delete_by_id(a.id), Err(Error::Io(_))));
        assert_eq!(s.list_ordered_by_created_desc().unwrap(), vec![a]);
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(Error::Json(_))));
    }
}
