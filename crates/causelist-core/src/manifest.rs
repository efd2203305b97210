//! Per-date JSON ledger of stored cause lists.
//!
//! One file per date, `<root>/<date>_manifest.json`. Every append re-reads
//! the file, pushes one entry and rewrites it whole; there is no cache. The
//! read-append-write runs under an exclusive advisory lock on
//! `<root>/.locks/<date>_manifest.json.lock` unless locking is turned off,
//! in which case callers must keep to one writer per date. Lock files are
//! never removed; they are empty and only ever locked, not read.

use crate::error::{Error, Result};
use crate::events::{Event, EventSink};
use crate::paths;
use crate::selection::Jurisdiction;
use crate::storage;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Judge name recorded when the portal did not show one.
pub const UNKNOWN_JUDGE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadEntry {
    pub court: String,
    pub judge: String,
    /// Stored PDF path with forward slashes.
    pub file: String,
}

impl DownloadEntry {
    pub fn new(court: &str, judge: Option<&str>, file: &Path) -> Self {
        let judge = judge
            .map(str::trim)
            .filter(|j| !j.is_empty())
            .unwrap_or(UNKNOWN_JUDGE);
        Self {
            court: court.to_string(),
            judge: judge.to_string(),
            file: paths::portable(file),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub date: String,
    pub state: String,
    pub district: String,
    pub court_complex: String,
    /// Append-only, in download order. The same court may appear twice.
    pub downloads: Vec<DownloadEntry>,
}

impl ManifestRecord {
    pub fn new(date: &str, jurisdiction: &Jurisdiction) -> Self {
        Self {
            date: date.to_string(),
            state: jurisdiction.state.clone(),
            district: jurisdiction.district.clone(),
            court_complex: jurisdiction.court_complex.clone(),
            downloads: Vec::new(),
        }
    }

    pub fn jurisdiction(&self) -> Jurisdiction {
        Jurisdiction::new(&self.state, &self.district, &self.court_complex)
    }
}

#[derive(Debug, Clone)]
pub struct ManifestStore {
    root: PathBuf,
    lock: bool,
}

impl ManifestStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: true,
        }
    }

    /// Turns the advisory lock around [`append`](Self::append) on or off.
    pub fn with_locking(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, date: &str) -> Result<PathBuf> {
        paths::manifest_path(&self.root, date)
    }

    /// Reads the record for `date`; `None` when no manifest exists yet.
    pub fn load(&self, date: &str) -> Result<Option<ManifestRecord>> {
        let path = self.path_for(date)?;
        read_record(&path)
    }

    /// Records one stored PDF for `date`.
    ///
    /// Creates the manifest with `jurisdiction` on first use; afterwards the
    /// stored jurisdiction is kept. An unreadable existing manifest fails
    /// with [`Error::CorruptManifest`] and is not overwritten.
    pub fn append(
        &self,
        date: &str,
        jurisdiction: &Jurisdiction,
        court: &str,
        judge: Option<&str>,
        file: &Path,
        sink: &dyn EventSink,
    ) -> Result<ManifestRecord> {
        let path = self.path_for(date)?;
        storage::ensure_parent(&path).map_err(|e| Error::io(&path, e))?;
        let _guard = if self.lock {
            Some(ManifestLock::acquire(&path)?)
        } else {
            None
        };

        let mut record = match read_record(&path)? {
            Some(existing) => {
                if existing.jurisdiction() != *jurisdiction {
                    sink.record(&Event::JurisdictionMismatch { path: path.clone() });
                }
                existing
            }
            None => ManifestRecord::new(date, jurisdiction),
        };
        record.downloads.push(DownloadEntry::new(court, judge, file));

        write_record(&path, &record)?;
        sink.record(&Event::ManifestUpdated {
            path,
            entries: record.downloads.len(),
        });
        Ok(record)
    }
}

fn read_record(path: &Path) -> Result<Option<ManifestRecord>> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io(path, e)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| Error::CorruptManifest {
            path: path.to_path_buf(),
            source,
        })
}

fn write_record(path: &Path, record: &ManifestRecord) -> Result<()> {
    let mut json = serde_json::to_string_pretty(record)?;
    json.push('\n');
    storage::write_atomic(path, json.as_bytes()).map_err(|e| Error::io(path, e))
}

/// Directory next to the manifests that holds their lock files.
const LOCK_DIR: &str = ".locks";

fn lock_path(manifest: &Path) -> PathBuf {
    let dir = manifest.parent().unwrap_or(Path::new("")).join(LOCK_DIR);
    let mut name = manifest.file_name().unwrap_or_default().to_owned();
    name.push(".lock");
    dir.join(name)
}

/// Exclusive lock on the manifest's lock file, released on drop.
struct ManifestLock {
    file: fs::File,
}

impl ManifestLock {
    fn acquire(manifest: &Path) -> Result<Self> {
        let lock_path = lock_path(manifest);
        storage::ensure_parent(&lock_path).map_err(|e| Error::io(&lock_path, e))?;
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| Error::io(&lock_path, e))?;
        file.lock_exclusive().map_err(|source| Error::Lock {
            path: lock_path,
            source,
        })?;
        Ok(Self { file })
    }
}

impl Drop for ManifestLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;

    fn delhi() -> Jurisdiction {
        Jurisdiction::new("Delhi", "New Delhi", "District Court Complex")
    }

    #[test]
    fn judge_defaults_to_unknown() {
        let f = Path::new("a.pdf");
        assert_eq!(DownloadEntry::new("C1", None, f).judge, "Unknown");
        assert_eq!(DownloadEntry::new("C1", Some(""), f).judge, "Unknown");
        assert_eq!(DownloadEntry::new("C1", Some("  "), f).judge, "Unknown");
        assert_eq!(DownloadEntry::new("C1", Some("A B"), f).judge, "A B");
    }

    #[test]
    fn entry_file_uses_forward_slashes() {
        let e = DownloadEntry::new("C1", None, Path::new(r"output\Delhi\C1.pdf"));
        assert_eq!(e.file, "output/Delhi/C1.pdf");
    }

    #[test]
    fn first_append_creates_single_entry_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path());
        let sink = MemorySink::new();

        store
            .append(
                "2025-10-15",
                &delhi(),
                "Court No.1",
                None,
                Path::new("output/Delhi/New Delhi/District Court Complex/2025-10-15/Court No.1.pdf"),
                &sink,
            )
            .unwrap();

        let path = dir.path().join("2025-10-15_manifest.json");
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["date"], "2025-10-15");
        assert_eq!(value["state"], "Delhi");
        assert_eq!(value["district"], "New Delhi");
        assert_eq!(value["court_complex"], "District Court Complex");
        assert_eq!(
            value["downloads"],
            serde_json::json!([{
                "court": "Court No.1",
                "judge": "Unknown",
                "file": "output/Delhi/New Delhi/District Court Complex/2025-10-15/Court No.1.pdf"
            }])
        );
        assert_eq!(
            sink.events(),
            vec![Event::ManifestUpdated { path, entries: 1 }]
        );
    }

    #[test]
    fn appends_preserve_order_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path());
        let sink = MemorySink::new();
        let courts = ["Court No.1", "Court No.2", "Court No.1"];

        for court in courts {
            let file = PathBuf::from(format!("out/{court}.pdf"));
            store
                .append("16-10-2025", &delhi(), court, Some("J"), &file, &sink)
                .unwrap();
        }

        let record = store.load("16-10-2025").unwrap().unwrap();
        assert_eq!(record.downloads.len(), 3);
        for (entry, court) in record.downloads.iter().zip(courts) {
            assert_eq!(entry.court, court);
            assert_eq!(entry.judge, "J");
            assert_eq!(entry.file, format!("out/{court}.pdf"));
        }
    }

    #[test]
    fn non_ascii_is_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path());
        let j = Jurisdiction::new("महाराष्ट्र", "पुणे", "Shivajinagar");
        store
            .append("d", &j, "न्यायालय 1", None, Path::new("x.pdf"), &MemorySink::new())
            .unwrap();
        let text = fs::read_to_string(dir.path().join("d_manifest.json")).unwrap();
        assert!(text.contains("महाराष्ट्र"));
        assert!(text.contains("न्यायालय 1"));
        assert!(!text.contains("\\u"));
        assert!(text.contains("\n  \"date\""));
    }

    #[test]
    fn corrupt_manifest_is_reported_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path());
        let path = dir.path().join("2025-10-15_manifest.json");
        fs::write(&path, b"{ not json").unwrap();

        let err = store
            .append("2025-10-15", &delhi(), "C1", None, Path::new("a.pdf"), &MemorySink::new())
            .unwrap_err();

        assert!(matches!(err, Error::CorruptManifest { .. }));
        assert_eq!(fs::read(&path).unwrap(), b"{ not json");
        assert!(matches!(
            store.load("2025-10-15"),
            Err(Error::CorruptManifest { .. })
        ));
    }

    #[test]
    fn stored_jurisdiction_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path()).with_locking(false);
        let sink = MemorySink::new();
        store
            .append("d", &delhi(), "C1", None, Path::new("a.pdf"), &sink)
            .unwrap();
        let other = Jurisdiction::new("Goa", "North Goa", "Mapusa");
        let record = store
            .append("d", &other, "C2", None, Path::new("b.pdf"), &sink)
            .unwrap();

        assert_eq!(record.jurisdiction(), delhi());
        assert_eq!(record.downloads.len(), 2);
        assert_eq!(
            sink.count(|e| matches!(e, Event::JurisdictionMismatch { .. })),
            1
        );
    }

    #[test]
    fn lock_file_lives_under_hidden_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path());
        store
            .append("d", &delhi(), "C1", None, Path::new("a.pdf"), &MemorySink::new())
            .unwrap();

        assert!(dir.path().join(".locks").join("d_manifest.json.lock").is_file());
        assert!(!dir.path().join("d_manifest.json.lock").exists());
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 2, "{names:?}");
    }

    #[test]
    fn concurrent_appends_are_all_kept() {
        const WRITERS: usize = 8;
        const APPENDS: usize = 25;

        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path());
        let sink = MemorySink::new();

        std::thread::scope(|s| {
            for w in 0..WRITERS {
                let store = store.clone();
                let sink = &sink;
                s.spawn(move || {
                    for i in 0..APPENDS {
                        let court = format!("Court {w}-{i}");
                        let file = PathBuf::from(format!("out/{court}.pdf"));
                        store
                            .append("2025-10-15", &delhi(), &court, None, &file, sink)
                            .unwrap();
                    }
                });
            }
        });

        let record = store.load("2025-10-15").unwrap().unwrap();
        assert_eq!(record.downloads.len(), WRITERS * APPENDS);
        for w in 0..WRITERS {
            let courts: Vec<_> = record
                .downloads
                .iter()
                .filter(|e| e.court.starts_with(&format!("Court {w}-")))
                .map(|e| e.court.clone())
                .collect();
            let expected: Vec<_> = (0..APPENDS).map(|i| format!("Court {w}-{i}")).collect();
            assert_eq!(courts, expected);
        }
    }

    #[test]
    fn load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path());
        assert!(store.load("2025-10-15").unwrap().is_none());
    }

    #[test]
    fn date_cannot_escape_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join("output"));
        let err = store
            .append("../../x", &delhi(), "C1", None, Path::new("a.pdf"), &MemorySink::new())
            .unwrap_err();
        assert!(matches!(err, Error::PathEscape { .. }));
    }

    #[test]
    fn round_trip_equals_last_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path());
        let written = store
            .append("d", &delhi(), "C1", Some("A B"), Path::new("a.pdf"), &MemorySink::new())
            .unwrap();
        assert_eq!(store.load("d").unwrap(), Some(written));
    }
}
