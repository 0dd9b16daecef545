//! Persistent symbol store.
//!
//! A file-backed cache for a symbol database, split into two sections so
//! the index can list classes without paying for their members:
//!
//! * the **skeleton file**: one small record per class, read eagerly and
//!   fully by [`SymbolStore::load_all`];
//! * the **body file**: one variable-length record per class, read lazily
//!   one class at a time when a handle's members are first touched.
//!
//! Both files begin with a format version; on mismatch the store must be
//! reset, never partially trusted. [`SymbolStore::append`] is
//! all-or-nothing per batch: on any failure the files are truncated back
//! to their pre-append lengths.

pub mod format;

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::Interner;
use crate::symbols::{BodySource, ClassBody, ClassProvider, ClassSymbol};

use format::{SkeletonRecord, STORE_VERSION};

/// Errors of the persistence path. Lookup paths never surface these; the
/// owning host sees them once per operation and degrades.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store version mismatch (expected {expected}, found {found})")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("store file is truncated")]
    Truncated,
    #[error("invalid store record: {0}")]
    InvalidRecord(String),
}

/// Sink for the rare user-facing store notices ("store file missing",
/// "store unreadable"). The host wires this to its status UI; the default
/// routes to the log.
pub trait StoreNotifier: Send + Sync {
    fn notify(&self, message: &str);
}

struct LogNotifier;

impl StoreNotifier for LogNotifier {
    fn notify(&self, message: &str) {
        warn!("{message}");
    }
}

/// The two-file persistent symbol store.
pub struct SymbolStore {
    skeleton_path: PathBuf,
    body_path: PathBuf,
    notifier: Arc<dyn StoreNotifier>,
    /// Guards every mutating and primary read operation (single-writer
    /// model); lazy body loads synchronize per symbol instead.
    state: Mutex<StoreState>,
}

struct StoreState {
    /// Shared with the lazy body loaders so skeleton and body records
    /// dedupe into one cache.
    interner: Arc<Mutex<Interner>>,
    missing_notified: bool,
}

impl SymbolStore {
    /// Create a store over an explicit file pair. No I/O happens yet.
    pub fn new(skeleton_path: impl Into<PathBuf>, body_path: impl Into<PathBuf>) -> Self {
        Self {
            skeleton_path: skeleton_path.into(),
            body_path: body_path.into(),
            notifier: Arc::new(LogNotifier),
            state: Mutex::new(StoreState {
                interner: Arc::new(Mutex::new(Interner::new())),
                missing_notified: false,
            }),
        }
    }

    /// Conventional file pair `<name>.jsk` / `<name>.jbd` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>, name: &str) -> Self {
        let dir = dir.as_ref();
        Self::new(
            dir.join(format!("{name}.jsk")),
            dir.join(format!("{name}.jbd")),
        )
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn StoreNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Truncate both files and write fresh version headers.
    pub fn reset(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.interner.lock().clear();
        state.missing_notified = false;
        for path in [&self.skeleton_path, &self.body_path] {
            let mut file = File::create(path)?;
            file.write_all(&STORE_VERSION.to_le_bytes())?;
            file.flush()?;
        }
        debug!(store = %self.skeleton_path.display(), "symbol store reset");
        Ok(())
    }

    /// Append one batch of classes (skeleton + body records).
    ///
    /// The batch is serialized into memory first and written in one step
    /// per file; on any failure both files are truncated back to their
    /// previous lengths, so a failed append leaves the store exactly as it
    /// was.
    pub fn append(&self, classes: &[ClassSymbol]) -> Result<(), StoreError> {
        let mut state = self.state.lock();

        let mut skeleton_file = open_for_append(&self.skeleton_path)?;
        let mut body_file = open_for_append(&self.body_path)?;
        let skeleton_start = skeleton_file.seek(SeekFrom::End(0))?;
        let body_start = body_file.seek(SeekFrom::End(0))?;

        // Serialize the whole batch up front; an error here costs nothing.
        let mut skeleton_buf = Vec::new();
        let mut body_buf = Vec::new();
        for class in classes {
            let body_seek = body_start + body_buf.len() as u64;
            let before = body_buf.len();
            format::encode_body(class.body(), &mut body_buf)?;
            let body_len = (body_buf.len() - before) as u32;

            let record = SkeletonRecord {
                full_name: class.full_name().to_string(),
                package_len: class.package().len() as u16,
                modifiers: class.modifiers(),
                body_seek,
                body_len,
            };
            format::encode_skeleton(&record, &mut skeleton_buf)?;
        }

        let written = (|| -> Result<(), StoreError> {
            skeleton_file.write_all(&skeleton_buf)?;
            body_file.write_all(&body_buf)?;
            skeleton_file.flush()?;
            body_file.flush()?;
            Ok(())
        })();

        if let Err(err) = written {
            // Roll the partial batch back; the store keeps its old contents.
            let _ = skeleton_file.set_len(skeleton_start);
            let _ = body_file.set_len(body_start);
            warn!(%err, "store append rolled back");
            return Err(err);
        }

        state.missing_notified = false;
        debug!(classes = classes.len(), "store append committed");
        Ok(())
    }

    /// Load every persisted class as a lazy handle.
    ///
    /// The skeleton section is read fully; bodies load on first member
    /// access. A missing (or shorter-than-header) skeleton file yields an
    /// empty set and a single notice; a version mismatch is an error the
    /// caller must answer with [`SymbolStore::reset`].
    pub fn load_all(&self) -> Result<Vec<ClassSymbol>, StoreError> {
        let mut state = self.state.lock();

        let file = match File::open(&self.skeleton_path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                self.notify_missing_once(&mut state);
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        if file.metadata()?.len() < 4 {
            self.notify_missing_once(&mut state);
            return Ok(Vec::new());
        }

        let mut reader = BufReader::new(file);
        check_version(&mut reader)?;

        // The body file header is validated now, not on first lazy load.
        match File::open(&self.body_path) {
            Ok(body_file) => check_version(&mut BufReader::new(body_file))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                self.notify_missing_once(&mut state);
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        }

        let body_file = Arc::new(BodyFile {
            path: self.body_path.clone(),
            interner: state.interner.clone(),
            io_notified: AtomicBool::new(false),
            notifier: self.notifier.clone(),
        });

        let mut classes = Vec::new();
        loop {
            if reader.fill_buf()?.is_empty() {
                break;
            }
            let record = {
                let mut interner = state.interner.lock();
                format::decode_skeleton(&mut reader, &mut interner)?
            };
            let source = Arc::new(StoredBody {
                file: body_file.clone(),
                seek: record.body_seek,
                len: record.body_len,
            });
            classes.push(ClassSymbol::new_lazy(
                record.full_name.as_str(),
                record.package_len as usize,
                record.modifiers,
                source,
            ));
        }
        debug!(classes = classes.len(), "store skeletons loaded");
        Ok(classes)
    }

    fn notify_missing_once(&self, state: &mut StoreState) {
        if !state.missing_notified {
            state.missing_notified = true;
            self.notifier.notify(&format!(
                "symbol store file not found: {}",
                self.skeleton_path.display()
            ));
        }
    }
}

/// A store is itself a symbol source.
impl ClassProvider for SymbolStore {
    fn classes(&self) -> Vec<ClassSymbol> {
        match self.load_all() {
            Ok(classes) => classes,
            Err(err) => {
                self.notifier
                    .notify(&format!("symbol store unreadable: {err}"));
                Vec::new()
            }
        }
    }

    fn append(&mut self, other: &dyn ClassProvider) -> bool {
        let incoming = other.classes();
        let last = incoming.len().saturating_sub(1);
        for (i, class) in incoming.iter().enumerate() {
            if !self.notify_append(class, i == last) {
                return false;
            }
        }
        SymbolStore::append(self, &incoming).is_ok()
    }

    fn reset(&mut self) {
        if let Err(err) = SymbolStore::reset(self) {
            self.notifier
                .notify(&format!("symbol store reset failed: {err}"));
        }
    }
}

fn open_for_append(path: &Path) -> Result<File, StoreError> {
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)?;
    if file.metadata()?.len() == 0 {
        file.write_all(&STORE_VERSION.to_le_bytes())?;
    } else {
        file.seek(SeekFrom::Start(0))?;
        check_version(&mut file)?;
    }
    Ok(file)
}

fn check_version(r: &mut impl Read) -> Result<(), StoreError> {
    let mut bytes = [0u8; 4];
    r.read_exact(&mut bytes).map_err(|_| StoreError::Truncated)?;
    let found = u32::from_le_bytes(bytes);
    if found != STORE_VERSION {
        return Err(StoreError::VersionMismatch {
            expected: STORE_VERSION,
            found,
        });
    }
    Ok(())
}

/// Shared lazy-load state for one body file: the interning cache and the
/// notice-once flag for I/O failures.
struct BodyFile {
    path: PathBuf,
    interner: Arc<Mutex<Interner>>,
    io_notified: AtomicBool,
    notifier: Arc<dyn StoreNotifier>,
}

/// Per-class body locator; the [`BodySource`] behind every lazy handle
/// returned by [`SymbolStore::load_all`].
struct StoredBody {
    file: Arc<BodyFile>,
    seek: u64,
    len: u32,
}

impl BodySource for StoredBody {
    fn load_body(
        &self,
        full_name: &str,
    ) -> Result<ClassBody, Box<dyn std::error::Error + Send + Sync>> {
        let result = (|| -> Result<ClassBody, StoreError> {
            let mut file = File::open(&self.file.path)?;
            file.seek(SeekFrom::Start(self.seek))?;
            let mut bytes = vec![0u8; self.len as usize];
            file.read_exact(&mut bytes)
                .map_err(|_| StoreError::Truncated)?;
            let mut interner = self.file.interner.lock();
            format::decode_body(&bytes, full_name, &mut interner)
        })();

        match result {
            Ok(body) => Ok(body),
            Err(err) => {
                if !self.file.io_notified.swap(true, Ordering::Relaxed) {
                    self.file.notifier.notify(&format!(
                        "symbol store body unreadable ({}): {err}",
                        self.file.path.display()
                    ));
                }
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Modifiers;
    use crate::symbols::{FieldSymbol, MethodSymbol, TypeName};

    fn sample_class(name: &str) -> ClassSymbol {
        let full = format!("com.example.{name}");
        ClassSymbol::new(
            name,
            "com.example",
            Modifiers::new(Modifiers::PUBLIC),
            ClassBody {
                declaration_offset: 7,
                superclass: Some("java.lang.Object".into()),
                interfaces: vec![],
                fields: vec![FieldSymbol::new(
                    full.as_str(),
                    "count",
                    Modifiers::new(Modifiers::PRIVATE),
                    TypeName::scalar("int"),
                )],
                constructors: vec![],
                methods: vec![MethodSymbol::new(
                    full.as_str(),
                    "count",
                    Modifiers::new(Modifiers::PUBLIC),
                    vec![],
                    TypeName::scalar("int"),
                )],
            },
        )
    }

    fn store_in(dir: &tempfile::TempDir) -> SymbolStore {
        SymbolStore::in_dir(dir.path(), "symbols")
    }

    #[test]
    fn test_missing_store_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_then_load_all_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.reset().unwrap();
        store
            .append(&[sample_class("A"), sample_class("B")])
            .unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(!loaded[0].is_body_loaded());
        assert_eq!(&**loaded[0].full_name(), "com.example.A");
        assert_eq!(loaded[0].fields().len(), 1);
        assert!(loaded[0].is_body_loaded());
        assert_eq!(loaded[1].methods().len(), 1);
    }

    #[test]
    fn test_append_batches_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.reset().unwrap();
        store.append(&[sample_class("A")]).unwrap();
        store.append(&[sample_class("B")]).unwrap();
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].fields().len(), 1);
    }

    #[test]
    fn test_version_mismatch_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.reset().unwrap();
        store.append(&[sample_class("A")]).unwrap();

        // Corrupt the skeleton header.
        let path = dir.path().join("symbols.jsk");
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[0] = bytes[0].wrapping_add(1);
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(
            store.load_all(),
            Err(StoreError::VersionMismatch { .. })
        ));

        // Recovery path: reset, after which the store is usable again.
        store.reset().unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_reset_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.reset().unwrap();
        store.append(&[sample_class("A")]).unwrap();
        store.reset().unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_provider_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        ClassProvider::reset(&mut store);
        let source = crate::symbols::VecProvider::new(vec![sample_class("A")]);
        assert!(ClassProvider::append(&mut store, &source));
        assert_eq!(store.classes().len(), 1);
    }
}
