//! File I/O adapter
//!
//! Saving behaves like a browser download: the document lands in the download
//! directory and never replaces an existing file. Loading either asks the
//! user for a path through a [`FilePicker`] or reads a known path.

use std::{
    fs,
    future::Future,
    io,
    path::{Path, PathBuf},
    pin::Pin,
    sync::{Arc, Mutex, PoisonError},
};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum FileError {
    #[error("No file was selected.")]
    NoFileSelected,
    #[error("The file is not valid JSON.")]
    InvalidJson(#[source] serde_json::Error),
    #[error("Error reading the file.")]
    Read(#[source] io::Error),
    #[error("Error writing {}.", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("The document could not be serialized.")]
    Serialize(#[source] serde_json::Error),
}

const JSON_EXTENSION: &str = "json";

/// Whether `path` ends in `.extension`, ignoring case.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
}

pub type PickFuture<'a> = Pin<Box<dyn Future<Output = Option<PathBuf>> + Send + 'a>>;

/// Asks the user for a file. Resolves to `None` when the user dismisses the
/// request.
pub trait FilePicker {
    fn pick_file<'a>(&'a self, extension: &'a str) -> PickFuture<'a>;
}

/// A single pending file request, shared between the task waiting for the
/// answer and the UI that produces it.
#[derive(Debug, Clone, Default)]
pub struct PickerSlot {
    pending: Arc<Mutex<Option<oneshot::Sender<Option<PathBuf>>>>>,
}

impl PickerSlot {
    /// Starts a new request. A request still pending is answered with `None`.
    pub fn arm(&self) -> oneshot::Receiver<Option<PathBuf>> {
        let (tx, rx) = oneshot::channel();
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(tx) {
            let _ = previous.send(None);
        }
        rx
    }

    /// Answers the pending request. Returns `false` if nobody was waiting.
    pub fn resolve(&self, path: Option<PathBuf>) -> bool {
        let sender = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        sender.is_some_and(|tx| tx.send(path).is_ok())
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[derive(Debug, Clone)]
pub struct FilesService {
    download_dir: PathBuf,
}

impl FilesService {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Serializes `document` and writes it as `file_name` into the download
    /// directory, or as `stem (n).ext` if that name is taken.
    pub fn save_json_file<T: Serialize>(
        &self,
        document: &T,
        file_name: &str,
    ) -> Result<PathBuf, FileError> {
        let json = serde_json::to_string(document).map_err(FileError::Serialize)?;
        fs::create_dir_all(&self.download_dir).map_err(|source| FileError::Write {
            path: self.download_dir.clone(),
            source,
        })?;

        let path = unique_path(&self.download_dir, file_name);
        fs::write(&path, json).map_err(|source| FileError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    pub async fn load_json_file(&self, picker: &impl FilePicker) -> Result<Value, FileError> {
        let path = picker
            .pick_file(JSON_EXTENSION)
            .await
            .filter(|path| {
                let accepted = has_extension(path, JSON_EXTENSION);
                if !accepted {
                    warn!("Ignoring {}: not a .{JSON_EXTENSION} file", path.display());
                }
                accepted
            })
            .ok_or(FileError::NoFileSelected)?;
        self.load_json_file_from_path(&path).await
    }

    pub async fn load_json_file_from_path(&self, path: &Path) -> Result<Value, FileError> {
        debug!("Reading {}", path.display());
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(FileError::Read)?;
        serde_json::from_str(&text).map_err(FileError::InvalidJson)
    }
}

fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map_or_else(|| file_name.to_string(), |s| s.to_string_lossy().into_owned());
    let extension = name
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    (1u32..)
        .map(|n| dir.join(format!("{stem} ({n}){extension}")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}
