//! Destinations for finished documents

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A finalized document handed off for saving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Persists finished documents, e.g. as a download on the user's device
pub trait DocumentSink: Send + Sync {
    fn save(&self, document: ExportedDocument) -> impl Future<Output = io::Result<()>> + Send;
}

/// Writes each document to `<dir>/<filename>`
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Target path for `filename`, which must be a bare file name
    pub fn path_for(&self, filename: &str) -> io::Result<PathBuf> {
        match Path::new(filename).file_name() {
            Some(name) if name == filename => Ok(self.dir.join(name)),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a bare file name", filename),
            )),
        }
    }
}

impl DocumentSink for DirectorySink {
    async fn save(&self, document: ExportedDocument) -> io::Result<()> {
        let path = self.path_for(&document.filename)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, &document.bytes).await?;
        tracing::info!(path = %path.display(), bytes = document.bytes.len(), "document saved");
        Ok(())
    }
}

/// Keeps documents in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: Mutex<Vec<ExportedDocument>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents saved so far, oldest first
    pub fn documents(&self) -> Vec<ExportedDocument> {
        self.documents
            .lock()
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentSink for MemorySink {
    async fn save(&self, document: ExportedDocument) -> io::Result<()> {
        self.documents
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory sink poisoned"))?
            .push(document);
        Ok(())
    }
}
