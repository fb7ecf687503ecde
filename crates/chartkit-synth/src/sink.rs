//! Output sinks for rendered documents
//!
//! - **Directory**: writes each document to `<dir>/<filename>` (default)
//! - **Memory**: keeps documents in a map, for tests and dry runs

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{Result, SynthError};

/// Destination for rendered documents
pub trait ManifestSink {
    /// Store one document under `filename`, replacing any previous content
    fn write(&mut self, filename: &str, contents: &str) -> Result<()>;
}

/// Writes documents into a directory, creating it on first write
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

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl ManifestSink for DirectorySink {
    fn write(&mut self, filename: &str, contents: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|source| SynthError::Write {
            path: self.dir.display().to_string(),
            source,
        })?;

        let path = self.path_for(filename);
        std::fs::write(&path, contents).map_err(|source| SynthError::Write {
            path: path.display().to_string(),
            source,
        })?;

        tracing::info!(path = %path.display(), bytes = contents.len(), "wrote manifest");
        Ok(())
    }
}

/// Keeps documents in memory, in write order
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    documents: IndexMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, filename: &str) -> Option<&str> {
        self.documents.get(filename).map(String::as_str)
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn into_documents(self) -> IndexMap<String, String> {
        self.documents
    }
}

impl ManifestSink for MemorySink {
    fn write(&mut self, filename: &str, contents: &str) -> Result<()> {
        self.documents.insert(filename.to_string(), contents.to_string());
        Ok(())
    }
}
