//! Bounded, most-recent-first store of parsed documents, persisted as a
//! single JSON file.

use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{DocumentHistory, ParsedDocument};

/// Default retention bound.
pub const DEFAULT_MAX_DOCUMENTS: usize = 50;

pub struct HistoryStore {
    path: PathBuf,
    max_documents: usize,
    history: DocumentHistory,
}

impl HistoryStore {
    /// Open the store at `path` with the default bound. A missing,
    /// unreadable or malformed file degrades to an empty history so a
    /// corrupted cache never blocks the caller.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_bound(path, DEFAULT_MAX_DOCUMENTS)
    }

    pub fn with_bound(path: impl Into<PathBuf>, max_documents: usize) -> Self {
        let path = path.into();
        let history = load_or_default(&path);
        Self {
            path,
            max_documents,
            history,
        }
    }

    /// Insert a document at the front. An existing entry with the same
    /// id is replaced; entries beyond the bound are evicted oldest
    /// first. Persists immediately.
    pub fn add_document(&mut self, document: ParsedDocument) -> Result<()> {
        self.history.documents.retain(|d| d.id != document.id);
        self.history.documents.insert(0, document);
        self.history.documents.truncate(self.max_documents);
        self.history.last_accessed = Utc::now();
        self.save()
    }

    #[must_use]
    pub fn documents(&self) -> &[ParsedDocument] {
        &self.history.documents
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&ParsedDocument> {
        self.history.documents.iter().find(|d| d.id == id)
    }

    /// Remove a document by id. Returns whether an entry was removed.
    pub fn remove(&mut self, id: Uuid) -> Result<bool> {
        let before = self.history.documents.len();
        self.history.documents.retain(|d| d.id != id);
        let removed = self.history.documents.len() != before;
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.history = DocumentHistory::default();
        self.save()
    }

    /// Case-insensitive substring search over document names and
    /// markdown bodies, in history order.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&ParsedDocument> {
        let needle = term.to_lowercase();
        self.history
            .documents
            .iter()
            .filter(|d| {
                d.metadata.name.to_lowercase().contains(&needle)
                    || d.markdown_content.to_lowercase().contains(&needle)
            })
            .collect()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&self.history)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

fn load_or_default(path: &Path) -> DocumentHistory {
    if !path.exists() {
        return DocumentHistory::default();
    }
    match std::fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str(&json) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "malformed history, starting empty");
                DocumentHistory::default()
            }
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read history, starting empty");
            DocumentHistory::default()
        }
    }
}
