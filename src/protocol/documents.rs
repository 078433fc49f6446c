//! In-memory document list behind the upload endpoints.
//!
//! Uploads never reach the engine; the list only gives clients a stable
//! create/list/delete lifecycle. Uses `parking_lot::RwLock` (no poisoning).

use chrono::{Local, NaiveDate, NaiveDateTime, SubsecRound};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A registered schema upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
}

impl Document {
    fn new(id: impl Into<String>, name: impl Into<String>, created_at: NaiveDateTime) -> Self {
        Document {
            id: id.into(),
            name: name.into(),
            created_at,
        }
    }
}

fn seeded_at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, 0, 0))
        .unwrap_or_default()
}

/// Document list owned by the request handler.
#[derive(Debug)]
pub struct DocumentStore {
    documents: RwLock<Vec<Document>>,
}

impl DocumentStore {
    /// Store seeded with the two sample documents
    pub fn new() -> Self {
        Self::with_documents(vec![
            Document::new("sim-1", "Sample ERP schema", seeded_at(2025, 1, 15, 10)),
            Document::new("sim-2", "Demo schema", seeded_at(2025, 2, 1, 9)),
        ])
    }

    pub fn with_documents(documents: Vec<Document>) -> Self {
        DocumentStore {
            documents: RwLock::new(documents),
        }
    }

    /// Snapshot in insertion order
    pub fn list(&self) -> Vec<Document> {
        self.documents.read().clone()
    }

    /// Register an upload of `file_count` files
    pub fn create(&self, file_count: usize) -> Document {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        let document = Document::new(
            format!("sim-{}", &uuid[..8]),
            format!("Uploaded {file_count} file(s)"),
            Local::now().naive_local().trunc_subsecs(0),
        );
        self.documents.write().push(document.clone());
        tracing::info!(id = %document.id, files = file_count, "document_created");
        document
    }

    /// Remove by id. Returns whether anything was removed.
    pub fn delete(&self, id: &str) -> bool {
        let mut documents = self.documents.write();
        let before = documents.len();
        documents.retain(|d| d.id != id);
        let removed = documents.len() != before;
        if removed {
            tracing::info!(id, "document_deleted");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
