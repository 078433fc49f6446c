//! erpsim Protocol
//!
//! Client-server communication: HTTP REST API over the simulation engine.
//!
//! # Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |                      erpsim Protocol                        |
//! +-------------------------------------------------------------+
//! |  HTTP Endpoints:                                            |
//! |    - /health, /stats, /api/reload-check                     |
//! |    - /api/query-schema, /api/nl2sql, /api/execute-sql       |
//! |    - /api/analytics                                         |
//! |    - /api/upload-schema, /api/documents[/:id]               |
//! |    - /api/workflow                                          |
//! +-------------------------------------------------------------+
//! |  Wire Format: JSON { success, data?, error? }               |
//! +-------------------------------------------------------------+
//! ```
//!
//! # Module Structure
//!
//! - `documents` - In-memory document list for uploads
//! - `handler` - Handler wrapping the engine, counters and documents
//! - `rest` - REST API handlers and routing

pub mod documents;
pub mod handler;
pub mod rest;

pub use documents::{Document, DocumentStore};
pub use handler::Handler;

// Protocol Constants
/// Default HTTP server port
pub const DEFAULT_PORT: u16 = 5000;

/// Maximum upload size (16 MB)
pub const MAX_UPLOAD_SIZE: usize = 16 * 1024 * 1024;
