//! The data store that owns waitlist entries.
//!
//! The handler only ever needs one capability from the store: insert a single row and get
//! either the inserted row or a structured error back. `WaitlistStore` is that capability,
//! `PostgrestStore` talks to the hosted data API and `MemoryStore` keeps rows in-process.

mod memory;
mod postgrest;

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Postgres error code for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Inserts exactly one row. `Ok(None)` means the store accepted the row but did not
    /// return a representation of it.
    async fn insert_entry(&self, entry: &NewWaitlistEntry) -> StoreResult<Option<WaitlistRow>>;
}

// ###################################
// ->   STRUCTS
// ###################################
/// A row proposed for insertion, serialized with the table's column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewWaitlistEntry {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: Option<String>,
    pub source: String,
}

/// A row as returned by the store.
/// Columns generated by the store (`id`, `created_at`, ...) are kept in `generated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistRow {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: Option<String>,
    pub source: String,
    #[serde(flatten)]
    pub generated: Map<String, Value>,
}

impl WaitlistRow {
    pub fn from_entry(entry: &NewWaitlistEntry, generated: Map<String, Value>) -> Self {
        WaitlistRow {
            first_name: entry.first_name.clone(),
            last_name: entry.last_name.clone(),
            email: entry.email.clone(),
            company: entry.company.clone(),
            source: entry.source.clone(),
            generated,
        }
    }
}

/// A structured error reported by the store itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreRejection {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl StoreRejection {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        StoreRejection {
            code: code.into(),
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code == UNIQUE_VIOLATION
    }
}

impl core::fmt::Display for StoreRejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " - details: {details}")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " - hint: {hint}")?;
        }
        Ok(())
    }
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type StoreResult<T> = core::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store rejected the insert: {0}")]
    Rejected(StoreRejection),
    #[error("unexpected response from the store with status {status}: {body}")]
    UnexpectedResponse { status: u16, body: String },
    #[error("failed to build store url: {0}")]
    UrlParsing(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("reqwest error: {0}")]
    Transport(#[from] reqwest::Error),
}
