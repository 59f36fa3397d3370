// crates/gemini-mcp-server/src/gemini/history.rs
// In-memory log of successful consultations

use serde::Serialize;
use std::sync::Mutex;

/// One successful consultation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsultationRecord {
    pub id: String,
    pub timestamp: String,
    /// First 200 characters of the query, "..." appended when cut
    pub query: String,
    pub status: String,
    /// Seconds the CLI took
    pub execution_time: f64,
}

/// Append-only, insertion-ordered history. Lives as long as the process.
#[derive(Debug, Default)]
pub struct ConsultationLog {
    entries: Mutex<Vec<ConsultationRecord>>,
}

impl ConsultationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: ConsultationRecord) {
        // A poisoned lock still holds a valid Vec; keep recording
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(record);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or_else(|e| e.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<ConsultationRecord> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.last().cloned()
    }

    /// Snapshot of every record, oldest first
    pub fn snapshot(&self) -> Vec<ConsultationRecord> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.clone()
    }
}
