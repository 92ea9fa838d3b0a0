//! In-memory name records for the admin panel.
//!
//! Records live for the lifetime of the process. All access goes through one
//! mutex, and id assignment happens in the same critical section as the
//! insert, so ids are unique and strictly increasing across every ingestion
//! path.

use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Name not found")]
    NotFound(u64),
}

/// Review state of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Untested,
    Correct,
    NeedsReview,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameRecord {
    pub id: u64,
    pub name: String,
    pub detected_ethnicity: Option<String>,
    pub native_script: Option<String>,
    pub status: RecordStatus,
    pub last_tested: Option<NaiveDate>,
    pub expected_ethnicity: Option<String>,
    pub audio_path: Option<String>,
}

/// Fields of a record to be created; the store assigns the id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewRecord {
    pub name: String,
    pub detected_ethnicity: Option<String>,
    pub native_script: Option<String>,
    pub expected_ethnicity: Option<String>,
    pub audio_path: Option<String>,
}

/// Partial update. Outer `None` leaves a field alone; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecordPatch {
    #[serde(default, deserialize_with = "present")]
    pub detected_ethnicity: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub native_script: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub audio_path: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub last_tested: Option<Option<NaiveDate>>,
}

/// Distinguishes an explicit `null` from a missing key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl RecordPatch {
    fn apply(self, record: &mut NameRecord) {
        if let Some(v) = self.detected_ethnicity {
            record.detected_ethnicity = v;
        }
        if let Some(v) = self.native_script {
            record.native_script = v;
        }
        if let Some(v) = self.audio_path {
            record.audio_path = v;
        }
        if let Some(v) = self.last_tested {
            record.last_tested = v;
        }
    }
}

struct Table {
    records: Vec<NameRecord>,
    next_id: u64,
}

impl Table {
    fn find_mut(&mut self, id: u64) -> Result<&mut NameRecord, StoreError> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

/// Ordered, process-wide list of name records.
pub struct NameStore {
    table: Mutex<Table>,
}

impl Default for NameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NameStore {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table {
                records: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        // A panic while holding the lock cannot leave a half-written record,
        // so a poisoned table is still consistent.
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All records in insertion order.
    pub fn list(&self) -> Vec<NameRecord> {
        self.lock().records.clone()
    }

    pub fn get(&self, id: u64) -> Option<NameRecord> {
        self.lock().records.iter().find(|r| r.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a new untested record and return it with its assigned id.
    pub fn insert(&self, new: NewRecord) -> NameRecord {
        let mut table = self.lock();
        let record = NameRecord {
            id: table.next_id,
            name: new.name,
            detected_ethnicity: new.detected_ethnicity,
            native_script: new.native_script,
            status: RecordStatus::Untested,
            last_tested: None,
            expected_ethnicity: new.expected_ethnicity,
            audio_path: new.audio_path,
        };
        table.next_id += 1;
        table.records.push(record.clone());
        record
    }

    /// Set the review status and stamp `last_tested` with `today`.
    pub fn set_status(
        &self,
        id: u64,
        status: RecordStatus,
        today: NaiveDate,
    ) -> Result<NameRecord, StoreError> {
        let mut table = self.lock();
        let record = table.find_mut(id)?;
        record.status = status;
        record.last_tested = Some(today);
        Ok(record.clone())
    }

    pub fn update(&self, id: u64, patch: RecordPatch) -> Result<NameRecord, StoreError> {
        let mut table = self.lock();
        let record = table.find_mut(id)?;
        patch.apply(record);
        Ok(record.clone())
    }
}
