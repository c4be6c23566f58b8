use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::error::AppError;
use crate::store::{
    DeleteSelector, NewRecord, UpsertOutcome, VacancyCriteria, VacancyStore, pick_identity,
};

pub const DEFAULT_STORE_PATH: &str = "data/vacancies.json";

/// Vacancies kept as a JSON array in a single file.
///
/// Every operation reads the whole file and, when it changes anything, writes
/// the whole file back. There is no locking between processes.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl Default for JsonStore {
    fn default() -> Self {
        JsonStore::new(DEFAULT_STORE_PATH)
    }
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored records. A missing, empty or unreadable file yields an
    /// empty list so the next write starts fresh.
    pub fn read_all(&self) -> Vec<Value> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}", self.path.display());
                return Vec::new();
            }
        };

        if contents.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Array(records)) => records,
            Ok(_) => {
                tracing::warn!(
                    "{} does not hold a JSON array, treating it as empty",
                    self.path.display()
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Corrupt store {}: {e}, treating it as empty", self.path.display());
                Vec::new()
            }
        }
    }

    /// Replace the stored records, creating parent directories as needed.
    pub fn write_all(&self, records: &[Value]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        records.serialize(&mut serializer)?;
        fs::write(&self.path, buf)?;

        tracing::debug!("Wrote {} vacancies to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Upsert `records`: a record whose identity is already stored replaces
    /// it in place, anything else is appended. Records that are not JSON
    /// objects are skipped.
    pub fn save(&self, records: &[Value]) -> UpsertOutcome {
        let mut stored = self.read_all();
        let mut index: HashMap<String, usize> = stored
            .iter()
            .enumerate()
            .filter_map(|(i, record)| pick_identity(record).map(|id| (id, i)))
            .collect();

        let mut outcome = UpsertOutcome::default();
        for record in records {
            if !record.is_object() {
                tracing::warn!("Skipping non-object record: {record}");
                outcome.skipped += 1;
                continue;
            }

            match pick_identity(record) {
                Some(identity) => match index.get(&identity) {
                    Some(&i) => {
                        stored[i] = record.clone();
                        outcome.updated += 1;
                    }
                    None => {
                        index.insert(identity, stored.len());
                        stored.push(record.clone());
                        outcome.inserted += 1;
                    }
                },
                None => {
                    stored.push(record.clone());
                    outcome.inserted += 1;
                }
            }
        }

        outcome.persisted = match self.write_all(&stored) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to write {}: {e}", self.path.display());
                false
            }
        };

        tracing::info!(
            "Saved vacancies to {}: {} new, {} updated, {} skipped",
            self.path.display(),
            outcome.inserted,
            outcome.updated,
            outcome.skipped
        );
        outcome
    }
}

impl VacancyStore for JsonStore {
    fn add(&self, record: NewRecord) -> Result<UpsertOutcome, AppError> {
        let value = record.into_value()?;
        Ok(self.save(std::slice::from_ref(&value)))
    }

    fn query(&self, criteria: &VacancyCriteria) -> Vec<Value> {
        self.read_all()
            .into_iter()
            .filter(|record| criteria.matches(record))
            .collect()
    }

    fn delete(&self, selector: &DeleteSelector) -> Result<usize, AppError> {
        selector.validate()?;

        let mut stored = self.read_all();
        let before = stored.len();
        stored.retain(|record| !selector.matches(record));
        let removed = before - stored.len();

        if removed > 0
            && let Err(e) = self.write_all(&stored)
        {
            tracing::error!("Failed to write {}: {e}", self.path.display());
        }
        Ok(removed)
    }
}
