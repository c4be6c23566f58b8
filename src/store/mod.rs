// Persistence for collected vacancies.

pub mod json;

use serde_json::Value;

use crate::error::AppError;
use crate::models::Vacancy;
use crate::models::vacancy::salary_bound;

pub use json::JsonStore;

/// Operations every vacancy store provides.
pub trait VacancyStore {
    /// Insert or replace a single record, keyed by its identity.
    fn add(&self, record: NewRecord) -> Result<UpsertOutcome, AppError>;

    /// Stored records matching every criterion that is set.
    fn query(&self, criteria: &VacancyCriteria) -> Vec<Value>;

    /// Remove records by id or url, returning how many were removed.
    fn delete(&self, selector: &DeleteSelector) -> Result<usize, AppError>;
}

/// A record accepted by [`VacancyStore::add`].
#[derive(Debug, Clone)]
pub enum NewRecord {
    Raw(Value),
    Vacancy(Vacancy),
}

impl NewRecord {
    /// The mapping to persist. Raw values must be JSON objects.
    pub fn into_value(self) -> Result<Value, AppError> {
        match self {
            NewRecord::Vacancy(v) => Ok(v.to_value()),
            NewRecord::Raw(value) if value.is_object() => Ok(value),
            NewRecord::Raw(other) => Err(AppError::InvalidRecord(format!(
                "only vacancy objects can be stored, got {other}"
            ))),
        }
    }
}

impl From<Value> for NewRecord {
    fn from(value: Value) -> Self {
        NewRecord::Raw(value)
    }
}

impl From<Vacancy> for NewRecord {
    fn from(vacancy: Vacancy) -> Self {
        NewRecord::Vacancy(vacancy)
    }
}

impl From<&Vacancy> for NewRecord {
    fn from(vacancy: &Vacancy) -> Self {
        NewRecord::Vacancy(vacancy.clone())
    }
}

/// Counts reported by an upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    /// Whether the result reached the backing file.
    pub persisted: bool,
}

/// Filters for [`VacancyStore::query`]. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct VacancyCriteria {
    /// Substring of name, requirement or responsibility.
    pub keyword: Option<String>,
    /// Substring of the area name or address city.
    pub city: Option<String>,
    /// Currency code, compared case-insensitively.
    pub currency: Option<String>,
    /// Minimum lower salary bound. Records without one never match.
    pub min_salary: Option<u64>,
}

impl VacancyCriteria {
    pub fn matches(&self, record: &Value) -> bool {
        if let Some(keyword) = &self.keyword {
            let haystack = [
                field_text(record, &["name"]),
                field_text(record, &["snippet", "requirement"]),
                field_text(record, &["snippet", "responsibility"]),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
            if !haystack.contains(&keyword.to_lowercase()) {
                return false;
            }
        }

        if let Some(city) = &self.city {
            let needle = city.to_lowercase();
            let found = [
                field_text(record, &["area", "name"]),
                field_text(record, &["address", "city"]),
            ]
            .into_iter()
            .flatten()
            .any(|c| c.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }

        if let Some(currency) = &self.currency {
            let stored = field_text(record, &["salary", "currency"]);
            if !stored.is_some_and(|c| c.eq_ignore_ascii_case(currency)) {
                return false;
            }
        }

        if let Some(min) = self.min_salary {
            let from = salary_bound(record.get("salary").and_then(|s| s.get("from")));
            if !from.is_some_and(|from| from >= min) {
                return false;
            }
        }

        true
    }
}

/// Selects records for [`VacancyStore::delete`].
#[derive(Debug, Clone, Default)]
pub struct DeleteSelector {
    pub id: Option<String>,
    /// Matches either `url` or `alternate_url`.
    pub url: Option<String>,
}

impl DeleteSelector {
    pub fn by_id(id: impl Into<String>) -> Self {
        DeleteSelector {
            id: Some(id.into()),
            url: None,
        }
    }

    pub fn by_url(url: impl Into<String>) -> Self {
        DeleteSelector {
            id: None,
            url: Some(url.into()),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.id.is_none() && self.url.is_none() {
            return Err(AppError::Validation(
                "either an id or a url is required to delete vacancies".to_string(),
            ));
        }
        Ok(())
    }

    pub fn matches(&self, record: &Value) -> bool {
        let id_hit = self
            .id
            .as_deref()
            .is_some_and(|id| field_text(record, &["id"]).as_deref() == Some(id));
        let url_hit = self.url.as_deref().is_some_and(|url| {
            field_text(record, &["url"]).as_deref() == Some(url)
                || field_text(record, &["alternate_url"]).as_deref() == Some(url)
        });
        id_hit || url_hit
    }
}

/// Deduplication key: `id`, then `url`, then `alternate_url`.
/// Records with none of them have no identity.
pub fn pick_identity(record: &Value) -> Option<String> {
    ["id", "url", "alternate_url"]
        .into_iter()
        .find_map(|key| field_text(record, &[key]))
}

/// Non-blank text at `path`. Numbers are stringified so numeric ids compare
/// equal to their string form.
fn field_text(record: &Value, path: &[&str]) -> Option<String> {
    let value = path.iter().try_fold(record, |v, key| v.get(key))?;
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
