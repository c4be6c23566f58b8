use std::cmp::Ordering;
use std::fmt;

use serde_json::{Value, json};

use crate::error::AppError;

const DEFAULT_NAME: &str = "No title";
const DEFAULT_CITY: &str = "Unspecified";
const MISSING_URL: &str = "-";

/// A single normalized listing.
///
/// Vacancies are ordered by their effective salary only. The ordering is
/// exposed through [`Vacancy::cmp_by_salary`] rather than `Ord`, so sort
/// call sites name the rule they rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vacancy {
    pub id: Option<String>,
    pub name: String,
    pub city: String,
    pub salary_from: Option<u64>,
    pub salary_to: Option<u64>,
    pub currency: Option<String>,
    pub requirement: Option<String>,
    pub responsibility: Option<String>,
    pub url: String,
    pub alternate_url: Option<String>,
    pub employer: Option<String>,
}

impl Vacancy {
    /// Build a vacancy from an API-shaped mapping.
    ///
    /// Every field is validated on its own: a missing or malformed field
    /// falls back to its default without affecting the others. Only a value
    /// that is not a JSON object is rejected.
    pub fn from_value(raw: &Value) -> Result<Vacancy, AppError> {
        let obj = raw
            .as_object()
            .ok_or_else(|| AppError::InvalidRecord(format!("expected an object, got {raw}")))?;

        let area = obj.get("area");
        let salary = obj.get("salary");
        let snippet = obj.get("snippet");
        let employer = obj.get("employer");

        Ok(Vacancy {
            id: optional_string(obj.get("id")),
            name: optional_string(obj.get("name")).unwrap_or_else(|| DEFAULT_NAME.to_string()),
            city: optional_string(nested(area, "name"))
                .unwrap_or_else(|| DEFAULT_CITY.to_string()),
            salary_from: salary_bound(nested(salary, "from")),
            salary_to: salary_bound(nested(salary, "to")),
            currency: optional_string(nested(salary, "currency")).map(|c| c.to_uppercase()),
            requirement: optional_string(nested(snippet, "requirement")),
            responsibility: optional_string(nested(snippet, "responsibility")),
            url: optional_string(obj.get("url")).unwrap_or_else(|| MISSING_URL.to_string()),
            alternate_url: optional_string(obj.get("alternate_url")),
            employer: optional_string(nested(employer, "name")),
        })
    }

    /// Convert a batch of raw values, skipping the ones that are not objects.
    pub fn from_values(items: &[Value]) -> Vec<Vacancy> {
        items
            .iter()
            .filter_map(|raw| match Vacancy::from_value(raw) {
                Ok(vacancy) => Some(vacancy),
                Err(e) => {
                    tracing::warn!("Skipping malformed vacancy: {e}");
                    None
                }
            })
            .collect()
    }

    /// Serialize back into the mapping shape used by the API and the store.
    pub fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "area": { "name": self.city },
            "salary": {
                "from": self.salary_from,
                "to": self.salary_to,
                "currency": self.currency,
            },
            "snippet": {
                "requirement": self.requirement,
                "responsibility": self.responsibility,
            },
            "url": self.url,
            "alternate_url": self.alternate_url,
            "employer": self.employer.as_ref().map(|name| json!({ "name": name })),
        })
    }

    /// Average of both bounds, the single present bound, or 0.
    pub fn effective_salary(&self) -> u64 {
        match (self.salary_from, self.salary_to) {
            (Some(from), Some(to)) => from / 2 + to / 2 + (from % 2 + to % 2) / 2,
            (Some(from), None) => from,
            (None, Some(to)) => to,
            (None, None) => 0,
        }
    }

    pub fn cmp_by_salary(&self, other: &Vacancy) -> Ordering {
        self.effective_salary().cmp(&other.effective_salary())
    }

    /// Concatenated searchable text: name, requirement and responsibility.
    pub(crate) fn haystack(&self) -> String {
        [
            Some(self.name.as_str()),
            self.requirement.as_deref(),
            self.responsibility.as_deref(),
        ]
        .into_iter()
        .map(|s| s.unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }
}

impl fmt::Display for Vacancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |b: Option<u64>| b.map_or_else(|| "-".to_string(), |v| v.to_string());
        write!(
            f,
            "{} ({}); salary: from {} to {}",
            self.name,
            self.city,
            bound(self.salary_from),
            bound(self.salary_to)
        )?;
        if let Some(currency) = &self.currency {
            write!(f, " {currency}")?;
        }
        Ok(())
    }
}

fn nested<'a>(parent: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    parent.and_then(|p| p.get(key))
}

/// Trimmed, non-empty text. Numbers and booleans are stringified.
fn optional_string(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Non-negative integer salary bound. Anything else is treated as absent.
pub(crate) fn salary_bound(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_salary(from: Option<u64>, to: Option<u64>) -> Vacancy {
        Vacancy::from_value(&json!({
            "name": "Dev",
            "salary": { "from": from, "to": to, "currency": "rur" },
            "url": "https://api.hh.ru/vacancies/1",
        }))
        .unwrap()
    }

    #[test]
    fn parses_api_shape() {
        let raw = json!({
            "id": "X1",
            "name": "Data Engineer",
            "area": { "name": "Москва" },
            "salary": { "from": 100000, "to": 200000, "currency": "RUR" },
            "snippet": { "requirement": "ETL", "responsibility": "Pipelines" },
            "url": "https://api.hh.ru/vacancies/X1",
            "alternate_url": "https://hh.ru/vacancy/X1",
            "employer": { "name": "Data Corp" },
        });

        let v = Vacancy::from_value(&raw).unwrap();
        assert_eq!(v.id.as_deref(), Some("X1"));
        assert_eq!(v.name, "Data Engineer");
        assert_eq!(v.city, "Москва");
        assert_eq!(v.currency.as_deref(), Some("RUR"));
        assert_eq!(v.employer.as_deref(), Some("Data Corp"));
        assert_eq!(
            v.to_string(),
            "Data Engineer (Москва); salary: from 100000 to 200000 RUR"
        );
    }

    #[test]
    fn missing_fields_fall_back_independently() {
        let raw = json!({
            "id": 42,
            "name": "   ",
            "salary": { "from": -5, "to": "abc", "currency": "usd" },
            "snippet": null,
            "employer": {},
        });

        let v = Vacancy::from_value(&raw).unwrap();
        assert_eq!(v.id.as_deref(), Some("42"));
        assert_eq!(v.name, DEFAULT_NAME);
        assert_eq!(v.city, DEFAULT_CITY);
        assert_eq!(v.salary_from, None);
        assert_eq!(v.salary_to, None);
        assert_eq!(v.currency.as_deref(), Some("USD"));
        assert_eq!(v.requirement, None);
        assert_eq!(v.url, MISSING_URL);
        assert_eq!(v.employer, None);
        assert_eq!(v.to_string(), "No title (Unspecified); salary: from - to - USD");
    }

    #[test]
    fn numeric_strings_and_floats_are_salaries() {
        let v = Vacancy::from_value(&json!({ "salary": { "from": "150000", "to": 250000.7 } }))
            .unwrap();
        assert_eq!(v.salary_from, Some(150_000));
        assert_eq!(v.salary_to, Some(250_000));
    }

    #[test]
    fn rejects_non_objects() {
        assert!(matches!(
            Vacancy::from_value(&json!("nope")),
            Err(AppError::InvalidRecord(_))
        ));
        let batch = [json!({ "name": "ok" }), json!(3), json!(null)];
        assert_eq!(Vacancy::from_values(&batch).len(), 1);
    }

    #[test]
    fn effective_salary_rules() {
        assert_eq!(with_salary(Some(100_000), Some(200_000)).effective_salary(), 150_000);
        assert_eq!(with_salary(Some(100_000), None).effective_salary(), 100_000);
        assert_eq!(with_salary(None, Some(300_000)).effective_salary(), 300_000);
        assert_eq!(with_salary(None, None).effective_salary(), 0);
        assert_eq!(with_salary(Some(1), Some(2)).effective_salary(), 1);
        assert_eq!(with_salary(Some(u64::MAX), Some(u64::MAX)).effective_salary(), u64::MAX);
    }

    #[test]
    fn comparison_uses_effective_salary_only() {
        let low = with_salary(Some(100_000), None);
        let mid = with_salary(Some(100_000), Some(200_000));
        let high = with_salary(None, Some(300_000));

        assert_eq!(low.cmp_by_salary(&mid), Ordering::Less);
        assert_eq!(high.cmp_by_salary(&mid), Ordering::Greater);

        let mut other_low = with_salary(Some(100_000), None);
        other_low.name = "Another".to_string();
        assert_eq!(low.cmp_by_salary(&other_low), Ordering::Equal);
    }

    #[test]
    fn value_round_trip() {
        let v = Vacancy {
            id: Some("T1".to_string()),
            name: "Test".to_string(),
            city: "Москва".to_string(),
            salary_from: Some(150_000),
            salary_to: Some(200_000),
            currency: Some("RUR".to_string()),
            requirement: Some("Python".to_string()),
            responsibility: Some("Development".to_string()),
            url: "https://api.hh.ru/vacancies/T1".to_string(),
            alternate_url: Some("https://hh.ru/vacancy/T1".to_string()),
            employer: Some("Test Co".to_string()),
        };

        let value = v.to_value();
        assert_eq!(value["area"]["name"], "Москва");
        assert_eq!(value["salary"]["from"], 150_000);
        assert_eq!(value["employer"]["name"], "Test Co");
        assert_eq!(Vacancy::from_value(&value).unwrap(), v);

        let bare = with_salary(None, None);
        assert!(bare.to_value()["employer"].is_null());
        assert_eq!(Vacancy::from_value(&bare.to_value()).unwrap(), bare);
    }
}
