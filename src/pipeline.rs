//! Pure filtering and ranking over collected vacancies.

use crate::models::Vacancy;

/// Inclusive salary bounds. `None` leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SalaryRange {
    pub low: Option<u64>,
    pub high: Option<u64>,
}

impl SalaryRange {
    pub fn new(low: Option<u64>, high: Option<u64>) -> Self {
        SalaryRange { low, high }
    }

    pub fn contains(&self, salary: u64) -> bool {
        self.low.is_none_or(|low| salary >= low) && self.high.is_none_or(|high| salary <= high)
    }
}

/// Keep vacancies whose name, requirement or responsibility mentions any of
/// `words`, case-insensitively. No words means no filtering.
pub fn filter_by_keywords<S: AsRef<str>>(vacancies: Vec<Vacancy>, words: &[S]) -> Vec<Vacancy> {
    if words.is_empty() {
        return vacancies;
    }
    let keys: Vec<String> = words.iter().map(|w| w.as_ref().to_lowercase()).collect();

    vacancies
        .into_iter()
        .filter(|v| {
            let haystack = v.haystack();
            keys.iter().any(|k| haystack.contains(k.as_str()))
        })
        .collect()
}

pub fn filter_by_salary(vacancies: Vec<Vacancy>, range: SalaryRange) -> Vec<Vacancy> {
    vacancies
        .into_iter()
        .filter(|v| range.contains(v.effective_salary()))
        .collect()
}

/// Highest effective salary first; ties keep their input order.
pub fn top_n(mut vacancies: Vec<Vacancy>, n: i64) -> Vec<Vacancy> {
    if n <= 0 {
        return Vec::new();
    }
    vacancies.sort_by(|a, b| b.cmp_by_salary(a));
    vacancies.truncate(usize::try_from(n).unwrap_or(usize::MAX));
    vacancies
}

/// Parse user input such as `"100000-200000"`, `"150000"` or `" - 200000"`.
///
/// Em and en dashes are accepted as separators. A lone number is the lower
/// bound. A side that is not a plain number is left open.
pub fn parse_salary_range(input: &str) -> SalaryRange {
    let normalized = input.trim().replace(['\u{2014}', '\u{2013}'], "-");
    if normalized.is_empty() {
        return SalaryRange::default();
    }

    match normalized.split_once('-') {
        Some((left, right)) => SalaryRange::new(parse_amount(left), parse_amount(right)),
        None => SalaryRange::new(parse_amount(&normalized), None),
    }
}

fn parse_amount(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
