// Collectors fetch raw vacancy listings from remote sources.

pub mod headhunter;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

pub use headhunter::HeadHunter;

/// Upstream ceiling on items per page.
pub const MAX_PER_PAGE: u32 = 100;

/// Query parameters for a single page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub text: String,
    pub page: u32,
    pub per_page: u32,
}

/// One page of search results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiPage {
    #[serde(default)]
    pub items: Vec<Value>,
    /// Total page count, when the source reports it.
    #[serde(default)]
    pub pages: Option<u32>,
}

pub(crate) fn clamp_per_page(per_page: u32) -> u32 {
    per_page.clamp(1, MAX_PER_PAGE)
}

/// Trait that all vacancy collectors must implement.
/// Implementors provide single-page requests; `load` drives the pagination.
#[async_trait]
pub trait JobCollector: Send + Sync {
    /// Human-readable source name, used in logs.
    fn name(&self) -> &str;

    /// Configured page size, already clamped to `1..=MAX_PER_PAGE`.
    fn per_page(&self) -> u32;

    /// Fetch one page of results.
    async fn request(&self, query: &PageQuery) -> Result<ApiPage, AppError>;

    /// Collect up to `max_items` raw listings for `keyword`, page by page.
    ///
    /// Stops when the limit is reached, a page comes back empty, or the last
    /// reported page has been read. Any failed request fails the whole load;
    /// items from earlier pages are not returned.
    async fn load(&self, keyword: &str, max_items: usize) -> Result<Vec<Value>, AppError> {
        let mut items: Vec<Value> = Vec::new();
        let mut page: u32 = 0;

        while items.len() < max_items {
            let remaining = max_items - items.len();
            let per_page = u32::try_from(remaining)
                .unwrap_or(u32::MAX)
                .min(self.per_page());
            let query = PageQuery {
                text: keyword.to_string(),
                page,
                per_page,
            };

            tracing::debug!("{}: requesting page {page} ({per_page} per page)", self.name());
            let batch = self.request(&query).await?;
            if batch.items.is_empty() {
                break;
            }

            items.extend(batch.items);
            items.truncate(max_items);

            if let Some(pages) = batch.pages
                && page.saturating_add(1) >= pages
            {
                break;
            }
            page += 1;
        }

        tracing::info!(
            "{}: collected {} vacancies for '{keyword}'",
            self.name(),
            items.len()
        );
        Ok(items)
    }
}
