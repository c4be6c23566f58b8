use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::collectors::{ApiPage, JobCollector, PageQuery, clamp_per_page};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.hh.ru/vacancies";
pub const DEFAULT_USER_AGENT: &str = "job-garden/1.0";
pub const DEFAULT_PER_PAGE: u32 = 50;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Client for the hh.ru vacancy search API.
pub struct HeadHunter {
    client: reqwest::Client,
    base_url: String,
    per_page: u32,
}

impl HeadHunter {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        per_page: u32,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self::from_client(client, base_url, per_page))
    }

    /// Wrap an already configured client.
    pub fn from_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        per_page: u32,
    ) -> Self {
        HeadHunter {
            client,
            base_url: base_url.into(),
            per_page: clamp_per_page(per_page),
        }
    }

    pub fn with_defaults() -> Result<Self, AppError> {
        Self::new(
            DEFAULT_BASE_URL,
            DEFAULT_USER_AGENT,
            DEFAULT_PER_PAGE,
            DEFAULT_TIMEOUT,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl JobCollector for HeadHunter {
    fn name(&self) -> &str {
        "headhunter"
    }

    fn per_page(&self) -> u32 {
        self.per_page
    }

    async fn request(&self, query: &PageQuery) -> Result<ApiPage, AppError> {
        let resp = self
            .client
            .get(&self.base_url)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!("hh.ru returned {status} for page {}", query.page);
            return Err(AppError::upstream(status.as_u16(), &body));
        }

        Ok(resp.json::<ApiPage>().await?)
    }
}
