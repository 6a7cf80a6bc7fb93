// HTTP repository implementation for the voice stats API
use crate::application::stats_repository::StatsRepository;
use crate::domain::stats::{ClipStat, VoiceStat};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ApiRepository {
    base_url: String,
    client: reqwest::Client,
}

impl ApiRepository {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// `/api/v1/clips/<resource>`, or `/api/v1/<locale>/clips/<resource>` when filtered
    fn build_url(&self, locale: Option<&str>, resource: &str) -> String {
        match locale {
            Some(locale) => format!(
                "{}/api/v1/{}/clips/{}",
                self.base_url,
                urlencoding::encode(locale),
                resource
            ),
            None => format!("{}/api/v1/clips/{}", self.base_url, resource),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("Requesting {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to stats API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Stats API request failed with status {}: {}", status, body);
        }

        response
            .json::<T>()
            .await
            .context("Failed to parse stats API response")
    }
}

#[async_trait]
impl StatsRepository for ApiRepository {
    async fn fetch_clips_stats(&self, locale: Option<&str>) -> Result<Vec<ClipStat>> {
        let url = self.build_url(locale, "stats");
        self.get_json(&url).await
    }

    async fn fetch_clip_voices(&self, locale: Option<&str>) -> Result<Vec<VoiceStat>> {
        let url = self.build_url(locale, "voices");
        self.get_json(&url).await
    }
}
