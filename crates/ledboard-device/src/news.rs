//! NewsAPI top-headlines client

use ledboard_core::sources::{FetchError, Headline, NewsSource};
use log::debug;
use serde::Deserialize;

use crate::error::DeviceError;
use crate::http::{decode_error, fetch_body};
use crate::settings::NewsSettings;

/// Placeholder NewsAPI returns for articles pulled after publication.
const REMOVED_TITLE: &str = "[Removed]";

pub struct NewsApiClient {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
    country: String,
    page_size: String,
}

impl NewsApiClient {
    /// Fails when no API key was configured.
    pub fn new(agent: ureq::Agent, settings: &NewsSettings) -> Result<Self, DeviceError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(DeviceError::MissingNewsKey)?;

        Ok(Self {
            agent,
            endpoint: settings.endpoint.clone(),
            api_key,
            country: settings.country.clone(),
            page_size: settings.page_size.to_string(),
        })
    }
}

impl NewsSource for NewsApiClient {
    async fn fetch_top_stories(&mut self) -> Result<Vec<Headline>, FetchError> {
        debug!("Requesting top headlines for '{}'", self.country);
        let request = self
            .agent
            .get(&self.endpoint)
            .query("country", &self.country)
            .query("pageSize", &self.page_size)
            .set("X-Api-Key", &self.api_key);
        let body = fetch_body(request)?;
        parse_top_headlines(&body)
    }
}

#[derive(Deserialize)]
struct TopHeadlines {
    status: String,
    #[serde(default)]
    articles: Vec<Article>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct Article {
    title: Option<String>,
}

/// Decode a top-headlines page, dropping untitled and removed articles.
pub fn parse_top_headlines(body: &str) -> Result<Vec<Headline>, FetchError> {
    let page: TopHeadlines = serde_json::from_str(body).map_err(decode_error)?;
    if page.status != "ok" {
        return Err(FetchError::Decode(format!(
            "NewsAPI answered '{}' ({}): {}",
            page.status,
            page.code.as_deref().unwrap_or("no code"),
            page.message.as_deref().unwrap_or("no message"),
        )));
    }

    Ok(page
        .articles
        .into_iter()
        .filter_map(|article| article.title)
        .filter(|title| title.trim() != REMOVED_TITLE && !title.trim().is_empty())
        .map(Headline::new)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::agent;
    use std::time::Duration;

    #[test]
    fn test_parse_titles_in_order() {
        let body = r#"{
            "status": "ok",
            "totalResults": 3,
            "articles": [
                {"source": {"id": null, "name": "Wire"}, "title": "Markets rally"},
                {"source": {"id": null, "name": "Wire"}, "title": "[Removed]"},
                {"source": {"id": null, "name": "Wire"}, "title": null},
                {"source": {"id": null, "name": "Wire"}, "title": "Storm heads north"}
            ]
        }"#;

        let headlines = parse_top_headlines(body).unwrap();
        assert_eq!(
            headlines,
            vec![
                Headline::new("Markets rally"),
                Headline::new("Storm heads north")
            ]
        );
    }

    #[test]
    fn test_error_status_is_a_decode_error() {
        let body = r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#;
        assert!(matches!(
            parse_top_headlines(body),
            Err(FetchError::Decode(msg)) if msg.contains("apiKeyInvalid")
        ));
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let settings = NewsSettings {
            api_key: Some("  ".into()),
            ..NewsSettings::default()
        };
        assert!(matches!(
            NewsApiClient::new(agent(Duration::from_secs(1)), &settings),
            Err(DeviceError::MissingNewsKey)
        ));
    }
}
