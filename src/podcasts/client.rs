use std::sync::Arc;

use serde::Deserialize;
use url::Url;

use crate::error::{AnalyserError, Result};
use crate::http::{endpoint, parse_json, HttpTransport};

pub const DEFAULT_API_BASE: &str = "https://api.podbean.com/v1";

/// Largest `limit` the episodes endpoint accepts.
pub const PAGE_SIZE: usize = 100;

const SOURCE: &str = "podbean";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PodcastEpisode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub permalink_url: Option<String>,
    /// Epoch seconds.
    pub publish_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct EpisodesResponse {
    #[serde(default)]
    episodes: Vec<PodcastEpisode>,
    #[serde(default)]
    has_more: bool,
}

/// Podbean API client authenticating with client credentials.
pub struct PodbeanClient {
    transport: Arc<dyn HttpTransport>,
    client_id: String,
    client_secret: String,
    base: Url,
    max_pages: usize,
}

impl PodbeanClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        base: Url,
        max_pages: usize,
    ) -> Self {
        Self {
            transport,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base,
            max_pages: max_pages.max(1),
        }
    }

    pub async fn access_token(&self) -> Result<String> {
        let url = endpoint(&self.base, "oauth/token")?;
        let body = self
            .transport
            .post_form(
                &url,
                Some((self.client_id.as_str(), self.client_secret.as_str())),
                &[("grant_type", "client_credentials")],
            )
            .await?;
        let token: TokenResponse = parse_json(SOURCE, &body)?;
        if token.access_token.is_empty() {
            return Err(AnalyserError::unavailable(SOURCE, "empty access token"));
        }
        Ok(token.access_token)
    }

    /// Every episode of the authenticated podcast, in the order Podbean lists them.
    pub async fn all_episodes(&self) -> Result<Vec<PodcastEpisode>> {
        let token = self.access_token().await?;
        let limit = PAGE_SIZE.to_string();
        let mut episodes = Vec::new();
        let mut offset = 0usize;
        let mut pages = 0usize;
        loop {
            let mut url = endpoint(&self.base, "episodes")?;
            url.query_pairs_mut()
                .append_pair("access_token", &token)
                .append_pair("offset", &offset.to_string())
                .append_pair("limit", &limit);
            let body = self.transport.get(&url).await?;
            let page: EpisodesResponse = parse_json(SOURCE, &body)?;
            pages += 1;

            let returned = page.episodes.len();
            tracing::debug!(offset, returned, has_more = page.has_more, "fetched episode page");
            episodes.extend(page.episodes);
            if !page.has_more || returned == 0 {
                break;
            }
            if pages >= self.max_pages {
                tracing::warn!(max_pages = self.max_pages, "page limit reached, stopping");
                break;
            }
            offset += returned;
        }
        tracing::info!(pages, episodes = episodes.len(), "podbean listing complete");
        Ok(episodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakePodbean {
        pages: Vec<&'static str>,
        gets: Mutex<Vec<String>>,
        auth: Mutex<Option<(String, String)>>,
    }

    #[async_trait]
    impl HttpTransport for FakePodbean {
        async fn get(&self, url: &Url) -> Result<String> {
            let mut gets = self.gets.lock().unwrap();
            let body = self.pages.get(gets.len()).copied().unwrap_or(r#"{"episodes":[]}"#);
            gets.push(url.to_string());
            Ok(body.to_string())
        }

        async fn post_form(&self, url: &Url, basic_auth: Option<(&str, &str)>, form: &[(&str, &str)]) -> Result<String> {
            assert!(url.path().ends_with("/oauth/token"));
            assert_eq!(form, &[("grant_type", "client_credentials")]);
            *self.auth.lock().unwrap() = basic_auth.map(|(u, p)| (u.to_string(), p.to_string()));
            Ok(r#"{"access_token":"tok","token_type":"Bearer","expires_in":604800}"#.to_string())
        }
    }

    #[tokio::test]
    async fn walks_offsets_until_has_more_is_false() {
        let fake = Arc::new(FakePodbean {
            pages: vec![
                r#"{"episodes":[{"id":"1","title":"one","permalink_url":"https://p/e/1","publish_time":1706745600},
                                {"id":"2","title":"two","publish_time":1706832000}],"offset":0,"limit":100,"has_more":true}"#,
                r#"{"episodes":[{"id":"3","title":"three"}],"offset":2,"limit":100,"has_more":false}"#,
            ],
            gets: Mutex::new(Vec::new()),
            auth: Mutex::new(None),
        });
        let client = PodbeanClient::new(fake.clone(), "id", "secret", Url::parse(DEFAULT_API_BASE).unwrap(), 50);
        let episodes = client.all_episodes().await.unwrap();

        let ids: Vec<_> = episodes.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(episodes[2].publish_time, None);

        let gets = fake.gets.lock().unwrap();
        assert_eq!(gets.len(), 2);
        assert!(gets[0].contains("access_token=tok") && gets[0].contains("offset=0"));
        assert!(gets[1].contains("offset=2"));
        assert_eq!(*fake.auth.lock().unwrap(), Some(("id".to_string(), "secret".to_string())));
    }

    #[tokio::test]
    async fn empty_page_ends_the_walk_even_with_has_more() {
        let fake = Arc::new(FakePodbean {
            pages: vec![r#"{"episodes":[],"has_more":true}"#],
            gets: Mutex::new(Vec::new()),
            auth: Mutex::new(None),
        });
        let client = PodbeanClient::new(fake.clone(), "id", "secret", Url::parse(DEFAULT_API_BASE).unwrap(), 50);
        assert!(client.all_episodes().await.unwrap().is_empty());
        assert_eq!(fake.gets.lock().unwrap().len(), 1);
    }
}
