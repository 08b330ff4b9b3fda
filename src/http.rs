use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AnalyserError, Result};

const USER_AGENT: &str = concat!("content-analyser/", env!("CARGO_PKG_VERSION"));

/// Raw HTTP seam used by the platform clients. Implementations return the body of a
/// successful (2xx) response and map everything else to `SourceUnavailable`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<String>;

    async fn post_form(
        &self,
        url: &Url,
        basic_auth: Option<(&str, &str)>,
        form: &[(&str, &str)],
    ) -> Result<String>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    async fn body_of(resp: reqwest::Response) -> Result<String> {
        let status = resp.status();
        let host = resp.url().host_str().unwrap_or("http").to_string();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalyserError::unavailable(
                host,
                format!("status {}: {}", status.as_u16(), body.trim()),
            ));
        }
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<String> {
        tracing::debug!(path = url.path(), "GET");
        let resp = self.client.get(url.clone()).send().await?;
        Self::body_of(resp).await
    }

    async fn post_form(
        &self,
        url: &Url,
        basic_auth: Option<(&str, &str)>,
        form: &[(&str, &str)],
    ) -> Result<String> {
        tracing::debug!(path = url.path(), "POST");
        let mut req = self.client.post(url.clone()).form(form);
        if let Some((user, password)) = basic_auth {
            req = req.basic_auth(user, Some(password));
        }
        Self::body_of(req.send().await?).await
    }
}

/// Deserialize a response body, treating a structurally invalid payload as the source being unavailable.
pub(crate) fn parse_json<T: DeserializeOwned>(source_name: &str, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| AnalyserError::unavailable(source_name, format!("invalid payload: {e}")))
}

/// Join `path` onto an API base, keeping any path prefix the base already carries.
pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url> {
    let mut root = base.clone();
    if !root.path().ends_with('/') {
        let with_slash = format!("{}/", root.path());
        root.set_path(&with_slash);
    }
    root.join(path)
        .map_err(|e| AnalyserError::Config(format!("invalid endpoint {base}{path}: {e}")))
}
