#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use content_analyser::prelude::*;
use url::Url;

/// A canned answer for every request whose path ends with `path`, whose query carries
/// every `params` pair, and none of the `absent` keys. First matching route wins.
struct Route {
    path: String,
    params: Vec<(String, String)>,
    absent: Vec<String>,
    body: Option<String>,
}

#[derive(Default)]
pub struct ScriptedTransport {
    routes: Vec<Route>,
    calls: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, path: &str, params: &[(&str, &str)], absent: &[&str], body: &str) -> Self {
        self.routes.push(Route {
            path: path.to_string(),
            params: params.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            absent: absent.iter().map(|k| k.to_string()).collect(),
            body: Some(body.to_string()),
        });
        self
    }

    /// Requests matching this route fail as if the connection dropped.
    pub fn fail(mut self, path: &str, params: &[(&str, &str)]) -> Self {
        self.routes.push(Route {
            path: path.to_string(),
            params: params.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            absent: Vec::new(),
            body: None,
        });
        self
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| u.path().ends_with(path)).count()
    }

    pub fn query_values(&self, path: &str, key: &str) -> Vec<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.path().ends_with(path))
            .map(|u| u.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned()))
            .collect()
    }

    fn answer(&self, url: &Url) -> Result<String> {
        self.calls.lock().unwrap().push(url.clone());
        let pairs: Vec<(String, String)> = url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        let route = self.routes.iter().find(|r| {
            url.path().ends_with(&r.path)
                && r.params.iter().all(|p| pairs.contains(p))
                && r.absent.iter().all(|k| pairs.iter().all(|(key, _)| key != k))
        });
        match route.and_then(|r| r.body.clone()) {
            Some(body) => Ok(body),
            None => Err(AnalyserError::unavailable("scripted", format!("no answer for {}", url.path()))),
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<String> {
        self.answer(url)
    }

    async fn post_form(&self, url: &Url, _: Option<(&str, &str)>, _: &[(&str, &str)]) -> Result<String> {
        self.answer(url)
    }
}

pub fn youtube(transport: &Arc<ScriptedTransport>) -> Arc<YoutubeClient> {
    let base = Url::parse(content_analyser::youtube::DEFAULT_API_BASE).unwrap();
    Arc::new(YoutubeClient::new(transport.clone(), "test-key", base, 100))
}

pub fn page(items: &[(&str, &str, &str)], next: Option<&str>) -> String {
    let items: Vec<serde_json::Value> = items
        .iter()
        .map(|(id, title, published)| {
            serde_json::json!({
                "snippet": {
                    "title": title,
                    "description": format!("about {title}"),
                    "publishedAt": published,
                    "resourceId": { "kind": "youtube#video", "videoId": id }
                }
            })
        })
        .collect();
    let mut body = serde_json::json!({ "kind": "youtube#playlistItemListResponse", "items": items });
    if let Some(token) = next {
        body["nextPageToken"] = serde_json::Value::from(token);
    }
    body.to_string()
}

pub fn views(count: &str) -> String {
    serde_json::json!({ "items": [ { "statistics": { "viewCount": count } } ] }).to_string()
}

pub fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn utc_offset() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}
