use std::fmt;

use chrono::{DateTime, Utc};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Video,
    Podcast,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Podcast => "podcast",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized piece of published content, independent of the platform it came from.
///
/// Values are immutable once built: the url is always absolute and the publish
/// instant is always known. Items without a publish date never become `Content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    title: String,
    url: Url,
    published_at: DateTime<Utc>,
    kind: ContentType,
    view_count: u64,
}

impl Content {
    pub fn new(
        title: impl Into<String>,
        url: Url,
        published_at: DateTime<Utc>,
        kind: ContentType,
        view_count: u64,
    ) -> Self {
        Self { title: title.into(), url, published_at, kind, view_count }
    }

    pub fn title(&self) -> &str { &self.title }
    pub fn url(&self) -> &Url { &self.url }
    pub fn published_at(&self) -> DateTime<Utc> { self.published_at }
    pub fn kind(&self) -> ContentType { self.kind }
    pub fn view_count(&self) -> u64 { self.view_count }

    /// Strictly after the cutoff; content published exactly at the cutoff is excluded.
    pub fn is_after(&self, cutoff: DateTime<Utc>) -> bool {
        self.published_at > cutoff
    }
}

/// Stable ascending sort by publish instant; equal instants keep their input order.
pub fn sort_by_published(items: &mut [Content]) {
    items.sort_by_key(|c| c.published_at);
}
