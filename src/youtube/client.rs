use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use url::Url;

use super::types::{ChannelResponse, PlaylistItem, PlaylistItemsResponse, VideoStatsResponse};
use crate::error::{AnalyserError, Result};
use crate::http::{endpoint, parse_json, HttpTransport};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Largest `maxResults` the playlistItems endpoint accepts.
pub const PAGE_SIZE: u32 = 50;

const SOURCE: &str = "youtube";

/// A playlist entry joined with its view count, in playlist order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub view_count: u64,
    pub video_id: String,
}

#[derive(Debug)]
struct ListingItem {
    video_id: String,
    title: String,
    description: String,
    published_at: DateTime<Utc>,
}

struct ListingPage {
    items: Vec<ListingItem>,
    next_cursor: Option<String>,
}

/// Stateless client over the YouTube Data API. Every call is awaited before the next
/// one is issued so results keep the order the API listed them in.
pub struct YoutubeClient {
    transport: Arc<dyn HttpTransport>,
    api_key: String,
    base: Url,
    max_pages: usize,
}

impl YoutubeClient {
    pub fn new(transport: Arc<dyn HttpTransport>, api_key: impl Into<String>, base: Url, max_pages: usize) -> Self {
        Self { transport, api_key: api_key.into(), base, max_pages: max_pages.max(1) }
    }

    /// Resolve a channel id (`UC...`) or handle (`@name`) to its uploads playlist.
    pub async fn uploads_playlist_id(&self, channel: &str) -> Result<String> {
        let selector = if channel.starts_with('@') { "forHandle" } else { "id" };
        let url = self.url("channels", &[("part", "contentDetails"), (selector, channel)])?;
        let body = self.transport.get(&url).await?;
        let response: ChannelResponse = parse_json(SOURCE, &body)?;
        response
            .uploads_playlist()
            .map(str::to_string)
            .ok_or_else(|| AnalyserError::FeedNotFound(channel.to_string()))
    }

    pub async fn videos_by_channel(&self, channel: &str) -> Result<Vec<VideoInfo>> {
        let uploads = self.uploads_playlist_id(channel).await?;
        tracing::info!(channel, playlist = %uploads, "resolved channel uploads playlist");
        self.videos_from_playlist(&uploads).await
    }

    /// Walk every page of a playlist, then enrich each entry with its view count.
    ///
    /// Listing failures abort the walk. Enrichment never does: a missing, empty or
    /// unparseable statistic, or a failed statistics call, yields a view count of 0.
    pub async fn videos_from_playlist(&self, playlist_id: &str) -> Result<Vec<VideoInfo>> {
        let listing = self.list_playlist(playlist_id).await?;
        let mut videos = Vec::with_capacity(listing.len());
        for item in listing {
            let view_count = self.view_count_or_default(&item.video_id).await;
            videos.push(VideoInfo {
                title: item.title,
                description: item.description,
                published_at: item.published_at,
                view_count,
                video_id: item.video_id,
            });
        }
        Ok(videos)
    }

    /// The view count reported for `video_id`, or `None` when the API has none to give.
    pub async fn view_count(&self, video_id: &str) -> Result<Option<u64>> {
        let url = self.url("videos", &[("part", "statistics"), ("id", video_id)])?;
        let body = self.transport.get(&url).await?;
        let stats: VideoStatsResponse = parse_json(SOURCE, &body)?;
        Ok(parse_statistic(stats.view_count()))
    }

    async fn view_count_or_default(&self, video_id: &str) -> u64 {
        match self.view_count(video_id).await {
            Ok(Some(count)) => count,
            Ok(None) => {
                tracing::warn!(video_id, "no usable view count, defaulting to 0");
                0
            }
            Err(e) => {
                tracing::warn!(video_id, error = %e, "statistics lookup failed, defaulting to 0");
                0
            }
        }
    }

    async fn list_playlist(&self, playlist_id: &str) -> Result<Vec<ListingItem>> {
        let mut listing = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;
        loop {
            let page = self.playlist_page(playlist_id, cursor.as_deref()).await?;
            pages += 1;
            tracing::debug!(playlist_id, page = pages, items = page.items.len(), "fetched playlist page");
            listing.extend(page.items);

            let Some(next) = page.next_cursor else { break };
            if !seen.insert(next.clone()) {
                tracing::warn!(playlist_id, cursor = %next, "server repeated a page cursor, stopping");
                break;
            }
            if pages >= self.max_pages {
                tracing::warn!(playlist_id, max_pages = self.max_pages, "page limit reached, stopping");
                break;
            }
            cursor = Some(next);
        }
        tracing::info!(playlist_id, pages, items = listing.len(), "playlist listing complete");
        Ok(listing)
    }

    async fn playlist_page(&self, playlist_id: &str, cursor: Option<&str>) -> Result<ListingPage> {
        let page_size = PAGE_SIZE.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(token) = cursor {
            params.push(("pageToken", token));
        }
        let url = self.url("playlistItems", &params)?;
        let body = self.transport.get(&url).await?;
        let response: PlaylistItemsResponse = parse_json(SOURCE, &body)?;
        Ok(ListingPage {
            items: response.items.into_iter().filter_map(listing_item).collect(),
            next_cursor: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = endpoint(&self.base, path)?;
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                query.append_pair(name, value);
            }
            query.append_pair("key", &self.api_key);
        }
        Ok(url)
    }
}

fn listing_item(item: PlaylistItem) -> Option<ListingItem> {
    let Some(snippet) = item.snippet else {
        tracing::warn!(item_id = item.id.as_deref().unwrap_or("?"), "playlist entry without a snippet, skipping");
        return None;
    };
    let Some(video_id) = snippet.resource_id.and_then(|r| r.video_id).filter(|id| !id.is_empty()) else {
        tracing::warn!(title = %snippet.title, "playlist entry without a video id, skipping");
        return None;
    };
    let published_at = match snippet.published_at.as_deref().map(DateTime::parse_from_rfc3339) {
        Some(Ok(at)) => at.with_timezone(&Utc),
        _ => {
            tracing::warn!(video_id, "playlist entry without a valid publish date, skipping");
            return None;
        }
    };
    Some(ListingItem { video_id, title: snippet.title, description: snippet.description, published_at })
}

/// Statistics arrive as strings; anything that is not a non-negative integer counts as missing.
fn parse_statistic(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}
