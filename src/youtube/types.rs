//! Wire shapes of the YouTube Data API v3 responses. Unknown fields are ignored and
//! every nested level is optional so a sparse payload still deserializes.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelResponse {
    #[serde(default)]
    pub items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChannelItem {
    pub content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContentDetails {
    pub related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RelatedPlaylists {
    pub uploads: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistItemsResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItem {
    pub id: Option<String>,
    pub snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub published_at: Option<String>,
    pub resource_id: Option<ResourceId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResourceId {
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoStatsResponse {
    #[serde(default)]
    pub items: Vec<VideoStatsItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoStatsItem {
    pub statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Statistics {
    pub view_count: Option<String>,
}

impl VideoStatsResponse {
    /// The raw view count of the first returned video, if the API reported one.
    pub fn view_count(&self) -> Option<&str> {
        self.items
            .first()
            .and_then(|item| item.statistics.as_ref())
            .and_then(|stats| stats.view_count.as_deref())
    }
}

impl ChannelResponse {
    pub fn uploads_playlist(&self) -> Option<&str> {
        self.items
            .first()
            .and_then(|item| item.content_details.as_ref())
            .and_then(|details| details.related_playlists.as_ref())
            .and_then(|playlists| playlists.uploads.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_page_with_sparse_items() {
        let body = r#"{
            "kind": "youtube#playlistItemListResponse",
            "nextPageToken": "CAUQAA",
            "items": [
                {"snippet": {"title": "A", "publishedAt": "2024-02-01T10:00:00Z",
                             "resourceId": {"kind": "youtube#video", "videoId": "a1"}}},
                {"id": "no-snippet"}
            ]
        }"#;
        let page: PlaylistItemsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("CAUQAA"));
        assert_eq!(page.items.len(), 2);
        let snippet = page.items[0].snippet.as_ref().unwrap();
        assert_eq!(snippet.description, "");
        assert_eq!(snippet.resource_id.as_ref().unwrap().video_id.as_deref(), Some("a1"));
        assert!(page.items[1].snippet.is_none());
    }

    #[test]
    fn stats_and_channel_accessors() {
        let stats: VideoStatsResponse =
            serde_json::from_str(r#"{"items":[{"statistics":{"viewCount":"42","likeCount":"1"}}]}"#).unwrap();
        assert_eq!(stats.view_count(), Some("42"));

        let empty: VideoStatsResponse = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert_eq!(empty.view_count(), None);

        let channel: ChannelResponse = serde_json::from_str(
            r#"{"items":[{"id":"UC1","contentDetails":{"relatedPlaylists":{"likes":"","uploads":"UU1"}}}]}"#,
        )
        .unwrap();
        assert_eq!(channel.uploads_playlist(), Some("UU1"));

        let none: ChannelResponse = serde_json::from_str(r#"{"pageInfo":{"totalResults":0}}"#).unwrap();
        assert_eq!(none.uploads_playlist(), None);
    }
}
