mod client;
mod types;

pub use client::{VideoInfo, YoutubeClient, DEFAULT_API_BASE, PAGE_SIZE};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::content::Content;
use crate::error::Result;
use crate::mapping::content_from_video;
use crate::producer::ContentProducer;
use crate::report::ReportSchema;

/// Every upload of one channel, addressed by channel id or `@handle`.
pub struct ChannelProducer {
    name: String,
    client: Arc<YoutubeClient>,
    channel: String,
}

impl ChannelProducer {
    pub fn new(name: impl Into<String>, client: Arc<YoutubeClient>, channel: impl Into<String>) -> Self {
        Self { name: name.into(), client, channel: channel.into() }
    }
}

#[async_trait]
impl ContentProducer for ChannelProducer {
    fn name(&self) -> &str { &self.name }
    fn schema(&self) -> ReportSchema { ReportSchema::WithViews }

    async fn content_from(&self, cutoff: DateTime<Utc>) -> Result<Vec<Content>> {
        let videos = self.client.videos_by_channel(&self.channel).await?;
        videos_after(&videos, cutoff)
    }
}

/// Every entry of one playlist.
pub struct PlaylistProducer {
    name: String,
    client: Arc<YoutubeClient>,
    playlist_id: String,
}

impl PlaylistProducer {
    pub fn new(name: impl Into<String>, client: Arc<YoutubeClient>, playlist_id: impl Into<String>) -> Self {
        Self { name: name.into(), client, playlist_id: playlist_id.into() }
    }
}

#[async_trait]
impl ContentProducer for PlaylistProducer {
    fn name(&self) -> &str { &self.name }
    fn schema(&self) -> ReportSchema { ReportSchema::WithViews }

    async fn content_from(&self, cutoff: DateTime<Utc>) -> Result<Vec<Content>> {
        let videos = self.client.videos_from_playlist(&self.playlist_id).await?;
        videos_after(&videos, cutoff)
    }
}

fn videos_after(videos: &[VideoInfo], cutoff: DateTime<Utc>) -> Result<Vec<Content>> {
    videos
        .iter()
        .filter(|v| v.published_at > cutoff)
        .map(content_from_video)
        .collect()
}
