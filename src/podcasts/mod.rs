mod client;

pub use client::{PodbeanClient, PodcastEpisode, DEFAULT_API_BASE, PAGE_SIZE};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::content::Content;
use crate::error::Result;
use crate::mapping::content_from_episode;
use crate::producer::ContentProducer;
use crate::report::ReportSchema;

/// Episodes of the Podbean podcast the credentials belong to. Podbean exposes no
/// play counts through this listing, so the report carries no views column.
pub struct PodcastProducer {
    name: String,
    client: Arc<PodbeanClient>,
}

impl PodcastProducer {
    pub fn new(name: impl Into<String>, client: Arc<PodbeanClient>) -> Self {
        Self { name: name.into(), client }
    }
}

#[async_trait]
impl ContentProducer for PodcastProducer {
    fn name(&self) -> &str { &self.name }
    fn schema(&self) -> ReportSchema { ReportSchema::Basic }

    async fn content_from(&self, cutoff: DateTime<Utc>) -> Result<Vec<Content>> {
        let episodes = self.client.all_episodes().await?;
        let mut content = Vec::with_capacity(episodes.len());
        for episode in &episodes {
            match content_from_episode(episode) {
                Some(c) if c.is_after(cutoff) => content.push(c),
                Some(_) => {}
                None => tracing::warn!(episode = %episode.id, title = %episode.title, "episode without publish date or permalink, skipping"),
            }
        }
        Ok(content)
    }
}
