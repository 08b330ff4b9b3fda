use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::content::Content;
use crate::error::Result;
use crate::podcasts::PodcastProducer;
use crate::report::ReportSchema;
use crate::youtube::{ChannelProducer, PlaylistProducer};

/// A single platform feed that can list its content.
///
/// `content_from` returns only content published strictly after `cutoff`. An empty
/// list is a valid answer; unreachable platforms and invalid payloads are errors.
#[async_trait]
pub trait ContentProducer: Send + Sync {
    /// Registry name, also the stem of the report file.
    fn name(&self) -> &str;

    fn schema(&self) -> ReportSchema;

    async fn content_from(&self, cutoff: DateTime<Utc>) -> Result<Vec<Content>>;
}

/// The closed set of producers a run can be configured with.
pub enum Producer {
    Channel(ChannelProducer),
    Playlist(PlaylistProducer),
    Podcast(PodcastProducer),
}

impl Producer {
    fn inner(&self) -> &dyn ContentProducer {
        match self {
            Producer::Channel(p) => p,
            Producer::Playlist(p) => p,
            Producer::Podcast(p) => p,
        }
    }
}

#[async_trait]
impl ContentProducer for Producer {
    fn name(&self) -> &str { self.inner().name() }
    fn schema(&self) -> ReportSchema { self.inner().schema() }

    async fn content_from(&self, cutoff: DateTime<Utc>) -> Result<Vec<Content>> {
        self.inner().content_from(cutoff).await
    }
}

impl From<ChannelProducer> for Producer {
    fn from(p: ChannelProducer) -> Self { Producer::Channel(p) }
}

impl From<PlaylistProducer> for Producer {
    fn from(p: PlaylistProducer) -> Self { Producer::Playlist(p) }
}

impl From<PodcastProducer> for Producer {
    fn from(p: PodcastProducer) -> Self { Producer::Podcast(p) }
}
