//! Aggregates content (videos, podcast episodes) published after a cutoff across
//! platform feeds and writes one CSV report per feed.

pub mod aggregator;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod mapping;
pub mod podcasts;
pub mod producer;
pub mod report;
pub mod youtube;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::aggregator::{Aggregator, ProducerFailure, RunSummary};
    pub use crate::config::{Config, ProducerConfig, ProducerKind};
    pub use crate::content::{Content, ContentType};
    pub use crate::error::{AnalyserError, Result};
    pub use crate::http::{HttpTransport, ReqwestTransport};
    pub use crate::podcasts::{PodbeanClient, PodcastProducer};
    pub use crate::producer::{ContentProducer, Producer};
    pub use crate::report::{ReportSchema, ReportWriter};
    pub use crate::youtube::{ChannelProducer, PlaylistProducer, VideoInfo, YoutubeClient};
}
