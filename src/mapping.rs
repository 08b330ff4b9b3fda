use chrono::{DateTime, Utc};
use url::Url;

use crate::content::{Content, ContentType};
use crate::error::{AnalyserError, Result};
use crate::podcasts::PodcastEpisode;
use crate::youtube::VideoInfo;

const WATCH_URL: &str = "https://www.youtube.com/watch";

pub fn video_url(video_id: &str) -> Result<Url> {
    Url::parse_with_params(WATCH_URL, &[("v", video_id)])
        .map_err(|e| AnalyserError::unavailable("youtube", format!("bad video id {video_id}: {e}")))
}

pub fn content_from_video(video: &VideoInfo) -> Result<Content> {
    Ok(Content::new(
        video.title.clone(),
        video_url(&video.video_id)?,
        video.published_at,
        ContentType::Video,
        video.view_count,
    ))
}

/// Podbean publish times are epoch seconds; zero or out-of-range values mean "no date".
pub fn episode_published_at(publish_time: Option<i64>) -> Option<DateTime<Utc>> {
    publish_time
        .filter(|secs| *secs > 0)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// `None` when the episode has no publish date or no absolute permalink.
pub fn content_from_episode(episode: &PodcastEpisode) -> Option<Content> {
    let published_at = episode_published_at(episode.publish_time)?;
    let url = episode
        .permalink_url
        .as_deref()
        .and_then(|raw| Url::parse(raw).ok())
        .filter(|u| u.has_host())?;
    Some(Content::new(episode.title.clone(), url, published_at, ContentType::Podcast, 0))
}
