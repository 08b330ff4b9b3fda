use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use url::Url;

use crate::config::{Config, ProducerKind};
use crate::error::{AnalyserError, Result};
use crate::http::HttpTransport;
use crate::podcasts::{PodbeanClient, PodcastProducer};
use crate::producer::{ContentProducer, Producer};
use crate::report::ReportWriter;
use crate::youtube::{ChannelProducer, PlaylistProducer, YoutubeClient};

/// A producer that could not deliver its report.
#[derive(Debug)]
pub struct ProducerFailure {
    pub producer: String,
    pub error: AnalyserError,
}

#[derive(Debug)]
pub struct RunSummary {
    pub cutoff: DateTime<Utc>,
    pub written: Vec<PathBuf>,
    pub failed: Vec<ProducerFailure>,
}

impl RunSummary {
    pub fn is_complete(&self) -> bool { self.failed.is_empty() }
}

/// Aggregator owns the registered producers and writes one report per producer.
pub struct Aggregator {
    producers: Vec<Producer>,
    output_dir: PathBuf,
    offset: Option<FixedOffset>,
}

impl Aggregator {
    pub fn new(producers: Vec<Producer>, output_dir: impl Into<PathBuf>) -> Self {
        Self { producers, output_dir: output_dir.into(), offset: None }
    }

    /// Use a fixed UTC offset instead of the local timezone, for both the default
    /// cutoff and the dates written to reports.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Build the producer registry described by `config`, sharing one client per platform.
    pub fn from_config(config: &Config, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        let mut youtube: Option<Arc<YoutubeClient>> = None;
        let mut podbean: Option<Arc<PodbeanClient>> = None;
        let mut names = HashSet::new();
        let mut producers = Vec::new();

        for pc in config.producer_configs() {
            if !names.insert(pc.name.clone()) {
                return Err(AnalyserError::Config(format!("duplicate producer name '{}'", pc.name)));
            }
            let producer: Producer = match pc.kind {
                ProducerKind::YoutubeChannel => {
                    let client = youtube_client(config, &transport, &mut youtube)?;
                    ChannelProducer::new(&pc.name, client, pc.feed_id()?).into()
                }
                ProducerKind::YoutubePlaylist => {
                    let client = youtube_client(config, &transport, &mut youtube)?;
                    PlaylistProducer::new(&pc.name, client, pc.feed_id()?).into()
                }
                ProducerKind::Podbean => {
                    let client = podbean_client(config, &transport, &mut podbean)?;
                    PodcastProducer::new(&pc.name, client).into()
                }
            };
            producers.push(producer);
        }
        Ok(Self::new(producers, config.output_dir()))
    }

    pub fn output_dir(&self) -> &Path { &self.output_dir }

    pub fn producer_names(&self) -> Vec<&str> {
        self.producers.iter().map(|p| p.name()).collect()
    }

    /// Keep only the named producers. Unknown names are a configuration error.
    pub fn retain_named(&mut self, names: &[String]) -> Result<()> {
        if let Some(unknown) = names.iter().find(|n| !self.producers.iter().any(|p| p.name() == n.as_str())) {
            return Err(AnalyserError::Config(format!("no producer named '{unknown}'")));
        }
        self.producers.retain(|p| names.iter().any(|n| n == p.name()));
        Ok(())
    }

    /// Run every producer against the start of the current year.
    pub async fn run(&self) -> Result<RunSummary> {
        let cutoff = match self.offset {
            Some(offset) => beginning_of_year(&Utc::now().with_timezone(&offset)),
            None => beginning_of_year(&Local::now()),
        };
        self.run_with_cutoff(cutoff).await
    }

    /// Producers run one after another. A producer that fails is recorded and
    /// skipped; only report write failures end the run.
    pub async fn run_with_cutoff(&self, cutoff: DateTime<Utc>) -> Result<RunSummary> {
        let dir = &self.output_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AnalyserError::write_failure(dir, e))?;
        if !tokio::fs::metadata(dir).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Err(AnalyserError::write_failure(dir, missing("output directory does not exist")));
        }

        let mut written = Vec::with_capacity(self.producers.len());
        let mut failed = Vec::new();
        for producer in &self.producers {
            let name = producer.name();
            tracing::info!(producer = name, %cutoff, "collecting content");
            let content = match producer.content_from(cutoff).await {
                Ok(content) => content,
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    tracing::error!(producer = name, %error, "producer failed, skipping its report");
                    failed.push(ProducerFailure { producer: name.to_string(), error });
                    continue;
                }
            };

            let path = dir.join(format!("{name}.csv"));
            ReportWriter::new(producer.schema())
                .with_offset(self.offset)
                .write(&content, &path)?;
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Err(AnalyserError::write_failure(&path, missing("report missing after write")));
            }
            tracing::info!(producer = name, items = content.len(), path = %path.display(), "producer done");
            written.push(path);
        }

        Ok(RunSummary { cutoff, written, failed })
    }
}

/// Midnight on January 1st of `now`'s year, in `now`'s timezone.
pub fn beginning_of_year<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let midnight = NaiveDate::from_yo_opt(now.year(), 1)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

fn missing(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, msg.to_string())
}

fn api_base(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| AnalyserError::Config(format!("invalid api base '{raw}': {e}")))
}

fn youtube_client(
    config: &Config,
    transport: &Arc<dyn HttpTransport>,
    slot: &mut Option<Arc<YoutubeClient>>,
) -> Result<Arc<YoutubeClient>> {
    if let Some(client) = slot {
        return Ok(client.clone());
    }
    let key = config
        .youtube_api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| AnalyserError::Config("a YouTube producer needs youtube_api_key".into()))?;
    let client = Arc::new(YoutubeClient::new(
        transport.clone(),
        key,
        api_base(&config.youtube_api_base)?,
        config.max_pages,
    ));
    *slot = Some(client.clone());
    Ok(client)
}

fn podbean_client(
    config: &Config,
    transport: &Arc<dyn HttpTransport>,
    slot: &mut Option<Arc<PodbeanClient>>,
) -> Result<Arc<PodbeanClient>> {
    if let Some(client) = slot {
        return Ok(client.clone());
    }
    let (id, secret) = config
        .podbean_credentials()
        .ok_or_else(|| AnalyserError::Config("a Podbean producer needs podbean_client_id and podbean_client_secret".into()))?;
    let client = Arc::new(PodbeanClient::new(
        transport.clone(),
        id,
        secret,
        api_base(&config.podbean_api_base)?,
        config.max_pages,
    ));
    *slot = Some(client.clone());
    Ok(client)
}
