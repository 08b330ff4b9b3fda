use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, FixedOffset, Local, Utc};
use tempfile::NamedTempFile;

use crate::content::{sort_by_published, Content};
use crate::error::{AnalyserError, Result};

pub const EXPORT_INDICATOR: &str = "export for reporting";
pub const DATE_FORMAT: &str = "%m/%d/%Y";

const BASIC_HEADER: [&str; 4] = ["NAME", "CONTENT TYPE", "EXPORT INDICATOR", "DATE"];
const VIEWS_HEADER: [&str; 5] = ["NAME", "CONTENT TYPE", "EXPORT INDICATOR", "DATE", "VIEWS"];

/// Column layout of a report. Producers declare theirs; the writer never infers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSchema {
    Basic,
    WithViews,
}

impl ReportSchema {
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            ReportSchema::Basic => &BASIC_HEADER,
            ReportSchema::WithViews => &VIEWS_HEADER,
        }
    }

    fn row(&self, content: &Content, date: String) -> Vec<String> {
        let mut row = vec![
            content.title().to_string(),
            content.kind().to_string(),
            EXPORT_INDICATOR.to_string(),
            date,
        ];
        if *self == ReportSchema::WithViews {
            row.push(content.view_count().to_string());
        }
        row
    }
}

pub struct ReportWriter {
    schema: ReportSchema,
    offset: Option<FixedOffset>,
}

impl ReportWriter {
    /// Dates are rendered in the host's local timezone, the same zone the default cutoff uses.
    pub fn new(schema: ReportSchema) -> Self {
        Self { schema, offset: None }
    }

    /// Render dates at a fixed UTC offset instead of the local timezone.
    pub fn with_offset(mut self, offset: Option<FixedOffset>) -> Self {
        self.offset = offset;
        self
    }

    fn date(&self, at: DateTime<Utc>) -> String {
        match self.offset {
            Some(offset) => at.with_timezone(&offset).format(DATE_FORMAT).to_string(),
            None => at.with_timezone(&Local).format(DATE_FORMAT).to_string(),
        }
    }

    /// CSV bytes for `content`, oldest first.
    pub fn render(&self, content: &[Content]) -> io::Result<Vec<u8>> {
        let mut ordered = content.to_vec();
        sort_by_published(&mut ordered);

        let mut csv = csv::Writer::from_writer(Vec::new());
        csv.write_record(self.schema.header())?;
        for item in &ordered {
            csv.write_record(self.schema.row(item, self.date(item.published_at())))?;
        }
        csv.into_inner().map_err(|e| e.into_error())
    }

    /// Replace `destination` with the report. The bytes go to a temporary file in the
    /// same directory first so a failed write never clobbers a previous report.
    pub fn write(&self, content: &[Content], destination: &Path) -> Result<()> {
        let fail = |e: io::Error| AnalyserError::write_failure(destination, e);
        let bytes = self.render(content).map_err(fail)?;
        let dir = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(fail)?;
        tmp.write_all(&bytes).map_err(fail)?;
        tmp.as_file().sync_all().map_err(fail)?;
        tmp.persist(destination).map_err(|e| fail(e.error))?;
        tracing::info!(path = %destination.display(), rows = content.len(), "report written");
        Ok(())
    }
}
