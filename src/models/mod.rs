//! Data types shared by the playlist pipeline and the run log.

use serde::Serialize;

use crate::playlist::classifier::{LineKind, classify};
use crate::playlist::extinf::ChannelHeader;

/// One playlist entry: its header line plus the body lines that follow it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSegment {
    pub header: ChannelHeader,
    pub body: Vec<String>,
}

impl ChannelSegment {
    pub fn new(header: ChannelHeader) -> Self {
        Self {
            header,
            body: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.header.display_name
    }

    /// Stream reference lines of the body, in order
    pub fn stream_refs(&self) -> impl Iterator<Item = &str> {
        self.body
            .iter()
            .map(String::as_str)
            .filter(|line| classify(line) == LineKind::StreamRef)
    }

    /// Header line followed by the body
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.header.line.as_str()).chain(self.body.iter().map(String::as_str))
    }
}

/// A retained stream whose reachability probe failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamCheckFailure {
    pub channel_name: String,
    pub url: String,
}

impl std::fmt::Display for StreamCheckFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.channel_name, self.url)
    }
}

/// Result of scanning one source document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledSource {
    /// Retained channels in flush order
    pub segments: Vec<ChannelSegment>,
    /// Failed stream checks in the order they ran
    pub failures: Vec<StreamCheckFailure>,
}

impl AssembledSource {
    pub fn retained_names(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn lines(&self) -> Vec<String> {
        self.segments
            .iter()
            .flat_map(ChannelSegment::lines)
            .map(str::to_string)
            .collect()
    }
}

/// How a source's document was obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    Fetched { plain_list: bool },
    Failed { message: String },
}

/// Per-source echo written to the run log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub label: String,
    pub url: String,
    pub user_agent: Option<String>,
    pub filters: String,
    pub status: SourceStatus,
    pub retained_channels: usize,
    pub failed_checks: usize,
}

/// Counts and identities gathered over a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Number of channel flushes across all sources
    pub retained_channels: usize,
    pub retained_names: Vec<String>,
    pub failures: Vec<StreamCheckFailure>,
    /// Channel count after merging, when merging is enabled
    pub merged_channels: Option<usize>,
    pub sources: Vec<SourceReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::extinf::parse_header;

    #[test]
    fn test_segment_lines_start_with_header() {
        let mut segment = ChannelSegment::new(parse_header("#EXTINF:-1,CNN"));
        segment.body.push("#EXTVLCOPT:http-referrer=http://r".to_string());
        segment.body.push("http://x/1".to_string());

        let lines: Vec<_> = segment.lines().collect();
        assert_eq!(
            lines,
            vec!["#EXTINF:-1,CNN", "#EXTVLCOPT:http-referrer=http://r", "http://x/1"]
        );
        assert_eq!(segment.stream_refs().collect::<Vec<_>>(), vec!["http://x/1"]);
    }

    #[test]
    fn test_failure_display() {
        let failure = StreamCheckFailure {
            channel_name: "CNN".to_string(),
            url: "http://x/1".to_string(),
        };
        assert_eq!(failure.to_string(), "CNN: http://x/1");
    }
}
