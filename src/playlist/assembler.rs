//! Channel assembly: the line-by-line scan that groups a playlist into
//! channel segments and keeps the ones the filters accept.
//!
//! The scanner holds one piece of state, the channel currently being
//! collected. A header line flushes the previous retained channel and decides
//! the fate of the next one; body lines are buffered only while inside a
//! retained channel. Lines seen before the first header cannot be attributed
//! to any channel and are dropped.

use tracing::{debug, trace, warn};

use super::classifier::{LineKind, classify};
use super::extinf::{annotate_user_agent, parse_header, split_annotation};
use super::filter::FilterSet;
use crate::models::{AssembledSource, ChannelSegment, StreamCheckFailure};
use crate::services::stream_checker::StreamChecker;
use crate::utils::url::UrlUtils;

/// Scanner position relative to channel boundaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    /// Before the first header, or inside a dropped channel
    Outside,
    /// Inside a channel that passed the filters
    Retained(ChannelSegment),
}

pub struct ChannelAssembler<'a> {
    filters: &'a FilterSet,
    default_ua: Option<&'a str>,
    checker: Option<&'a dyn StreamChecker>,
    state: ScanState,
    output: AssembledSource,
}

impl<'a> ChannelAssembler<'a> {
    /// `checker` enables reachability probing of retained streams
    pub fn new(
        filters: &'a FilterSet,
        default_ua: Option<&'a str>,
        checker: Option<&'a dyn StreamChecker>,
    ) -> Self {
        Self {
            filters,
            default_ua: default_ua.filter(|ua| !ua.is_empty()),
            checker,
            state: ScanState::Outside,
            output: AssembledSource::default(),
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Channels flushed so far
    pub fn flushed(&self) -> &[ChannelSegment] {
        &self.output.segments
    }

    /// Advance the scan by one line without reachability checks
    pub fn feed_line(&mut self, line: &str) {
        match classify(line) {
            LineKind::Header => self.start_channel(line),
            LineKind::StreamRef => self.push_stream_ref(line),
            LineKind::Passthrough => self.push_passthrough(line),
        }
    }

    /// Advance the scan by one line, probing retained streams first when a
    /// checker is configured
    pub async fn push_line(&mut self, line: &str) {
        if let Some(checker) = self.checker
            && let ScanState::Retained(segment) = &self.state
            && classify(line) == LineKind::StreamRef
        {
            let stream = line.trim();
            let (url, annotated_ua) = split_annotation(stream);
            if !checker.check(url, annotated_ua.or(self.default_ua)).await {
                warn!(
                    "Stream check failed for '{}': {}",
                    segment.name(),
                    UrlUtils::obfuscate_credentials(url)
                );
                self.output.failures.push(StreamCheckFailure {
                    channel_name: segment.name().to_string(),
                    url: stream.to_string(),
                });
            }
        }
        self.feed_line(line);
    }

    /// Flush the last channel and return everything retained
    pub fn finish(mut self) -> AssembledSource {
        self.flush();
        self.output
    }

    fn start_channel(&mut self, line: &str) {
        self.flush();

        let header = parse_header(line);
        if self.filters.should_keep(&header.group, &header.display_name) {
            trace!(
                "Keeping channel '{}' (group '{}')",
                header.display_name, header.group
            );
            self.state = ScanState::Retained(ChannelSegment::new(header));
        } else {
            trace!(
                "Dropping channel '{}' (group '{}')",
                header.display_name, header.group
            );
        }
    }

    fn push_stream_ref(&mut self, line: &str) {
        if let ScanState::Retained(segment) = &mut self.state {
            segment.body.push(annotate_user_agent(line.trim(), self.default_ua));
        }
    }

    fn push_passthrough(&mut self, line: &str) {
        if let ScanState::Retained(segment) = &mut self.state {
            segment.body.push(line.to_string());
        }
    }

    fn flush(&mut self) {
        if let ScanState::Retained(segment) = std::mem::replace(&mut self.state, ScanState::Outside) {
            debug!(
                "Retained channel '{}' with {} body line(s)",
                segment.name(),
                segment.body.len()
            );
            self.output.segments.push(segment);
        }
    }
}

/// Run the assembler over a complete line sequence
pub async fn assemble<I, S>(
    lines: I,
    filters: &FilterSet,
    default_ua: Option<&str>,
    checker: Option<&dyn StreamChecker>,
) -> AssembledSource
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut assembler = ChannelAssembler::new(filters, default_ua, checker);
    for line in lines {
        assembler.push_line(line.as_ref()).await;
    }
    assembler.finish()
}
