//! Final document composition and run summary bookkeeping.

use super::classifier::PLAYLIST_MARKER;
use super::dedupe::dedupe;
use crate::models::{AssembledSource, ChannelSegment, RunSummary, SourceReport};

/// Prefix the playlist marker unless the first line already is it
pub fn compose<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut lines = lines.into_iter().map(Into::into).peekable();
    let mut document = Vec::new();
    if lines.peek().is_none_or(|first| first.trim() != PLAYLIST_MARKER) {
        document.push(PLAYLIST_MARKER.to_string());
    }
    document.extend(lines);
    document
}

/// Join document lines; no trailing newline is added
pub fn render(lines: &[String]) -> String {
    lines.join("\n")
}

/// Accumulates per-source results in configured source order
#[derive(Debug, Default)]
pub struct OutputComposer {
    segments: Vec<ChannelSegment>,
    summary: RunSummary,
}

/// Finished playlist plus the summary that goes to the run log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedOutput {
    pub lines: Vec<String>,
    pub summary: RunSummary,
}

impl OutputComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, report: SourceReport, assembled: AssembledSource) {
        self.summary.retained_channels += assembled.segments.len();
        self.summary.retained_names.extend(assembled.retained_names());
        self.summary.failures.extend(assembled.failures);
        self.summary.sources.push(report);
        self.segments.extend(assembled.segments);
    }

    /// Build the document; `merge_max_streams` enables same-name merging
    pub fn finish(self, merge_max_streams: Option<usize>) -> ComposedOutput {
        let Self {
            segments,
            mut summary,
        } = self;

        let segments = match merge_max_streams {
            Some(max_streams) => {
                let merged = dedupe(segments, max_streams);
                summary.merged_channels = Some(merged.len());
                merged
            }
            None => segments,
        };

        let lines = compose(
            segments
                .iter()
                .flat_map(ChannelSegment::lines)
                .map(str::to_string),
        );

        ComposedOutput { lines, summary }
    }
}
