//! Merging of same-named channels with resolution-ranked streams.

use regex::Regex;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::extinf::split_annotation;
use crate::models::ChannelSegment;

fn resolution_regex() -> &'static Regex {
    static RESOLUTION: OnceLock<Regex> = OnceLock::new();
    RESOLUTION.get_or_init(|| Regex::new(r"(\d{3,4})[pi]").expect("resolution pattern is valid"))
}

/// Resolution hint such as `1080` in `stream_1080p.m3u8`, `0` when absent
pub fn extract_resolution(text: &str) -> u32 {
    resolution_regex()
        .captures(&text.to_lowercase())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Merge segments sharing a display name.
///
/// The first segment seen for a name supplies the header; the streams of all
/// members are ranked by resolution (stable on ties) and cut to `max_streams`.
/// Passthrough lines are not carried into merged segments. Channels without a
/// display name are never merged with each other.
pub fn dedupe(segments: Vec<ChannelSegment>, max_streams: usize) -> Vec<ChannelSegment> {
    let mut merged: Vec<ChannelSegment> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for segment in segments {
        let streams: Vec<String> = segment.stream_refs().map(str::to_string).collect();

        let slot = if segment.name().is_empty() {
            None
        } else {
            index_by_name.get(segment.name()).copied()
        };

        match slot {
            Some(index) => {
                let target = &mut merged[index];
                for stream in streams {
                    if !target.body.contains(&stream) {
                        target.body.push(stream);
                    }
                }
            }
            None => {
                if !segment.name().is_empty() {
                    index_by_name.insert(segment.name().to_string(), merged.len());
                }
                let mut representative = ChannelSegment::new(segment.header);
                for stream in streams {
                    if !representative.body.contains(&stream) {
                        representative.body.push(stream);
                    }
                }
                merged.push(representative);
            }
        }
    }

    for segment in &mut merged {
        rank_streams(&mut segment.body, max_streams);
    }
    merged
}

/// Sort by resolution hint, highest first, keeping at most `max_streams`
pub fn rank_streams(streams: &mut Vec<String>, max_streams: usize) {
    streams.sort_by_key(|stream| Reverse(extract_resolution(split_annotation(stream).0)));
    streams.truncate(max_streams);
}
