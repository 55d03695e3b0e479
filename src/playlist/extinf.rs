//! `#EXTINF` header attribute extraction and the `|User-Agent=` stream annotation.

use regex::Regex;
use std::sync::OnceLock;

/// Suffix players read to pick the identification string for a stream
pub const USER_AGENT_ANNOTATION: &str = "|User-Agent=";

/// Metadata extracted from a channel header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHeader {
    /// The header line exactly as read from the source
    pub line: String,
    /// Value of `group-title`, empty when absent
    pub group: String,
    /// Text after the attribute section's comma, empty when absent
    pub display_name: String,
}

fn group_title_regex() -> &'static Regex {
    static GROUP_TITLE: OnceLock<Regex> = OnceLock::new();
    GROUP_TITLE.get_or_init(|| {
        Regex::new(r#"(?i)group-title="([^"]*)""#).expect("group-title pattern is valid")
    })
}

/// Parse a header line into its group and display name.
///
/// A header without a `group-title` attribute or a title comma yields empty
/// strings rather than an error; the filter decides what to do with it.
pub fn parse_header(line: &str) -> ChannelHeader {
    ChannelHeader {
        line: line.to_string(),
        group: extract_group(line),
        display_name: extract_display_name(line),
    }
}

pub fn extract_group(line: &str) -> String {
    group_title_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Everything after the first comma that is not inside a quoted attribute value
pub fn extract_display_name(line: &str) -> String {
    let mut in_quotes = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return line[idx + 1..].trim().to_string(),
            _ => {}
        }
    }
    String::new()
}

/// Build a header line for a synthesized channel
pub fn build_header(group: &str, name: &str) -> String {
    format!("#EXTINF:-1 group-title=\"{group}\",{name}")
}

pub fn has_user_agent(stream_line: &str) -> bool {
    stream_line
        .to_ascii_lowercase()
        .contains(&USER_AGENT_ANNOTATION.to_ascii_lowercase())
}

/// Append the user-agent annotation unless the line already carries one
pub fn annotate_user_agent(stream_line: &str, user_agent: Option<&str>) -> String {
    match user_agent {
        Some(ua) if !ua.is_empty() && !has_user_agent(stream_line) => {
            format!("{stream_line}{USER_AGENT_ANNOTATION}{ua}")
        }
        _ => stream_line.to_string(),
    }
}

/// Split a stream line into its bare URL and the annotated user agent, if any.
///
/// Header pairs after `|` follow the `Key=Value&Key=Value` convention.
pub fn split_annotation(stream_line: &str) -> (&str, Option<&str>) {
    let Some((url, headers)) = stream_line.split_once('|') else {
        return (stream_line.trim(), None);
    };

    let user_agent = headers
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("user-agent"))
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty());

    (url.trim(), user_agent)
}
