//! Line kind detection for extended M3U playlists.
//!
//! Only enough of the format is recognised to route lines: channel headers
//! (`#EXTINF`), playable stream references, and everything else.

/// Marker that opens every extended M3U document
pub const PLAYLIST_MARKER: &str = "#EXTM3U";

const HEADER_TOKEN: &str = "#extinf";

/// URI scheme prefixes recognised as playable stream references
const STREAM_SCHEMES: [&str; 6] = [
    "http://", "https://", "rtmp://", "rtsp://", "mms://", "udp://",
];

/// Routing decision for a single playlist line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `#EXTINF` metadata line starting a channel
    Header,
    /// Playable URI belonging to the current channel
    StreamRef,
    /// Stream options, comments, blank lines
    Passthrough,
}

pub fn classify(line: &str) -> LineKind {
    if is_header(line) {
        LineKind::Header
    } else if is_stream_ref(line) {
        LineKind::StreamRef
    } else {
        LineKind::Passthrough
    }
}

pub fn is_header(line: &str) -> bool {
    starts_with_ignore_case(line.trim(), HEADER_TOKEN)
}

pub fn is_stream_ref(line: &str) -> bool {
    let line = line.trim_start();
    STREAM_SCHEMES
        .iter()
        .any(|scheme| starts_with_ignore_case(line, scheme))
}

pub fn is_playlist_marker(line: &str) -> bool {
    starts_with_ignore_case(line.trim(), PLAYLIST_MARKER)
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
