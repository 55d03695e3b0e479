//! Conversion of one-channel-per-line text lists into header/stream line pairs.
//!
//! Accepted line shapes:
//!
//! ```text
//! CCTV-1,http://host/cctv1.m3u8     named channel
//! http://host/anonymous.m3u8         name synthesized as {group}_Channel_{n}
//! 卫视频道,#genre#                    switches the group for following lines
//! ```

use tracing::debug;

use super::classifier::{is_header, is_playlist_marker};
use super::extinf::{annotate_user_agent, build_header};
use crate::config::defaults::DEFAULT_PLAIN_LIST_GROUP;
use crate::utils::url::UrlUtils;

const GENRE_MARKER: &str = "#genre#";
const BYTE_ORDER_MARK: char = '\u{feff}';

/// True when the first non-blank line is neither `#EXTM3U` nor `#EXTINF`
pub fn looks_like_plain_list(document: &str) -> bool {
    document
        .lines()
        .map(|line| line.trim_start_matches(BYTE_ORDER_MARK).trim())
        .find(|line| !line.is_empty())
        .is_some_and(|first| !is_playlist_marker(first) && !is_header(first))
}

/// Group used for channels of a plain list fetched from `source_url`
pub fn derive_group(source_url: &str) -> String {
    UrlUtils::file_stem(source_url).unwrap_or_else(|| DEFAULT_PLAIN_LIST_GROUP.to_string())
}

/// Convert a plain list into alternating header and stream lines.
///
/// The returned lines do not include the `#EXTM3U` marker.
pub fn adapt(document: &str, source_url: &str, default_ua: Option<&str>) -> Vec<String> {
    let source_group = derive_group(source_url);
    let mut group = source_group.clone();
    let mut lines = Vec::new();
    let mut position = 0usize;

    for raw in document.lines() {
        let line = raw.trim_start_matches(BYTE_ORDER_MARK).trim();
        if line.is_empty() {
            continue;
        }
        position += 1;

        let (name, url) = match line.split_once(',') {
            Some((name, url)) => (name.trim(), url.trim()),
            None => ("", line),
        };

        if url.eq_ignore_ascii_case(GENRE_MARKER) {
            group = if name.is_empty() {
                source_group.clone()
            } else {
                name.to_string()
            };
            continue;
        }

        if url.is_empty() {
            debug!("Skipping plain-list line {} without url", position);
            continue;
        }

        let name = if name.is_empty() {
            format!("{group}_Channel_{position}")
        } else {
            name.to_string()
        };

        lines.push(build_header(&group, &name));
        lines.push(annotate_user_agent(url, default_ua));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_plain_list() {
        assert!(looks_like_plain_list("\n\nhttp://x/1\n"));
        assert!(looks_like_plain_list("CNN,http://x/1"));
        assert!(!looks_like_plain_list("#EXTM3U\n#EXTINF:-1,CNN\nhttp://x/1"));
        assert!(!looks_like_plain_list("\u{feff}#EXTM3U\n"));
        assert!(!looks_like_plain_list("  #EXTINF:-1,CNN\nhttp://x/1"));
        assert!(!looks_like_plain_list("   \n"));
    }

    #[test]
    fn test_unnamed_line_gets_synthesized_name() {
        let lines = adapt("http://x/3", "https://host/path/myfile.txt", None);
        assert_eq!(
            lines,
            vec![
                "#EXTINF:-1 group-title=\"myfile\",myfile_Channel_1".to_string(),
                "http://x/3".to_string(),
            ]
        );
    }

    #[test]
    fn test_named_lines_split_on_first_comma() {
        let lines = adapt(
            "CNN,http://x/1?a=1,2\n\nBBC , http://x/2\n",
            "https://host/news.txt",
            None,
        );
        assert_eq!(
            lines,
            vec![
                "#EXTINF:-1 group-title=\"news\",CNN",
                "http://x/1?a=1,2",
                "#EXTINF:-1 group-title=\"news\",BBC",
                "http://x/2",
            ]
        );
    }

    #[test]
    fn test_index_counts_non_blank_lines() {
        let lines = adapt("CNN,http://x/1\n\nhttp://x/2", "https://host/a.txt", None);
        assert_eq!(lines[2], "#EXTINF:-1 group-title=\"a\",a_Channel_2");
    }

    #[test]
    fn test_empty_urls_are_skipped() {
        let lines = adapt("Broken,\nCNN,http://x/1", "https://host/a.txt", None);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "#EXTINF:-1 group-title=\"a\",CNN");
    }

    #[test]
    fn test_group_falls_back_when_url_has_no_file_name() {
        let lines = adapt("http://x/1", "https://host/", None);
        assert_eq!(lines[0], "#EXTINF:-1 group-title=\"Plain\",Plain_Channel_1");
    }

    #[test]
    fn test_genre_lines_switch_group() {
        let lines = adapt(
            "央视,#genre#\nCCTV-1,http://x/1\n卫视,#genre#\nhttp://x/2",
            "https://host/cn.txt",
            None,
        );
        assert_eq!(
            lines,
            vec![
                "#EXTINF:-1 group-title=\"央视\",CCTV-1",
                "http://x/1",
                "#EXTINF:-1 group-title=\"卫视\",卫视_Channel_4",
                "http://x/2",
            ]
        );
    }

    #[test]
    fn test_default_user_agent_is_annotated() {
        let lines = adapt(
            "A,http://x/1\nB,http://x/2|User-Agent=Foo",
            "https://host/a.txt",
            Some("Mozilla/5.0"),
        );
        assert_eq!(lines[1], "http://x/1|User-Agent=Mozilla/5.0");
        assert_eq!(lines[3], "http://x/2|User-Agent=Foo");
    }
}
