//! Aggregation of every configured source into one playlist
//!
//! Source documents are fetched concurrently, then scanned strictly in
//! configured order so the merged playlist is reproducible between runs. A
//! source that cannot be fetched contributes no channels and does not stop
//! the run.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{Config, SourceConfig};
use crate::errors::{AppResult, SourceResult};
use crate::models::{AssembledSource, SourceReport, SourceStatus};
use crate::playlist::plain_list::{adapt, looks_like_plain_list};
use crate::playlist::{ComposedOutput, OutputComposer, PLAYLIST_MARKER, assemble};
use crate::services::stream_checker::{HttpStreamChecker, StreamChecker};
use crate::sources::{HttpPlaylistFetcher, PlaylistFetcher};
use crate::utils::url::UrlUtils;

pub struct PlaylistAggregator {
    fetcher: Arc<dyn PlaylistFetcher>,
    checker: Option<Arc<dyn StreamChecker>>,
    merge_max_streams: Option<usize>,
}

impl PlaylistAggregator {
    pub fn new(fetcher: Arc<dyn PlaylistFetcher>) -> Self {
        Self {
            fetcher,
            checker: None,
            merge_max_streams: None,
        }
    }

    /// Probe every retained stream with `checker`
    pub fn with_checker(mut self, checker: Arc<dyn StreamChecker>) -> Self {
        self.checker = Some(checker);
        self
    }

    /// Merge same-named channels, keeping at most `max_streams` streams each
    pub fn with_merge(mut self, max_streams: usize) -> Self {
        self.merge_max_streams = Some(max_streams);
        self
    }

    /// Build the HTTP-backed aggregator described by `config`
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let fetcher = Arc::new(HttpPlaylistFetcher::new(config.fetch_timeout)?);
        let mut aggregator = Self::new(fetcher);

        if config.check_urls {
            let checker = HttpStreamChecker::new(config.check_timeout)?;
            aggregator = aggregator.with_checker(Arc::new(checker));
        }
        if config.merge_similar_channels {
            aggregator = aggregator.with_merge(config.max_streams_per_channel);
        }

        Ok(aggregator)
    }

    pub async fn run(&self, sources: &[SourceConfig]) -> ComposedOutput {
        info!(
            "Processing {} source(s) (stream checks: {}, merge: {})",
            sources.len(),
            self.checker.is_some(),
            self.merge_max_streams.is_some()
        );

        let documents = join_all(
            sources
                .iter()
                .map(|source| self.fetcher.fetch(&source.url, source.default_user_agent())),
        )
        .await;

        let mut composer = OutputComposer::new();
        for (source, document) in sources.iter().zip(documents) {
            let (report, assembled) = self.process_source(source, document).await;
            composer.add_source(report, assembled);
        }

        let output = composer.finish(self.merge_max_streams);
        info!(
            "Run complete: {} channel(s) retained, {} failed stream check(s)",
            output.summary.retained_channels,
            output.summary.failures.len()
        );
        output
    }

    /// Scan one fetched document, or record why it could not be fetched
    pub async fn process_source(
        &self,
        source: &SourceConfig,
        document: SourceResult<String>,
    ) -> (SourceReport, AssembledSource) {
        let filters = source.filter_set();
        let user_agent = source.default_user_agent();
        let label = UrlUtils::obfuscate_credentials(source.label());

        let mut report = SourceReport {
            label: label.clone(),
            url: UrlUtils::obfuscate_credentials(&source.url),
            user_agent: user_agent.map(str::to_string),
            filters: source.describe_filters(),
            status: SourceStatus::Fetched { plain_list: false },
            retained_channels: 0,
            failed_checks: 0,
        };

        let content = match document {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping source '{}': {}", label, e);
                report.status = SourceStatus::Failed {
                    message: e.to_string(),
                };
                return (report, AssembledSource::default());
            }
        };

        let plain_list = looks_like_plain_list(&content);
        let checker = self.checker.as_deref();
        let assembled = if plain_list {
            info!("Source '{}' is a plain list, converting to M3U", label);
            let lines = std::iter::once(PLAYLIST_MARKER.to_string())
                .chain(adapt(&content, &source.url, user_agent));
            assemble(lines, &filters, user_agent, checker).await
        } else {
            assemble(content.lines(), &filters, user_agent, checker).await
        };

        info!(
            "Source '{}': {} channel(s) retained, {} failed stream check(s)",
            label,
            assembled.segments.len(),
            assembled.failures.len()
        );

        report.status = SourceStatus::Fetched { plain_list };
        report.retained_channels = assembled.segments.len();
        report.failed_checks = assembled.failures.len();
        (report, assembled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SourceError;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Serves canned documents; unknown urls answer 404
    struct FakeFetcher {
        documents: HashMap<String, String>,
    }

    impl FakeFetcher {
        fn new(documents: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                documents: documents
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
            })
        }
    }

    #[async_trait]
    impl PlaylistFetcher for FakeFetcher {
        async fn fetch(&self, url: &str, _user_agent: Option<&str>) -> SourceResult<String> {
            self.documents
                .get(url)
                .cloned()
                .ok_or_else(|| SourceError::Http {
                    status: 404,
                    url: url.to_string(),
                })
        }
    }

    fn source(url: &str) -> SourceConfig {
        SourceConfig {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_failed_source_does_not_affect_others() {
        let fetcher = FakeFetcher::new(&[
            ("http://a/list.m3u", "#EXTM3U\n#EXTINF:-1,A\nhttp://a/1"),
            ("http://c/list.m3u", "#EXTM3U\n#EXTINF:-1,C\nhttp://c/1"),
        ]);
        let aggregator = PlaylistAggregator::new(fetcher);

        let output = aggregator
            .run(&[
                source("http://a/list.m3u"),
                source("http://missing/list.m3u"),
                source("http://c/list.m3u"),
            ])
            .await;

        assert_eq!(
            output.lines,
            vec!["#EXTM3U", "#EXTINF:-1,A", "http://a/1", "#EXTINF:-1,C", "http://c/1"]
        );
        assert_eq!(output.summary.sources.len(), 3);
        assert!(matches!(
            output.summary.sources[1].status,
            SourceStatus::Failed { .. }
        ));
        assert_eq!(output.summary.sources[2].retained_channels, 1);
    }

    #[tokio::test]
    async fn test_plain_list_source_is_adapted() {
        let fetcher = FakeFetcher::new(&[("https://host/path/myfile.txt", "http://x/3\n")]);
        let aggregator = PlaylistAggregator::new(fetcher);

        let mut config = source("https://host/path/myfile.txt");
        config.user_agents = vec!["Mozilla/5.0".to_string()];
        let output = aggregator.run(&[config]).await;

        assert_eq!(
            output.lines,
            vec![
                "#EXTM3U",
                "#EXTINF:-1 group-title=\"myfile\",myfile_Channel_1",
                "http://x/3|User-Agent=Mozilla/5.0",
            ]
        );
        assert_eq!(
            output.summary.sources[0].status,
            SourceStatus::Fetched { plain_list: true }
        );
    }

    #[tokio::test]
    async fn test_filters_apply_to_plain_lists() {
        let fetcher = FakeFetcher::new(&[(
            "https://host/cn.txt",
            "CCTV-1,http://x/1\nPhoenix,http://x/2",
        )]);
        let aggregator = PlaylistAggregator::new(fetcher);

        let mut config = source("https://host/cn.txt");
        config.keywords = vec!["cctv".to_string()];
        let output = aggregator.run(&[config]).await;

        assert_eq!(output.summary.retained_names, vec!["CCTV-1"]);
        assert_eq!(
            output.summary.sources[0].filters,
            "groups=[] channels=[] keywords=[cctv]"
        );
    }

    #[tokio::test]
    async fn test_report_echoes_filters_as_configured() {
        let fetcher = FakeFetcher::new(&[(
            "http://a/list.m3u",
            "#EXTM3U\n#EXTINF:-1 group-title=\"NEWS\",CNN\nhttp://a/1",
        )]);
        let aggregator = PlaylistAggregator::new(fetcher);

        let mut config = source("http://a/list.m3u");
        config.groups = vec!["News".to_string(), "Straße".to_string()];
        let output = aggregator.run(&[config]).await;

        assert_eq!(output.summary.retained_names, vec!["CNN"]);
        assert_eq!(
            output.summary.sources[0].filters,
            "groups=[News, Straße] channels=[] keywords=[]"
        );
    }

    #[tokio::test]
    async fn test_merge_across_sources() {
        let fetcher = FakeFetcher::new(&[
            ("http://a/list.m3u", "#EXTM3U\n#EXTINF:-1,CCTV1\nhttp://a/stream_480p.m3u8"),
            ("http://b/list.m3u", "#EXTM3U\n#EXTINF:-1,CCTV1\nhttp://b/stream_1080p.m3u8"),
        ]);
        let aggregator = PlaylistAggregator::new(fetcher).with_merge(3);

        let output = aggregator
            .run(&[source("http://a/list.m3u"), source("http://b/list.m3u")])
            .await;

        assert_eq!(
            output.lines,
            vec![
                "#EXTM3U",
                "#EXTINF:-1,CCTV1",
                "http://b/stream_1080p.m3u8",
                "http://a/stream_480p.m3u8",
            ]
        );
        assert_eq!(output.summary.merged_channels, Some(1));
    }
}
