use crate::{
    domain::{DisplayRegion, GifSource, SearchQuery},
    errors::FetchError,
    models::GifResultSet,
    regions::{render_gifs_if_current, Page},
};
use std::sync::Arc;
use tracing::{debug, error, info};

/// What a trigger ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Fetched and rendered this many tiles.
    Rendered(usize),
    /// Blank query, nothing requested.
    Skipped,
    /// A newer fetch for the same region was issued meanwhile; result dropped.
    Stale,
    /// The fetch failed; the failure was logged and the region left as it was.
    Failed,
}

/// Wires the page-ready and search-submit triggers to a GIF source.
#[derive(Clone)]
pub struct GifBrowser {
    source: Arc<dyn GifSource>,
}

impl GifBrowser {
    pub fn new(source: Arc<dyn GifSource>) -> Self {
        Self { source }
    }

    /// One request for `query`. Failures are returned, not logged.
    pub async fn fetch_gifs(&self, query: &SearchQuery) -> Result<GifResultSet, FetchError> {
        self.source.fetch(query).await
    }

    /// Initial load: trending results into the trending region.
    pub async fn page_ready(&self, page: &Page) -> TriggerOutcome {
        self.fetch_into(&SearchQuery::trending(), &page.trending).await
    }

    /// Search button: blank input is ignored, otherwise results go into the
    /// search region and the trending wrapper is hidden.
    pub async fn search_submit(&self, page: &Page, raw_query: &str) -> TriggerOutcome {
        let query = SearchQuery::parse(Some(raw_query));
        if query.term().is_none() {
            debug!("Ignoring search with blank query");
            return TriggerOutcome::Skipped;
        }

        let outcome = self.fetch_into(&query, &page.search).await;
        if let TriggerOutcome::Rendered(_) = outcome {
            page.trending_wrapper.hide();
        }
        outcome
    }

    async fn fetch_into(&self, query: &SearchQuery, target: &dyn DisplayRegion) -> TriggerOutcome {
        let token = target.issue_token();
        let mode = query.mode().name();

        let gifs = match self.fetch_gifs(query).await {
            Ok(gifs) => gifs,
            Err(e) => {
                error!(error = %e, mode, region = target.name(), "Failed to fetch GIFs");
                return TriggerOutcome::Failed;
            }
        };

        if render_gifs_if_current(&gifs, target, token) {
            info!(mode, region = target.name(), count = gifs.len(), "GIFs rendered");
            TriggerOutcome::Rendered(gifs.len())
        } else {
            debug!(mode, region = target.name(), token = token.0, "Discarding stale GIF response");
            TriggerOutcome::Stale
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        giphy::GiphyClient,
        models::GifRecord,
        regions::{render_gifs, TileRegion},
    };
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::{
        io::Write,
        sync::Mutex,
    };
    use tokio::sync::Notify;

    fn record(n: &str) -> GifRecord {
        GifRecord::new(format!("GIF {}", n), format!("https://media.example/{}/200.gif", n))
    }

    /// Records every query and answers from a fixed script.
    #[derive(Default)]
    struct FakeSource {
        calls: Mutex<Vec<SearchQuery>>,
        results: Vec<GifRecord>,
        fail: bool,
        // Queries for this term wait until notified.
        slow_term: Option<&'static str>,
        gate: Notify,
    }

    impl FakeSource {
        fn returning(results: Vec<GifRecord>) -> Self {
            Self { results, ..Default::default() }
        }

        fn failing() -> Self {
            Self { fail: true, ..Default::default() }
        }

        fn calls(&self) -> Vec<SearchQuery> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GifSource for FakeSource {
        async fn fetch(&self, query: &SearchQuery) -> Result<GifResultSet, FetchError> {
            self.calls.lock().unwrap().push(query.clone());
            if self.slow_term.is_some() && query.term() == self.slow_term {
                self.gate.notified().await;
                return Ok(vec![record("slow")]);
            }
            if self.fail {
                let decode = serde_json::from_str::<crate::models::GiphyEnvelope>("not json").unwrap_err();
                return Err(FetchError::Decode(decode));
            }
            Ok(self.results.clone())
        }
    }

    fn browser_with(source: &Arc<FakeSource>) -> GifBrowser {
        GifBrowser::new(source.clone())
    }

    fn alts(region: &TileRegion) -> Vec<String> {
        region.tiles().into_iter().map(|t| t.alt).collect()
    }

    #[derive(Clone)]
    struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for CaptureWriter {
        fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn error_lines(buf: &Arc<Mutex<Vec<u8>>>) -> usize {
        let text = String::from_utf8(buf.lock().unwrap().clone()).unwrap();
        text.lines().filter(|line| line.contains("ERROR")).count()
    }

    #[tokio::test]
    async fn page_ready_fetches_trending_once() {
        let source = Arc::new(FakeSource::returning(vec![record("a"), record("b")]));
        let page = Page::new();

        let outcome = browser_with(&source).page_ready(&page).await;

        assert_eq!(outcome, TriggerOutcome::Rendered(2));
        assert_eq!(source.calls(), vec![SearchQuery::trending()]);
        assert_eq!(alts(&page.trending), vec!["GIF a", "GIF b"]);
        assert!(page.search.tiles().is_empty());
        assert!(!page.trending_wrapper.is_hidden());
    }

    #[tokio::test]
    async fn search_fetches_once_with_trimmed_term() {
        let source = Arc::new(FakeSource::returning(vec![record("c")]));
        let page = Page::new();
        render_gifs(&[record("t")], &page.trending);

        let outcome = browser_with(&source).search_submit(&page, "  cats  ").await;

        assert_eq!(outcome, TriggerOutcome::Rendered(1));
        assert_eq!(source.calls(), vec![SearchQuery::parse(Some("cats"))]);
        assert_eq!(alts(&page.search), vec!["GIF c"]);
        assert!(page.trending_wrapper.is_hidden());
        // Hidden, not cleared.
        assert_eq!(alts(&page.trending), vec!["GIF t"]);
    }

    #[tokio::test]
    async fn blank_search_does_nothing() {
        let source = Arc::new(FakeSource::returning(vec![record("x")]));
        let page = Page::new();
        render_gifs(&[record("t")], &page.trending);
        let browser = browser_with(&source);

        for raw in ["", "   ", "\t\n"] {
            assert_eq!(browser.search_submit(&page, raw).await, TriggerOutcome::Skipped);
        }

        assert!(source.calls().is_empty());
        assert_eq!(alts(&page.trending), vec!["GIF t"]);
        assert!(page.search.tiles().is_empty());
        assert!(!page.trending_wrapper.is_hidden());
    }

    #[tokio::test]
    async fn failed_search_logs_once_and_leaves_page_alone() {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let writer = CaptureWriter(buf.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let source = Arc::new(FakeSource::failing());
        let page = Page::new();
        render_gifs(&[record("old")], &page.search);

        let outcome = browser_with(&source).search_submit(&page, "cats").await;

        assert_eq!(outcome, TriggerOutcome::Failed);
        assert_eq!(source.calls().len(), 1);
        assert_eq!(alts(&page.search), vec!["GIF old"]);
        assert!(!page.trending_wrapper.is_hidden());
        assert_eq!(error_lines(&buf), 1);
    }

    #[tokio::test]
    async fn failed_page_ready_leaves_trending_empty() {
        let source = Arc::new(FakeSource::failing());
        let page = Page::new();

        assert_eq!(browser_with(&source).page_ready(&page).await, TriggerOutcome::Failed);
        assert!(page.trending.tiles().is_empty());
    }

    #[tokio::test]
    async fn fetch_gifs_surfaces_the_failure() {
        let source = Arc::new(FakeSource::failing());
        let result = browser_with(&source).fetch_gifs(&SearchQuery::trending()).await;
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn newest_search_wins_over_late_response() {
        let source = Arc::new(FakeSource {
            results: vec![record("fast")],
            slow_term: Some("slow"),
            ..Default::default()
        });
        let browser = browser_with(&source);
        let page = Page::new();

        let (slow, fast) = tokio::join!(browser.search_submit(&page, "slow"), async {
            let outcome = browser.search_submit(&page, "fast").await;
            source.gate.notify_one();
            outcome
        });

        assert_eq!(fast, TriggerOutcome::Rendered(1));
        assert_eq!(slow, TriggerOutcome::Stale);
        assert_eq!(alts(&page.search), vec!["GIF fast"]);
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn cats_end_to_end() {
        let server = MockServer::start_async().await;
        let search_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/gifs/search")
                    .query_param("q", "cats")
                    .query_param("limit", "25")
                    .query_param("rating", "g");
                then.status(200).json_body(json!({
                    "data": [
                        { "title": "Cat One", "images": { "fixed_height": { "url": "https://media.example/1.gif" } } },
                        { "title": "Cat Two", "images": { "fixed_height": { "url": "https://media.example/2.gif" } } }
                    ]
                }));
            })
            .await;
        let trending_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/gifs/trending");
                then.status(200).json_body(json!({ "data": [] }));
            })
            .await;

        let base = reqwest::Url::parse(&server.base_url()).unwrap();
        let client = GiphyClient::new(reqwest::Client::new(), &base, "test-key".into()).unwrap();
        let browser = GifBrowser::new(Arc::new(client));
        let page = Page::new();

        let outcome = browser.search_submit(&page, "cats").await;

        assert_eq!(outcome, TriggerOutcome::Rendered(2));
        search_mock.assert_async().await;
        trending_mock.assert_hits_async(0).await;

        let tiles = page.search.tiles();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].src, "https://media.example/1.gif");
        assert_eq!(tiles[1].alt, "Cat Two");
        assert!(page.trending_wrapper.is_hidden());
    }
}
