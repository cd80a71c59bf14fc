//! Provider contract tests against a local mock server.
//!
//! These verify the outbound request shape (paths, parameters, User-Agent)
//! and how each provider maps responses, failures and malformed bodies.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use keyword_surprise::http::BROWSER_USER_AGENT;
use keyword_surprise::providers::{DuckDuckGo, GoogleCustomSearch, SerpApi};
use keyword_surprise::{
    Credentials, Provider, ProviderId, ResultKind, ResultSet, Search, SearchConfig, SearchError,
    SearchQuery, SearchRecord, TokenSource,
};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct NoToken;

#[async_trait]
impl TokenSource for NoToken {
    async fn acquire(&self, _query: &str) -> keyword_surprise::Result<Option<String>> {
        Ok(None)
    }
}

const RESULTS_PAGE: &str = r#"
<html><body>
  <div class="result"><div class="result__body">
    <h2 class="result__title"><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2Flearn&rut=x">Learn Rust</a></h2>
    <a class="result__snippet">Get started with Rust.</a>
  </div></div>
  <div class="result"><div class="result__body">
    <h2 class="result__title"><a class="result__a" href="https://doc.rust-lang.org/book/">The Rust Programming Language</a></h2>
    <a class="result__snippet">The book.</a>
  </div></div>
</body></html>
"#;

fn image_query(text: &str) -> SearchQuery {
    SearchQuery::new(text, ResultKind::Image).unwrap()
}

fn link_query(text: &str) -> SearchQuery {
    SearchQuery::new(text, ResultKind::Link).unwrap()
}

fn duckduckgo(server: &MockServer) -> DuckDuckGo {
    DuckDuckGo::new(&SearchConfig::default())
        .unwrap()
        .with_base_url(server.uri())
}

/// Every recorded request identified itself with the browser User-Agent.
async fn assert_browser_user_agent(server: &MockServer) {
    let requests = server.received_requests().await.unwrap();
    assert!(!requests.is_empty());
    for request in requests {
        let user_agent = request.headers.get("user-agent").unwrap();
        assert_eq!(user_agent.to_str().unwrap(), BROWSER_USER_AGENT);
    }
}

mod duckduckgo_image_tests {
    use super::*;

    #[tokio::test]
    async fn test_duckduckgo_images_use_scraped_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("q", "cats"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<script>DDG.deep.initialize('/d.js', vqd='4-token123');</script>",
            ))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/i.js"))
            .and(query_param("q", "cats"))
            .and(query_param("l", "us-en"))
            .and(query_param("vqd", "4-token123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"title": "Cat", "image": "https://img.example.com/cat.jpg",
                     "thumbnail": "https://t.example.com/cat.jpg", "url": "https://example.com/cat"},
                    {"title": "Kitten", "image": "https://img.example.com/kitten.jpg"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = assert_ok!(duckduckgo(&server).search(&image_query("cats")).await);
        let ResultSet::Images(images) = results else {
            panic!("expected images");
        };
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].source_url.as_deref(), Some("https://img.example.com/cat.jpg"));
        assert_eq!(images[1].title.as_deref(), Some("Kitten"));
        assert_browser_user_agent(&server).await;
    }

    #[tokio::test]
    async fn test_duckduckgo_images_without_token_omit_vqd() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/i.js"))
            .and(query_param("q", "cats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = duckduckgo(&server).with_token_source(Arc::new(NoToken));
        let results = assert_ok!(provider.search(&image_query("cats")).await);
        assert!(results.is_empty());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.query_pairs().all(|(key, _)| key != "vqd"));
    }

    #[tokio::test]
    async fn test_duckduckgo_images_landing_page_without_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>no token here</html>"))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/i.js"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"title": "Cat", "image": "https://img.example.com/cat.jpg"}]
            })))
            .mount(&server)
            .await;

        let results = assert_ok!(duckduckgo(&server).search(&image_query("cats")).await);
        assert_eq!(results.len(), 1);

        let requests = server.received_requests().await.unwrap();
        let image_request = requests.iter().find(|r| r.url.path() == "/i.js").unwrap();
        assert!(image_request.url.query_pairs().all(|(key, _)| key != "vqd"));
    }

    #[tokio::test]
    async fn test_duckduckgo_images_error_status_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/i.js"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let provider = duckduckgo(&server).with_token_source(Arc::new(NoToken));
        let results = assert_ok!(provider.search(&image_query("cats")).await);
        assert_eq!(results, ResultSet::empty(ResultKind::Image));
    }

    #[tokio::test]
    async fn test_duckduckgo_images_malformed_payload_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/i.js"))
            .respond_with(ResponseTemplate::new(200).set_body_string("If this error persists, please let us know"))
            .mount(&server)
            .await;

        let provider = duckduckgo(&server).with_token_source(Arc::new(NoToken));
        let results = assert_ok!(provider.search(&image_query("cats")).await);
        assert!(results.is_empty());
    }
}

mod duckduckgo_link_tests {
    use super::*;

    #[tokio::test]
    async fn test_duckduckgo_links() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/html/"))
            .and(query_param("q", "rust programming"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
            .expect(1)
            .mount(&server)
            .await;

        let results = assert_ok!(duckduckgo(&server).search(&link_query("rust programming")).await);
        let ResultSet::Links(links) = results else {
            panic!("expected links");
        };
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].link, "https://www.rust-lang.org/learn");
        assert_eq!(links[0].snippet_text(), "Get started with Rust.");
        assert_eq!(links[1].title, "The Rust Programming Language");
        assert_browser_user_agent(&server).await;
    }

    #[tokio::test]
    async fn test_duckduckgo_links_changed_markup_degrades() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/html/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body><div class=\"new-layout\"></div></body></html>"))
            .mount(&server)
            .await;

        let results = assert_ok!(duckduckgo(&server).search(&link_query("rust")).await);
        assert_eq!(results, ResultSet::empty(ResultKind::Link));
    }
}

mod google_tests {
    use super::*;

    fn google(server: &MockServer) -> GoogleCustomSearch {
        let config = SearchConfig::new(Credentials::none().with_google("g-key", "g-cx"));
        GoogleCustomSearch::new(&config)
            .unwrap()
            .with_endpoint(format!("{}/customsearch/v1", server.uri()))
    }

    #[tokio::test]
    async fn test_google_image_request_and_mapping() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("key", "g-key"))
            .and(query_param("cx", "g-cx"))
            .and(query_param("q", "cats"))
            .and(query_param("searchType", "image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "title": "Cat",
                    "link": "https://img.example.com/cat.jpg",
                    "image": {"thumbnailLink": "https://t.example.com/cat.jpg", "contextLink": "https://example.com/cat"}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = assert_ok!(google(&server).search(&image_query("cats")).await);
        let ResultSet::Images(images) = results else {
            panic!("expected images");
        };
        assert_eq!(images[0].thumbnail_url.as_deref(), Some("https://t.example.com/cat.jpg"));
        assert_eq!(images[0].context_url.as_deref(), Some("https://example.com/cat"));
        assert_browser_user_agent(&server).await;
    }

    #[tokio::test]
    async fn test_google_zero_items_is_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"kind": "customsearch#search"})))
            .mount(&server)
            .await;

        let results = assert_ok!(google(&server).search(&link_query("zzzz")).await);
        assert_eq!(results, ResultSet::empty(ResultKind::Link));
    }

    #[tokio::test]
    async fn test_google_error_status_is_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": {"message": "quota"}})))
            .mount(&server)
            .await;

        let err = assert_err!(google(&server).search(&link_query("rust")).await);
        assert!(matches!(err, SearchError::Upstream { provider: "Google", .. }));
        assert!(err.to_string().contains("403"));
        assert!(!err.to_string().contains("g-key"));
    }

    #[tokio::test]
    async fn test_google_malformed_body_is_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let err = assert_err!(google(&server).search(&link_query("rust")).await);
        assert!(matches!(err, SearchError::Upstream { .. }));
    }
}

mod serpapi_tests {
    use super::*;

    fn serpapi(server: &MockServer) -> SerpApi {
        let config = SearchConfig::new(Credentials::none().with_serpapi("s-key"));
        SerpApi::new(&config)
            .unwrap()
            .with_endpoint(format!("{}/search.json", server.uri()))
    }

    #[tokio::test]
    async fn test_serpapi_link_request_and_mapping() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("api_key", "s-key"))
            .and(query_param("q", "rust"))
            .and(query_param("engine", "google"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organic_results": [
                    {"title": "Rust", "link": "https://www.rust-lang.org/", "snippet": "Reliable software"},
                    {"title": "No link"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = assert_ok!(serpapi(&server).search(&link_query("rust")).await);
        let ResultSet::Links(links) = results else {
            panic!("expected links");
        };
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].snippet_text(), "Reliable software");

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].url.query_pairs().all(|(key, _)| key != "tbm"));
    }

    #[tokio::test]
    async fn test_serpapi_image_request_sets_tbm() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("tbm", "isch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "images_results": [{"title": "Cat", "original": "https://o.example.com/cat.jpg"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = assert_ok!(serpapi(&server).search(&image_query("cats")).await);
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_serpapi_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = assert_err!(serpapi(&server).search(&link_query("rust")).await);
        assert_eq!(err.status_code(), 500);
        assert!(matches!(err, SearchError::Upstream { provider: "SerpApi", .. }));
    }
}

mod transport_tests {
    use super::*;

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/html/"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let config = SearchConfig::default().with_timeout(1);
        let provider = DuckDuckGo::new(&config).unwrap().with_base_url(server.uri());
        let err = assert_err!(provider.search(&link_query("rust")).await);
        assert!(matches!(err, SearchError::Timeout));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let provider = DuckDuckGo::new(&SearchConfig::default().with_timeout(2))
            .unwrap()
            .with_base_url("http://127.0.0.1:1");
        let err = assert_err!(provider.search(&link_query("rust")).await);
        assert_eq!(err.status_code(), 500);
    }
}

mod search_tests {
    use super::*;

    #[tokio::test]
    async fn test_search_scrape_image_without_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/i.js"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let mut search = Search::new(Credentials::none());
        search.add_provider(duckduckgo(&server).with_token_source(Arc::new(NoToken)));

        let response = assert_ok!(search.search("cats", "image", "duckduckgo").await);
        assert_eq!(response.provider, ProviderId::DuckDuckGo);
        assert_eq!(response.count, 0);
        assert!(response.result.is_none());
    }

    #[tokio::test]
    async fn test_search_scrape_links_picks_one() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/html/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
            .mount(&server)
            .await;

        let mut search = Search::new(Credentials::none());
        search.add_provider(duckduckgo(&server));

        let response = assert_ok!(search.search("rust programming", "link", "auto").await);
        assert_eq!(response.count, 2);
        match response.result {
            Some(SearchRecord::Link(link)) => assert!(
                link.link == "https://www.rust-lang.org/learn" || link.link == "https://doc.rust-lang.org/book/"
            ),
            other => panic!("unexpected result: {:?}", other),
        }

        let json = serde_json::to_value(search.search("rust programming", "link", "auto").await.unwrap()).unwrap();
        assert_eq!(json["provider"], "duckduckgo");
        assert_eq!(json["type"], "link");
        assert_eq!(json["count"], 2);
    }

    #[tokio::test]
    async fn test_search_google_without_key_makes_no_request() {
        let server = MockServer::start().await;

        let mut search = Search::new(Credentials::none());
        search.add_provider(duckduckgo(&server));

        let err = assert_err!(search.search("rust programming", "link", "google").await);
        assert!(matches!(err, SearchError::Config(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
