//! Crossref client and enrichment against a local fake registry.

use feed_config::LookupConfig;
use feed_core::StudyRecord;
use feed_lookup::{CrossrefClient, LinkEnricher, LinkSource, LookupError, WorkLookup};
use serde_json::json;
use wiremock::matchers::{header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> LookupConfig {
    LookupConfig {
        base_url: server.uri(),
        mailto: "curator@example.org".into(),
        timeout_secs: 2,
        ..Default::default()
    }
}

fn works(items: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": "ok",
        "message-type": "work-list",
        "message": { "items": items }
    }))
}

fn study(title: &str) -> StudyRecord {
    StudyRecord {
        track: "social_layer".into(),
        title: title.into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn search_title_sends_bibliographic_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("query.bibliographic", "The Strength of Weak Ties"))
        .and(query_param("rows", "1"))
        .and(query_param("select", "DOI,title,issued"))
        .and(header_regex("user-agent", r"mailto:curator@example\.org"))
        .respond_with(works(json!([
            {
                "DOI": "10.1086/225469",
                "title": ["The Strength of Weak Ties"],
                "issued": { "date-parts": [[1973]] }
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = CrossrefClient::new(&config_for(&server)).unwrap();
    let candidate = client
        .search_title("The Strength of Weak Ties")
        .await
        .unwrap()
        .expect("one candidate");
    assert_eq!(candidate.doi, "10.1086/225469");
    assert_eq!(candidate.year, Some(1973));
}

#[tokio::test]
async fn empty_result_is_no_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(works(json!([])))
        .mount(&server)
        .await;

    let client = CrossrefClient::new(&config_for(&server)).unwrap();
    assert!(client.search_title("Nothing Like This").await.unwrap().is_none());
}

#[tokio::test]
async fn server_error_is_swallowed_by_best_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = CrossrefClient::new(&config_for(&server)).unwrap();
    let err = client.search_title("Weak Ties").await.unwrap_err();
    assert!(matches!(err, LookupError::Api { status: 500, .. }), "{err}");
    assert!(client.best_match("Weak Ties").await.is_none());
}

#[tokio::test]
async fn rate_limit_is_reported_then_swallowed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "2"))
        .mount(&server)
        .await;

    let client = CrossrefClient::new(&config_for(&server)).unwrap();
    let err = client.search_title("Weak Ties").await.unwrap_err();
    assert!(matches!(err, LookupError::RateLimited { retry_after_secs: 2 }), "{err}");
    assert!(client.best_match("Weak Ties").await.is_none());
}

#[tokio::test]
async fn enrichment_with_exact_registry_title_links_to_doi() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(works(json!([
            { "DOI": "10.1086/225469", "title": ["The Strength of Weak Ties"] }
        ])))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let enricher = LinkEnricher::from_config(CrossrefClient::new(&config).unwrap(), &config);
    let mut record = study("The Strength of Weak Ties");

    let source = enricher.enrich(&mut record).await;
    assert!(matches!(source, LinkSource::Registry { .. }), "{source:?}");
    assert_eq!(
        record.source_url.as_deref(),
        Some("https://doi.org/10.1086/225469")
    );
}

#[tokio::test]
async fn enrichment_with_unreachable_registry_uses_search_link() {
    let config = LookupConfig {
        base_url: "http://127.0.0.1:9".into(),
        timeout_secs: 1,
        ..Default::default()
    };
    let enricher = LinkEnricher::from_config(CrossrefClient::new(&config).unwrap(), &config);
    let mut record = study("Weak Ties, Revisited");

    assert_eq!(enricher.enrich(&mut record).await, LinkSource::SearchFallback);
    assert_eq!(
        record.source_url.as_deref(),
        Some("https://scholar.google.com/scholar?q=Weak%20Ties%2C%20Revisited")
    );
}

#[tokio::test]
#[ignore] // requires network
async fn live_crossref_finds_a_classic() {
    let client = CrossrefClient::new(&LookupConfig::default()).unwrap();
    let candidate = client.search_title("The Strength of Weak Ties").await.unwrap();
    assert!(candidate.is_some());
}
