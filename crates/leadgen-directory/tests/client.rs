//! Integration tests for `DirectoryClient` using wiremock HTTP mocks.

use leadgen_core::SearchCriteria;
use leadgen_directory::DirectoryClient;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> DirectoryClient {
    DirectoryClient::with_base_url("test-key", 30, "leadgen-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn criteria(max_results: usize) -> SearchCriteria {
    SearchCriteria::new("Nashville, TN", "restaurants", 5.0, max_results)
        .expect("criteria should validate")
}

/// Builds a page body with `count` listings whose ids start at `start`.
fn page_body(start: usize, count: usize) -> serde_json::Value {
    let businesses: Vec<serde_json::Value> = (start..start + count)
        .map(|i| {
            serde_json::json!({
                "id": format!("biz-{i}"),
                "name": format!("Business {i}"),
                "location": {
                    "address1": format!("{i} Main St"),
                    "city": "Nashville",
                    "state": "TN",
                    "zip_code": "37203"
                },
                "phone": format!("+1615555{i:04}"),
                "rating": 4.0,
                "review_count": 10
            })
        })
        .collect();
    serde_json::json!({ "businesses": businesses, "total": 1000 })
}

#[tokio::test]
async fn single_page_returns_exact_match_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri()).search(&criteria(3)).await;

    assert_eq!(outcome.listings.len(), 3);
    assert_eq!(outcome.pages_fetched, 1);
    assert!(!outcome.truncated_by_error());
    assert_eq!(outcome.listings[0].id, "biz-0");
}

#[tokio::test]
async fn request_carries_bearer_auth_and_search_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .and(header("authorization", "Bearer test-key"))
        .and(query_param("term", "restaurants"))
        .and(query_param("location", "Nashville, TN"))
        .and(query_param("radius", "8047"))
        .and(query_param("sort_by", "rating"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri()).search(&criteria(1)).await;
    assert_eq!(outcome.listings.len(), 1);
}

#[tokio::test]
async fn short_page_stops_pagination() {
    let server = MockServer::start().await;

    // 4 listings against a page limit of 10: the short page signals the
    // end of the provider's data, so no second request is issued.
    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, 4)))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri()).search(&criteria(10)).await;

    assert_eq!(outcome.listings.len(), 4);
    assert_eq!(outcome.pages_fetched, 1);
    assert!(!outcome.truncated_by_error());
}

#[tokio::test]
async fn empty_followup_page_stops_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, 50)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(50, 0)))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri()).search(&criteria(60)).await;

    assert_eq!(outcome.listings.len(), 50);
    assert_eq!(outcome.pages_fetched, 2);
    assert!(!outcome.truncated_by_error());
}

#[tokio::test]
async fn accumulated_results_are_truncated_to_max() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, 50)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(50, 50)))
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri()).search(&criteria(60)).await;

    assert_eq!(outcome.listings.len(), 60, "must never exceed max_results");
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.listings[59].id, "biz-59");
}

#[tokio::test]
async fn mid_pagination_failure_returns_partial_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, 50)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri()).search(&criteria(100)).await;

    assert_eq!(outcome.listings.len(), 50, "partial results are kept");
    assert!(outcome.truncated_by_error());
}

#[tokio::test]
async fn first_page_failure_yields_empty_outcome_with_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri()).search(&criteria(10)).await;

    assert!(outcome.listings.is_empty());
    assert!(
        outcome.truncated_by_error(),
        "unreachable directory must be distinguishable from zero matches"
    );
}

#[tokio::test]
async fn malformed_body_stops_pagination_with_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri()).search(&criteria(10)).await;

    assert!(outcome.listings.is_empty());
    assert!(outcome.truncated_by_error());
}
