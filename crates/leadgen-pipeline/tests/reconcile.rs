//! Reconciliation and batch-processing behaviour against mocked
//! cross-reference and verification services.

use leadgen_core::{BusinessStatus, ConfidenceLevel};
use leadgen_directory::Listing;
use leadgen_pipeline::{process_all, FailurePolicy, ReconciliationEngine};
use leadgen_places::{CrossReferenceClient, PlacesClient};
use leadgen_verify::AddressVerifier;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing(json: serde_json::Value) -> Listing {
    serde_json::from_value(json).expect("parse listing")
}

fn full_listing(id: &str, name: &str) -> Listing {
    listing(serde_json::json!({
        "id": id,
        "name": name,
        "location": {
            "address1": "1115 Porter Rd",
            "city": "Nashville",
            "state": "TN",
            "zip_code": "37206"
        },
        "phone": "+16156459100",
        "rating": 4.5,
        "review_count": 812
    }))
}

async fn no_match_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/place/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&server)
        .await;
    server
}

fn engine_for(server: &MockServer, verifier: Option<AddressVerifier>) -> ReconciliationEngine {
    let places = PlacesClient::with_base_url("test-key", 30, "leadgen-test/0.1", &server.uri())
        .expect("places client");
    ReconciliationEngine::new(CrossReferenceClient::new(places), verifier)
}

#[tokio::test]
async fn no_cross_reference_match_yields_medium_unknown() {
    let server = no_match_server().await;
    let engine = engine_for(&server, None);

    let listings = vec![
        full_listing("a", "Cafe Roze"),
        full_listing("b", "Butcher & Bee"),
        full_listing("c", "Folk"),
    ];

    let verified = process_all(&engine, &listings, 10, FailurePolicy::SkipAndLog)
        .await
        .expect("batch succeeds");

    assert_eq!(verified.len(), 3);
    for business in &verified {
        assert_eq!(business.confidence, ConfidenceLevel::Medium);
        assert_eq!(business.status, BusinessStatus::Unknown);
        assert_eq!(business.source, "directory+crossref_medium");
        assert!(business.discrepancy_note.is_none());
    }
}

#[tokio::test]
async fn phone_backfills_from_cross_reference() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/place/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [{ "place_id": "p1" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "result": {
                "name": "Cafe Roze",
                "formatted_phone_number": "615-555-0100",
                "business_status": "OPERATIONAL"
            }
        })))
        .mount(&server)
        .await;

    let engine = engine_for(&server, None);
    let phoneless = listing(serde_json::json!({
        "id": "a",
        "name": "Cafe Roze",
        "location": { "address1": "1115 Porter Rd" }
    }));

    let business = engine.reconcile(&phoneless).await.expect("reconcile");
    assert_eq!(business.phone, "615-555-0100");
    // Corroboration without contradiction leaves the defaults alone.
    assert_eq!(business.confidence, ConfidenceLevel::Medium);
    assert_eq!(business.status, BusinessStatus::Unknown);
}

#[tokio::test]
async fn listing_phone_wins_over_cross_reference() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/place/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [{ "place_id": "p1" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "result": { "formatted_phone_number": "615-555-0100" }
        })))
        .mount(&server)
        .await;

    let engine = engine_for(&server, None);
    let business = engine
        .reconcile(&full_listing("a", "Cafe Roze"))
        .await
        .expect("reconcile");

    assert_eq!(business.phone, "+16156459100");
}

#[tokio::test]
async fn permanent_closure_upgrades_confidence_and_flags_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/place/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [{ "place_id": "p1" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "result": { "name": "Shuttered Cafe", "business_status": "CLOSED_PERMANENTLY" }
        })))
        .mount(&server)
        .await;

    let engine = engine_for(&server, None);
    let business = engine
        .reconcile(&full_listing("a", "Shuttered Cafe"))
        .await
        .expect("reconcile");

    assert_eq!(business.status, BusinessStatus::Closed);
    assert_eq!(business.confidence, ConfidenceLevel::High);
    assert_eq!(business.source, "directory+crossref_high");
    assert!(business.discrepancy_note.is_some());
}

#[tokio::test]
async fn verified_address_is_canonicalized() {
    let crossref = no_match_server().await;

    let verify_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/street-address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "delivery_line_1": "1115 Porter Rd",
            "components": {
                "city_name": "Nashville",
                "state_abbreviation": "TN",
                "zipcode": "37206-1234"
            },
            "analysis": { "dpv_match_code": "Y" }
        }])))
        .expect(1)
        .mount(&verify_server)
        .await;

    let verifier = AddressVerifier::with_base_url(
        "id",
        "token",
        30,
        "leadgen-test/0.1",
        &verify_server.uri(),
    )
    .expect("verifier");

    let engine = engine_for(&crossref, Some(verifier));
    let business = engine
        .reconcile(&full_listing("a", "Cafe Roze"))
        .await
        .expect("reconcile");

    assert_eq!(business.zip_code, "37206-1234");
    assert_eq!(business.city, "Nashville");
}

#[tokio::test]
async fn incomplete_address_skips_verification() {
    let crossref = no_match_server().await;

    let verify_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/street-address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&verify_server)
        .await;

    let verifier = AddressVerifier::with_base_url(
        "id",
        "token",
        30,
        "leadgen-test/0.1",
        &verify_server.uri(),
    )
    .expect("verifier");

    let engine = engine_for(&crossref, Some(verifier));
    // No zip code, so the verifier must not be called.
    let partial = listing(serde_json::json!({
        "id": "a",
        "name": "Cafe Roze",
        "location": { "address1": "1115 Porter Rd", "city": "Nashville", "state": "TN" }
    }));

    let business = engine.reconcile(&partial).await.expect("reconcile");
    assert_eq!(business.zip_code, "");
}

#[tokio::test]
async fn blank_id_is_dropped_under_skip_policy() {
    let server = no_match_server().await;
    let engine = engine_for(&server, None);

    let listings = vec![
        listing(serde_json::json!({ "id": " ", "name": "Anonymous" })),
        full_listing("b", "Kept"),
    ];

    let verified = process_all(&engine, &listings, 10, FailurePolicy::SkipAndLog)
        .await
        .expect("skip policy never fails the batch");

    assert_eq!(verified.len(), 1);
    assert_eq!(verified[0].name, "Kept");
}

#[tokio::test]
async fn blank_id_aborts_batch_under_escalate_policy() {
    let server = no_match_server().await;
    let engine = engine_for(&server, None);

    let listings = vec![listing(serde_json::json!({ "id": "", "name": "Anonymous" }))];

    let result = process_all(&engine, &listings, 10, FailurePolicy::Escalate).await;
    assert!(result.is_err());
}
