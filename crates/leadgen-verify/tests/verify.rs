//! Integration tests for the address verifier against a mocked
//! street-address endpoint.

use leadgen_verify::{AddressVerifier, VerificationStatus};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn verifier_for(server: &MockServer) -> AddressVerifier {
    AddressVerifier::with_base_url("auth-id", "auth-token", 30, "leadgen-test/0.1", &server.uri())
        .expect("verifier construction")
}

#[tokio::test]
async fn confirmed_address_verifies_with_full_confidence() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/street-address"))
        .and(query_param("auth-id", "auth-id"))
        .and(query_param("street", "800 N Point St"))
        .and(query_param("zipcode", "94109"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "delivery_line_1": "800 N Point St",
            "components": {
                "city_name": "San Francisco",
                "state_abbreviation": "CA",
                "zipcode": "94109"
            },
            "analysis": { "dpv_match_code": "Y", "dpv_vacant": "N", "dpv_cmra": "N" }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let result = verifier_for(&server)
        .verify("800 N Point St", "San Francisco", "CA", "94109")
        .await;

    assert!(result.verified);
    assert_eq!(result.status, VerificationStatus::Verified);
    assert!((result.confidence - 1.0).abs() < 1e-9);
    assert_eq!(result.verified_city.as_deref(), Some("San Francisco"));
    assert!(result.error.is_none());
}

#[tokio::test]
async fn vacant_address_is_discounted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/street-address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "delivery_line_1": "12 Empty Ave",
            "analysis": { "dpv_match_code": "Y", "dpv_vacant": "Y" }
        }])))
        .mount(&server)
        .await;

    let result = verifier_for(&server)
        .verify("12 Empty Ave", "Austin", "TX", "78701")
        .await;

    assert!(result.verified);
    assert!((result.confidence - 0.7).abs() < 1e-9);
}

#[tokio::test]
async fn empty_response_is_invalid_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/street-address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let result = verifier_for(&server)
        .verify("1 Nowhere Ln", "Nowhere", "KS", "00000")
        .await;

    assert!(!result.verified);
    assert_eq!(result.status, VerificationStatus::Invalid);
    assert!(result.error.is_some());
}

#[tokio::test]
async fn server_failure_becomes_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/street-address"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = verifier_for(&server)
        .verify("800 N Point St", "San Francisco", "CA", "94109")
        .await;

    assert!(!result.verified);
    assert_eq!(result.status, VerificationStatus::Error);
    assert!(result.confidence.abs() < 1e-9);
    let message = result.error.expect("error message");
    assert!(message.contains("500"));
    // Credentials never leak into the error message.
    assert!(!message.contains("auth-token="));
}

#[tokio::test]
async fn malformed_body_becomes_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/street-address"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = verifier_for(&server)
        .verify("800 N Point St", "San Francisco", "CA", "94109")
        .await;

    assert_eq!(result.status, VerificationStatus::Error);
}
