//! End-to-end tests for `suggest_addresses` against a mocked provider.
//!
//! Primary requests carry `type` filters and fallback requests do not, which
//! lets each mock target one cascade round and assert its call count.

use civitas_core::{BoundingBox, Centroid, CommuneGeoContext};
use civitas_geocoder::{suggest_addresses, GeocoderClient, GeocoderError, SuggestError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn springfield() -> CommuneGeoContext {
    CommuneGeoContext {
        id: "99001".to_string(),
        name: "Springfield".to_string(),
        postal_codes: vec!["75000".to_string()],
        bounding_box: Some(BoundingBox {
            south: 48.80,
            north: 48.90,
            west: 2.25,
            east: 2.42,
        }),
        centroid: Centroid {
            latitude: 48.85,
            longitude: 2.34,
        },
    }
}

fn test_client(server: &MockServer) -> GeocoderClient {
    GeocoderClient::new(&format!("{}/search/", server.uri()), "civitas-test/0.1", 5)
        .expect("client construction should not fail")
}

/// One feature inside the Springfield box.
fn feature(id: &str, label: &str) -> serde_json::Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [2.33, 48.86] },
        "properties": { "id": id, "label": label, "city": "Springfield" }
    })
}

fn collection(features: Vec<serde_json::Value>) -> serde_json::Value {
    json!({ "type": "FeatureCollection", "features": features })
}

fn primary() -> wiremock::MockBuilder {
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("type", "housenumber"))
}

fn fallback() -> wiremock::MockBuilder {
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param_is_missing("type"))
}

// ---------------------------------------------------------------------------
// Scenario A – primary query already satisfies every token
// ---------------------------------------------------------------------------

#[tokio::test]
async fn primary_match_skips_fallbacks_and_keeps_label() {
    let server = MockServer::start().await;

    primary()
        .and(query_param("q", "12 rue de la paix Springfield"))
        .and(query_param("limit", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![feature(
            "99001_0001_00012",
            "12 Rue de la Paix 75000 Springfield",
        )])))
        .expect(1)
        .mount(&server)
        .await;

    fallback()
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let suggestions = suggest_addresses(&test_client(&server), &springfield(), "12 rue de la paix", None)
        .await
        .expect("suggestions");

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].label, "12 Rue de la Paix 75000 Springfield");
    assert_eq!(suggestions[0].id, "99001_0001_00012");
    server.verify().await;
}

// ---------------------------------------------------------------------------
// Scenario B – misspelled query resolved by the first fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fallback_with_stripped_query_recovers_misspelling() {
    let server = MockServer::start().await;

    primary()
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![])))
        .expect(1)
        .mount(&server)
        .await;

    fallback()
        .and(query_param("q", "bibliotheque"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![feature(
            "poi-1",
            "Bibliothèque municipale, Springfield",
        )])))
        .expect(1)
        .mount(&server)
        .await;

    fallback()
        .and(query_param("q", "bibliotheque Springfield"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let suggestions = suggest_addresses(&test_client(&server), &springfield(), "bibliothéque", None)
        .await
        .expect("suggestions");

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].label, "Bibliothèque municipale, Springfield");

    let body = serde_json::to_value(&suggestions).expect("serialize");
    let first = body[0].as_object().expect("object");
    assert!(!first.contains_key("origin"), "origin leaked: {body}");
    assert_eq!(first["name"], "Bibliothèque municipale, Springfield");
    server.verify().await;
}

// ---------------------------------------------------------------------------
// Scenario C – primary provider failure is fatal
// ---------------------------------------------------------------------------

#[tokio::test]
async fn primary_server_error_is_service_unavailable() {
    let server = MockServer::start().await;

    primary()
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    fallback()
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let err = suggest_addresses(&test_client(&server), &springfield(), "rue de la paix", None)
        .await
        .expect_err("primary 500 must fail");

    assert!(
        matches!(
            err,
            SuggestError::ProviderUnavailable(GeocoderError::UnexpectedStatus { status: 500, .. })
        ),
        "unexpected error: {err:?}"
    );
    server.verify().await;
}

#[tokio::test]
async fn primary_invalid_json_is_service_unavailable() {
    let server = MockServer::start().await;

    primary()
        .respond_with(ResponseTemplate::new(200).set_body_string("oops"))
        .mount(&server)
        .await;

    let err = suggest_addresses(&test_client(&server), &springfield(), "rue de la paix", None)
        .await
        .expect_err("invalid JSON must fail");
    assert!(matches!(
        err,
        SuggestError::ProviderUnavailable(GeocoderError::Deserialize { .. })
    ));
}

#[tokio::test]
async fn primary_null_features_is_an_empty_round() {
    let server = MockServer::start().await;

    primary()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "features": null })))
        .expect(1)
        .mount(&server)
        .await;

    fallback()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "features": null })))
        .mount(&server)
        .await;

    let suggestions = suggest_addresses(&test_client(&server), &springfield(), "rue de la paix", None)
        .await
        .expect("null features must not be fatal");
    assert!(suggestions.is_empty());
    server.verify().await;
}

#[tokio::test]
async fn numeric_postcode_does_not_discard_feature() {
    let server = MockServer::start().await;

    primary()
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![json!({
            "geometry": { "coordinates": [2.33, 48.86] },
            "properties": { "label": "Rue de la Paix Springfield", "postcode": 75000 }
        })])))
        .mount(&server)
        .await;

    let suggestions = suggest_addresses(&test_client(&server), &springfield(), "rue de la paix", None)
        .await
        .expect("suggestions");

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].label, "Rue de la Paix Springfield");
    assert_eq!(suggestions[0].postcode.as_deref(), Some("75000"));
}

// ---------------------------------------------------------------------------
// Fallback failures, validation and caps
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failing_fallback_does_not_abort_cascade() {
    let server = MockServer::start().await;

    primary()
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![])))
        .expect(1)
        .mount(&server)
        .await;

    fallback()
        .and(query_param("q", "gymnase"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    fallback()
        .and(query_param("q", "gymnase Springfield"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .expect(1)
        .mount(&server)
        .await;

    fallback()
        .and(query_param("q", "gymnase 75000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![feature(
            "poi-gym",
            "Gymnase Jean Jaurès, Springfield",
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let suggestions = suggest_addresses(&test_client(&server), &springfield(), "gymnase", None)
        .await
        .expect("fallback failures must be swallowed");

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].id, "poi-gym");
    server.verify().await;
}

#[tokio::test]
async fn short_query_is_rejected_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let err = suggest_addresses(&test_client(&server), &springfield(), "  x ", None)
        .await
        .expect_err("single character must be rejected");
    assert!(matches!(err, SuggestError::InvalidQuery(_)));
    server.verify().await;
}

#[tokio::test]
async fn results_outside_commune_are_filtered() {
    let server = MockServer::start().await;

    let outside = json!({
        "geometry": { "coordinates": [1.10, 49.44] },
        "properties": { "id": "far", "label": "Rue de la Paix 76000 Rouen", "city": "Rouen", "postcode": "76000" }
    });
    let unlabeled = json!({
        "geometry": { "coordinates": [2.33, 48.86] },
        "properties": { "id": "nolabel" }
    });

    primary()
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![
            outside,
            unlabeled,
            feature("near", "Rue de la Paix 75000 Springfield"),
        ])))
        .mount(&server)
        .await;

    let suggestions = suggest_addresses(&test_client(&server), &springfield(), "rue de la paix", None)
        .await
        .expect("suggestions");

    let ids: Vec<&str> = suggestions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["near"]);
}

#[tokio::test]
async fn merged_results_never_exceed_limit() {
    let server = MockServer::start().await;

    primary()
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(
            (0..3)
                .map(|i| feature(&format!("p{i}"), &format!("Rue des Roses {i}")))
                .collect(),
        )))
        .expect(1)
        .mount(&server)
        .await;

    for (round, q) in ["rue des lilas", "rue des lilas Springfield", "rue des lilas 75000"]
        .into_iter()
        .enumerate()
    {
        fallback()
            .and(query_param("q", q))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(collection(
                (0..3)
                    .map(|i| feature(&format!("f{round}-{i}"), &format!("Allée des Lilas {round}{i}")))
                    .collect(),
            )))
            .expect(1)
            .mount(&server)
            .await;
    }

    let suggestions = suggest_addresses(&test_client(&server), &springfield(), "rue des lilas", Some(3))
        .await
        .expect("suggestions");

    assert_eq!(suggestions.len(), 3);
    server.verify().await;
}

#[tokio::test]
async fn ranking_puts_best_match_first() {
    let server = MockServer::start().await;

    primary()
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![
            feature("a", "Avenue de la Paix 75000 Springfield"),
            feature("b", "8 Rue de la Paix 75000 Springfield"),
            feature("c", "Rue Lepic 75000 Springfield"),
        ])))
        .mount(&server)
        .await;

    let suggestions = suggest_addresses(&test_client(&server), &springfield(), "8 rue de la paix", None)
        .await
        .expect("suggestions");

    let ids: Vec<&str> = suggestions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids.first(), Some(&"b"));
}
