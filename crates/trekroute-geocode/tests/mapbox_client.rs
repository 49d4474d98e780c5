use std::sync::Arc;

use serde_json::json;
use trekroute_core::{Coordinate, InterpolationMode, ItineraryStop, ResolutionStatus, TrekAnchor};
use trekroute_geocode::{
    GeocodeError, GeocodeQuery, GeocodeResolver, Geocoder, MapboxGeocoder, RouteEngine,
    SessionCache,
};
use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn geocoder(server: &MockServer) -> MapboxGeocoder {
    MapboxGeocoder::with_base_url(
        TOKEN,
        &format!("{}/geocoding/v5/mapbox.places/", server.uri()),
        5,
        "trekroute-test/0.1",
    )
    .expect("geocoder builds")
}

fn everest() -> Coordinate {
    Coordinate::new(28.0043, 86.8571)
}

fn feature(lng: f64, lat: f64, name: &str) -> serde_json::Value {
    json!({ "center": [lng, lat], "place_name": name })
}

#[tokio::test]
async fn forward_reads_center_as_lng_lat() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"/geocoding/v5/mapbox\.places/Namche.*\.json$"))
        .and(query_param("access_token", TOKEN))
        .and(query_param("limit", "1"))
        .and(query_param("types", "place,locality,poi,region"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "FeatureCollection",
            "features": [feature(86.7140, 27.8069, "Namche Bazaar, Nepal")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = GeocodeQuery::around("Namche Bazaar, Nepal", everest(), 1000.0);
    let candidates = geocoder(&server).forward(&query).await.unwrap();

    assert_eq!(candidates, vec![Coordinate::new(27.8069, 86.7140)]);
}

#[tokio::test]
async fn forward_sends_proximity_bias() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("proximity", "86.857100,28.004300"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "features": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let query = GeocodeQuery::around("Lukla", everest(), 1000.0);
    let candidates = geocoder(&server).forward(&query).await.unwrap();

    assert!(candidates.is_empty());
}

#[tokio::test]
async fn missing_features_field_is_no_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "attribution": "x" })))
        .mount(&server)
        .await;

    let query = GeocodeQuery::around("Nowhere", everest(), 1000.0);
    let candidates = geocoder(&server).forward(&query).await.unwrap();

    assert!(candidates.is_empty());
}

#[tokio::test]
async fn rate_limit_surfaces_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let query = GeocodeQuery::around("Lukla", everest(), 1000.0);
    let err = geocoder(&server).forward(&query).await.unwrap_err();

    assert!(
        matches!(err, GeocodeError::RateLimited { retry_after_secs: 7 }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn unauthorized_is_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let query = GeocodeQuery::around("Lukla", everest(), 1000.0);
    let err = geocoder(&server).forward(&query).await.unwrap_err();

    assert!(
        matches!(err, GeocodeError::UnexpectedStatus { status: 401 }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let query = GeocodeQuery::around("Lukla", everest(), 1000.0);
    let err = geocoder(&server).forward(&query).await.unwrap_err();

    assert!(matches!(err, GeocodeError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn transient_server_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "features": [feature(86.7314, 27.6857, "Lukla")] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = GeocodeQuery::around("Lukla", everest(), 1000.0);
    let candidates = geocoder(&server)
        .with_retries(2, 0)
        .forward(&query)
        .await
        .unwrap();

    assert_eq!(candidates, vec![Coordinate::new(27.6857, 86.7314)]);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let query = GeocodeQuery::around("Lukla", everest(), 1000.0);
    let result = geocoder(&server).with_retries(3, 0).forward(&query).await;

    assert!(matches!(result, Err(GeocodeError::UnexpectedStatus { status: 404 })));
}

#[tokio::test]
async fn engine_resolves_through_http_and_caches_every_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex("Lukla"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "features": [feature(86.7314, 27.6857, "Lukla, Nepal")] })),
        )
        .expect(1)
        .mount(&server)
        .await;
    // Dole in France, the wrong side of the world for this trek.
    Mock::given(method("GET"))
        .and(path_regex("Dole"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "features": [feature(5.4900, 47.0920, "Dole, France")] })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex("Gokyo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "features": [feature(86.6940, 27.9530, "Gokyo, Nepal")] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resolver = GeocodeResolver::new(
        geocoder(&server),
        Arc::new(SessionCache::new()),
        1000.0,
        0.1,
    );
    let engine = RouteEngine::new(resolver, InterpolationMode::Midpoint);
    let anchor = TrekAnchor {
        name: "Gokyo Lakes".to_string(),
        country: "Nepal".to_string(),
        latitude: 28.0043,
        longitude: 86.8571,
    };
    let stops = vec![
        ItineraryStop::new(1, "Fly to Lukla"),
        ItineraryStop::new(4, "Rest day at Dole"),
        ItineraryStop::new(6, "Machhermo to Gokyo (4790m)"),
    ];

    let first = engine.resolve(&stops, Some(&anchor)).await.unwrap();
    let second = engine.resolve(&stops, Some(&anchor)).await.unwrap();

    let statuses: Vec<_> = first.stops().iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        vec![
            ResolutionStatus::Geocoded,
            ResolutionStatus::Interpolated,
            ResolutionStatus::Geocoded,
        ]
    );
    assert!((first.stops()[1].lat - 27.8193).abs() < 1e-3);
    assert_eq!(first, second);
    // `expect(1)` on each mock is verified when the server drops.
}
