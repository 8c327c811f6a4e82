use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tpl_assist::options::TransportOptions;
use tpl_assist::transit::{EventQuery, TransitClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup_mock_server() -> (MockServer, TransitClient) {
    let mock_server = MockServer::start().await;
    let client = TransitClient::new(format!("{}/api/v1", mock_server.uri()));
    (mock_server, client)
}

fn agencies_body() -> Value {
    json!({
        "Agencies": [
            { "name": "Ataf&Linea", "agency": "http://www.disit.org/km4city/resource/Bus_Firenze_Ataf" },
            { "name": "CTT Nord", "agency": "http://www.disit.org/km4city/resource/Bus_CTT_Nord" }
        ]
    })
}

#[tokio::test]
async fn test_agencies_body_is_passed_through_unchanged() {
    let (mock_server, client) = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tpl/agencies"))
        .and(header("user-agent", "snap/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(agencies_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert_eq!(client.agencies().await, agencies_body());
}

#[tokio::test]
async fn test_bus_lines_sends_agency_query() {
    let (mock_server, client) = setup_mock_server().await;
    let agency = "http://www.disit.org/km4city/resource/Bus_Firenze_Ataf";
    let body = json!({ "BusLines": [{ "shortName": "6", "longName": "Torregalli - San Marco" }] });

    Mock::given(method("GET"))
        .and(path("/api/v1/tpl/bus-lines/"))
        .and(query_param("agency", agency))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert_eq!(client.bus_lines(agency).await, body);
}

#[tokio::test]
async fn test_http_error_becomes_null() {
    let (mock_server, client) = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tpl/agencies"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    assert_eq!(client.agencies().await, Value::Null);
}

#[tokio::test]
async fn test_malformed_body_becomes_null() {
    let (mock_server, client) = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tpl/bus-lines/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    assert_eq!(client.bus_lines("http://example.org/agency").await, Value::Null);
}

#[tokio::test]
async fn test_unreachable_host_becomes_null() {
    // Nothing listens on the discard port.
    let client = TransitClient::new("http://127.0.0.1:9/api/v1");
    assert_eq!(client.agencies().await, Value::Null);
}

#[tokio::test]
async fn test_timeout_becomes_null() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tpl/agencies"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(agencies_body())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client = TransitClient::with_options(
        mock_server.uri(),
        TransportOptions::new().with_timeout(Duration::from_millis(50)),
    );
    assert_eq!(client.agencies().await, Value::Null);
}

#[tokio::test]
async fn test_events_forward_only_set_filters() {
    let (mock_server, client) = setup_mock_server().await;
    let body = json!({ "Event": { "features": [] } });
    Mock::given(method("GET"))
        .and(path("/api/v1/events/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = EventQuery {
        range: Some("week".to_string()),
        selection: None,
        max_dists: Some(2.5),
        max_results: None,
    };
    assert_eq!(client.events(&query).await, body);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let params: HashMap<String, String> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    assert_eq!(params.len(), 2);
    assert_eq!(params.get("range").map(String::as_str), Some("week"));
    assert_eq!(params.get("maxDists").map(String::as_str), Some("2.5"));
    assert!(!params.contains_key("selection"));
    assert!(!params.contains_key("maxResults"));
}
