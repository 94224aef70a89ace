use booking_intake::config::DatastoreConfig;
use booking_intake::store::{PostgrestStore, RecordStore};
use serde_json::{Map, Value, json};
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

fn store_for(server: &MockServer) -> PostgrestStore {
    PostgrestStore::new(&DatastoreConfig {
        // Trailing slash is tolerated.
        url: format!("{}/", server.uri()),
        service_key: "service-key".to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

fn record() -> Map<String, Value> {
    json!({ "name": "Anna", "guests": 2 }).as_object().cloned().unwrap()
}

#[tokio::test]
async fn insert_sends_postgrest_request() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/rest/v1/bookings"))
        .and(matchers::query_param("select", "id,created_at"))
        .and(matchers::header("apikey", "service-key"))
        .and(matchers::header("authorization", "Bearer service-key"))
        .and(matchers::header("prefer", "return=representation"))
        .and(matchers::header("accept", "application/vnd.pgrst.object+json"))
        .and(matchers::body_json(json!({ "name": "Anna", "guests": 2 })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "id": 42, "created_at": "2024-06-01T12:00:00+00:00" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let row = store_for(&server)
        .insert("bookings", &record(), &["id", "created_at"])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(row["id"], 42);
    assert_eq!(row["created_at"], "2024-06-01T12:00:00+00:00");
}

#[tokio::test]
async fn array_response_yields_first_row() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": 5 }])))
        .mount(&server)
        .await;

    let row = store_for(&server)
        .insert("messages", &record(), &["id"])
        .await
        .unwrap();

    assert_eq!(row, Some(json!({ "id": 5 })));
}

#[tokio::test]
async fn empty_response_yields_none() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let row = store_for(&server)
        .insert("bookings", &record(), &["id", "created_at"])
        .await
        .unwrap();

    assert!(row.is_none());
}

#[tokio::test]
async fn postgrest_error_is_decoded() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "PGRST204",
            "message": "Could not find the 'customer_name' column of 'bookings' in the schema cache",
            "details": null,
            "hint": "Check the column name",
        })))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .insert("bookings", &record(), &["id"])
        .await
        .unwrap_err();

    assert_eq!(err.code.as_deref(), Some("PGRST204"));
    assert!(err.message.contains("customer_name"));
    assert!(err.details.is_none());
    assert_eq!(err.hint.as_deref(), Some("Check the column name"));
}

#[tokio::test]
async fn non_json_error_keeps_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .insert("bookings", &record(), &["id"])
        .await
        .unwrap_err();

    assert_eq!(err.code.as_deref(), Some("503"));
    assert!(err.message.contains("503"));
    assert_eq!(err.details.as_deref(), Some("upstream unavailable"));
}

#[tokio::test]
async fn unreachable_datastore_is_an_error() {
    let store = PostgrestStore::new(&DatastoreConfig {
        url: "http://127.0.0.1:9".to_string(),
        service_key: "service-key".to_string(),
        timeout_secs: 2,
    })
    .unwrap();

    let err = store
        .insert("bookings", &record(), &["id"])
        .await
        .unwrap_err();

    assert!(err.message.contains("Datastore request failed"));
    assert!(err.code.is_none());
}
