//! HTTP contract tests for the `/flight` API.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use flightdesk::api::{self, links::LinkBuilder, AppState};
use flightdesk::{FlightService, Storage};

fn app_with_base(base_url: Option<&str>) -> Router {
    let storage = Storage::open_in_memory().unwrap();
    let service = FlightService::new(Arc::new(storage));
    api::router(
        AppState::new(service, LinkBuilder::new(base_url)),
        api::cors_layer(&[]),
    )
}

fn app() -> Router {
    app_with_base(None)
}

fn flight_json(number: &str, rating: i32) -> Value {
    json!({
        "aircraftName": "Boeing 737",
        "flightNumber": number,
        "origin": "BOG",
        "destination": "MDE",
        "capacity": 160,
        "rating": rating,
        "flightPlanId": 7
    })
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, number: &str, rating: i32) -> Value {
    let payload = flight_json(number, rating);
    let (status, body) = send_json(app, Method::POST, "/flight/save", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

fn rels(links: &Value) -> Vec<String> {
    links
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect::<Vec<_>>()
}

fn sorted(mut v: Vec<String>) -> Vec<String> {
    v.sort();
    v
}

fn expect(rels: &[&str]) -> Vec<String> {
    sorted(rels.iter().map(ToString::to_string).collect())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send_json(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_save_returns_created_with_links() {
    let app = app();
    let body = create(&app, "AV204", 4).await;

    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["flightNumber"], "AV204");
    assert_eq!(body["rating"], 4);

    let links = &body["_links"];
    assert_eq!(
        sorted(rels(links)),
        expect(&["self", "all-flights", "delete", "update", "top-flights"])
    );
    assert_eq!(links["self"]["href"], format!("/flight/list/{id}"));
    assert_eq!(links["delete"]["href"], format!("/flight/delete/{id}"));
    assert_eq!(links["delete"]["method"], "DELETE");
    assert_eq!(links["update"]["method"], "PUT");
}

#[tokio::test]
async fn test_save_ignores_client_id() {
    let app = app();
    let mut payload = flight_json("AV1", 3);
    payload["id"] = json!(999);

    let (status, body) = send_json(&app, Method::POST, "/flight/save", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(body["id"], 999);
}

#[tokio::test]
async fn test_save_rejects_rating_above_five() {
    let app = app();
    let (status, body) =
        send_json(&app, Method::POST, "/flight/save", Some(flight_json("AV1", 6))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["detail"], "Rating must be <= 5");

    let (_, list) = send_json(&app, Method::GET, "/flight/listAll", None).await;
    assert_eq!(list["_embedded"]["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_save_rejects_rating_below_one() {
    let (status, body) =
        send_json(&app(), Method::POST, "/flight/save", Some(flight_json("AV1", 0))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("Rating"));
}

#[tokio::test]
async fn test_save_rejects_blank_text() {
    let mut payload = flight_json("AV1", 3);
    payload["origin"] = json!("   ");
    let (status, body) = send_json(&app(), Method::POST, "/flight/save", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("origin"));
}

#[tokio::test]
async fn test_save_rejects_missing_field() {
    let mut payload = flight_json("AV1", 3);
    payload.as_object_mut().unwrap().remove("destination");
    let (status, _) = send_json(&app(), Method::POST, "/flight/save", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_problem_content_type() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/flight/list/12345")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
}

#[tokio::test]
async fn test_get_by_id() {
    let app = app();
    let created = create(&app, "AV204", 2).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send_json(&app, Method::GET, &format!("/flight/list/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flightNumber"], "AV204");
    assert_eq!(
        sorted(rels(&body["_links"])),
        expect(&[
            "self",
            "all-flights",
            "delete",
            "update",
            "top-flights",
            "create-flight"
        ])
    );
    assert_eq!(body["_links"]["create-flight"]["method"], "POST");
}

#[tokio::test]
async fn test_get_by_id_featured_for_top_rated() {
    let app = app();
    let created = create(&app, "AV204", 4).await;
    let id = created["id"].as_i64().unwrap();

    let (_, body) = send_json(&app, Method::GET, &format!("/flight/list/{id}"), None).await;
    let featured = &body["_links"]["featured"];
    assert_eq!(featured["href"], "/flight/topFlights");
    assert_eq!(featured["title"], "Featured Flight");
}

#[tokio::test]
async fn test_get_by_id_not_found() {
    let (status, body) = send_json(&app(), Method::GET, "/flight/list/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Flight ID not found: 999");
}

#[tokio::test]
async fn test_get_by_id_malformed() {
    let (status, _) = send(&app(), Method::GET, "/flight/list/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_all() {
    let app = app();
    create(&app, "AV1", 1).await;
    create(&app, "AV2", 5).await;

    let (status, body) = send_json(&app, Method::GET, "/flight/listAll", None).await;
    assert_eq!(status, StatusCode::OK);

    let items = body["_embedded"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["flightNumber"], "AV1");
    assert_eq!(
        sorted(rels(&items[0]["_links"])),
        expect(&["self", "delete", "update", "top-flights"])
    );

    assert_eq!(
        sorted(rels(&body["_links"])),
        expect(&["self", "create-flight", "top-flights"])
    );
    assert_eq!(body["_links"]["self"]["href"], "/flight/listAll");
}

#[tokio::test]
async fn test_list_all_empty() {
    let (status, body) = send_json(&app(), Method::GET, "/flight/listAll", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_embedded"]["items"], json!([]));
}

#[tokio::test]
async fn test_top_flights() {
    let app = app();
    create(&app, "AV1", 3).await;
    create(&app, "AV2", 4).await;
    create(&app, "AV3", 5).await;

    let (status, body) = send_json(&app, Method::GET, "/flight/topFlights", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let items = body["_embedded"]["items"].as_array().unwrap();
    let numbers: Vec<&str> = items
        .iter()
        .map(|item| item["flightNumber"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec!["AV2", "AV3"]);
    assert_eq!(
        sorted(rels(&items[0]["_links"])),
        expect(&["self", "delete", "update"])
    );
    assert_eq!(
        sorted(rels(&body["_links"])),
        expect(&["self", "all-flights", "create-flight"])
    );
}

#[tokio::test]
async fn test_top_flights_empty_is_not_found() {
    let app = app();
    create(&app, "AV1", 3).await;

    let (status, body) = send_json(&app, Method::GET, "/flight/topFlights", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "No flights found with rating >= 4");
}

#[tokio::test]
async fn test_update() {
    let app = app();
    let created = create(&app, "AV1", 2).await;
    let id = created["id"].as_i64().unwrap();

    let mut payload = flight_json("AV1-R", 5);
    payload["id"] = json!(id);
    payload["completed"] = json!(true);

    let (status, body) = send_json(&app, Method::PUT, "/flight/update", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["flightNumber"], "AV1-R");
    assert_eq!(body["rating"], 5);
    assert_eq!(body["completed"], true);
    assert_eq!(
        sorted(rels(&body["_links"])),
        expect(&["self", "all-flights", "delete", "update", "top-flights"])
    );
    assert_eq!(body["_links"]["update"]["method"], "PUT");
    assert_eq!(body["_links"]["self"]["href"], format!("/flight/list/{id}"));

    let (_, fetched) = send_json(&app, Method::GET, &format!("/flight/list/{id}"), None).await;
    assert_eq!(fetched["flightNumber"], "AV1-R");
}

#[tokio::test]
async fn test_update_unknown_id() {
    let app = app();
    let mut payload = flight_json("AV1", 3);
    payload["id"] = json!(4242);

    let (status, body) = send_json(&app, Method::PUT, "/flight/update", Some(payload)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Flight not found with ID: 4242");

    let (_, list) = send_json(&app, Method::GET, "/flight/listAll", None).await;
    assert_eq!(list["_embedded"]["items"], json!([]));
}

#[tokio::test]
async fn test_update_without_id() {
    let (status, body) =
        send_json(&app(), Method::PUT, "/flight/update", Some(flight_json("AV1", 3))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Flight not found with ID: null");
}

#[tokio::test]
async fn test_update_rejects_invalid_rating() {
    let app = app();
    let created = create(&app, "AV1", 2).await;
    let mut payload = flight_json("AV1", 9);
    payload["id"] = created["id"].clone();

    let (status, _) = send_json(&app, Method::PUT, "/flight/update", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_get() {
    let app = app();
    let created = create(&app, "AV1", 2).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/flight/delete/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "Flight removed");

    let (status, _) = send(&app, Method::GET, &format!("/flight/list/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_id_confirms() {
    let (status, body) = send(&app(), Method::DELETE, "/flight/delete/31337", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "Flight removed");
}

#[tokio::test]
async fn test_flights_by_rating() {
    let app = app();
    create(&app, "AV1", 3).await;
    create(&app, "AV2", 4).await;
    create(&app, "AV3", 3).await;

    let (status, body) = send_json(&app, Method::GET, "/flight/rating/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_embedded"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["_links"]["self"]["href"], "/flight/rating/3");
    assert_eq!(
        sorted(rels(&body["_links"])),
        expect(&["self", "all-flights", "create-flight", "top-flights"])
    );

    let (status, body) = send_json(&app, Method::GET, "/flight/rating/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_embedded"]["items"], json!([]));
}

#[tokio::test]
async fn test_flights_by_route() {
    let app = app();
    create(&app, "AV1", 3).await;
    let mut other = flight_json("AV2", 3);
    other["destination"] = json!("CTG");
    send_json(&app, Method::POST, "/flight/save", Some(other)).await;

    let uri = "/flight/route?origin=BOG&destination=CTG";
    let (status, body) = send_json(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let items = body["_embedded"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["flightNumber"], "AV2");
    assert_eq!(body["_links"]["self"]["href"], uri);
}

#[tokio::test]
async fn test_flights_by_route_missing_param() {
    let (status, _) = send(&app(), Method::GET, "/flight/route?origin=BOG", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_flights_by_completed() {
    let app = app();
    let created = create(&app, "AV1", 3).await;
    create(&app, "AV2", 3).await;

    let mut payload = flight_json("AV1", 3);
    payload["id"] = created["id"].clone();
    payload["completed"] = json!(true);
    send_json(&app, Method::PUT, "/flight/update", Some(payload)).await;

    let (status, body) = send_json(&app, Method::GET, "/flight/completed/true", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["_embedded"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["flightNumber"], "AV1");

    let (status, _) = send(&app, Method::GET, "/flight/completed/maybe", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_base_url_prefixes_links() {
    let app = app_with_base(Some("https://api.example.com/"));
    let body = create(&app, "AV1", 3).await;
    let id = body["id"].as_i64().unwrap();

    assert_eq!(
        body["_links"]["self"]["href"],
        format!("https://api.example.com/flight/list/{id}")
    );
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/flight/listAll")
        .header(header::ORIGIN, "http://frontend.local")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_end_to_end_lifecycle() {
    let app = app();

    let mut a = flight_json("AV-A", 5);
    a["aircraftName"] = json!("A");
    let (status, created_a) = send_json(&app, Method::POST, "/flight/save", Some(a)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id_a = created_a["id"].as_i64().unwrap();

    let mut b = flight_json("AV-B", 3);
    b["aircraftName"] = json!("B");
    let (status, created_b) = send_json(&app, Method::POST, "/flight/save", Some(b)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id_b = created_b["id"].as_i64().unwrap();
    assert_ne!(id_a, id_b);

    let (status, top) = send_json(&app, Method::GET, "/flight/topFlights", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let items = top["_embedded"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id_a);

    let (status, body) = send(&app, Method::DELETE, &format!("/flight/delete/{id_b}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "Flight removed");

    let (status, _) = send(&app, Method::GET, &format!("/flight/list/{id_b}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send_json(&app, Method::GET, "/flight/listAll", None).await;
    let items = list["_embedded"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id_a);
}
