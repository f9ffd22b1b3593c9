use axum::{
    body::{Body, BodyDataStream},
    http::{header, HeaderName, HeaderValue, Request, StatusCode},
};
use axum_test::{
    multipart::{MultipartForm, Part},
    TestRequest, TestServer,
};
use futures::StreamExt;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

use campus_lost_found::{
    adapters::inbound::http::{
        ClaimResponseDto, CreatedPostingDto, ErrorResponseDto, USER_EMAIL_HEADER, USER_ID_HEADER,
        USER_PHONE_HEADER,
    },
    create_in_memory_app,
    domain::models::{LostAndFoundLog, Posting},
    AppServices, DEFAULT_PUBLIC_BASE_URL,
};

async fn setup_test_server() -> (TestServer, AppServices) {
    let services = create_in_memory_app().await.unwrap();
    let server = TestServer::new(services.router()).unwrap();
    (server, services)
}

fn as_user(request: TestRequest, id: &'static str) -> TestRequest {
    let email = format!("{}@campus.edu", id);
    request
        .add_header(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_static(id),
        )
        .add_header(
            HeaderName::from_static(USER_EMAIL_HEADER),
            HeaderValue::from_str(&email).unwrap(),
        )
        .add_header(
            HeaderName::from_static(USER_PHONE_HEADER),
            HeaderValue::from_static("555-0100"),
        )
}

fn posting_form(item_name: &str, location: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("item_name", item_name)
        .add_text("description", "Navy blue, wooden handle")
        .add_text("location", location)
        .add_text("occurred_date", "2026-10-14")
        .add_text("occurred_time", "Around 2pm")
        .add_part(
            "image",
            Part::bytes(b"\xff\xd8\xff\xe0 fake jpeg".to_vec())
                .file_name("umbrella.jpg")
                .mime_type("image/jpeg"),
        )
}

async fn create_posting(server: &TestServer, kind: &str, owner: &'static str) -> String {
    let response = as_user(server.post(&format!("/items/{}", kind)), owner)
        .multipart(posting_form("Blue Umbrella", "Library"))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<CreatedPostingDto>().id.to_string()
}

async fn active(server: &TestServer, kind: &str) -> Vec<Posting> {
    let response = server.get(&format!("/items/{}", kind)).await;
    response.assert_status_ok();
    response.json::<Vec<Posting>>()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _) = setup_test_server().await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_create_and_list_posting() {
    let (server, _) = setup_test_server().await;

    let id = create_posting(&server, "found", "alice").await;

    let feed = active(&server, "found").await;
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id().as_str(), id);
    assert_eq!(feed[0].item_name(), "Blue Umbrella");
    assert_eq!(feed[0].poster().email, "alice@campus.edu");

    // Wire shape follows the mobile client's document fields
    let raw = server.get("/items/found").await.json::<Value>();
    assert_eq!(raw[0]["kind"], "found");
    assert_eq!(raw[0]["foundLocation"], "Library");
    assert_eq!(raw[0]["status"], "active");

    assert!(active(&server, "lost").await.is_empty());
}

#[tokio::test]
async fn test_create_requires_identity() {
    let (server, _) = setup_test_server().await;

    let response = server
        .post("/items/lost")
        .multipart(posting_form("Keys", "Gym"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<ErrorResponseDto>().error, "Unauthorized");
}

#[tokio::test]
async fn test_create_with_missing_field_is_bad_request() {
    let (server, _) = setup_test_server().await;

    let form = MultipartForm::new()
        .add_text("item_name", "Keys")
        .add_text("location", "Gym")
        .add_text("occurred_date", "2026-10-14")
        .add_text("occurred_time", "noon")
        .add_part("image", Part::bytes(b"img".to_vec()).file_name("k.png"));

    let response = as_user(server.post("/items/lost"), "alice")
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<ErrorResponseDto>();
    assert_eq!(body.error, "ValidationError");
    assert!(body.message.contains("description"));
    assert!(active(&server, "lost").await.is_empty());
}

#[tokio::test]
async fn test_create_with_bad_date_is_bad_request() {
    let (server, _) = setup_test_server().await;

    let form = posting_form("Keys", "Gym").add_text("occurred_date", "yesterday");

    let response = as_user(server.post("/items/lost"), "alice")
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_kind_is_bad_request() {
    let (server, _) = setup_test_server().await;

    server
        .get("/items/stolen")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/items/stolen/live")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_claim_flow_over_http() {
    let (server, services) = setup_test_server().await;

    as_user(server.put("/users/me/push-token"), "alice")
        .json(&json!({ "token": "ExponentPushToken[alice]" }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let id = create_posting(&server, "found", "alice").await;
    let snapshot = active(&server, "found").await.remove(0);

    let response = as_user(server.post(&format!("/items/found/{}/claim", id)), "bob")
        .json(&snapshot)
        .await;
    response.assert_status(StatusCode::CREATED);
    let log_id = response.json::<ClaimResponseDto>().log_id;

    assert!(active(&server, "found").await.is_empty());

    let logs = server.get("/logs").await.json::<Vec<LostAndFoundLog>>();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].id, log_id);
    assert_eq!(logs[0].poster.email, "alice@campus.edu");
    assert_eq!(logs[0].claimer.email, "bob@campus.edu");

    let recorder = services.push_recorder.unwrap();
    let messages = recorder.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to, "ExponentPushToken[alice]");
    assert!(messages[0].body.contains("bob@campus.edu"));

    // Replaying the claim conflicts
    let response = as_user(server.post(&format!("/items/found/{}/claim", id)), "carol")
        .json(&snapshot)
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<ErrorResponseDto>().error, "AlreadyResolved");
}

#[tokio::test]
async fn test_self_claim_is_forbidden() {
    let (server, _) = setup_test_server().await;

    let id = create_posting(&server, "lost", "alice").await;
    let snapshot = active(&server, "lost").await.remove(0);

    let response = as_user(server.post(&format!("/items/lost/{}/claim", id)), "alice")
        .json(&snapshot)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(active(&server, "lost").await.len(), 1);
}

#[tokio::test]
async fn test_claim_against_wrong_feed_is_rejected() {
    let (server, _) = setup_test_server().await;

    let id = create_posting(&server, "lost", "alice").await;
    let snapshot = active(&server, "lost").await.remove(0);

    let response = as_user(server.post(&format!("/items/found/{}/claim", id)), "bob")
        .json(&snapshot)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(active(&server, "lost").await.len(), 1);
}

#[tokio::test]
async fn test_remove_posting_is_idempotent() {
    let (server, _) = setup_test_server().await;

    let id = create_posting(&server, "lost", "alice").await;
    let snapshot = active(&server, "lost").await.remove(0);
    let url = format!(
        "/items/lost/{}?deletion_handle={}",
        id,
        urlencoding::encode(snapshot.image().deletion_handle.as_str())
    );

    for _ in 0..2 {
        as_user(server.delete(&url), "alice")
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }

    assert!(active(&server, "lost").await.is_empty());
    assert!(server
        .get("/logs")
        .await
        .json::<Vec<LostAndFoundLog>>()
        .is_empty());
}

#[tokio::test]
async fn test_only_the_poster_can_remove() {
    let (server, _) = setup_test_server().await;

    let id = create_posting(&server, "lost", "alice").await;
    let snapshot = active(&server, "lost").await.remove(0);
    let handle = snapshot.image().deletion_handle.as_str().to_string();

    let response = as_user(
        server.delete(&format!(
            "/items/lost/{}?deletion_handle={}",
            id,
            urlencoding::encode(&handle)
        )),
        "mallory",
    )
    .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<ErrorResponseDto>().error, "Forbidden");

    // The poster cannot aim the deletion at some other object either
    as_user(
        server.delete(&format!(
            "/items/lost/{}?deletion_handle=found_images%2Fother.jpg",
            id
        )),
        "alice",
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(active(&server, "lost").await.len(), 1);
    server
        .get(&format!("/images/{}", handle))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_claim_with_blank_poster_email_is_rejected() {
    let (server, _) = setup_test_server().await;

    let id = create_posting(&server, "found", "alice").await;
    let mut snapshot = server.get("/items/found").await.json::<Value>()[0].clone();
    snapshot["poster"]["email"] = json!("");

    let response = as_user(server.post(&format!("/items/found/{}/claim", id)), "bob")
        .json(&snapshot)
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(active(&server, "found").await.len(), 1);
    assert!(server
        .get("/logs")
        .await
        .json::<Vec<LostAndFoundLog>>()
        .is_empty());
}

#[tokio::test]
async fn test_image_url_is_served() {
    let (server, _) = setup_test_server().await;

    create_posting(&server, "found", "alice").await;
    let posting = active(&server, "found").await.remove(0);

    let image_path = posting
        .image()
        .url
        .strip_prefix(DEFAULT_PUBLIC_BASE_URL.trim_end_matches("/images"))
        .unwrap()
        .to_string();
    assert!(image_path.starts_with("/images/found_images/"));

    let response = server.get(&image_path).await;
    response.assert_status_ok();
    assert_eq!(response.header(header::CONTENT_TYPE), "image/jpeg");
    assert_eq!(response.as_bytes().as_ref(), b"\xff\xd8\xff\xe0 fake jpeg");

    server
        .get("/images/found_images/missing.jpg")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

async fn next_event(body: &mut BodyDataStream) -> String {
    let chunk = tokio::time::timeout(Duration::from_secs(5), body.next())
        .await
        .expect("no event within five seconds")
        .expect("event stream ended")
        .unwrap();
    String::from_utf8(chunk.to_vec()).unwrap()
}

#[tokio::test]
async fn test_live_feed_streams_snapshots() {
    let (server, services) = setup_test_server().await;

    let request = Request::builder()
        .uri("/items/found/live")
        .body(Body::empty())
        .unwrap();
    let response = services.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );

    let mut body = response.into_body().into_data_stream();

    let first = next_event(&mut body).await;
    assert!(first.contains("event: snapshot"));
    assert!(first.contains("data: []"));

    create_posting(&server, "found", "alice").await;

    let mut event = next_event(&mut body).await;
    for _ in 0..3 {
        if event.contains("Blue Umbrella") {
            break;
        }
        event = next_event(&mut body).await;
    }
    assert!(event.contains("event: snapshot"));
    assert!(event.contains("Blue Umbrella"));
    assert!(event.contains("alice@campus.edu"));
}

#[tokio::test]
async fn test_register_push_token_receives_broadcasts() {
    let (server, services) = setup_test_server().await;

    as_user(server.put("/users/me/push-token"), "bob")
        .json(&json!({ "token": "ExponentPushToken[bob]" }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    create_posting(&server, "lost", "alice").await;

    let recorder = services.push_recorder.unwrap();
    assert_eq!(
        recorder.addresses().await,
        vec!["ExponentPushToken[bob]".to_string()]
    );
}
