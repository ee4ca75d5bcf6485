//! End-to-end tests for the HTTP transfer endpoint.
//!
//! Runs the full actix application over in-memory adapters and exercises
//! the wire contract: multipart sends, conversation listings, image
//! retrieval, and error mapping.

use std::sync::Arc;

use actix_web::{
    App, Error,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::StatusCode,
    test, web,
};
use mockable::DefaultClock;
use serde_json::Value;

use parley::config::Config;
use parley::media::memory::InMemoryMediaStore;
use parley::message::{
    adapters::memory::InMemoryMessageRepository, domain::UserId,
    services::send::MessageService, validation::service::DefaultMessageValidator,
};
use parley::transfer;

const BOUNDARY: &str = "parley-test-boundary";

type MemoryService = MessageService<
    InMemoryMessageRepository,
    InMemoryMediaStore,
    DefaultMessageValidator,
    DefaultClock,
>;

fn test_app(
    config: Config,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    let service: MemoryService = MessageService::new(
        Arc::new(InMemoryMessageRepository::new()),
        Arc::new(InMemoryMediaStore::new()),
        DefaultMessageValidator::new(),
        Arc::new(DefaultClock),
    );

    App::new()
        .app_data(web::Data::new(service))
        .app_data(web::Data::new(config))
        .configure(
            transfer::configure::<
                InMemoryMessageRepository,
                InMemoryMediaStore,
                DefaultMessageValidator,
                DefaultClock,
            >,
        )
}

fn push_text_field(body: &mut Vec<u8>, name: &str, value: &str) {
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .as_bytes(),
    );
}

fn push_file_field(body: &mut Vec<u8>, name: &str, mime: &str, bytes: &[u8]) {
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
             filename=\"upload.bin\"\r\nContent-Type: {mime}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
}

fn close_body(body: &mut Vec<u8>) {
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
}

fn text_send_body(sender: UserId, recipient: UserId, text: &str) -> Vec<u8> {
    let mut body = Vec::new();
    push_text_field(&mut body, "senderId", &sender.to_string());
    push_text_field(&mut body, "recipientId", &recipient.to_string());
    push_text_field(&mut body, "messageType", "text");
    push_text_field(&mut body, "messageText", text);
    close_body(&mut body);
    body
}

fn image_send_body(sender: UserId, recipient: UserId, mime: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    push_text_field(&mut body, "senderId", &sender.to_string());
    push_text_field(&mut body, "recipientId", &recipient.to_string());
    push_text_field(&mut body, "messageType", "image");
    push_file_field(&mut body, "imageFile", mime, bytes);
    close_body(&mut body);
    body
}

fn multipart_post(body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/messages")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

#[actix_web::test]
async fn health_endpoint_reports_ok() {
    let app = test::init_service(test_app(Config::default())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request())
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn text_message_round_trips_through_the_endpoint() {
    let app = test::init_service(test_app(Config::default())).await;
    let alice = UserId::new();
    let bob = UserId::new();

    let send = multipart_post(text_send_body(alice, bob, "hello bob")).to_request();
    let resp = test::call_service(&app, send).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let sent: Value = test::read_body_json(resp).await;
    assert_eq!(sent["messageType"], "text");
    assert_eq!(sent["messageText"], "hello bob");
    assert_eq!(sent["sequenceNumber"], 1);

    let list = test::TestRequest::get()
        .uri(&format!("/messages/{alice}/{bob}"))
        .to_request();
    let listing: Value = test::call_and_read_body_json(&app, list).await;

    let data = listing["data"].as_array().expect("data array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["messageText"], "hello bob");
    assert_eq!(data[0]["senderId"], sent["senderId"]);
}

#[actix_web::test]
async fn listing_is_symmetric_in_path_order() {
    let app = test::init_service(test_app(Config::default())).await;
    let alice = UserId::new();
    let bob = UserId::new();

    let send = multipart_post(text_send_body(alice, bob, "either way")).to_request();
    assert_eq!(
        test::call_service(&app, send).await.status(),
        StatusCode::OK
    );

    let forward: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/messages/{alice}/{bob}"))
            .to_request(),
    )
    .await;
    let backward: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/messages/{bob}/{alice}"))
            .to_request(),
    )
    .await;

    assert_eq!(forward, backward);
}

#[actix_web::test]
async fn image_upload_serves_identical_bytes_back() {
    let app = test::init_service(test_app(Config::default())).await;
    let alice = UserId::new();
    let bob = UserId::new();
    let image_bytes = b"pretend this is a png".to_vec();

    let send =
        multipart_post(image_send_body(alice, bob, "image/png", &image_bytes)).to_request();
    let resp = test::call_service(&app, send).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let sent: Value = test::read_body_json(resp).await;
    assert_eq!(sent["messageType"], "image");
    let image_url = sent["imageUrl"].as_str().expect("image reference");

    let fetch = test::TestRequest::get()
        .uri(&format!("/files/{image_url}"))
        .to_request();
    let fetched = test::call_service(&app, fetch).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(
        fetched
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("image/png")
    );

    let bytes = test::read_body(fetched).await;
    assert_eq!(bytes.as_ref(), image_bytes.as_slice());
}

#[actix_web::test]
async fn blank_text_is_rejected_with_bad_request() {
    let app = test::init_service(test_app(Config::default())).await;
    let alice = UserId::new();
    let bob = UserId::new();

    let send = multipart_post(text_send_body(alice, bob, "   ")).to_request();
    let resp = test::call_service(&app, send).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().is_some());

    let listing: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/messages/{alice}/{bob}"))
            .to_request(),
    )
    .await;
    assert_eq!(listing["data"].as_array().map(Vec::len), Some(0));
}

#[actix_web::test]
async fn sending_to_oneself_is_rejected() {
    let app = test::init_service(test_app(Config::default())).await;
    let user = UserId::new();

    let send = multipart_post(text_send_body(user, user, "hello me")).to_request();
    let resp = test::call_service(&app, send).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn missing_message_type_is_rejected() {
    let app = test::init_service(test_app(Config::default())).await;
    let mut body = Vec::new();
    push_text_field(&mut body, "senderId", &UserId::new().to_string());
    push_text_field(&mut body, "recipientId", &UserId::new().to_string());
    push_text_field(&mut body, "messageText", "no type");
    close_body(&mut body);

    let resp = test::call_service(&app, multipart_post(body).to_request()).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn image_type_without_file_is_rejected() {
    let app = test::init_service(test_app(Config::default())).await;
    let mut body = Vec::new();
    push_text_field(&mut body, "senderId", &UserId::new().to_string());
    push_text_field(&mut body, "recipientId", &UserId::new().to_string());
    push_text_field(&mut body, "messageType", "image");
    close_body(&mut body);

    let resp = test::call_service(&app, multipart_post(body).to_request()).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn non_image_upload_is_rejected() {
    let app = test::init_service(test_app(Config::default())).await;

    let send = multipart_post(image_send_body(
        UserId::new(),
        UserId::new(),
        "text/plain",
        b"not an image",
    ))
    .to_request();
    let resp = test::call_service(&app, send).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn oversized_image_is_rejected_with_payload_too_large() {
    let config = Config {
        max_image_bytes: 16,
        ..Config::default()
    };
    let app = test::init_service(test_app(config)).await;

    let send = multipart_post(image_send_body(
        UserId::new(),
        UserId::new(),
        "image/png",
        &[0u8; 64],
    ))
    .to_request();
    let resp = test::call_service(&app, send).await;

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[actix_web::test]
async fn unknown_pair_lists_empty_conversation() {
    let app = test::init_service(test_app(Config::default())).await;

    let listing: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/messages/{}/{}", UserId::new(), UserId::new()))
            .to_request(),
    )
    .await;

    assert_eq!(listing["data"].as_array().map(Vec::len), Some(0));
}

#[actix_web::test]
async fn malformed_listing_participant_is_rejected() {
    let app = test::init_service(test_app(Config::default())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/messages/not-a-uuid/{}", UserId::new()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().is_some());
}

#[actix_web::test]
async fn unknown_image_reference_is_not_found() {
    let app = test::init_service(test_app(Config::default())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/files/0a1b2c3d.jpg")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn traversal_style_reference_is_rejected() {
    let app = test::init_service(test_app(Config::default())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/files/evil..name")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_participant_id_is_rejected() {
    let app = test::init_service(test_app(Config::default())).await;
    let mut body = Vec::new();
    push_text_field(&mut body, "senderId", "not-a-uuid");
    push_text_field(&mut body, "recipientId", &UserId::new().to_string());
    push_text_field(&mut body, "messageType", "text");
    push_text_field(&mut body, "messageText", "hello");
    close_body(&mut body);

    let resp = test::call_service(&app, multipart_post(body).to_request()).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
