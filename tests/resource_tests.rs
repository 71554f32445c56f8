//! Integration tests for resources and collections.
//!
//! Every test builds a [`ContextIo`] against a local mock server, so each
//! request goes through the real signed transport. `.expect(n)` pins how
//! many requests the lazy object model is allowed to make.

use contextio_lite::clients::Params;
use contextio_lite::rest::resources::lite::User;
use contextio_lite::rest::{ResourceError, RestCollection, RestResource};
use contextio_lite::{BaseUrl, ConsumerKey, ConsumerSecret, ContextIo, ContextIoConfig};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn contextio_for(server: &MockServer) -> ContextIo {
    let config = ContextIoConfig::builder()
        .consumer_key(ConsumerKey::new("test-key").unwrap())
        .consumer_secret(ConsumerSecret::new("test-secret").unwrap())
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    ContextIo::new(config).unwrap()
}

fn params(value: serde_json::Value) -> Params {
    value.as_object().cloned().unwrap()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |requests| requests.len())
}

// ============================================================================
// Construction and identity
// ============================================================================

#[tokio::test]
async fn test_resource_with_only_resource_url_fetches_that_url() {
    let server = MockServer::start().await;
    let contextio = contextio_for(&server);

    Mock::given(method("GET"))
        .and(path("/lite/users/u7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u7",
            "first_name": "Jane"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = User::build(
        contextio.api(),
        params(json!({"resource_url": format!("{}/lite/users/u7", server.uri())})),
    )
    .unwrap();

    assert_eq!(user.first_name().await.unwrap().as_deref(), Some("Jane"));
    assert_eq!(user.id().await.unwrap().as_deref(), Some("u7"));
}

#[tokio::test]
async fn test_resource_without_identity_is_rejected() {
    let server = MockServer::start().await;
    let contextio = contextio_for(&server);

    let result = User::build(contextio.api(), params(json!({"first_name": "Jane"})));

    assert!(matches!(
        result,
        Err(ResourceError::MissingIdentity {
            resource: "user",
            primary_key: "id"
        })
    ));
}

#[tokio::test]
async fn test_keyed_access_makes_no_request() {
    let server = MockServer::start().await;
    let contextio = contextio_for(&server);

    let folder = contextio
        .users()
        .get("u1")
        .email_accounts()
        .unwrap()
        .get("primary")
        .folders()
        .unwrap()
        .get("INBOX");

    assert_eq!(
        folder.resource_url().unwrap(),
        "users/u1/email_accounts/primary/folders/INBOX"
    );
    assert_eq!(request_count(&server).await, 0);
}

// ============================================================================
// Lazy fetching
// ============================================================================

#[tokio::test]
async fn test_attributes_fetched_once_at_encoded_path() {
    let server = MockServer::start().await;
    let contextio = contextio_for(&server);

    Mock::given(method("GET"))
        .and(path("/lite/users/u1/email_accounts/a%2Fb/folders/Inbox"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Inbox",
            "nb_messages": 12,
            "nb_unseen_messages": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let folder = contextio
        .users()
        .get("u1")
        .email_accounts()
        .unwrap()
        .get("a/b")
        .folders()
        .unwrap()
        .get("Inbox");

    assert_eq!(folder.nb_messages().await.unwrap(), Some(12));
    assert_eq!(folder.nb_unseen_messages().await.unwrap(), Some(2));
    assert_eq!(folder.delimiter().await.unwrap(), None);
}

#[tokio::test]
async fn test_collection_lists_once() {
    let server = MockServer::start().await;
    let contextio = contextio_for(&server);

    Mock::given(method("GET"))
        .and(path("/lite/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "u1", "email_addresses": ["a@example.com"]},
            {"id": "u2", "email_addresses": ["b@example.com"]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let users = contextio.users();

    assert_eq!(users.size().await.unwrap(), 2);
    assert!(!users.is_empty().await.unwrap());

    let listed = users.to_vec().await.unwrap();
    assert_eq!(
        listed[1].email_addresses().await.unwrap(),
        vec!["b@example.com".to_string()]
    );
}

#[tokio::test]
async fn test_has_many_seeded_from_fetched_attributes() {
    let server = MockServer::start().await;
    let contextio = contextio_for(&server);

    Mock::given(method("GET"))
        .and(path("/lite/users/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "first_name": "Jane",
            "email_accounts": [{"label": "primary"}, {"label": "work"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lite/users/u1/email_accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let user = contextio.users().get("u1");
    user.first_name().await.unwrap();

    let accounts = user.email_accounts().unwrap();
    assert_eq!(accounts.size().await.unwrap(), 2);
}

// ============================================================================
// Constraints
// ============================================================================

#[tokio::test]
async fn test_filter_is_a_union_and_leaves_receiver_untouched() {
    let server = MockServer::start().await;
    let contextio = contextio_for(&server);

    Mock::given(method("GET"))
        .and(path("/lite/users"))
        .and(query_param("email", "jane@example.com"))
        .and(query_param("status_ok", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "u1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let users = contextio.users();
    let by_email = users.filter(params(json!({"email": "jane@example.com"})));
    let narrowed = by_email.filter(params(json!({"status_ok": true})));

    assert_eq!(narrowed.size().await.unwrap(), 1);
    assert!(users.where_constraints().is_empty());
    assert_eq!(by_email.where_constraints().len(), 1);
}

#[tokio::test]
async fn test_with_sends_normalized_constraints_on_fetch() {
    let server = MockServer::start().await;
    let contextio = contextio_for(&server);

    Mock::given(method("GET"))
        .and(path("/lite/users/u1/email_accounts/primary/folders/INBOX/messages/m1"))
        .and(query_param("include_body", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message_id": "m1",
            "subject": "Hello",
            "bodies": [{"type": "text/plain", "content": "Hi there"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lite/users/u1/email_accounts/primary/folders/INBOX/messages/m1/body"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bodies": []})))
        .expect(0)
        .mount(&server)
        .await;

    let plain = contextio
        .users()
        .get("u1")
        .email_accounts()
        .unwrap()
        .get("primary")
        .folders()
        .unwrap()
        .get("INBOX")
        .messages()
        .unwrap()
        .get("m1");
    let with_body = plain.with(params(json!({"include_body": true})));

    assert!(plain.resource().with_constraints().is_empty());
    assert_eq!(with_body.subject().await.unwrap().as_deref(), Some("Hello"));
    assert_eq!(with_body.body_plain().await.unwrap(), "Hi there");
}

// ============================================================================
// Mutations and errors
// ============================================================================

#[tokio::test]
async fn test_delete_reports_success_flag() {
    let server = MockServer::start().await;
    let contextio = contextio_for(&server);

    Mock::given(method("DELETE"))
        .and(path("/lite/users/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/lite/users/u2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(contextio.users().get("u1").delete().await.unwrap());
    assert!(!contextio.users().get("u2").delete().await.unwrap());
}

#[tokio::test]
async fn test_create_user_without_email_sends_nothing() {
    let server = MockServer::start().await;
    let contextio = contextio_for(&server);

    let result = contextio
        .users()
        .create(None, params(json!({"first_name": "Jane"})))
        .await;

    match result {
        Err(ResourceError::Validation { message, .. }) => {
            assert_eq!(message, "You must provide an email for new Users.");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_create_user_posts_and_wraps_response() {
    let server = MockServer::start().await;
    let contextio = contextio_for(&server);

    Mock::given(method("POST"))
        .and(path("/lite/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "id": "u9",
            "resource_url": format!("{}/lite/users/u9", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = contextio
        .users()
        .create(Some("jane@example.com"), Params::new())
        .await
        .unwrap();

    assert_eq!(user.id().await.unwrap().as_deref(), Some("u9"));
    assert!(user.resource().known("success").is_none());
}

#[tokio::test]
async fn test_api_error_message_surfaces() {
    let server = MockServer::start().await;
    let contextio = contextio_for(&server);

    Mock::given(method("GET"))
        .and(path("/lite/users/u1"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"type": "error", "value": "bad key"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let error = contextio.users().get("u1").username().await.unwrap_err();

    assert_eq!(error.to_string(), "bad key");
    assert_eq!(error.status(), Some(401));
    assert!(!error.is_configuration());
}
