//! Integration tests for security policy moves against a mock appliance.

use std::sync::Arc;
use std::time::Duration;

use fortios_core::{
    ClientConfig, CmdbClientBuilder, Error, Lifecycle, LocalConfig, RequestOptions,
    ResourceState,
};
use fortios_firewall::SecurityPolicySeq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn adapter(server: &MockServer) -> SecurityPolicySeq {
    let client = CmdbClientBuilder::new(server.uri())
        .unwrap()
        .with_token("token")
        .with_http_config(ClientConfig::new().with_retry_delay(Duration::ZERO))
        .build()
        .unwrap();
    SecurityPolicySeq::new(Arc::new(client))
}

fn move_request(src: i64, dst: i64, position: &str) -> ResourceState {
    ResourceState::new(
        LocalConfig::new()
            .with("policy_src_id", src)
            .with("policy_dst_id", dst)
            .with("alter_position", position),
    )
}

fn success() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "http_method": "PUT",
        "status": "success",
        "http_status": 200
    }))
}

#[tokio::test]
async fn test_create_moves_source_after_destination() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/cmdb/firewall/policy/10"))
        .and(query_param("action", "move"))
        .and(query_param("after", "20"))
        .respond_with(success())
        .expect(1)
        .mount(&server)
        .await;

    let mut state = move_request(10, 20, "after");
    adapter(&server).create(&mut state).await.unwrap();

    assert_eq!(state.id.as_deref(), Some("10"));
}

#[tokio::test]
async fn test_update_moves_before_within_vdom() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/cmdb/firewall/policy/3"))
        .and(query_param("action", "move"))
        .and(query_param("before", "1"))
        .and(query_param("vdom", "dmz"))
        .respond_with(success())
        .expect(1)
        .mount(&server)
        .await;

    let mut state = move_request(3, 1, "before");
    state.id = Some("3".to_string());
    adapter(&server)
        .with_options(RequestOptions::new().with_vdom("dmz"))
        .update(&mut state)
        .await
        .unwrap();

    assert_eq!(state.id.as_deref(), Some("3"));
}

#[tokio::test]
async fn test_invalid_position_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(success())
        .expect(0)
        .mount(&server)
        .await;

    let mut state = move_request(10, 20, "below");
    let err = adapter(&server).create(&mut state).await.unwrap_err();

    assert_eq!(err.root_cause(), &Error::InvalidPosition("below".to_string()));
    assert!(state.id.is_none());
}

#[tokio::test]
async fn test_read_and_delete_make_no_calls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(success())
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(success())
        .expect(0)
        .mount(&server)
        .await;

    let resource = adapter(&server);
    let mut state = move_request(10, 20, "after");
    state.id = Some("10".to_string());

    resource.read(&mut state).await.unwrap();
    assert_eq!(state.id.as_deref(), Some("10"));

    resource.delete(&mut state).await.unwrap();
    assert!(state.id.is_none());
}

#[tokio::test]
async fn test_move_failure_is_wrapped() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/cmdb/firewall/policy/10"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "error",
            "http_status": 404
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut state = move_request(10, 99, "after");
    let err = adapter(&server).create(&mut state).await.unwrap_err();

    assert!(err
        .to_string()
        .starts_with("Error moving FirewallSecurityPolicySeq resource"));
    assert!(matches!(err.root_cause(), Error::NotFound(_)));
    assert!(state.id.is_none());
}
