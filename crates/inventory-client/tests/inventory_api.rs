use async_trait::async_trait;
use inventory_client::{
    Error, ErrorKind, InventoryClient, InventoryClientBuilder, IpReservation, IpamIpRequest, Node,
    Resource,
};
use inventory_core::config::InventoryConfig;
use inventory_core::MacAddress;
use inventory_sigv4::{Credential, CredentialBroker, CredentialSource, SigningConfig};
use serde_json::json;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MAC: MacAddress = MacAddress::new([0x00, 0x01, 0x02, 0x03, 0x04, 0x05]);

fn static_signing() -> SigningConfig {
    SigningConfig::new(
        "us-east-2",
        CredentialSource::static_credential(Credential::new("AKIDEXAMPLE", "secret")),
    )
    .unwrap()
}

fn client(server: &MockServer) -> InventoryClient {
    InventoryClient::new(format!("{}/v0/", server.uri()), static_signing()).unwrap()
}

#[derive(Default)]
struct CountingBroker {
    issued: AtomicUsize,
}

#[async_trait]
impl CredentialBroker for CountingBroker {
    async fn issue_credential(&self, role: &str) -> inventory_client::Result<Credential> {
        assert_eq!(role, "inventory");
        self.issued.fetch_add(1, Ordering::SeqCst);
        Ok(Credential::new("ASIABROKER", "broker-secret").with_session_token("broker-token"))
    }
}

#[tokio::test]
async fn node_get_decodes_requested_identifier() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/node/test-000"))
        .and(header_exists("authorization"))
        .and(header_exists("x-amz-date"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"InventoryID": "test-000"})))
        .expect(1)
        .mount(&server)
        .await;

    let node = client(&server).node().get("test-000").await.unwrap();
    assert_eq!(node.id(), "test-000");
}

#[tokio::test]
async fn node_get_all_preserves_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/node"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"InventoryID": "test-000"},
            {"InventoryID": "test-001"},
            {"InventoryID": "test-002"}
        ])))
        .mount(&server)
        .await;

    let nodes = client(&server).node().get_all().await.unwrap();
    let ids: Vec<&str> = nodes.iter().map(Node::id).collect();
    assert_eq!(ids, vec!["test-000", "test-001", "test-002"]);
}

#[tokio::test]
async fn node_create_conflict_carries_remote_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v0/node"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "status": "Conflict",
            "error": "object already exists"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .node()
        .create(&Node::new("test-000"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.error_code(), "CONFLICT");
    let api = err.api_error().unwrap();
    assert_eq!(api.status, "Conflict");
    assert_eq!(api.message, "object already exists");
    assert_eq!(api.path, "/v0/node");
}

#[tokio::test]
async fn node_delete_success_and_missing() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v0/node/test-000"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v0/node/test-404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "Not Found",
            "error": "object not found"
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    client.node().delete(&Node::new("test-000")).await.unwrap();
    let err = client
        .node()
        .delete(&Node::new("test-404"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn ipam_scenario_pending_reservation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/ipam/ip/10.0.0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "mac": "00:01:02:03:04:05",
            "ip": "10.0.0.1/24",
            "start": null,
            "end": null
        })))
        .mount(&server)
        .await;

    let reservation = client(&server)
        .ipam()
        .get_ip_reservation(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)))
        .await
        .unwrap();
    assert_eq!(reservation.mac, Some(MAC));
    assert!(reservation.start.is_none());
    assert_eq!(reservation.ip.prefix_len(), Some(24));
}

#[tokio::test]
async fn ipam_update_round_trip() {
    let server = MockServer::start().await;
    let sent: IpReservation = serde_json::from_value(json!({
        "mac": "00:01:02:03:04:05",
        "ip": "10.0.0.1/24",
        "start": "2018-06-01T12:00:00Z",
        "end": null,
        "metadata": {"owner": "ops"},
        "gateway": "10.0.0.254",
        "dns": ["10.0.0.2", "10.0.0.3"]
    }))
    .unwrap();
    let wire = serde_json::to_value(&sent).unwrap();

    Mock::given(method("PUT"))
        .and(path("/v0/ipam/ip/10.0.0.1"))
        .and(body_json(wire.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(wire))
        .expect(1)
        .mount(&server)
        .await;

    let echoed = client(&server)
        .ipam()
        .update_ip_reservation(&sent)
        .await
        .unwrap();
    assert_eq!(echoed, sent);
}

#[tokio::test]
async fn ipam_create_then_lookup_by_mac() {
    let server = MockServer::start().await;
    let reservation = json!({
        "mac": "00:01:02:03:04:05",
        "ip": "10.0.0.7/24",
        "start": "2018-06-01T12:00:00Z",
        "end": null
    });
    Mock::given(method("POST"))
        .and(path("/v0/ipam/ip"))
        .respond_with(ResponseTemplate::new(201).set_body_json(reservation.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/ipam/ip"))
        .and(query_param("mac", "00:01:02:03:04:05"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([reservation])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let request = IpamIpRequest::new(MAC, "10.0.0.0/24".parse().unwrap());
    let created = client
        .ipam()
        .create_ip_reservation(&request, None)
        .await
        .unwrap();
    let found = client.ipam().get_ip_reservations_by_mac(MAC).await.unwrap();
    assert_eq!(found, vec![created]);
}

#[tokio::test]
async fn malformed_success_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/system/test-000"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .system()
        .get("test-000")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[tokio::test]
async fn broker_credentials_from_config_are_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/network/test-000"))
        .and(header("x-amz-security-token", "broker-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Name": "test-000"})))
        .expect(2)
        .mount(&server)
        .await;

    let config = InventoryConfig::new(format!("{}/v0", server.uri()))
        .unwrap()
        .with_region("us-east-2")
        .with_vault_role("inventory");
    let broker = Arc::new(CountingBroker::default());
    let shared: Arc<dyn CredentialBroker> = broker.clone();
    let client = InventoryClient::from_config(&config, Some(shared)).unwrap();

    for _ in 0..2 {
        client.network().get("test-000").await.unwrap();
    }
    assert_eq!(broker.issued.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn shared_profile_credentials_sign_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/node"))
        .and(header("x-amz-security-token", "profile-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let credentials = dir.path().join("credentials");
    std::fs::write(
        &credentials,
        "[inventory]\naws_access_key_id = AKIDPROFILE\naws_secret_access_key = profile-secret\naws_session_token = profile-token\n",
    )
    .unwrap();

    let signing = SigningConfig::new(
        "us-east-2",
        CredentialSource::SharedProfile {
            profile: "inventory".to_string(),
            credentials_file: Some(credentials),
        },
    )
    .unwrap();
    let client = InventoryClientBuilder::new(format!("{}/v0", server.uri()))
        .unwrap()
        .with_signing_config(signing)
        .build()
        .unwrap();

    assert!(client.node().get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_profile_credentials_send_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let signing = SigningConfig::new(
        "us-east-2",
        CredentialSource::SharedProfile {
            profile: "inventory".to_string(),
            credentials_file: Some(dir.path().join("absent")),
        },
    )
    .unwrap();
    let client = InventoryClient::new(format!("{}/v0", server.uri()), signing).unwrap();

    let err = client.node().get_all().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[test]
fn base_path_preserved_when_joining() {
    let client = InventoryClient::new("https://inventory.api.local/v0", static_signing()).unwrap();
    assert_eq!(
        client.url("/node").unwrap().as_str(),
        "https://inventory.api.local/v0/node"
    );
}
