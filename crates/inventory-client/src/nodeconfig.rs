//! Read-only node configuration lookups.

use inventory_core::query::QueryParams;
use inventory_core::{Error, MacAddress, Result};

use crate::client::InventoryClient;
use crate::models::InventoryNode;

const NODECONFIG_PATH: &str = "nodeconfig";

/// Client for `/nodeconfig`.
#[derive(Debug, Clone, Copy)]
pub struct NodeConfigClient<'a> {
    client: &'a InventoryClient,
}

impl<'a> NodeConfigClient<'a> {
    pub(crate) fn new(client: &'a InventoryClient) -> Self {
        Self { client }
    }

    /// Fetch the configuration of one node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the node does not exist.
    pub async fn get(&self, id: &str) -> Result<InventoryNode> {
        let url = self.client.item_url(NODECONFIG_PATH, id)?;
        self.client.get_json(url, &QueryParams::new()).await
    }

    /// Fetch the configuration of every node.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the list cannot be decoded.
    pub async fn get_all(&self) -> Result<Vec<InventoryNode>> {
        let url = self.client.url(NODECONFIG_PATH)?;
        self.client.get_json(url, &QueryParams::new()).await
    }

    /// Fetch the configuration of the node owning `mac`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LookupFailed`] unless exactly one node matches.
    pub async fn get_by_mac(&self, mac: MacAddress) -> Result<InventoryNode> {
        let url = self.client.url(NODECONFIG_PATH)?;
        let mut nodes: Vec<InventoryNode> = self
            .client
            .get_json(url, &QueryParams::single("mac", mac))
            .await?;

        match nodes.len() {
            1 => Ok(nodes.remove(0)),
            count => Err(Error::LookupFailed(format!(
                "expected one node for mac {mac}, got {count}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_core::ErrorKind;
    use inventory_sigv4::{Credential, CredentialSource, SigningConfig};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MAC: MacAddress = MacAddress::new([0x00, 0x01, 0x02, 0x03, 0x04, 0x05]);

    fn client(server: &MockServer) -> InventoryClient {
        let signing = SigningConfig::new(
            "us-east-2",
            CredentialSource::static_credential(Credential::new("AKID", "secret")),
        )
        .unwrap();
        InventoryClient::new(format!("{}/v0/", server.uri()), signing).unwrap()
    }

    async fn mount_lookup(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/v0/nodeconfig"))
            .and(query_param("mac", "00:01:02:03:04:05"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn get_by_mac_single_match() {
        let server = MockServer::start().await;
        mount_lookup(
            &server,
            json!([{"InventoryID": "test-000", "Hostname": "node-000"}]),
        )
        .await;

        let client = client(&server);
        let node = client.node_config().get_by_mac(MAC).await.unwrap();
        assert_eq!(node.inventory_id, "test-000");
        assert_eq!(node.hostname.as_deref(), Some("node-000"));
    }

    #[tokio::test]
    async fn get_by_mac_no_match() {
        let server = MockServer::start().await;
        mount_lookup(&server, json!([])).await;

        let client = client(&server);
        let err = client.node_config().get_by_mac(MAC).await.unwrap_err();
        assert!(matches!(err, Error::LookupFailed(_)));
        assert_eq!(err.kind(), ErrorKind::Invariant);
    }

    #[tokio::test]
    async fn get_by_mac_ambiguous() {
        let server = MockServer::start().await;
        mount_lookup(
            &server,
            json!([{"InventoryID": "test-000"}, {"InventoryID": "test-001"}]),
        )
        .await;

        let client = client(&server);
        let err = client.node_config().get_by_mac(MAC).await.unwrap_err();
        assert!(matches!(err, Error::LookupFailed(_)));
    }

    #[tokio::test]
    async fn get_and_get_all() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/nodeconfig/test-000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"InventoryID": "test-000"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/nodeconfig"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"InventoryID": "test-000"},
                {"InventoryID": "test-001"}
            ])))
            .mount(&server)
            .await;

        let client = client(&server);
        let node = client.node_config().get("test-000").await.unwrap();
        assert_eq!(node.inventory_id, "test-000");
        let nodes = client.node_config().get_all().await.unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].inventory_id, "test-001");
    }
}
