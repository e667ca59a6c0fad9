//! IPAM operations

use crate::client::WapiClient;
use crate::common::query::{build_query, Filter};
use crate::error::WapiResult;
use serde_json::Value;

const IPV4_ADDRESS: &str = "/ipv4address";

/// IPAM resource module, borrowed from [`WapiClient::ipam`]
#[derive(Debug, Clone, Copy)]
pub struct Ipam<'a> {
    client: &'a WapiClient,
}

impl<'a> Ipam<'a> {
    pub(crate) fn new(client: &'a WapiClient) -> Self {
        Self { client }
    }

    /// IPAM view of a single IPv4 address (status, usage, names, ...)
    pub async fn get_ipv4addr_by_addr(
        &self,
        ipv4addr: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        let path = build_query(IPV4_ADDRESS, &[Filter::eq("ip_address", ipv4addr)]);
        self.client.get(path, return_fields).await
    }

    /// IPAM view of every address in a network (CIDR)
    ///
    /// Subject to the client's result cap, so large networks may need
    /// [`WapiClient::set_max_results`] raised first.
    pub async fn get_ipv4addr_by_network(
        &self,
        network: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        let path = build_query(IPV4_ADDRESS, &[Filter::eq("network", network)]);
        self.client.get(path, return_fields).await
    }
}

#[cfg(test)]
mod tests {
    use crate::config::WapiConfig;
    use crate::mock::MockTransport;
    use crate::WapiClient;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn ipv4address_lookups() {
        let mock = Arc::new(MockTransport::new());
        mock.push_ok(json!([{"ip_address": "10.0.0.5", "status": "USED"}]));
        let mut client = WapiClient::with_transport(
            mock.clone(),
            &WapiConfig::new("gm.example.com", "admin", "secret"),
        );

        let result = client
            .ipam()
            .get_ipv4addr_by_addr("10.0.0.5", Some("usage"))
            .await
            .expect("addr");
        assert_eq!(result[0]["status"], "USED");
        assert_eq!(
            mock.last_uri().as_deref(),
            Some("/ipv4address?ip_address=10.0.0.5&_return_type=json&_return_fields%2B=usage&_max_results=1000")
        );

        client.set_max_results(Some(4096));
        client.ipam().get_ipv4addr_by_network("10.0.0.0/20", None).await.expect("network");
        assert_eq!(
            mock.last_uri().as_deref(),
            Some("/ipv4address?network=10.0.0.0/20&_return_type=json&_max_results=4096")
        );
    }
}
