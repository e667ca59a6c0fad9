//! DHCP operations
//!
//! Fixed addresses, leases, networks, ranges and their templates. None of
//! these objects carry a creator, so lookups send only the caller's filters.

use crate::client::WapiClient;
use crate::common::query::{build_query, Filter};
use crate::error::WapiResult;
use crate::models::{fields, merge_fields, Fields, ObjectRef};
use serde_json::{json, Value};
use tracing::debug;

const FIXED_ADDRESS: &str = "/fixedaddress";
const LEASE: &str = "/lease";
const NETWORK: &str = "/network";
const RANGE: &str = "/range";
const NETWORK_TEMPLATE: &str = "/networktemplate";
const RANGE_TEMPLATE: &str = "/rangetemplate";

/// DHCP resource module, borrowed from [`WapiClient::dhcp`]
#[derive(Debug, Clone, Copy)]
pub struct Dhcp<'a> {
    client: &'a WapiClient,
}

impl<'a> Dhcp<'a> {
    pub(crate) fn new(client: &'a WapiClient) -> Self {
        Self { client }
    }

    async fn find(
        &self,
        path: &str,
        clause: Filter,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.client.get(build_query(path, &[clause]), return_fields).await
    }

    async fn create(&self, path: &str, required: Fields, opts: Fields) -> WapiResult<Value> {
        self.client.post(path.to_string(), merge_fields(required, opts)).await
    }

    // Fixed addresses

    pub async fn get_fixed_addr_by_ip(
        &self,
        ipv4addr: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(FIXED_ADDRESS, Filter::eq("ipv4addr", ipv4addr), return_fields).await
    }

    /// `mac` in `00:00:00:00:00:00` form
    pub async fn get_fixed_addr_by_mac(
        &self,
        mac: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(FIXED_ADDRESS, Filter::eq("mac", mac), return_fields).await
    }

    /// `network` in CIDR notation
    pub async fn get_fixed_addr_by_network(
        &self,
        network: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(FIXED_ADDRESS, Filter::eq("network", network), return_fields).await
    }

    pub async fn get_fixed_addr_by_attr(
        &self,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(FIXED_ADDRESS, Filter::attr(attr_name, attr_value), return_fields).await
    }

    pub async fn search_fixed_addr_by_ip(
        &self,
        ipv4addr: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(FIXED_ADDRESS, Filter::search("ipv4addr", ipv4addr), return_fields).await
    }

    pub async fn search_fixed_addr_by_mac(
        &self,
        mac: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(FIXED_ADDRESS, Filter::search("mac", mac), return_fields).await
    }

    pub async fn search_fixed_addr_by_network(
        &self,
        network: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(FIXED_ADDRESS, Filter::search("network", network), return_fields).await
    }

    /// Reference of the fixed address binding `ipv4addr` to `mac`
    ///
    /// # Returns
    /// * `Ok(Some(ref))` - First matching object
    /// * `Ok(None)` - No fixed address matches
    /// * `Err(WapiError)` - The lookup itself failed
    pub async fn get_fixed_addr_ref(
        &self,
        ipv4addr: &str,
        mac: &str,
    ) -> WapiResult<Option<ObjectRef>> {
        self.client
            .get_ref(build_query(
                FIXED_ADDRESS,
                &[Filter::eq("ipv4addr", ipv4addr), Filter::eq("mac", mac)],
            ))
            .await
    }

    /// Reserve `ipv4addr` for `mac`, returning the new reference
    pub async fn create_fixed_addr(
        &self,
        ipv4addr: &str,
        mac: &str,
        opts: Fields,
    ) -> WapiResult<Value> {
        let required = fields([("ipv4addr", json!(ipv4addr)), ("mac", json!(mac))]);
        self.create(FIXED_ADDRESS, required, opts).await
    }

    // Leases

    pub async fn get_lease_by_addr(
        &self,
        address: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(LEASE, Filter::eq("address", address), return_fields).await
    }

    pub async fn get_lease_by_mac(
        &self,
        mac: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(LEASE, Filter::eq("hardware", mac), return_fields).await
    }

    pub async fn get_lease_by_hostname(
        &self,
        hostname: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(LEASE, Filter::eq("client_hostname", hostname), return_fields).await
    }

    pub async fn get_lease_by_fingerprint(
        &self,
        fingerprint: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(LEASE, Filter::eq("fingerprint", fingerprint), return_fields).await
    }

    pub async fn search_lease_by_addr(
        &self,
        address: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(LEASE, Filter::search("address", address), return_fields).await
    }

    pub async fn search_lease_by_mac(
        &self,
        mac: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(LEASE, Filter::search("hardware", mac), return_fields).await
    }

    pub async fn search_lease_by_hostname(
        &self,
        hostname: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(LEASE, Filter::search("client_hostname", hostname), return_fields).await
    }

    pub async fn search_lease_by_fingerprint(
        &self,
        fingerprint: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(LEASE, Filter::search("fingerprint", fingerprint), return_fields).await
    }

    // Networks

    pub async fn get_network_by_network(
        &self,
        network: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(NETWORK, Filter::eq("network", network), return_fields).await
    }

    pub async fn get_network_by_comment(
        &self,
        comment: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(NETWORK, Filter::eq("comment", comment), return_fields).await
    }

    pub async fn get_network_by_attr(
        &self,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(NETWORK, Filter::attr(attr_name, attr_value), return_fields).await
    }

    pub async fn search_network_by_network(
        &self,
        network: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(NETWORK, Filter::search("network", network), return_fields).await
    }

    pub async fn search_network_by_comment(
        &self,
        comment: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(NETWORK, Filter::search("comment", comment), return_fields).await
    }

    /// Ask the appliance for the next `num` free addresses of a network
    ///
    /// # Arguments
    /// * `reference` - Network object reference
    /// * `num` - Number of addresses to return
    ///
    /// # Returns
    /// * `Ok(Value)` - `{"ips": [...]}` as returned by the appliance
    pub async fn next_available_ip(&self, reference: &str, num: u32) -> WapiResult<Value> {
        debug!("Requesting {} free address(es) from {}", num, reference);
        self.client
            .post(
                format!("/{}?_function=next_available_ip", reference),
                json!({ "num": num }),
            )
            .await
    }

    /// Create a network (CIDR), returning its reference
    pub async fn create_network(&self, network: &str, opts: Fields) -> WapiResult<Value> {
        self.create(NETWORK, fields([("network", json!(network))]), opts).await
    }

    // Ranges

    pub async fn get_range_by_network(
        &self,
        network: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RANGE, Filter::eq("network", network), return_fields).await
    }

    pub async fn get_range_by_start_addr(
        &self,
        address: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RANGE, Filter::eq("start_addr", address), return_fields).await
    }

    pub async fn get_range_by_end_addr(
        &self,
        address: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RANGE, Filter::eq("end_addr", address), return_fields).await
    }

    pub async fn search_range_by_network(
        &self,
        network: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RANGE, Filter::search("network", network), return_fields).await
    }

    pub async fn create_range(
        &self,
        start_addr: &str,
        end_addr: &str,
        opts: Fields,
    ) -> WapiResult<Value> {
        let required = fields([("start_addr", json!(start_addr)), ("end_addr", json!(end_addr))]);
        self.create(RANGE, required, opts).await
    }

    // Templates

    pub async fn get_network_templates(&self, return_fields: Option<&str>) -> WapiResult<Value> {
        self.client.get(NETWORK_TEMPLATE.to_string(), return_fields).await
    }

    pub async fn get_range_templates(&self, return_fields: Option<&str>) -> WapiResult<Value> {
        self.client.get(RANGE_TEMPLATE.to_string(), return_fields).await
    }
}

#[cfg(test)]
mod tests {
    use crate::config::WapiConfig;
    use crate::mock::MockTransport;
    use crate::models::{Fields, ObjectRef};
    use crate::WapiClient;
    use reqwest::Method;
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (Arc<MockTransport>, WapiClient) {
        let mock = Arc::new(MockTransport::new());
        let config = WapiConfig::new("gm.example.com", "admin", "secret");
        let client = WapiClient::with_transport(mock.clone(), &config);
        (mock, client)
    }

    #[tokio::test]
    async fn create_fixed_addr_posts_merged_body() {
        let (mock, client) = setup();
        mock.push_ok(json!("fixedaddress/ZG5zLmZpeGVkX2FkZHJlc3Mk:10.0.0.5/default"));
        let mut opts = Fields::new();
        opts.insert("name".to_string(), json!("host1"));

        let result = client
            .dhcp()
            .create_fixed_addr("10.0.0.5", "aa:bb:cc:dd:ee:ff", opts)
            .await
            .expect("create");

        assert_eq!(result, json!("fixedaddress/ZG5zLmZpeGVkX2FkZHJlc3Mk:10.0.0.5/default"));
        let request = mock.last_request().expect("request");
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.uri(), "/fixedaddress?_return_type=json");
        assert_eq!(
            request.body,
            Some(json!({"ipv4addr": "10.0.0.5", "mac": "aa:bb:cc:dd:ee:ff", "name": "host1"}))
        );
    }

    #[tokio::test]
    async fn create_range_lets_caller_override_required_fields() {
        let (mock, client) = setup();
        let mut opts = Fields::new();
        opts.insert("end_addr".to_string(), json!("10.0.0.200"));
        opts.insert("comment".to_string(), json!("pool"));

        client
            .dhcp()
            .create_range("10.0.0.100", "10.0.0.150", opts)
            .await
            .expect("create");

        assert_eq!(
            mock.last_request().and_then(|r| r.body),
            Some(json!({"start_addr": "10.0.0.100", "end_addr": "10.0.0.200", "comment": "pool"}))
        );
    }

    #[tokio::test]
    async fn next_available_ip_calls_function() {
        let (mock, client) = setup();
        mock.push_ok(json!({"ips": ["10.0.0.10", "10.0.0.11", "10.0.0.12"]}));

        let result = client
            .dhcp()
            .next_available_ip("network/ZG5zLm5ldHdvcmsk:10.0.0.0/24/default", 3)
            .await
            .expect("next ip");

        assert_eq!(result["ips"].as_array().map(Vec::len), Some(3));
        let request = mock.last_request().expect("request");
        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.uri(),
            "/network/ZG5zLm5ldHdvcmsk:10.0.0.0/24/default?_function=next_available_ip&_return_type=json"
        );
        assert_eq!(request.body, Some(json!({"num": 3})));
    }

    #[tokio::test]
    async fn fixed_addr_ref_first_match_or_none() {
        let (mock, client) = setup();
        mock.push_ok(json!([
            {"_ref": "fixedaddress/ONE:10.0.0.5/default"},
            {"_ref": "fixedaddress/TWO:10.0.0.5/default"}
        ]));
        mock.push_ok(json!([]));
        let dhcp = client.dhcp();

        let found = dhcp.get_fixed_addr_ref("10.0.0.5", "aa:bb:cc:dd:ee:ff").await.expect("ref");
        assert_eq!(found, Some(ObjectRef::new("fixedaddress/ONE:10.0.0.5/default")));
        assert_eq!(
            mock.last_uri().as_deref(),
            Some("/fixedaddress?ipv4addr=10.0.0.5&mac=aa:bb:cc:dd:ee:ff&_return_type=json&_max_results=1000")
        );

        let missing = dhcp.get_fixed_addr_ref("10.0.0.6", "aa:bb:cc:dd:ee:00").await.expect("ref");
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn reference_lookup_propagates_rejection() {
        let (mock, client) = setup();
        mock.push_err(401, "GET /fixedaddress failed: 401 Unauthorized");

        let err = client
            .dhcp()
            .get_fixed_addr_ref("10.0.0.5", "aa:bb:cc:dd:ee:ff")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(401));
    }

    #[tokio::test]
    async fn lease_fields() {
        let (mock, client) = setup();
        let dhcp = client.dhcp();

        dhcp.get_lease_by_mac("aa:bb:cc:dd:ee:ff", None).await.expect("lease");
        assert_eq!(
            mock.last_uri().as_deref(),
            Some("/lease?hardware=aa:bb:cc:dd:ee:ff&_return_type=json&_max_results=1000")
        );

        dhcp.search_lease_by_hostname("printer", Some("address")).await.expect("lease");
        assert_eq!(
            mock.last_uri().as_deref(),
            Some("/lease?client_hostname~=printer&_return_type=json&_return_fields%2B=address&_max_results=1000")
        );
    }

    #[tokio::test]
    async fn network_and_range_lookups() {
        let (mock, client) = setup();
        let dhcp = client.dhcp();

        dhcp.get_network_by_attr("Site", "PAR", None).await.expect("network");
        assert_eq!(
            mock.last_uri().as_deref(),
            Some("/network?*Site=PAR&_return_type=json&_max_results=1000")
        );

        dhcp.get_range_by_start_addr("10.0.0.100", None).await.expect("range");
        assert_eq!(
            mock.last_uri().as_deref(),
            Some("/range?start_addr=10.0.0.100&_return_type=json&_max_results=1000")
        );

        dhcp.get_range_templates(None).await.expect("templates");
        assert_eq!(
            mock.last_uri().as_deref(),
            Some("/rangetemplate?_return_type=json&_max_results=1000")
        );
    }
}
