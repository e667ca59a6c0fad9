//! Infoblox WAPI client
//!
//! Owns the connection settings and the transport, and hands out the DNS,
//! DHCP and IPAM resource modules. Object-level operations that work on any
//! `_ref` live here as well.

use crate::common::{HttpClient, WapiRequest};
use crate::config::WapiConfig;
use crate::dhcp::Dhcp;
use crate::dns::Dns;
use crate::error::{WapiError, WapiResult};
use crate::ipam::Ipam;
use crate::models::{Creator, ObjectRef};
use crate::transport_trait::WapiTransport;
use reqwest::{Certificate, Client};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Infoblox WAPI client
pub struct WapiClient {
    transport: Arc<dyn WapiTransport>,
    base_url: String,
    max_results: Option<u32>,
    creator: Creator,
}

impl std::fmt::Debug for WapiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WapiClient")
            .field("base_url", &self.base_url)
            .field("max_results", &self.max_results)
            .field("creator", &self.creator)
            .finish_non_exhaustive()
    }
}

impl WapiClient {
    /// Create a new WAPI client
    ///
    /// When `config.ca_cert` is set, the certificates in that PEM file are the
    /// only trust anchors: the built-in public roots are switched off, so the
    /// grid master must present a chain ending at the configured CA. Without a
    /// CA file the public web roots are used.
    ///
    /// # Returns
    /// * `Ok(WapiClient)` - Ready to use client
    /// * `Err(WapiError::Config)` - Invalid settings or unreadable certificate
    pub fn new(config: WapiConfig) -> WapiResult<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(path) = &config.ca_cert {
            builder = builder.tls_built_in_root_certs(false);
            for cert in load_ca_bundle(path)? {
                builder = builder.add_root_certificate(cert);
            }
        }
        let client = builder
            .build()
            .map_err(|e| WapiError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let http = HttpClient::new(client, config.base_url(), &config.username, &config.password);
        Ok(Self::with_transport(Arc::new(http), &config))
    }

    /// Create a client on top of an existing transport
    ///
    /// Host, credentials and certificate in `config` are ignored; only the
    /// result cap and creator tag are taken from it.
    pub fn with_transport(transport: Arc<dyn WapiTransport>, config: &WapiConfig) -> Self {
        Self {
            transport,
            base_url: config.base_url(),
            max_results: config.max_results,
            creator: config.creator,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Cap currently applied to GET requests
    pub fn max_results(&self) -> Option<u32> {
        self.max_results
    }

    /// Change the cap applied to subsequent GET requests (`None` removes it)
    pub fn set_max_results(&mut self, max_results: Option<u32>) {
        self.max_results = max_results;
    }

    /// Creator tag currently added to DNS lookups
    pub fn creator(&self) -> Creator {
        self.creator
    }

    /// Change the creator tag used by DNS lookups
    pub fn set_creator(&mut self, creator: Creator) {
        self.creator = creator;
    }

    /// DNS records and delegated zones
    pub fn dns(&self) -> Dns<'_> {
        Dns::new(self)
    }

    /// Fixed addresses, leases, networks, ranges and templates
    pub fn dhcp(&self) -> Dhcp<'_> {
        Dhcp::new(self)
    }

    /// IPv4 address views
    pub fn ipam(&self) -> Ipam<'_> {
        Ipam::new(self)
    }

    /// GET a resource path, applying the configured result cap
    pub(crate) async fn get(&self, path: String, return_fields: Option<&str>) -> WapiResult<Value> {
        let request = WapiRequest::get(path, return_fields).with_max_results(self.max_results);
        self.transport.execute(request).await
    }

    /// GET a resource path and keep the first match's reference
    pub(crate) async fn get_ref(&self, path: String) -> WapiResult<Option<ObjectRef>> {
        let result = self.get(path, None).await?;
        let reference = ObjectRef::first_in(&result);
        if reference.is_none() {
            debug!("Reference lookup matched nothing");
        }
        Ok(reference)
    }

    /// POST a JSON body to a collection or function path
    pub(crate) async fn post(&self, path: String, body: Value) -> WapiResult<Value> {
        self.transport.execute(WapiRequest::post(path, body)).await
    }

    /// Get an object by reference
    ///
    /// # Arguments
    /// * `reference` - Object reference returned by a search or create
    /// * `return_fields` - Optional comma separated fields added to the defaults
    pub async fn get_obj(&self, reference: &str, return_fields: Option<&str>) -> WapiResult<Value> {
        debug!("Fetching object {}", reference);
        self.get(format!("/{}", reference), return_fields).await
    }

    /// Update an object by reference (PUT), returning its reference
    pub async fn update_obj(&self, reference: &str, data: Value) -> WapiResult<Value> {
        debug!("Updating object {}", reference);
        self.transport
            .execute(WapiRequest::put(format!("/{}", reference), data))
            .await
    }

    /// Delete an object by reference, returning the deleted reference
    pub async fn delete_obj(&self, reference: &str) -> WapiResult<Value> {
        debug!("Deleting object {}", reference);
        self.transport
            .execute(WapiRequest::delete(format!("/{}", reference)))
            .await
    }
}

/// Read every certificate of a PEM bundle, refusing a bundle with none
fn load_ca_bundle(path: &Path) -> WapiResult<Vec<Certificate>> {
    let pem = std::fs::read(path).map_err(|e| {
        WapiError::Config(format!(
            "Failed to read CA certificate {}: {}",
            path.display(),
            e
        ))
    })?;
    let certs = Certificate::from_pem_bundle(&pem).map_err(|e| {
        WapiError::Config(format!("Invalid CA certificate {}: {}", path.display(), e))
    })?;
    if certs.is_empty() {
        return Err(WapiError::Config(format!(
            "No certificate found in {}",
            path.display()
        )));
    }
    debug!("Trusting {} certificate(s) from {}", certs.len(), path.display());
    Ok(certs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use reqwest::Method;
    use serde_json::json;

    fn client(mock: &Arc<MockTransport>) -> WapiClient {
        WapiClient::with_transport(
            mock.clone(),
            &WapiConfig::new("gm.example.com", "admin", "secret"),
        )
    }

    #[tokio::test]
    async fn get_obj_applies_cap_and_fields() {
        let mock = Arc::new(MockTransport::new());
        mock.push_ok(json!({"_ref": "network/ZG5z:10.0.0.0/24/default", "comment": "lab"}));
        let client = client(&mock);

        let obj = client
            .get_obj("network/ZG5z:10.0.0.0/24/default", Some("comment"))
            .await
            .expect("get_obj");

        assert_eq!(obj["comment"], "lab");
        assert_eq!(
            mock.last_uri().as_deref(),
            Some("/network/ZG5z:10.0.0.0/24/default?_return_type=json&_return_fields%2B=comment&_max_results=1000")
        );
    }

    #[tokio::test]
    async fn update_and_delete_use_reference_path() {
        let mock = Arc::new(MockTransport::new());
        mock.push_ok(json!("record:a/ZG5z:host.example.com/default"));
        mock.push_ok(json!("record:a/ZG5z:host.example.com/default"));
        let client = client(&mock);

        let updated = client
            .update_obj("record:a/ZG5z:host.example.com/default", json!({"ttl": 600}))
            .await
            .expect("update");
        assert_eq!(updated, json!("record:a/ZG5z:host.example.com/default"));
        client
            .delete_obj("record:a/ZG5z:host.example.com/default")
            .await
            .expect("delete");

        let requests = mock.requests();
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(requests[0].body, Some(json!({"ttl": 600})));
        assert_eq!(requests[0].uri(), "/record:a/ZG5z:host.example.com/default?_return_type=json");
        assert_eq!(requests[1].method, Method::DELETE);
        assert_eq!(requests[1].uri(), "/record:a/ZG5z:host.example.com/default?_return_type=json");
    }

    #[tokio::test]
    async fn setters_change_later_requests() {
        let mock = Arc::new(MockTransport::new());
        mock.push_ok(json!([]));
        mock.push_ok(json!([]));
        let mut client = client(&mock);

        client.set_max_results(None);
        client.set_creator(Creator::Dynamic);
        assert_eq!(client.max_results(), None);
        assert_eq!(client.creator(), Creator::Dynamic);

        client.dns().get_a_by_name("host.example.com", None).await.expect("lookup");
        assert_eq!(
            mock.last_uri().as_deref(),
            Some("/record:a?name=host.example.com&creator=DYNAMIC&_return_type=json")
        );

        client.set_max_results(Some(5));
        client.get_obj("zone_delegated/ZG5z", None).await.expect("get");
        assert_eq!(
            mock.last_uri().as_deref(),
            Some("/zone_delegated/ZG5z?_return_type=json&_max_results=5")
        );
    }

    #[tokio::test]
    async fn remote_rejection_is_returned_not_raised() {
        let mock = Arc::new(MockTransport::new());
        mock.push_err(404, "GET /network/missing failed: 404 Not Found");
        let client = client(&mock);

        let err = client.get_obj("network/missing", None).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert!(!err.message().is_empty());
    }

    fn fixture(name: &str) -> String {
        format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    fn config_with_ca(name: &str) -> WapiConfig {
        WapiConfig::new("gm.example.com", "admin", "secret").with_ca_cert(fixture(name))
    }

    #[test]
    fn new_rejects_missing_certificate() {
        let config = WapiConfig::new("gm.example.com", "admin", "secret")
            .with_ca_cert("/nonexistent/infoblox-ca.pem");
        let err = WapiClient::new(config).unwrap_err();
        assert!(matches!(err, WapiError::Config(_)));
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn new_accepts_pem_ca_bundle() {
        let client = WapiClient::new(config_with_ca("infoblox-ca.pem")).expect("client");
        assert_eq!(client.base_url(), "https://gm.example.com/wapi/v2.6.1");
    }

    #[test]
    fn new_rejects_malformed_certificate() {
        let err = WapiClient::new(config_with_ca("malformed-ca.pem")).unwrap_err();
        assert!(matches!(err, WapiError::Config(_)));
        assert!(err.message().contains("malformed-ca.pem"));
    }

    #[test]
    fn new_rejects_file_without_certificates() {
        let err = WapiClient::new(config_with_ca("empty-ca.pem")).unwrap_err();
        assert!(matches!(err, WapiError::Config(_)));
        assert!(err.message().contains("No certificate found"));
    }

    #[test]
    fn ca_bundle_yields_every_certificate() {
        let certs = load_ca_bundle(Path::new(&fixture("infoblox-ca.pem"))).expect("bundle");
        assert_eq!(certs.len(), 1);
    }

    #[test]
    fn new_without_certificate_uses_config_base_url() {
        let config = WapiConfig::new("gm.example.com", "admin", "secret").with_version("2.9");
        let client = WapiClient::new(config).expect("client");
        assert_eq!(client.base_url(), "https://gm.example.com/wapi/v2.9");
        assert_eq!(client.max_results(), Some(1000));
        assert_eq!(client.creator(), Creator::Static);
    }

    #[test]
    fn new_accepts_opt_in_timeout() {
        let config = WapiConfig::new("gm.example.com", "admin", "secret")
            .with_timeout(std::time::Duration::from_secs(5));
        assert!(WapiClient::new(config).is_ok());
    }
}
