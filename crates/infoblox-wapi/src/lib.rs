//! Infoblox WAPI Client
//!
//! A Rust client library for the Infoblox WAPI REST API.
//! Builds filter queries for DNS, DHCP and IPAM objects, authenticates every
//! call and returns the decoded JSON as-is.
//!
//! # Example
//!
//! ```no_run
//! use infoblox_wapi::{WapiClient, WapiConfig, Fields};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WapiConfig::new("gm.example.com", "admin", "infoblox")
//!     .with_ca_cert("/etc/infoblox/gm.pem");
//! let client = WapiClient::new(config)?;
//!
//! // Static A records for a name
//! let records = client.dns().get_a_by_name("host.example.com", None).await?;
//!
//! // Reserve an address
//! let mut opts = Fields::new();
//! opts.insert("name".into(), "host1".into());
//! let reference = client
//!     .dhcp()
//!     .create_fixed_addr("10.0.0.5", "aa:bb:cc:dd:ee:ff", opts)
//!     .await?;
//!
//! // Transport failures are values
//! match client.get_obj("network/missing", None).await {
//!     Ok(obj) => println!("{obj}"),
//!     Err(e) => println!("status {:?}: {}", e.status_code(), e.message()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **DNS**: A, CNAME, PTR, MX and TXT records, delegated zones
//! - **DHCP**: fixed addresses, leases, networks, ranges, templates
//! - **IPAM**: IPv4 address views
//! - **Object references**: get, update and delete any object by `_ref`

pub mod client;
pub mod common;
pub mod config;
pub mod dhcp;
pub mod dns;
pub mod error;
pub mod ipam;
pub mod models;
#[path = "trait.rs"]
pub mod transport_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::WapiClient;
pub use common::query::{build_query, Filter, FilterOp};
pub use common::{HttpClient, WapiRequest};
pub use config::WapiConfig;
pub use error::{WapiError, WapiResult};
pub use models::*;
pub use transport_trait::WapiTransport;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockTransport;
