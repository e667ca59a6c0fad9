//! DNS operations
//!
//! A, CNAME, PTR, MX and TXT records plus delegated zones. Lookups on A
//! records and every `search_*` method restrict results to the client's
//! creator tag so DDNS-created records stay out of the way.

use crate::client::WapiClient;
use crate::common::query::{build_query, Filter};
use crate::error::WapiResult;
use crate::models::{fields, merge_fields, Fields, ObjectRef};
use serde_json::{json, Value};

const ALL_RECORDS: &str = "/allrecords";
const RECORD_A: &str = "/record:a";
const RECORD_CNAME: &str = "/record:cname";
const RECORD_PTR: &str = "/record:ptr";
const RECORD_MX: &str = "/record:mx";
const RECORD_TXT: &str = "/record:txt";
const ZONE_DELEGATED: &str = "/zone_delegated";

/// DNS resource module, borrowed from [`WapiClient::dns`]
#[derive(Debug, Clone, Copy)]
pub struct Dns<'a> {
    client: &'a WapiClient,
}

impl<'a> Dns<'a> {
    pub(crate) fn new(client: &'a WapiClient) -> Self {
        Self { client }
    }

    async fn find(
        &self,
        path: &str,
        mut clauses: Vec<Filter>,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        clauses.push(Filter::eq("creator", self.client.creator().as_str()));
        self.client.get(build_query(path, &clauses), return_fields).await
    }

    async fn find_any(
        &self,
        path: &str,
        clauses: Vec<Filter>,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.client.get(build_query(path, &clauses), return_fields).await
    }

    async fn reference(&self, path: &str, clauses: Vec<Filter>) -> WapiResult<Option<ObjectRef>> {
        self.client.get_ref(build_query(path, &clauses)).await
    }

    async fn create(&self, path: &str, required: Fields, opts: Fields) -> WapiResult<Value> {
        self.client.post(path.to_string(), merge_fields(required, opts)).await
    }

    /// All records of a zone
    pub async fn get_all_records(&self, zone: &str) -> WapiResult<Value> {
        self.find_any(ALL_RECORDS, vec![Filter::eq("zone", zone)], None).await
    }

    // A records

    pub async fn get_a_by_name(
        &self,
        name: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RECORD_A, vec![Filter::eq("name", name)], return_fields).await
    }

    pub async fn get_a_by_addr(
        &self,
        ipv4addr: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RECORD_A, vec![Filter::eq("ipv4addr", ipv4addr)], return_fields).await
    }

    pub async fn get_a_by_attr(
        &self,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RECORD_A, vec![Filter::attr(attr_name, attr_value)], return_fields).await
    }

    pub async fn get_a_by_name_addr(
        &self,
        name: &str,
        ipv4addr: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(
            RECORD_A,
            vec![Filter::eq("name", name), Filter::eq("ipv4addr", ipv4addr)],
            return_fields,
        )
        .await
    }

    pub async fn get_a_by_name_attr(
        &self,
        name: &str,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(
            RECORD_A,
            vec![Filter::eq("name", name), Filter::attr(attr_name, attr_value)],
            return_fields,
        )
        .await
    }

    pub async fn get_a_by_addr_attr(
        &self,
        ipv4addr: &str,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(
            RECORD_A,
            vec![Filter::eq("ipv4addr", ipv4addr), Filter::attr(attr_name, attr_value)],
            return_fields,
        )
        .await
    }

    pub async fn search_a_by_name(
        &self,
        name: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RECORD_A, vec![Filter::search("name", name)], return_fields).await
    }

    pub async fn search_a_by_addr(
        &self,
        ipv4addr: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RECORD_A, vec![Filter::search("ipv4addr", ipv4addr)], return_fields).await
    }

    /// Search on the attribute value itself (`*attr~=value`)
    pub async fn search_a_by_attr(
        &self,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RECORD_A, vec![Filter::attr_search(attr_name, attr_value)], return_fields)
            .await
    }

    pub async fn search_a_by_name_attr(
        &self,
        name: &str,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(
            RECORD_A,
            vec![Filter::search("name", name), Filter::attr(attr_name, attr_value)],
            return_fields,
        )
        .await
    }

    pub async fn search_a_by_addr_attr(
        &self,
        ipv4addr: &str,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(
            RECORD_A,
            vec![Filter::search("ipv4addr", ipv4addr), Filter::attr(attr_name, attr_value)],
            return_fields,
        )
        .await
    }

    /// Reference of the A record matching name, address and view
    pub async fn get_a_ref(
        &self,
        name: &str,
        ipv4addr: &str,
        view: &str,
    ) -> WapiResult<Option<ObjectRef>> {
        self.reference(
            RECORD_A,
            vec![
                Filter::eq("ipv4addr", ipv4addr),
                Filter::eq("name", name),
                Filter::eq("view", view),
            ],
        )
        .await
    }

    /// Create an A record, returning its reference
    pub async fn create_a(&self, name: &str, ipv4addr: &str, opts: Fields) -> WapiResult<Value> {
        let required = fields([("ipv4addr", json!(ipv4addr)), ("name", json!(name))]);
        self.create(RECORD_A, required, opts).await
    }

    // CNAME records

    pub async fn get_cname_by_name(
        &self,
        name: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(RECORD_CNAME, vec![Filter::eq("name", name)], return_fields).await
    }

    pub async fn get_cname_by_canonical(
        &self,
        canonical: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(RECORD_CNAME, vec![Filter::eq("canonical", canonical)], return_fields)
            .await
    }

    pub async fn get_cname_by_attr(
        &self,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(RECORD_CNAME, vec![Filter::attr(attr_name, attr_value)], return_fields)
            .await
    }

    pub async fn get_cname_by_name_canonical(
        &self,
        name: &str,
        canonical: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(
            RECORD_CNAME,
            vec![Filter::eq("name", name), Filter::eq("canonical", canonical)],
            return_fields,
        )
        .await
    }

    pub async fn get_cname_by_name_attr(
        &self,
        name: &str,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(
            RECORD_CNAME,
            vec![Filter::eq("name", name), Filter::attr(attr_name, attr_value)],
            return_fields,
        )
        .await
    }

    pub async fn get_cname_by_canonical_attr(
        &self,
        canonical: &str,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(
            RECORD_CNAME,
            vec![Filter::eq("canonical", canonical), Filter::attr(attr_name, attr_value)],
            return_fields,
        )
        .await
    }

    pub async fn search_cname_by_name(
        &self,
        name: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RECORD_CNAME, vec![Filter::search("name", name)], return_fields).await
    }

    pub async fn search_cname_by_canonical(
        &self,
        canonical: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RECORD_CNAME, vec![Filter::search("canonical", canonical)], return_fields)
            .await
    }

    pub async fn search_cname_by_attr(
        &self,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RECORD_CNAME, vec![Filter::attr_search(attr_name, attr_value)], return_fields)
            .await
    }

    pub async fn search_cname_by_name_attr(
        &self,
        name: &str,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(
            RECORD_CNAME,
            vec![Filter::search("name", name), Filter::attr(attr_name, attr_value)],
            return_fields,
        )
        .await
    }

    pub async fn search_cname_by_canonical_attr(
        &self,
        canonical: &str,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(
            RECORD_CNAME,
            vec![Filter::search("canonical", canonical), Filter::attr(attr_name, attr_value)],
            return_fields,
        )
        .await
    }

    pub async fn get_cname_ref(
        &self,
        name: &str,
        canonical: &str,
        view: &str,
    ) -> WapiResult<Option<ObjectRef>> {
        self.reference(
            RECORD_CNAME,
            vec![
                Filter::eq("canonical", canonical),
                Filter::eq("name", name),
                Filter::eq("view", view),
            ],
        )
        .await
    }

    pub async fn create_cname(
        &self,
        name: &str,
        canonical: &str,
        opts: Fields,
    ) -> WapiResult<Value> {
        let required = fields([("canonical", json!(canonical)), ("name", json!(name))]);
        self.create(RECORD_CNAME, required, opts).await
    }

    // PTR records

    pub async fn get_ptr_by_name(
        &self,
        name: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(RECORD_PTR, vec![Filter::eq("name", name)], return_fields).await
    }

    pub async fn get_ptr_by_dname(
        &self,
        ptrdname: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(RECORD_PTR, vec![Filter::eq("ptrdname", ptrdname)], return_fields).await
    }

    pub async fn get_ptr_by_addr(
        &self,
        ipv4addr: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(RECORD_PTR, vec![Filter::eq("ipv4addr", ipv4addr)], return_fields).await
    }

    pub async fn get_ptr_by_attr(
        &self,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(RECORD_PTR, vec![Filter::attr(attr_name, attr_value)], return_fields)
            .await
    }

    pub async fn get_ptr_by_dname_addr(
        &self,
        ptrdname: &str,
        ipv4addr: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(
            RECORD_PTR,
            vec![Filter::eq("ptrdname", ptrdname), Filter::eq("ipv4addr", ipv4addr)],
            return_fields,
        )
        .await
    }

    pub async fn get_ptr_ref(
        &self,
        ptrdname: &str,
        ipv4addr: &str,
        view: &str,
    ) -> WapiResult<Option<ObjectRef>> {
        self.reference(
            RECORD_PTR,
            vec![
                Filter::eq("ipv4addr", ipv4addr),
                Filter::eq("ptrdname", ptrdname),
                Filter::eq("view", view),
            ],
        )
        .await
    }

    pub async fn create_ptr(
        &self,
        ptrdname: &str,
        ipv4addr: &str,
        opts: Fields,
    ) -> WapiResult<Value> {
        let required = fields([("ipv4addr", json!(ipv4addr)), ("ptrdname", json!(ptrdname))]);
        self.create(RECORD_PTR, required, opts).await
    }

    // MX records

    pub async fn get_mx_by_name(
        &self,
        name: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(RECORD_MX, vec![Filter::eq("name", name)], return_fields).await
    }

    pub async fn get_mx_by_exchanger(
        &self,
        mail_exchanger: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(RECORD_MX, vec![Filter::eq("mail_exchanger", mail_exchanger)], return_fields)
            .await
    }

    pub async fn get_mx_by_attr(
        &self,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(RECORD_MX, vec![Filter::attr(attr_name, attr_value)], return_fields)
            .await
    }

    pub async fn get_mx_by_name_exchanger(
        &self,
        name: &str,
        mail_exchanger: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(
            RECORD_MX,
            vec![Filter::eq("name", name), Filter::eq("mail_exchanger", mail_exchanger)],
            return_fields,
        )
        .await
    }

    pub async fn get_mx_by_name_attr(
        &self,
        name: &str,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(
            RECORD_MX,
            vec![Filter::eq("name", name), Filter::attr(attr_name, attr_value)],
            return_fields,
        )
        .await
    }

    pub async fn get_mx_by_exchanger_attr(
        &self,
        mail_exchanger: &str,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(
            RECORD_MX,
            vec![Filter::eq("mail_exchanger", mail_exchanger), Filter::attr(attr_name, attr_value)],
            return_fields,
        )
        .await
    }

    pub async fn search_mx_by_name(
        &self,
        name: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RECORD_MX, vec![Filter::search("name", name)], return_fields).await
    }

    pub async fn search_mx_by_exchanger(
        &self,
        mail_exchanger: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RECORD_MX, vec![Filter::search("mail_exchanger", mail_exchanger)], return_fields)
            .await
    }

    pub async fn search_mx_by_exchanger_attr(
        &self,
        mail_exchanger: &str,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(
            RECORD_MX,
            vec![
                Filter::search("mail_exchanger", mail_exchanger),
                Filter::attr(attr_name, attr_value),
            ],
            return_fields,
        )
        .await
    }

    pub async fn get_mx_ref(
        &self,
        name: &str,
        mail_exchanger: &str,
        view: &str,
    ) -> WapiResult<Option<ObjectRef>> {
        self.reference(
            RECORD_MX,
            vec![
                Filter::eq("mail_exchanger", mail_exchanger),
                Filter::eq("name", name),
                Filter::eq("view", view),
            ],
        )
        .await
    }

    pub async fn create_mx(
        &self,
        name: &str,
        mail_exchanger: &str,
        preference: u32,
        opts: Fields,
    ) -> WapiResult<Value> {
        let required = fields([
            ("mail_exchanger", json!(mail_exchanger)),
            ("name", json!(name)),
            ("preference", json!(preference)),
        ]);
        self.create(RECORD_MX, required, opts).await
    }

    // TXT records

    pub async fn get_txt_by_name(
        &self,
        name: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(RECORD_TXT, vec![Filter::eq("name", name)], return_fields).await
    }

    pub async fn get_txt_by_text(
        &self,
        text: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(RECORD_TXT, vec![Filter::eq("text", text)], return_fields).await
    }

    pub async fn get_txt_by_attr(
        &self,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(RECORD_TXT, vec![Filter::attr(attr_name, attr_value)], return_fields)
            .await
    }

    pub async fn get_txt_by_name_text(
        &self,
        name: &str,
        text: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(
            RECORD_TXT,
            vec![Filter::eq("name", name), Filter::eq("text", text)],
            return_fields,
        )
        .await
    }

    pub async fn get_txt_by_name_attr(
        &self,
        name: &str,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(
            RECORD_TXT,
            vec![Filter::eq("name", name), Filter::attr(attr_name, attr_value)],
            return_fields,
        )
        .await
    }

    pub async fn get_txt_by_text_attr(
        &self,
        text: &str,
        attr_name: &str,
        attr_value: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(
            RECORD_TXT,
            vec![Filter::eq("text", text), Filter::attr(attr_name, attr_value)],
            return_fields,
        )
        .await
    }

    pub async fn search_txt_by_name(
        &self,
        name: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RECORD_TXT, vec![Filter::search("name", name)], return_fields).await
    }

    pub async fn search_txt_by_text(
        &self,
        text: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find(RECORD_TXT, vec![Filter::search("text", text)], return_fields).await
    }

    pub async fn get_txt_ref(
        &self,
        name: &str,
        text: &str,
        view: &str,
    ) -> WapiResult<Option<ObjectRef>> {
        self.reference(
            RECORD_TXT,
            vec![
                Filter::eq("text", text),
                Filter::eq("name", name),
                Filter::eq("view", view),
            ],
        )
        .await
    }

    pub async fn create_txt(&self, name: &str, text: &str, opts: Fields) -> WapiResult<Value> {
        self.create(RECORD_TXT, fields([("name", json!(name)), ("text", json!(text))]), opts).await
    }

    // Delegated zones

    pub async fn get_zones_delegated(&self, return_fields: Option<&str>) -> WapiResult<Value> {
        self.find_any(ZONE_DELEGATED, Vec::new(), return_fields).await
    }

    pub async fn get_zone_delegated_by_view(
        &self,
        view: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(ZONE_DELEGATED, vec![Filter::eq("view", view)], return_fields).await
    }

    pub async fn get_zone_delegated_by_fqdn(
        &self,
        fqdn: &str,
        return_fields: Option<&str>,
    ) -> WapiResult<Value> {
        self.find_any(ZONE_DELEGATED, vec![Filter::eq("fqdn", fqdn)], return_fields).await
    }

    /// Delegate `fqdn` in `view` to the given name servers
    ///
    /// `delegate_to` is the WAPI `extserver` list, e.g.
    /// `[{"name": "ns1.example.net", "address": "192.0.2.53"}]`.
    pub async fn create_zone_delegated(
        &self,
        fqdn: &str,
        view: &str,
        delegate_to: Value,
    ) -> WapiResult<Value> {
        let mut opts = Fields::new();
        opts.insert("delegate_to".to_string(), delegate_to);
        let required = fields([("fqdn", json!(fqdn)), ("view", json!(view))]);
        self.create(ZONE_DELEGATED, required, opts).await
    }
}
