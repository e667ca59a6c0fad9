//! Query utilities for the WAPI
//!
//! WAPI filters are plain `field<op>value` query parameters. Values are passed
//! through verbatim: characters such as `&`, `?` or spaces must be
//! percent-encoded by the caller.

use reqwest::Method;
use std::fmt;

/// Filter operator understood by the WAPI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `field=value`
    Exact,
    /// `field~=value` (regular expression / substring search)
    Search,
    /// `*attr=value` on an extensible attribute
    AttrExact,
    /// `*attr~=value` on an extensible attribute
    AttrSearch,
}

/// One `field<op>value` query clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

impl Filter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Exact match on a regular field
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Exact, value)
    }

    /// Search match on a regular field
    pub fn search(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Search, value)
    }

    /// Exact match on an extensible attribute
    pub fn attr(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, FilterOp::AttrExact, value)
    }

    /// Search match on an extensible attribute
    pub fn attr_search(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, FilterOp::AttrSearch, value)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            FilterOp::Exact => write!(f, "{}={}", self.field, self.value),
            FilterOp::Search => write!(f, "{}~={}", self.field, self.value),
            FilterOp::AttrExact => write!(f, "*{}={}", self.field, self.value),
            FilterOp::AttrSearch => write!(f, "*{}~={}", self.field, self.value),
        }
    }
}

/// Separator to use for the next parameter appended to `uri`
fn separator(uri: &str) -> char {
    if uri.contains('?') { '&' } else { '?' }
}

/// Append filter clauses to a resource path
///
/// Clauses keep the order given and are never deduplicated; the WAPI treats
/// repeated fields as separate conditions.
pub fn build_query(path: &str, clauses: &[Filter]) -> String {
    let mut uri = path.to_string();
    for clause in clauses {
        uri.push(separator(&uri));
        uri.push_str(&clause.to_string());
    }
    uri
}

/// Append the per-request directives to a path that may already carry a query
///
/// Every request gets `_return_type=json`. GET requests additionally get the
/// return-fields projection (when non-empty) and the result cap (when set).
pub fn append_directives(
    uri: &str,
    method: &Method,
    return_fields: Option<&str>,
    max_results: Option<u32>,
) -> String {
    let mut out = format!("{}{}_return_type=json", uri, separator(uri));

    if *method == Method::GET {
        if let Some(fields) = return_fields.filter(|f| !f.is_empty()) {
            out.push_str("&_return_fields%2B=");
            out.push_str(fields);
        }
        if let Some(max) = max_results {
            out.push_str(&format!("&_max_results={}", max));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_each_operator() {
        assert_eq!(
            build_query("/network", &[Filter::eq("comment", "lab")]),
            "/network?comment=lab"
        );
        assert_eq!(
            build_query("/network", &[Filter::search("comment", "lab")]),
            "/network?comment~=lab"
        );
        assert_eq!(build_query("/network", &[Filter::attr("Site", "PAR")]), "/network?*Site=PAR");
        assert_eq!(
            build_query("/network", &[Filter::attr_search("Site", "PA")]),
            "/network?*Site~=PA"
        );
    }

    #[test]
    fn joins_clauses_in_order() {
        let uri = build_query(
            "/record:a",
            &[
                Filter::eq("name", "host.example.com"),
                Filter::attr("Owner", "netops"),
                Filter::eq("creator", "STATIC"),
            ],
        );
        assert_eq!(uri, "/record:a?name=host.example.com&*Owner=netops&creator=STATIC");
    }

    #[test]
    fn keeps_repeated_fields() {
        let uri = build_query(
            "/lease",
            &[Filter::eq("address", "10.0.0.1"), Filter::eq("address", "10.0.0.2")],
        );
        assert_eq!(uri, "/lease?address=10.0.0.1&address=10.0.0.2");
    }

    #[test]
    fn no_clauses_leaves_path_untouched() {
        assert_eq!(build_query("/networktemplate", &[]), "/networktemplate");
    }

    #[test]
    fn continues_existing_query_with_ampersand() {
        let uri = build_query(
            "/network/ZG5z?_function=next_available_ip",
            &[Filter::eq("num", "1")],
        );
        assert_eq!(uri, "/network/ZG5z?_function=next_available_ip&num=1");
    }

    #[test]
    fn values_are_not_encoded() {
        let uri = build_query("/record:txt", &[Filter::eq("text", "v=spf1 a&b")]);
        assert_eq!(uri, "/record:txt?text=v=spf1 a&b");
    }

    #[test]
    fn get_directives_in_order() {
        let uri = append_directives("/record:a?name=h", &Method::GET, Some("ttl,view"), Some(1000));
        assert_eq!(
            uri,
            "/record:a?name=h&_return_type=json&_return_fields%2B=ttl,view&_max_results=1000"
        );
    }

    #[test]
    fn get_without_query_starts_with_question_mark() {
        let uri = append_directives("/zone_delegated", &Method::GET, None, Some(50));
        assert_eq!(uri, "/zone_delegated?_return_type=json&_max_results=50");
    }

    #[test]
    fn empty_return_fields_and_no_cap_are_skipped() {
        let uri = append_directives("/rangetemplate", &Method::GET, Some(""), None);
        assert_eq!(uri, "/rangetemplate?_return_type=json");
    }

    #[test]
    fn write_methods_only_get_return_type() {
        for method in [Method::POST, Method::PUT, Method::DELETE] {
            let uri = append_directives("/fixedaddress", &method, Some("mac"), Some(1000));
            assert_eq!(uri, "/fixedaddress?_return_type=json");
        }
    }

    #[test]
    fn single_question_mark_after_directives() {
        let uri = append_directives(
            "/network/ZG5z?_function=next_available_ip",
            &Method::POST,
            None,
            Some(1000),
        );
        assert_eq!(uri.matches('?').count(), 1);
        assert_eq!(uri, "/network/ZG5z?_function=next_available_ip&_return_type=json");
    }
}
