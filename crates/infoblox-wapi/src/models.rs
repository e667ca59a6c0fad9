//! WAPI data types
//!
//! Objects are returned as raw JSON; only the pieces the client itself
//! interprets are typed here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Caller-supplied object fields merged into a create request
pub type Fields = Map<String, Value>;

/// Opaque object reference issued by the appliance (`_ref`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRef(String);

impl ObjectRef {
    /// Wrap a reference string as returned by the appliance
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The raw reference, usable as a request path
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Object type prefix, e.g. `record:a` for `record:a/ZG5z...:host/default`
    pub fn object_type(&self) -> &str {
        self.0.split('/').next().unwrap_or_default()
    }

    /// `_ref` of the first object in a decoded search result
    ///
    /// Extra matches are ignored; an empty array or any other shape yields `None`.
    pub fn first_in(result: &Value) -> Option<Self> {
        result
            .as_array()?
            .first()?
            .get("_ref")?
            .as_str()
            .map(Self::new)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ObjectRef {
    fn from(reference: String) -> Self {
        Self(reference)
    }
}

impl From<&str> for ObjectRef {
    fn from(reference: &str) -> Self {
        Self(reference.to_string())
    }
}

/// DNS record creator, used to keep DDNS-created records out of lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Creator {
    /// Created by an administrator or API client
    #[default]
    Static,
    /// Created through DDNS updates
    Dynamic,
    /// Created by the appliance itself
    System,
}

impl Creator {
    /// Value sent in `creator=` filters
    pub fn as_str(&self) -> &'static str {
        match self {
            Creator::Static => "STATIC",
            Creator::Dynamic => "DYNAMIC",
            Creator::System => "SYSTEM",
        }
    }
}

impl fmt::Display for Creator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Creator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "STATIC" => Ok(Creator::Static),
            "DYNAMIC" => Ok(Creator::Dynamic),
            "SYSTEM" => Ok(Creator::System),
            other => Err(format!("unknown creator: {}", other)),
        }
    }
}

/// Build a field map from literal pairs
pub fn fields<const N: usize>(pairs: [(&str, Value); N]) -> Fields {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Required fields overlaid with the caller's optional ones
///
/// Keys in `optional` win over identically named required keys.
pub fn merge_fields(required: Fields, optional: Fields) -> Value {
    let mut merged = required;
    merged.extend(optional);
    Value::Object(merged)
}
