use serde::{Deserialize, Serialize};

use crate::Links;

/// Entry of the request catalog, shared by admin and end-user views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Entry id.
    pub id: String,
    /// Whether the entry can be requested directly.
    #[serde(default)]
    pub requestable: bool,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parent entry id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Selectable answer of a request field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFieldChoice {
    /// Choice text.
    pub choice: String,
}

/// Field a requester fills in when requesting an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestField {
    /// Field id.
    pub id: String,
    /// Field type, e.g. `TEXT` or `SELECT`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Answer is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Field cannot be edited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    /// Upper bound for duration fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_value: Option<String>,
    /// Choices for select fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<RequestFieldChoice>,
}

/// Request fields of one catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFieldSet {
    /// Fields in display order.
    #[serde(default)]
    pub data: Vec<RequestField>,
}
