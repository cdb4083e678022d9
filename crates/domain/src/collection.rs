use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AuditMetadata, EntitlementSelection, ExternalRef, Links};

/// Allowed collection assignment principal types.
pub const ASSIGNMENT_PRINCIPAL_TYPES: &[&str] = &["OKTA_USER", "OKTA_GROUP"];

/// Curated group of resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Server-assigned id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Server audit fields.
    #[serde(flatten)]
    pub audit: AuditMetadata,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Body of collection create and replace calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequest {
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Resource member of a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResource {
    /// Resource id inside the collection.
    pub resource_id: String,
    /// ORN of the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_orn: Option<String>,
    /// Included entitlements and values.
    #[serde(default)]
    pub entitlements: Vec<EntitlementSelection>,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Principal assigned to a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionAssignment {
    /// Server-assigned id.
    pub id: String,
    /// Assigned principal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<ExternalRef>,
    /// Source of the assignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// Expiration instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
    /// IANA time zone of the expiration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// Assignment type reported by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_type: Option<String>,
    /// `ACTIVE` or `INACTIVE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Server audit fields.
    #[serde(flatten)]
    pub audit: AuditMetadata,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Body of a create-assignment call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionAssignmentRequest {
    /// Assigned principal.
    pub principal: ExternalRef,
    /// Source of the assignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// Expiration instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
    /// IANA time zone of the expiration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// One RFC 6902 JSON-patch operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOperation {
    /// `replace`, `add`, or `remove`.
    pub op: String,
    /// JSON pointer of the target field.
    pub path: String,
    /// New value; omitted for `remove`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    /// Replaces a field.
    #[must_use]
    pub fn replace(path: &str, value: Value) -> Self {
        Self {
            op: "replace".to_owned(),
            path: path.to_owned(),
            value: Some(value),
        }
    }

    /// Removes a field.
    #[must_use]
    pub fn remove(path: &str) -> Self {
        Self {
            op: "remove".to_owned(),
            path: path.to_owned(),
            value: None,
        }
    }

    /// Sets a field when a value is present, otherwise removes it.
    #[must_use]
    pub fn set_or_remove(path: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => Self::replace(path, Value::String(value.to_owned())),
            None => Self::remove(path),
        }
    }
}
