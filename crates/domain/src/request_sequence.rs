use serde::{Deserialize, Serialize};

use crate::{AuditMetadata, Links};

/// Allowed compatible resource types.
pub const COMPATIBLE_RESOURCE_TYPES: &[&str] = &["APP", "GROUP"];

/// Approval workflow attached to a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSequence {
    /// Server-assigned id.
    pub id: String,
    /// Owning resource id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Admin console link of the workflow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Resource types the sequence applies to.
    #[serde(default)]
    pub compatible_resource_types: Vec<String>,
    /// Server audit fields.
    #[serde(flatten)]
    pub audit: AuditMetadata,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Body of sequence create and replace calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSequenceRequest {
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Admin console link of the workflow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Resource types the sequence applies to.
    pub compatible_resource_types: Vec<String>,
}
