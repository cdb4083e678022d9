use serde::{Deserialize, Serialize};

use crate::{AuditMetadata, EntitlementSelection, ExternalRef, Links};

/// Allowed entitlement data types.
pub const ENTITLEMENT_DATA_TYPES: &[&str] = &["string", "array"];
/// Allowed entitlement parent types.
pub const ENTITLEMENT_PARENT_TYPES: &[&str] = &["APPLICATION"];
/// Allowed bundle status values.
pub const BUNDLE_STATUSES: &[&str] = &["ACTIVE", "INACTIVE"];

/// Entitlement as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    /// Server-assigned id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Value used by the downstream app.
    #[serde(default)]
    pub external_value: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether a principal may hold several values.
    #[serde(default)]
    pub multi_value: bool,
    /// `string` or `array`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Owning resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ExternalRef>,
    /// ORN of the owning resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_resource_orn: Option<String>,
    /// Values in server order.
    #[serde(default)]
    pub values: Vec<EntitlementValue>,
    /// Server audit fields.
    #[serde(flatten)]
    pub audit: AuditMetadata,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// One value of an entitlement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementValue {
    /// Server-assigned id, absent on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Value used by the downstream app.
    #[serde(default)]
    pub external_value: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of entitlement create and replace calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementRequest {
    /// Display name.
    pub name: String,
    /// Value used by the downstream app.
    pub external_value: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether a principal may hold several values.
    pub multi_value: bool,
    /// `string` or `array`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Owning resource.
    pub parent: ExternalRef,
    /// Values.
    #[serde(default)]
    pub values: Vec<EntitlementValue>,
}

/// Entitlement bundle as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementBundle {
    /// Server-assigned id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `ACTIVE` or `INACTIVE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Resource the bundle belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<ExternalRef>,
    /// ORN of the target resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_resource_orn: Option<String>,
    /// Bundled entitlements.
    #[serde(default)]
    pub entitlements: Vec<EntitlementSelection>,
    /// Server audit fields.
    #[serde(flatten)]
    pub audit: AuditMetadata,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Body of bundle create and replace calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementBundleRequest {
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `ACTIVE` or `INACTIVE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Resource the bundle belongs to.
    pub target: ExternalRef,
    /// Bundled entitlements.
    pub entitlements: Vec<EntitlementSelection>,
}
