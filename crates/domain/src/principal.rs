use serde::{Deserialize, Serialize};

use crate::{EntitlementValue, ExternalRef, Links};

/// Entitlement held by a principal on a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalEntitlement {
    /// Entitlement id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Value used by the downstream app.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_value: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether several values may be held.
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
    /// Principal holding the entitlement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_principal: Option<ExternalRef>,
    /// ORN of the principal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_principal_orn: Option<String>,
    /// Held values.
    #[serde(default)]
    pub values: Vec<EntitlementValue>,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Grant contributing to a principal's access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    /// Grant id.
    pub id: String,
    /// Grant type wire value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant_type: Option<String>,
    /// Grant status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Named entitlement or bundle in an access summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessItem {
    /// Item id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// Summary of everything a principal can access on a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalAccess {
    /// Contributing grants.
    #[serde(default)]
    pub grants: Vec<AccessGrant>,
    /// Effective entitlements.
    #[serde(default)]
    pub entitlements: Vec<AccessItem>,
    /// Effective bundles.
    #[serde(default)]
    pub bundles: Vec<AccessItem>,
    /// Earliest expiration of the access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Lookup key of a principal access summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrincipalAccessQuery {
    /// ORN of the principal.
    pub target_principal_orn: String,
    /// ORN of the resource.
    pub parent_resource_orn: String,
}
