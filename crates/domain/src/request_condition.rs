use serde::{Deserialize, Serialize};

use crate::{AuditMetadata, IdRef, Links};

/// Allowed request condition statuses.
pub const REQUEST_CONDITION_STATUSES: &[&str] = &["ACTIVE", "INACTIVE"];
/// Allowed access scope types.
pub const ACCESS_SCOPE_TYPES: &[&str] = &["RESOURCE_DEFAULT", "GROUPS", "ENTITLEMENT_BUNDLES"];
/// Allowed requester types.
pub const REQUESTER_TYPES: &[&str] = &["EVERYONE", "GROUPS", "TEAMS"];
/// Allowed access duration types.
pub const ACCESS_DURATION_TYPES: &[&str] = &["ADMIN_FIXED_DURATION", "REQUESTER_SPECIFIED_DURATION"];

/// Who may request, and what they may request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSettings {
    /// Scope type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Scoped object ids.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<IdRef>,
}

/// Duration applied to granted access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDurationSettings {
    /// Duration type.
    #[serde(rename = "type")]
    pub kind: String,
    /// ISO-8601 duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Request condition of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCondition {
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
    /// Evaluation order; lower wins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// `ACTIVE` or `INACTIVE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Approval sequence applied to matching requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_sequence_id: Option<String>,
    /// Requestable access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_scope_settings: Option<ScopeSettings>,
    /// Eligible requesters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_settings: Option<ScopeSettings>,
    /// Duration of granted access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_duration_settings: Option<AccessDurationSettings>,
    /// Server audit fields.
    #[serde(flatten)]
    pub audit: AuditMetadata,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Body of create and patch calls; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestConditionRequest {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Evaluation order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// Approval sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_sequence_id: Option<String>,
    /// Requestable access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_scope_settings: Option<ScopeSettings>,
    /// Eligible requesters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_settings: Option<ScopeSettings>,
    /// Duration of granted access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_duration_settings: Option<AccessDurationSettings>,
}

impl RequestConditionRequest {
    /// Returns true when the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
