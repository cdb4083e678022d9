use serde::{Deserialize, Serialize};

use crate::{AuditMetadata, ExternalRef, IdRef, Links};

/// Allowed request type statuses.
pub const REQUEST_TYPE_STATUSES: &[&str] = &["ACTIVE", "PENDING"];
/// Allowed request type approval types.
pub const APPROVAL_TYPES: &[&str] = &["NONE", "SERIAL"];
/// Allowed approver types.
pub const APPROVER_TYPES: &[&str] = &["GROUP_OWNER", "MANAGER", "MEMBER_OF", "USER"];

/// Answer to one requester field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequesterFieldValue {
    /// Field id.
    pub id: String,
    /// Single answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Multiple answers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// What an access request asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedItem {
    /// Catalog entry id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    /// Resource id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Access scope id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_scope_id: Option<String>,
    /// Access scope type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_scope_type: Option<String>,
    /// Requested object type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Access request as returned by the v2 requests API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestV2 {
    /// Server-assigned id.
    pub id: String,
    /// Requested access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<RequestedItem>,
    /// Principal that submitted the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester: Option<ExternalRef>,
    /// Principal that receives access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_for: Option<ExternalRef>,
    /// `SUBMITTED`, `APPROVED`, `DENIED`, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Answers to requester fields.
    #[serde(default)]
    pub requester_field_values: Vec<RequesterFieldValue>,
    /// Server audit fields.
    #[serde(flatten)]
    pub audit: AuditMetadata,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Body of a create-request call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestV2Create {
    /// Requested access.
    pub requested: RequestedItem,
    /// Principal that receives access.
    pub requested_for: ExternalRef,
    /// Answers to requester fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requester_field_values: Vec<RequesterFieldValue>,
}

/// Risk rule matched by an end-user request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedRiskRule {
    /// Rule name.
    #[serde(default)]
    pub name: String,
    /// Name of the conflicting resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
}

/// Risk evaluation of an end-user request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Submission behaviour applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_submission_type: Option<String>,
    /// Matched rules.
    #[serde(default)]
    pub risk_rules: Vec<MatchedRiskRule>,
}

/// Request submitted by the calling end user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyRequest {
    /// Server-assigned id.
    pub id: String,
    /// Requested access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<RequestedItem>,
    /// Lifecycle status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Status of the resulting grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant_status: Option<String>,
    /// Answers to requester fields.
    #[serde(default)]
    pub requester_field_values: Vec<RequesterFieldValue>,
    /// Risk evaluation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_assessment: Option<RiskAssessment>,
    /// Server audit fields.
    #[serde(flatten)]
    pub audit: AuditMetadata,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Body of an end-user request call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyRequestCreate {
    /// Answers to requester fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requester_field_values: Vec<RequesterFieldValue>,
}

/// Resources a request type applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTypeResourceSettings {
    /// Target resource type, e.g. `GROUPS`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Target resources.
    #[serde(default)]
    pub target_resources: Vec<RequestTypeTarget>,
}

/// One request type target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTypeTarget {
    /// Resource id.
    pub resource_id: String,
}

/// Who may use a request type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTypeRequesterSettings {
    /// `EVERYONE` or `GROUPS`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Eligible groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<IdRef>,
}

/// One approval step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    /// Approver type.
    pub approver_type: String,
    /// Approver user for `USER`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approver_user_id: Option<String>,
    /// Approver groups for `MEMBER_OF`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub approver_member_of: Vec<IdRef>,
}

/// Ordered approval chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalSettings {
    /// `NONE` or `SERIAL`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Approval steps in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub approvals: Vec<Approval>,
}

/// Request type as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestType {
    /// Server-assigned id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning team or group id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// `ACTIVE` when published, `PENDING` otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Target resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_settings: Option<RequestTypeResourceSettings>,
    /// Eligible requesters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_settings: Option<RequestTypeRequesterSettings>,
    /// Approval chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_settings: Option<ApprovalSettings>,
    /// Server audit fields.
    #[serde(flatten)]
    pub audit: AuditMetadata,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Body of a create-request-type call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTypeCreate {
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning team or group id.
    pub owner_id: String,
    /// Target resources.
    pub resource_settings: RequestTypeResourceSettings,
    /// Eligible requesters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_settings: Option<RequestTypeRequesterSettings>,
    /// Approval chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_settings: Option<ApprovalSettings>,
}
