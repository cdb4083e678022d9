use serde::{Deserialize, Serialize};

use crate::{AuditMetadata, Links};

/// Allowed review decisions.
pub const REVIEW_DECISIONS: &[&str] = &["APPROVE", "REVOKE"];

/// Identity shown on a review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewProfile {
    /// User id.
    pub id: String,
    /// Login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// User status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Entitlement value or bundle under review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedItem {
    /// Item id.
    pub id: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Value used by the downstream app.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_value: Option<String>,
}

/// Reviewer note attached to a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewNote {
    /// Note id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Note text.
    #[serde(default)]
    pub note: String,
}

/// Stage of a multi-level review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLevel {
    /// Level id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Reviewer type of the stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_type: Option<String>,
    /// Decision made at the stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
}

/// One reviewer decision record inside a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Server-assigned id.
    pub id: String,
    /// Owning campaign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    /// Reviewed resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// `UNREVIEWED`, `APPROVE`, or `REVOKE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    /// Remediation progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_status: Option<String>,
    /// Reviewer type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_type: Option<String>,
    /// Current stage id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_reviewer_level: Option<String>,
    /// Stages of the review.
    #[serde(default)]
    pub reviewer_levels: Vec<ReviewLevel>,
    /// Reviewed principal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_profile: Option<ReviewProfile>,
    /// Assigned reviewer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_profile: Option<ReviewProfile>,
    /// Reviewed entitlement value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entitlement_value: Option<ReviewedItem>,
    /// Reviewed bundle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entitlement_bundle: Option<ReviewedItem>,
    /// Reviewer note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<ReviewNote>,
    /// Decision time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided: Option<String>,
    /// Server audit fields.
    #[serde(flatten)]
    pub audit: AuditMetadata,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Body of a decide call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDecision {
    /// `APPROVE` or `REVOKE`.
    pub decision: String,
    /// Optional justification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
