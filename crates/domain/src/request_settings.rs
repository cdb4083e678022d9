use serde::{Deserialize, Serialize};

use crate::Links;

/// Submission behaviours for risky requests.
pub const RISK_SUBMISSION_TYPES: &[&str] = &["ALLOWED_WITH_OVERRIDES", "RESTRICTED"];

/// Organization-wide access request settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgRequestSettings {
    /// Subprocessor terms accepted.
    #[serde(default)]
    pub subprocessors_acknowledged: bool,
    /// Provisioning status of the request experience.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_status: Option<String>,
    /// Enabled request experiences.
    #[serde(default)]
    pub request_experiences: Vec<String>,
    /// Provisioning finished long ago.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_time_past_provisioned: Option<bool>,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Only field of the organization settings that can be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgRequestSettingsPatch {
    /// Subprocessor terms accepted.
    pub subprocessors_acknowledged: bool,
}

/// Access durations a requester may choose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDurationLimits {
    /// Upper bound in days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_days: Option<i64>,
    /// Upper bound in weeks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_weeks: Option<i64>,
    /// Upper bound in hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_hours: Option<i64>,
    /// Duration is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Supported duration types.
    #[serde(default)]
    pub supported_types: Vec<String>,
}

/// Type-only entry of a valid-settings list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedSetting {
    /// Setting type.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Who may request on behalf of others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOnBehalfOfSettings {
    /// Requesting for others is enabled.
    #[serde(default)]
    pub allowed: bool,
    /// Principal types that may be requested for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub only_for: Vec<String>,
}

/// Default risk handling of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSettings {
    /// Behaviour applied to risky requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_setting: Option<RiskDefaultSetting>,
}

/// Default risk behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskDefaultSetting {
    /// `ALLOWED_WITH_OVERRIDES` or `RESTRICTED`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_submission_type: Option<String>,
    /// Approval sequence for risky requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_sequence_id: Option<String>,
}

/// Access request settings of one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequestSettings {
    /// Duration rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_access_duration_settings: Option<AccessDurationLimits>,
    /// Allowed access scope types.
    #[serde(default)]
    pub valid_access_scope_settings: Vec<TypedSetting>,
    /// Allowed requester types.
    #[serde(default)]
    pub valid_requester_settings: Vec<TypedSetting>,
    /// Request-on-behalf-of rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_on_behalf_of_settings: Option<RequestOnBehalfOfSettings>,
    /// Risk handling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_settings: Option<RiskSettings>,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Writable subset of resource request settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequestSettingsPatch {
    /// Request-on-behalf-of rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_on_behalf_of_settings: Option<RequestOnBehalfOfSettings>,
    /// Risk handling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_settings: Option<RiskSettings>,
}
