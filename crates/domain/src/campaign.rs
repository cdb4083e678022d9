use std::str::FromStr;

use chrono::{DateTime, Utc};
use oig_core::AppError;
use serde::{Deserialize, Serialize};

use crate::{AuditMetadata, Links, ResourceRef};

/// Allowed `campaign_type` values.
pub const CAMPAIGN_TYPES: &[&str] = &["RESOURCE", "USER"];
/// Allowed `resource_settings.type` values.
pub const RESOURCE_SETTINGS_TYPES: &[&str] = &["APPLICATION", "APPLICATION_AND_GROUP", "GROUP"];
/// Allowed target and excluded resource types.
pub const TARGET_RESOURCE_TYPES: &[&str] = &["APPLICATION", "GROUP"];
/// Allowed `reviewer_settings.type` values.
pub const REVIEWER_TYPES: &[&str] = &[
    "GROUP",
    "MULTI_LEVEL",
    "RESOURCE_OWNER",
    "REVIEWER_EXPRESSION",
    "USER",
];
/// Allowed `schedule_settings.type` values.
pub const SCHEDULE_TYPES: &[&str] = &["ONE_OFF", "RECURRING"];
/// Allowed `recurrence.repeat_on_type` values.
pub const REPEAT_ON_TYPES: &[&str] = &[
    "LAST_WEEKDAY_AS_START_DATE",
    "SAME_DAY_AS_START_DATE",
    "SAME_WEEKDAY_AS_START_DATE",
];
/// Allowed remediation outcomes.
pub const REMEDIATION_ACTIONS: &[&str] = &["DENY", "NO_ACTION"];
/// Allowed `start_review.when` values.
pub const START_REVIEW_WHEN: &[&str] = &["ALL_REVIEWERS_COMPLETE", "ANY_REVIEWER_COMPLETE"];

/// Maximum number of reviewer levels.
pub const MAX_REVIEWER_LEVELS: usize = 2;
/// Maximum number of start-review triggers per level.
pub const MAX_START_REVIEW: usize = 2;
/// Maximum number of scoped user ids.
pub const MAX_SCOPE_USER_IDS: usize = 100;
/// Maximum number of scoped group ids.
pub const MAX_SCOPE_GROUP_IDS: usize = 5;
/// Maximum number of excluded user ids.
pub const MAX_EXCLUDED_USER_IDS: usize = 50;
/// Inclusive bounds of `predefined_inactive_users_scope.inactive_days`.
pub const INACTIVE_DAYS_RANGE: (i64, i64) = (30, 365);

/// Kind of access-review campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignType {
    /// Reviews access to selected resources.
    Resource,
    /// Reviews all access held by selected users.
    User,
}

impl CampaignType {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resource => "RESOURCE",
            Self::User => "USER",
        }
    }
}

impl FromStr for CampaignType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "RESOURCE" => Ok(Self::Resource),
            "USER" => Ok(Self::User),
            _ => Err(AppError::Validation(format!(
                "unknown campaign type '{value}'"
            ))),
        }
    }
}

/// Server-observable campaign status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignStatus {
    /// Created and not yet scheduled.
    Draft,
    /// Ready to launch.
    Ready,
    /// Waiting for its scheduled start.
    Scheduled,
    /// Launch in progress.
    Launching,
    /// Reviews are open.
    Active,
    /// End requested and in progress.
    Completing,
    /// Closed.
    Completed,
    /// Launch or close failed.
    Error,
}

impl CampaignStatus {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Ready => "READY",
            Self::Scheduled => "SCHEDULED",
            Self::Launching => "LAUNCHING",
            Self::Active => "ACTIVE",
            Self::Completing => "COMPLETING",
            Self::Completed => "COMPLETED",
            Self::Error => "ERROR",
        }
    }

    /// Returns true when `launch` is accepted from this status.
    #[must_use]
    pub fn can_launch(&self) -> bool {
        matches!(self, Self::Draft | Self::Ready | Self::Scheduled)
    }

    /// Returns true when `end` is accepted from this status.
    #[must_use]
    pub fn can_end(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl FromStr for CampaignStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "DRAFT" => Ok(Self::Draft),
            "READY" => Ok(Self::Ready),
            "SCHEDULED" => Ok(Self::Scheduled),
            "LAUNCHING" => Ok(Self::Launching),
            "ACTIVE" => Ok(Self::Active),
            "COMPLETING" => Ok(Self::Completing),
            "COMPLETED" => Ok(Self::Completed),
            "ERROR" => Ok(Self::Error),
            _ => Err(AppError::Validation(format!(
                "unknown campaign status '{value}'"
            ))),
        }
    }
}

/// Campaign as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    /// Server-assigned id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `RESOURCE` or `USER`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_type: Option<String>,
    /// Licensing tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_tier: Option<String>,
    /// Lifecycle status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Remediation behaviour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_settings: Option<RemediationSettings>,
    /// Reviewed resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_settings: Option<ResourceSettings>,
    /// Reviewer selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_settings: Option<ReviewerSettings>,
    /// Schedule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_settings: Option<ScheduleSettings>,
    /// Reviewer notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_settings: Option<NotificationSettings>,
    /// Reviewed principals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_scope_settings: Option<PrincipalScopeSettings>,
    /// Server audit fields.
    #[serde(flatten)]
    pub audit: AuditMetadata,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Body of a create-campaign call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRequest {
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `RESOURCE` or `USER`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_type: Option<String>,
    /// Licensing tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_tier: Option<String>,
    /// Remediation behaviour.
    pub remediation_settings: RemediationSettings,
    /// Reviewed resources.
    pub resource_settings: ResourceSettings,
    /// Reviewer selection.
    pub reviewer_settings: ReviewerSettings,
    /// Schedule.
    pub schedule_settings: ScheduleSettings,
    /// Reviewer notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_settings: Option<NotificationSettings>,
    /// Reviewed principals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_scope_settings: Option<PrincipalScopeSettings>,
}

/// What happens to access after a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationSettings {
    /// Outcome for approved access.
    #[serde(default)]
    pub access_approved: String,
    /// Outcome for revoked access.
    #[serde(default)]
    pub access_revoked: String,
    /// Outcome when no decision was made.
    #[serde(default)]
    pub no_response: String,
    /// Automatic revocation options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_remediation_settings: Option<AutoRemediationSettings>,
}

/// Automatic revocation options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoRemediationSettings {
    /// Also remediate indirect assignments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_all_indirect_assignments: Option<bool>,
    /// Limit remediation to these resources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_only: Vec<ResourceRef>,
}

/// Resources covered by the campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSettings {
    /// `APPLICATION`, `APPLICATION_AND_GROUP`, or `GROUP`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Include admin role assignments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_admin_roles: Option<bool>,
    /// Include entitlement assignments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_entitlements: Option<bool>,
    /// Only individually assigned apps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individually_assigned_apps_only: Option<bool>,
    /// Only individually assigned groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individually_assigned_groups_only: Option<bool>,
    /// Only out-of-policy entitlements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_include_out_of_policy_entitlements: Option<bool>,
    /// Reviewed resources.
    #[serde(default)]
    pub target_resources: Vec<TargetResource>,
    /// Skipped resources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_resources: Vec<ResourceRef>,
}

/// One reviewed resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetResource {
    /// Resource id.
    pub resource_id: String,
    /// `APPLICATION` or `GROUP`.
    #[serde(default)]
    pub resource_type: String,
    /// Review every entitlement and bundle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_all_entitlements_and_bundles: Option<bool>,
    /// Reviewed entitlements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entitlements: Vec<TargetEntitlement>,
    /// Reviewed bundles.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entitlement_bundles: Vec<crate::IdRef>,
}

/// One reviewed entitlement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetEntitlement {
    /// Entitlement id.
    pub id: String,
    /// Review every value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_all_values: Option<bool>,
    /// Reviewed values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<crate::IdRef>,
}

/// Reviewer selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerSettings {
    /// Reviewer type.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Reviewer group for `GROUP`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_group_id: Option<String>,
    /// Reviewer user for `USER`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<String>,
    /// Okta expression selecting reviewers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_scope_expression: Option<String>,
    /// Fallback when no reviewer resolves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reviewer_id: Option<String>,
    /// Block self-review.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_review_disabled: Option<bool>,
    /// Require a justification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification_required: Option<bool>,
    /// Block bulk decisions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk_decision_disabled: Option<bool>,
    /// Ordered review stages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviewer_levels: Vec<ReviewerLevel>,
}

/// One stage of a multi-level review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerLevel {
    /// Reviewer type for the stage.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Reviewer group for `GROUP`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_group_id: Option<String>,
    /// Reviewer user for `USER`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<String>,
    /// Okta expression selecting reviewers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_scope_expression: Option<String>,
    /// Fallback when no reviewer resolves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reviewer_id: Option<String>,
    /// Block self-review.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_review_disabled: Option<bool>,
    /// Activation triggers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub start_review: Vec<StartReview>,
}

/// When a review stage opens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartReview {
    /// Day offset from the campaign start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_day: Option<i64>,
    /// Completion condition of the previous stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
}

/// Campaign schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSettings {
    /// `ONE_OFF` or `RECURRING`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// First launch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    /// Review window length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_in_days: Option<i64>,
    /// IANA time zone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// Computed end of the current cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// Repetition, `RECURRING` only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

/// Repetition rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    /// ISO-8601 interval.
    #[serde(default)]
    pub interval: String,
    /// Last possible launch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends: Option<DateTime<Utc>>,
    /// Day alignment of each cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_on_type: Option<String>,
}

/// Reviewer notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    /// Notify when assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_reviewer_when_review_assigned: Option<bool>,
    /// Notify at the campaign end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_reviewer_at_campaign_end: Option<bool>,
    /// Notify when overdue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_reviewer_when_overdue: Option<bool>,
    /// Notify at the midpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_reviewer_during_midpoint_of_review: Option<bool>,
    /// Notify at review period end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_review_period_end: Option<bool>,
    /// Reminder offsets before close, in seconds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reminders_reviewer_before_campaign_close_in_secs: Vec<i64>,
}

/// Principals covered by the campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalScopeSettings {
    /// Scope type, e.g. `USERS`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Scoped users.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_ids: Vec<String>,
    /// Scoped groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_ids: Vec<String>,
    /// Users removed from the scope.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_user_ids: Vec<String>,
    /// Okta expression selecting users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_scope_expression: Option<String>,
    /// Only active users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_only_active_users: Option<bool>,
    /// Only users with separation-of-duties conflicts.
    #[serde(rename = "onlyIncludeUsersWithSODConflicts", skip_serializing_if = "Option::is_none")]
    pub only_include_users_with_sod_conflicts: Option<bool>,
    /// Inactive-user selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predefined_inactive_users_scope: Option<PredefinedInactiveUsersScope>,
}

/// Selects users inactive for a number of days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredefinedInactiveUsersScope {
    /// Inactivity threshold in days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive_days: Option<i64>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Campaign, CampaignStatus};

    #[test]
    fn launch_and_end_follow_the_status_machine() {
        let draft = CampaignStatus::from_str("DRAFT").unwrap_or_else(|_| unreachable!());
        assert!(draft.can_launch());
        assert!(!draft.can_end());

        let active = CampaignStatus::from_str("ACTIVE").unwrap_or_else(|_| unreachable!());
        assert!(!active.can_launch());
        assert!(active.can_end());

        assert!(CampaignStatus::from_str("CLOSED?").is_err());
    }

    #[test]
    fn campaign_decodes_with_sparse_settings() {
        let campaign: Result<Campaign, _> = serde_json::from_str(
            r#"{
                "id": "icikcxkbu5HYhpwuX0g4",
                "name": "Monthly access review of sales team",
                "campaignType": "RESOURCE",
                "status": "READY",
                "scheduleSettings": {"type": "ONE_OFF", "startDate": "2026-11-01T09:00:00.000Z", "durationInDays": 30, "timeZone": "America/Vancouver"},
                "principalScopeSettings": {"type": "USERS", "onlyIncludeUsersWithSODConflicts": false},
                "created": "2026-10-01T10:00:00.000Z",
                "createdBy": "00u1"
            }"#,
        );
        let campaign = campaign.unwrap_or_else(|error| panic!("{error}"));
        assert_eq!(campaign.audit.created_by.as_deref(), Some("00u1"));
        assert_eq!(
            campaign
                .principal_scope_settings
                .and_then(|scope| scope.only_include_users_with_sod_conflicts),
            Some(false)
        );
        assert!(campaign.reviewer_settings.is_none());
    }
}
