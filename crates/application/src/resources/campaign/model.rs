use crate::resources::common::{IdModel, ResourceRefModel};

oig_core::host_record! {
    /// Host-facing campaign record.
    pub struct CampaignModel {
        /// Server-assigned id.
        pub id: String,
        /// Display name.
        pub name: String,
        /// Description.
        pub description: String,
        /// `RESOURCE` or `USER`.
        pub campaign_type: String,
        /// Licensing tier.
        pub campaign_tier: String,
        /// Server status.
        pub status: String,
        /// Launch the campaign once it exists.
        pub launch_campaign: bool,
        /// End an active campaign.
        pub end_campaign: bool,
        /// Remediation behaviour.
        pub remediation_settings: RemediationModel,
        /// Reviewed resources.
        pub resource_settings: ResourceSettingsModel,
        /// Reviewer selection.
        pub reviewer_settings: ReviewerSettingsModel,
        /// Schedule.
        pub schedule_settings: ScheduleModel,
        /// Reviewer notifications.
        pub notification_settings: NotificationModel,
        /// Reviewed principals.
        pub principal_scope_settings: PrincipalScopeModel,
        /// Creation time.
        pub created: String,
        /// Creator id.
        pub created_by: String,
        /// Last modification time.
        pub last_updated: String,
        /// Last modifier id.
        pub last_updated_by: String,
    }
}

oig_core::host_record! {
    /// Remediation behaviour.
    pub struct RemediationModel {
        /// Outcome for approved access.
        pub access_approved: String,
        /// Outcome for revoked access.
        pub access_revoked: String,
        /// Outcome without a decision.
        pub no_response: String,
        /// Automatic revocation options.
        pub auto_remediation_settings: AutoRemediationModel,
    }
}

oig_core::host_record! {
    /// Automatic revocation options.
    pub struct AutoRemediationModel {
        /// Also remediate indirect assignments.
        pub include_all_indirect_assignments: bool,
        /// Limit remediation to these resources.
        pub include_only: Vec<ResourceRefModel>,
    }
}

oig_core::host_record! {
    /// Reviewed resources.
    pub struct ResourceSettingsModel {
        /// `APPLICATION`, `APPLICATION_AND_GROUP`, or `GROUP`.
        pub kind as "type": String,
        /// Include admin role assignments.
        pub include_admin_roles: bool,
        /// Include entitlement assignments.
        pub include_entitlements: bool,
        /// Only individually assigned apps.
        pub individually_assigned_apps_only: bool,
        /// Only individually assigned groups.
        pub individually_assigned_groups_only: bool,
        /// Only out-of-policy entitlements.
        pub only_include_out_of_policy_entitlements: bool,
        /// Reviewed resources.
        pub target_resources: Vec<TargetResourceModel>,
        /// Skipped resources.
        pub excluded_resources: Vec<ResourceRefModel>,
    }
}

oig_core::host_record! {
    /// One reviewed resource.
    pub struct TargetResourceModel {
        /// Resource id.
        pub resource_id: String,
        /// `APPLICATION` or `GROUP`.
        pub resource_type: String,
        /// Review every entitlement and bundle.
        pub include_all_entitlements_and_bundles: bool,
        /// Reviewed entitlements.
        pub entitlements: Vec<TargetEntitlementModel>,
        /// Reviewed bundles.
        pub entitlement_bundles: Vec<IdModel>,
    }
}

oig_core::host_record! {
    /// One reviewed entitlement.
    pub struct TargetEntitlementModel {
        /// Entitlement id.
        pub id: String,
        /// Review every value.
        pub include_all_values: bool,
        /// Reviewed values.
        pub values: Vec<IdModel>,
    }
}

oig_core::host_record! {
    /// Reviewer selection.
    pub struct ReviewerSettingsModel {
        /// Reviewer type.
        pub kind as "type": String,
        /// Reviewer group.
        pub reviewer_group_id: String,
        /// Reviewer user.
        pub reviewer_id: String,
        /// Reviewer expression.
        pub reviewer_scope_expression: String,
        /// Fallback reviewer.
        pub fallback_reviewer_id: String,
        /// Block self-review.
        pub self_review_disabled: bool,
        /// Require a justification.
        pub justification_required: bool,
        /// Block bulk decisions.
        pub bulk_decision_disabled: bool,
        /// Ordered review stages.
        pub reviewer_levels: Vec<ReviewerLevelModel>,
    }
}

oig_core::host_record! {
    /// One review stage.
    pub struct ReviewerLevelModel {
        /// Reviewer type.
        pub kind as "type": String,
        /// Reviewer group.
        pub reviewer_group_id: String,
        /// Reviewer user.
        pub reviewer_id: String,
        /// Reviewer expression.
        pub reviewer_scope_expression: String,
        /// Fallback reviewer.
        pub fallback_reviewer_id: String,
        /// Block self-review.
        pub self_review_disabled: bool,
        /// Activation triggers.
        pub start_review: Vec<StartReviewModel>,
    }
}

oig_core::host_record! {
    /// Stage activation trigger.
    pub struct StartReviewModel {
        /// Day offset from the campaign start.
        pub on_day: i64,
        /// Completion condition of the previous stage.
        pub when: String,
    }
}

oig_core::host_record! {
    /// Campaign schedule.
    pub struct ScheduleModel {
        /// `ONE_OFF` or `RECURRING`.
        pub kind as "type": String,
        /// First launch.
        pub start_date: String,
        /// Review window length.
        pub duration_in_days: i64,
        /// IANA time zone.
        pub time_zone: String,
        /// Computed end of the current cycle.
        pub end_date: String,
        /// Repetition, at most one entry.
        pub recurrence: Vec<RecurrenceModel>,
    }
}

oig_core::host_record! {
    /// Repetition rule.
    pub struct RecurrenceModel {
        /// ISO-8601 interval.
        pub interval: String,
        /// Last possible launch.
        pub ends: String,
        /// Day alignment of each cycle.
        pub repeat_on_type: String,
    }
}

oig_core::host_record! {
    /// Reviewer notifications.
    pub struct NotificationModel {
        /// Notify when assigned.
        pub notify_reviewer_when_review_assigned: bool,
        /// Notify at the campaign end.
        pub notify_reviewer_at_campaign_end: bool,
        /// Notify when overdue.
        pub notify_reviewer_when_overdue: bool,
        /// Notify at the midpoint.
        pub notify_reviewer_during_midpoint_of_review: bool,
        /// Notify at review period end.
        pub notify_review_period_end: bool,
        /// Reminder offsets before close, in seconds.
        pub reminders_reviewer_before_campaign_close_in_secs: Vec<i64>,
    }
}

oig_core::host_record! {
    /// Reviewed principals.
    pub struct PrincipalScopeModel {
        /// Scope type.
        pub kind as "type": String,
        /// Scoped users.
        pub user_ids: Vec<String>,
        /// Scoped groups.
        pub group_ids: Vec<String>,
        /// Users removed from the scope.
        pub excluded_user_ids: Vec<String>,
        /// User expression.
        pub user_scope_expression: String,
        /// Only active users.
        pub include_only_active_users: bool,
        /// Only users with separation-of-duties conflicts.
        pub only_include_users_with_sod_conflicts: bool,
        /// Inactive-user selection, at most one entry.
        pub predefined_inactive_users_scope: Vec<InactiveUsersModel>,
    }
}

oig_core::host_record! {
    /// Inactive-user selection.
    pub struct InactiveUsersModel {
        /// Inactivity threshold in days.
        pub inactive_days: i64,
    }
}
