use oig_core::{AppResult, Attr};
use oig_domain::{
    AutoRemediationSettings, Campaign, CampaignRequest, IdRef, NotificationSettings,
    PredefinedInactiveUsersScope, PrincipalScopeSettings, Recurrence, RemediationSettings,
    ResourceSettings, ReviewerLevel, ReviewerSettings, ScheduleSettings, StartReview,
    TargetEntitlement, TargetResource, format_timestamp_millis,
};

use crate::resources::common::{
    AuditState, IdModel, ResourceRefModel, flag, known_list, list_or_null, parse_optional_timestamp,
    refresh_list, refresh_timestamp, require,
};

use super::model::{
    AutoRemediationModel, CampaignModel, InactiveUsersModel, NotificationModel,
    PrincipalScopeModel, RecurrenceModel, RemediationModel, ResourceSettingsModel,
    ReviewerLevelModel, ReviewerSettingsModel, ScheduleModel, StartReviewModel,
    TargetEntitlementModel, TargetResourceModel,
};

/// Builds the create body from known plan values only.
pub fn build_request(plan: &CampaignModel) -> AppResult<CampaignRequest> {
    let remediation = require(&plan.remediation_settings, "remediation_settings")?;
    let resources = require(&plan.resource_settings, "resource_settings")?;
    let reviewers = require(&plan.reviewer_settings, "reviewer_settings")?;
    let schedule = require(&plan.schedule_settings, "schedule_settings")?;

    Ok(CampaignRequest {
        name: require(&plan.name, "name")?,
        description: plan.description.known_cloned(),
        campaign_type: plan.campaign_type.known_cloned(),
        campaign_tier: plan.campaign_tier.known_cloned(),
        remediation_settings: remediation_request(&remediation),
        resource_settings: resource_request(&resources),
        reviewer_settings: reviewer_request(&reviewers),
        schedule_settings: schedule_request(&schedule)?,
        notification_settings: plan.notification_settings.as_known().map(notification_request),
        principal_scope_settings: plan
            .principal_scope_settings
            .as_known()
            .map(principal_scope_request),
    })
}

fn remediation_request(model: &RemediationModel) -> RemediationSettings {
    RemediationSettings {
        access_approved: model.access_approved.known_cloned().unwrap_or_default(),
        access_revoked: model.access_revoked.known_cloned().unwrap_or_default(),
        no_response: model.no_response.known_cloned().unwrap_or_default(),
        auto_remediation_settings: model.auto_remediation_settings.as_known().map(|auto| {
            AutoRemediationSettings {
                include_all_indirect_assignments: auto
                    .include_all_indirect_assignments
                    .known_cloned(),
                include_only: known_list(&auto.include_only)
                    .iter()
                    .filter_map(ResourceRefModel::to_ref)
                    .collect(),
            }
        }),
    }
}

fn id_refs(values: &Attr<Vec<IdModel>>) -> Vec<IdRef> {
    known_list(values).iter().filter_map(IdModel::to_ref).collect()
}

fn resource_request(model: &ResourceSettingsModel) -> ResourceSettings {
    ResourceSettings {
        kind: model.kind.known_cloned().unwrap_or_default(),
        include_admin_roles: model.include_admin_roles.known_cloned(),
        include_entitlements: model.include_entitlements.known_cloned(),
        individually_assigned_apps_only: model.individually_assigned_apps_only.known_cloned(),
        individually_assigned_groups_only: model.individually_assigned_groups_only.known_cloned(),
        only_include_out_of_policy_entitlements: model
            .only_include_out_of_policy_entitlements
            .known_cloned(),
        target_resources: known_list(&model.target_resources)
            .iter()
            .filter_map(|target| {
                Some(TargetResource {
                    resource_id: target.resource_id.known_cloned()?,
                    resource_type: target.resource_type.known_cloned().unwrap_or_default(),
                    include_all_entitlements_and_bundles: target
                        .include_all_entitlements_and_bundles
                        .known_cloned(),
                    entitlements: known_list(&target.entitlements)
                        .iter()
                        .filter_map(|entitlement| {
                            Some(TargetEntitlement {
                                id: entitlement.id.known_cloned()?,
                                include_all_values: entitlement.include_all_values.known_cloned(),
                                values: id_refs(&entitlement.values),
                            })
                        })
                        .collect(),
                    entitlement_bundles: id_refs(&target.entitlement_bundles),
                })
            })
            .collect(),
        excluded_resources: known_list(&model.excluded_resources)
            .iter()
            .filter_map(ResourceRefModel::to_ref)
            .collect(),
    }
}

fn level_request(model: &ReviewerLevelModel) -> ReviewerLevel {
    ReviewerLevel {
        kind: model.kind.known_cloned().unwrap_or_default(),
        reviewer_group_id: model.reviewer_group_id.known_cloned(),
        reviewer_id: model.reviewer_id.known_cloned(),
        reviewer_scope_expression: model.reviewer_scope_expression.known_cloned(),
        fallback_reviewer_id: model.fallback_reviewer_id.known_cloned(),
        self_review_disabled: model.self_review_disabled.known_cloned(),
        start_review: known_list(&model.start_review)
            .iter()
            .map(|trigger| StartReview {
                on_day: trigger.on_day.known_cloned(),
                when: trigger.when.known_cloned(),
            })
            .collect(),
    }
}

fn reviewer_request(model: &ReviewerSettingsModel) -> ReviewerSettings {
    ReviewerSettings {
        kind: model.kind.known_cloned().unwrap_or_default(),
        reviewer_group_id: model.reviewer_group_id.known_cloned(),
        reviewer_id: model.reviewer_id.known_cloned(),
        reviewer_scope_expression: model.reviewer_scope_expression.known_cloned(),
        fallback_reviewer_id: model.fallback_reviewer_id.known_cloned(),
        self_review_disabled: model.self_review_disabled.known_cloned(),
        justification_required: model.justification_required.known_cloned(),
        bulk_decision_disabled: model.bulk_decision_disabled.known_cloned(),
        reviewer_levels: known_list(&model.reviewer_levels)
            .iter()
            .map(level_request)
            .collect(),
    }
}

fn schedule_request(model: &ScheduleModel) -> AppResult<ScheduleSettings> {
    let kind = model.kind.known_cloned().unwrap_or_default();
    let recurrence = if kind == "RECURRING" {
        known_list(&model.recurrence)
            .first()
            .map(|entry| -> AppResult<Recurrence> {
                Ok(Recurrence {
                    interval: entry.interval.known_cloned().unwrap_or_default(),
                    ends: parse_optional_timestamp(
                        &entry.ends,
                        "schedule_settings.recurrence[0].ends",
                    )?,
                    repeat_on_type: entry.repeat_on_type.known_cloned(),
                })
            })
            .transpose()?
    } else {
        None
    };

    Ok(ScheduleSettings {
        kind,
        start_date: parse_optional_timestamp(&model.start_date, "schedule_settings.start_date")?,
        duration_in_days: model.duration_in_days.known_cloned(),
        time_zone: model.time_zone.known_cloned(),
        end_date: None,
        recurrence,
    })
}

fn notification_request(model: &NotificationModel) -> NotificationSettings {
    NotificationSettings {
        notify_reviewer_when_review_assigned: model
            .notify_reviewer_when_review_assigned
            .known_cloned(),
        notify_reviewer_at_campaign_end: model.notify_reviewer_at_campaign_end.known_cloned(),
        notify_reviewer_when_overdue: model.notify_reviewer_when_overdue.known_cloned(),
        notify_reviewer_during_midpoint_of_review: model
            .notify_reviewer_during_midpoint_of_review
            .known_cloned(),
        notify_review_period_end: model.notify_review_period_end.known_cloned(),
        reminders_reviewer_before_campaign_close_in_secs: known_list(
            &model.reminders_reviewer_before_campaign_close_in_secs,
        ),
    }
}

fn principal_scope_request(model: &PrincipalScopeModel) -> PrincipalScopeSettings {
    PrincipalScopeSettings {
        kind: model.kind.known_cloned().unwrap_or_default(),
        user_ids: known_list(&model.user_ids),
        group_ids: known_list(&model.group_ids),
        excluded_user_ids: known_list(&model.excluded_user_ids),
        user_scope_expression: model.user_scope_expression.known_cloned(),
        include_only_active_users: model.include_only_active_users.known_cloned(),
        only_include_users_with_sod_conflicts: model
            .only_include_users_with_sod_conflicts
            .known_cloned(),
        predefined_inactive_users_scope: known_list(&model.predefined_inactive_users_scope)
            .first()
            .map(|scope| PredefinedInactiveUsersScope {
                inactive_days: scope.inactive_days.known_cloned(),
            }),
    }
}

/// Rebuilds the full host record from a server campaign.
///
/// `prior` supplies the control flags and configured timestamp text; every
/// other attribute comes from the response.
#[must_use]
pub fn campaign_state(campaign: &Campaign, prior: &CampaignModel) -> CampaignModel {
    let audit = AuditState::formatted(&campaign.audit, format_timestamp_millis);
    let prior_schedule = prior.schedule_settings.known_cloned().unwrap_or_default();
    let prior_scope = prior
        .principal_scope_settings
        .known_cloned()
        .unwrap_or_default();

    CampaignModel {
        id: Attr::known(campaign.id.clone()),
        name: Attr::known(campaign.name.clone()),
        description: Attr::from_option(campaign.description.clone()),
        campaign_type: Attr::from_option(campaign.campaign_type.clone()),
        campaign_tier: Attr::from_option(campaign.campaign_tier.clone()),
        status: Attr::from_option(campaign.status.clone()),
        launch_campaign: Attr::known(prior.launch_campaign.is_true()),
        end_campaign: Attr::known(prior.end_campaign.is_true()),
        remediation_settings: Attr::from_option(
            campaign.remediation_settings.as_ref().map(remediation_state),
        ),
        resource_settings: Attr::from_option(
            campaign.resource_settings.as_ref().map(resource_state),
        ),
        reviewer_settings: Attr::from_option(
            campaign.reviewer_settings.as_ref().map(reviewer_state),
        ),
        schedule_settings: Attr::from_option(
            campaign
                .schedule_settings
                .as_ref()
                .map(|schedule| schedule_state(schedule, &prior_schedule)),
        ),
        notification_settings: Attr::from_option(
            campaign.notification_settings.as_ref().map(notification_state),
        ),
        principal_scope_settings: Attr::from_option(
            campaign
                .principal_scope_settings
                .as_ref()
                .map(|scope| principal_scope_state(scope, &prior_scope)),
        ),
        created: audit.created,
        created_by: audit.created_by,
        last_updated: audit.last_updated,
        last_updated_by: audit.last_updated_by,
    }
}

fn remediation_state(settings: &RemediationSettings) -> RemediationModel {
    RemediationModel {
        access_approved: Attr::known(settings.access_approved.clone()),
        access_revoked: Attr::known(settings.access_revoked.clone()),
        no_response: Attr::known(settings.no_response.clone()),
        auto_remediation_settings: Attr::from_option(
            settings
                .auto_remediation_settings
                .as_ref()
                .map(|auto| AutoRemediationModel {
                    include_all_indirect_assignments: flag(auto.include_all_indirect_assignments),
                    include_only: list_or_null(
                        auto.include_only.iter().map(ResourceRefModel::from_ref).collect(),
                    ),
                }),
        ),
    }
}

fn id_models(values: &[IdRef]) -> Attr<Vec<IdModel>> {
    list_or_null(values.iter().map(IdModel::from_ref).collect())
}

fn resource_state(settings: &ResourceSettings) -> ResourceSettingsModel {
    ResourceSettingsModel {
        kind: Attr::known(settings.kind.clone()),
        include_admin_roles: flag(settings.include_admin_roles),
        include_entitlements: flag(settings.include_entitlements),
        individually_assigned_apps_only: flag(settings.individually_assigned_apps_only),
        individually_assigned_groups_only: flag(settings.individually_assigned_groups_only),
        only_include_out_of_policy_entitlements: flag(
            settings.only_include_out_of_policy_entitlements,
        ),
        target_resources: list_or_null(
            settings
                .target_resources
                .iter()
                .map(|target| TargetResourceModel {
                    resource_id: Attr::known(target.resource_id.clone()),
                    resource_type: Attr::known(target.resource_type.clone()),
                    include_all_entitlements_and_bundles: flag(
                        target.include_all_entitlements_and_bundles,
                    ),
                    entitlements: list_or_null(
                        target
                            .entitlements
                            .iter()
                            .map(|entitlement| TargetEntitlementModel {
                                id: Attr::known(entitlement.id.clone()),
                                include_all_values: flag(entitlement.include_all_values),
                                values: id_models(&entitlement.values),
                            })
                            .collect(),
                    ),
                    entitlement_bundles: id_models(&target.entitlement_bundles),
                })
                .collect(),
        ),
        excluded_resources: list_or_null(
            settings
                .excluded_resources
                .iter()
                .map(ResourceRefModel::from_ref)
                .collect(),
        ),
    }
}

fn level_state(level: &ReviewerLevel) -> ReviewerLevelModel {
    ReviewerLevelModel {
        kind: Attr::known(level.kind.clone()),
        reviewer_group_id: Attr::from_option(level.reviewer_group_id.clone()),
        reviewer_id: Attr::from_option(level.reviewer_id.clone()),
        reviewer_scope_expression: Attr::from_option(level.reviewer_scope_expression.clone()),
        fallback_reviewer_id: Attr::from_option(level.fallback_reviewer_id.clone()),
        self_review_disabled: flag(level.self_review_disabled),
        start_review: list_or_null(
            level
                .start_review
                .iter()
                .map(|trigger| StartReviewModel {
                    on_day: Attr::from_option(trigger.on_day),
                    when: Attr::from_option(trigger.when.clone()),
                })
                .collect(),
        ),
    }
}

fn reviewer_state(settings: &ReviewerSettings) -> ReviewerSettingsModel {
    ReviewerSettingsModel {
        kind: Attr::known(settings.kind.clone()),
        reviewer_group_id: Attr::from_option(settings.reviewer_group_id.clone()),
        reviewer_id: Attr::from_option(settings.reviewer_id.clone()),
        reviewer_scope_expression: Attr::from_option(settings.reviewer_scope_expression.clone()),
        fallback_reviewer_id: Attr::from_option(settings.fallback_reviewer_id.clone()),
        self_review_disabled: flag(settings.self_review_disabled),
        justification_required: flag(settings.justification_required),
        bulk_decision_disabled: flag(settings.bulk_decision_disabled),
        reviewer_levels: list_or_null(settings.reviewer_levels.iter().map(level_state).collect()),
    }
}

fn schedule_state(settings: &ScheduleSettings, prior: &ScheduleModel) -> ScheduleModel {
    let prior_recurrence = known_list(&prior.recurrence).into_iter().next().unwrap_or_default();

    ScheduleModel {
        kind: Attr::known(settings.kind.clone()),
        start_date: refresh_timestamp(
            &prior.start_date,
            settings.start_date.as_ref(),
            format_timestamp_millis,
        ),
        duration_in_days: Attr::from_option(settings.duration_in_days),
        time_zone: Attr::from_option(settings.time_zone.clone()),
        end_date: Attr::from_option(settings.end_date.as_ref().map(format_timestamp_millis)),
        recurrence: list_or_null(
            settings
                .recurrence
                .iter()
                .map(|recurrence| RecurrenceModel {
                    interval: Attr::known(recurrence.interval.clone()),
                    ends: match recurrence.ends.as_ref() {
                        Some(ends) => refresh_timestamp(
                            &prior_recurrence.ends,
                            Some(ends),
                            format_timestamp_millis,
                        ),
                        None => Attr::Null,
                    },
                    repeat_on_type: Attr::from_option(recurrence.repeat_on_type.clone()),
                })
                .collect(),
        ),
    }
}

fn notification_state(settings: &NotificationSettings) -> NotificationModel {
    NotificationModel {
        notify_reviewer_when_review_assigned: flag(settings.notify_reviewer_when_review_assigned),
        notify_reviewer_at_campaign_end: flag(settings.notify_reviewer_at_campaign_end),
        notify_reviewer_when_overdue: flag(settings.notify_reviewer_when_overdue),
        notify_reviewer_during_midpoint_of_review: flag(
            settings.notify_reviewer_during_midpoint_of_review,
        ),
        notify_review_period_end: flag(settings.notify_review_period_end),
        reminders_reviewer_before_campaign_close_in_secs: list_or_null(
            settings.reminders_reviewer_before_campaign_close_in_secs.clone(),
        ),
    }
}

fn principal_scope_state(
    settings: &PrincipalScopeSettings,
    prior: &PrincipalScopeModel,
) -> PrincipalScopeModel {
    PrincipalScopeModel {
        kind: Attr::known(settings.kind.clone()),
        user_ids: refresh_list(&prior.user_ids, settings.user_ids.clone()),
        group_ids: refresh_list(&prior.group_ids, settings.group_ids.clone()),
        excluded_user_ids: refresh_list(&prior.excluded_user_ids, settings.excluded_user_ids.clone()),
        user_scope_expression: Attr::from_option(settings.user_scope_expression.clone()),
        include_only_active_users: flag(settings.include_only_active_users),
        only_include_users_with_sod_conflicts: flag(settings.only_include_users_with_sod_conflicts),
        predefined_inactive_users_scope: list_or_null(
            settings
                .predefined_inactive_users_scope
                .iter()
                .map(|scope| InactiveUsersModel {
                    inactive_days: Attr::from_option(scope.inactive_days),
                })
                .collect(),
        ),
    }
}
