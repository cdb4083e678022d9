use oig_core::{Attr, AttributePath, Diagnostics};
use oig_domain::validation::{at_most, in_range, iso8601_duration, rfc3339};
use oig_domain::{
    CAMPAIGN_TYPES, INACTIVE_DAYS_RANGE, MAX_EXCLUDED_USER_IDS, MAX_REVIEWER_LEVELS,
    MAX_SCOPE_GROUP_IDS, MAX_SCOPE_USER_IDS, MAX_START_REVIEW, REMEDIATION_ACTIONS,
    REPEAT_ON_TYPES, RESOURCE_SETTINGS_TYPES, REVIEWER_TYPES, SCHEDULE_TYPES, START_REVIEW_WHEN,
    TARGET_RESOURCE_TYPES,
};

use crate::provider::check;
use crate::resources::common::{
    check_one_of, check_required_when, require_block, supplied, supplied_list,
};

use super::model::{
    CampaignModel, PrincipalScopeModel, RemediationModel, ResourceSettingsModel,
    ReviewerLevelModel, ReviewerSettingsModel, ScheduleModel,
};

/// Cross-field campaign rules. Unknown values are skipped; they are checked
/// again once known.
pub fn validate_campaign(campaign: &CampaignModel, diagnostics: &mut Diagnostics) {
    check_one_of(
        diagnostics,
        AttributePath::attribute("campaign_type"),
        &campaign.campaign_type,
        CAMPAIGN_TYPES,
    );

    for (name, present) in [
        ("remediation_settings", !campaign.remediation_settings.is_null()),
        ("resource_settings", !campaign.resource_settings.is_null()),
        ("reviewer_settings", !campaign.reviewer_settings.is_null()),
        ("schedule_settings", !campaign.schedule_settings.is_null()),
    ] {
        if !present {
            require_block(diagnostics, name);
        }
    }

    if let Some(remediation) = campaign.remediation_settings.as_known() {
        validate_remediation(remediation, diagnostics);
    }
    if let Some(resources) = campaign.resource_settings.as_known() {
        validate_resources(resources, diagnostics);
    }
    if let Some(reviewers) = campaign.reviewer_settings.as_known() {
        validate_reviewers(reviewers, diagnostics);
    }
    if let Some(schedule) = campaign.schedule_settings.as_known() {
        validate_schedule(schedule, diagnostics);
    }
    validate_principal_scope(campaign, diagnostics);
}

fn validate_remediation(remediation: &RemediationModel, diagnostics: &mut Diagnostics) {
    let path = AttributePath::attribute("remediation_settings");
    for (name, value) in [
        ("access_approved", &remediation.access_approved),
        ("access_revoked", &remediation.access_revoked),
        ("no_response", &remediation.no_response),
    ] {
        check_one_of(diagnostics, path.child(name), value, REMEDIATION_ACTIONS);
    }
}

fn validate_resources(resources: &ResourceSettingsModel, diagnostics: &mut Diagnostics) {
    let path = AttributePath::attribute("resource_settings");
    check_one_of(
        diagnostics,
        path.child("type"),
        &resources.kind,
        RESOURCE_SETTINGS_TYPES,
    );

    if let Some(targets) = resources.target_resources.as_known() {
        for (index, target) in targets.iter().enumerate() {
            check_one_of(
                diagnostics,
                path.child("target_resources").index(index).child("resource_type"),
                &target.resource_type,
                TARGET_RESOURCE_TYPES,
            );
        }
    }
    if let Some(excluded) = resources.excluded_resources.as_known() {
        for (index, resource) in excluded.iter().enumerate() {
            check_one_of(
                diagnostics,
                path.child("excluded_resources").index(index).child("resource_type"),
                &resource.resource_type,
                TARGET_RESOURCE_TYPES,
            );
        }
    }
}

fn validate_reviewers(reviewers: &ReviewerSettingsModel, diagnostics: &mut Diagnostics) {
    let path = AttributePath::attribute("reviewer_settings");
    check_one_of(diagnostics, path.child("type"), &reviewers.kind, REVIEWER_TYPES);

    match reviewers.kind.as_deref() {
        Some(kind @ ("REVIEWER_EXPRESSION" | "RESOURCE_OWNER")) => check_required_when(
            diagnostics,
            path.child("fallback_reviewer_id"),
            &reviewers.fallback_reviewer_id,
            &format!("reviewer_settings.type is {kind}"),
        ),
        Some("USER") => check_required_when(
            diagnostics,
            path.child("reviewer_scope_expression"),
            &reviewers.reviewer_scope_expression,
            "reviewer_settings.type is USER",
        ),
        _ => {}
    }

    let Some(levels) = reviewers.reviewer_levels.as_known() else {
        return;
    };
    check(
        diagnostics,
        path.child("reviewer_levels"),
        at_most("reviewer_settings.reviewer_levels", levels.len(), MAX_REVIEWER_LEVELS),
    );
    for (index, level) in levels.iter().enumerate() {
        validate_level(level, &path.child("reviewer_levels").index(index), diagnostics);
    }
}

fn validate_level(level: &ReviewerLevelModel, path: &AttributePath, diagnostics: &mut Diagnostics) {
    check_one_of(diagnostics, path.child("type"), &level.kind, REVIEWER_TYPES);

    let required = match level.kind.as_deref() {
        Some("GROUP") => Some(("reviewer_group_id", &level.reviewer_group_id)),
        Some("USER") => Some(("reviewer_id", &level.reviewer_id)),
        Some("REVIEWER_EXPRESSION") => {
            Some(("reviewer_scope_expression", &level.reviewer_scope_expression))
        }
        _ => None,
    };
    if let Some((name, value)) = required
        && let Some(kind) = level.kind.as_deref()
    {
        check_required_when(
            diagnostics,
            path.child(name),
            value,
            &format!("the level type is {kind}"),
        );
    }

    if let Some(triggers) = level.start_review.as_known() {
        let field = path.child("start_review");
        check(
            diagnostics,
            field.clone(),
            at_most(&field.to_string(), triggers.len(), MAX_START_REVIEW),
        );
        for (index, trigger) in triggers.iter().enumerate() {
            check_one_of(
                diagnostics,
                field.index(index).child("when"),
                &trigger.when,
                START_REVIEW_WHEN,
            );
        }
    }
}

fn validate_schedule(schedule: &ScheduleModel, diagnostics: &mut Diagnostics) {
    let path = AttributePath::attribute("schedule_settings");
    check_one_of(diagnostics, path.child("type"), &schedule.kind, SCHEDULE_TYPES);

    if let Some(start) = schedule.start_date.as_deref() {
        check(
            diagnostics,
            path.child("start_date"),
            rfc3339("schedule_settings.start_date", start).map(|_| ()),
        );
    }

    if schedule.kind.as_deref() != Some("RECURRING") {
        return;
    }
    let recurrence_path = path.child("recurrence");
    let recurrence = match &schedule.recurrence {
        Attr::Unknown => return,
        Attr::Known(entries) if !entries.is_empty() => &entries[0],
        _ => {
            check(
                diagnostics,
                recurrence_path,
                oig_domain::validation::required_when(
                    "schedule_settings.recurrence",
                    false,
                    "schedule_settings.type is RECURRING",
                ),
            );
            return;
        }
    };

    let entry = recurrence_path.index(0);
    match recurrence.interval.as_deref() {
        Some(interval) => check(
            diagnostics,
            entry.child("interval"),
            iso8601_duration("schedule_settings.recurrence[0].interval", interval),
        ),
        None => check_required_when(
            diagnostics,
            entry.child("interval"),
            &recurrence.interval,
            "schedule_settings.type is RECURRING",
        ),
    }
    check_one_of(
        diagnostics,
        entry.child("repeat_on_type"),
        &recurrence.repeat_on_type,
        REPEAT_ON_TYPES,
    );
    if let Some(ends) = recurrence.ends.as_deref() {
        check(
            diagnostics,
            entry.child("ends"),
            rfc3339("schedule_settings.recurrence[0].ends", ends).map(|_| ()),
        );
    }
}

fn validate_principal_scope(campaign: &CampaignModel, diagnostics: &mut Diagnostics) {
    let path = AttributePath::attribute("principal_scope_settings");
    let scope = campaign.principal_scope_settings.as_known();

    if campaign.campaign_type.as_deref() == Some("USER") {
        let selects_users = match (&campaign.principal_scope_settings, scope) {
            (Attr::Unknown, _) => true,
            (_, Some(scope)) => {
                supplied_list(&scope.user_ids)
                    || supplied_list(&scope.group_ids)
                    || supplied(&scope.user_scope_expression)
            }
            (_, None) => false,
        };
        if !selects_users {
            diagnostics.attribute_error(
                path.clone(),
                "Invalid attribute combination",
                "principal_scope_settings must set user_ids, group_ids, or user_scope_expression when campaign_type is USER",
            );
        }
    }

    let Some(scope) = scope else {
        return;
    };
    check_list_sizes(scope, &path, diagnostics);

    if let Some(entries) = scope.predefined_inactive_users_scope.as_known() {
        for (index, entry) in entries.iter().enumerate() {
            if let Some(days) = entry.inactive_days.as_known() {
                let (min, max) = INACTIVE_DAYS_RANGE;
                check(
                    diagnostics,
                    path.child("predefined_inactive_users_scope")
                        .index(index)
                        .child("inactive_days"),
                    in_range(
                        "principal_scope_settings.predefined_inactive_users_scope.inactive_days",
                        *days,
                        min,
                        max,
                    ),
                );
            }
        }
    }
}

fn check_list_sizes(scope: &PrincipalScopeModel, path: &AttributePath, diagnostics: &mut Diagnostics) {
    for (name, value, max) in [
        ("user_ids", &scope.user_ids, MAX_SCOPE_USER_IDS),
        ("group_ids", &scope.group_ids, MAX_SCOPE_GROUP_IDS),
        ("excluded_user_ids", &scope.excluded_user_ids, MAX_EXCLUDED_USER_IDS),
    ] {
        if let Some(items) = value.as_known() {
            check(
                diagnostics,
                path.child(name),
                at_most(&format!("principal_scope_settings.{name}"), items.len(), max),
            );
        }
    }
}
