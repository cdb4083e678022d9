use oig_core::{AttributeType, NestedBlock, Schema, SchemaAttribute};

use crate::resources::common::{id_schema, resource_ref_schema, string_list, with_audit_attributes};

fn remediation_block() -> NestedBlock {
    NestedBlock::single(
        "remediation_settings",
        Schema::new("What happens to access after a decision.")
            .with_attribute(SchemaAttribute::required_string(
                "access_approved",
                "Outcome for approved access: DENY or NO_ACTION.",
            ))
            .with_attribute(SchemaAttribute::required_string(
                "access_revoked",
                "Outcome for revoked access: DENY or NO_ACTION.",
            ))
            .with_attribute(SchemaAttribute::required_string(
                "no_response",
                "Outcome when no decision was made: DENY or NO_ACTION.",
            ))
            .with_block(NestedBlock::single(
                "auto_remediation_settings",
                Schema::new("Automatic revocation options.")
                    .with_attribute(SchemaAttribute::optional_bool(
                        "include_all_indirect_assignments",
                        "Also remediate indirect assignments. Defaults to false.",
                    ))
                    .with_block(NestedBlock::list(
                        "include_only",
                        resource_ref_schema("Limit remediation to these resources."),
                    )),
            )),
    )
}

fn resource_settings_block() -> NestedBlock {
    let target_entitlement = Schema::new("Reviewed entitlement.")
        .with_attribute(SchemaAttribute::required_string("id", "Entitlement id."))
        .with_attribute(SchemaAttribute::optional_bool(
            "include_all_values",
            "Review every value. Defaults to false.",
        ))
        .with_block(NestedBlock::list("values", id_schema("Reviewed value.")));

    let target_resource = Schema::new("Reviewed resource.")
        .with_attribute(SchemaAttribute::required_string("resource_id", "Resource id."))
        .with_attribute(SchemaAttribute::required_string(
            "resource_type",
            "APPLICATION or GROUP.",
        ))
        .with_attribute(SchemaAttribute::optional_bool(
            "include_all_entitlements_and_bundles",
            "Review every entitlement and bundle. Defaults to false.",
        ))
        .with_block(NestedBlock::list("entitlements", target_entitlement))
        .with_block(NestedBlock::list(
            "entitlement_bundles",
            id_schema("Reviewed bundle."),
        ));

    let mut settings = Schema::new("Resources covered by the campaign.").with_attribute(
        SchemaAttribute::required_string("type", "APPLICATION, APPLICATION_AND_GROUP, or GROUP."),
    );
    for flag in [
        "include_admin_roles",
        "include_entitlements",
        "individually_assigned_apps_only",
        "individually_assigned_groups_only",
        "only_include_out_of_policy_entitlements",
    ] {
        settings = settings.with_attribute(SchemaAttribute::optional_bool(
            flag,
            "Defaults to false.",
        ));
    }

    NestedBlock::single(
        "resource_settings",
        settings
            .with_block(NestedBlock::list("target_resources", target_resource))
            .with_block(NestedBlock::list(
                "excluded_resources",
                resource_ref_schema("Skipped resource."),
            )),
    )
}

fn reviewer_selection(schema: Schema) -> Schema {
    schema
        .with_attribute(SchemaAttribute::required_string(
            "type",
            "GROUP, MULTI_LEVEL, RESOURCE_OWNER, REVIEWER_EXPRESSION, or USER.",
        ))
        .with_attribute(SchemaAttribute::optional_string(
            "reviewer_group_id",
            "Reviewer group when type is GROUP.",
        ))
        .with_attribute(SchemaAttribute::optional_string(
            "reviewer_id",
            "Reviewer user when type is USER.",
        ))
        .with_attribute(SchemaAttribute::optional_string(
            "reviewer_scope_expression",
            "Okta expression selecting reviewers.",
        ))
        .with_attribute(SchemaAttribute::optional_string(
            "fallback_reviewer_id",
            "Fallback reviewer when none resolves.",
        ))
        .with_attribute(SchemaAttribute::optional_bool(
            "self_review_disabled",
            "Block self-review. Defaults to false.",
        ))
}

fn reviewer_settings_block() -> NestedBlock {
    let start_review = Schema::new("When the stage opens.")
        .with_attribute(SchemaAttribute::optional_int64(
            "on_day",
            "Day offset from the campaign start.",
        ))
        .with_attribute(SchemaAttribute::optional_string(
            "when",
            "ALL_REVIEWERS_COMPLETE or ANY_REVIEWER_COMPLETE.",
        ));
    let level = reviewer_selection(Schema::new("One review stage."))
        .with_block(NestedBlock::list("start_review", start_review));

    NestedBlock::single(
        "reviewer_settings",
        reviewer_selection(Schema::new("Reviewer selection."))
            .with_attribute(SchemaAttribute::optional_bool(
                "justification_required",
                "Require a justification. Defaults to false.",
            ))
            .with_attribute(SchemaAttribute::optional_bool(
                "bulk_decision_disabled",
                "Block bulk decisions. Defaults to false.",
            ))
            .with_block(NestedBlock::list("reviewer_levels", level)),
    )
}

fn schedule_block() -> NestedBlock {
    let recurrence = Schema::new("Repetition rule.")
        .with_attribute(SchemaAttribute::required_string(
            "interval",
            "ISO-8601 interval such as P1M.",
        ))
        .with_attribute(SchemaAttribute::optional_string(
            "ends",
            "Last possible launch (RFC3339).",
        ))
        .with_attribute(SchemaAttribute::optional_string(
            "repeat_on_type",
            "LAST_WEEKDAY_AS_START_DATE, SAME_DAY_AS_START_DATE, or SAME_WEEKDAY_AS_START_DATE.",
        ));

    NestedBlock::single(
        "schedule_settings",
        Schema::new("Campaign schedule.")
            .with_attribute(SchemaAttribute::required_string("type", "ONE_OFF or RECURRING."))
            .with_attribute(SchemaAttribute::required_string(
                "start_date",
                "First launch (RFC3339); stored as YYYY-MM-DDTHH:MM:SS.mmmZ.",
            ))
            .with_attribute(SchemaAttribute::required(
                "duration_in_days",
                AttributeType::Int64,
                "Review window length.",
            ))
            .with_attribute(SchemaAttribute::required_string(
                "time_zone",
                "IANA time zone.",
            ))
            .with_attribute(SchemaAttribute::computed_string(
                "end_date",
                "End of the current cycle.",
            ))
            .with_block(NestedBlock::list("recurrence", recurrence).max_items(1)),
    )
}

fn notification_block() -> NestedBlock {
    let mut schema = Schema::new("Reviewer notifications.");
    for flag in [
        "notify_reviewer_when_review_assigned",
        "notify_reviewer_at_campaign_end",
        "notify_reviewer_when_overdue",
        "notify_reviewer_during_midpoint_of_review",
        "notify_review_period_end",
    ] {
        schema = schema.with_attribute(SchemaAttribute::optional_bool(flag, "Defaults to false."));
    }

    NestedBlock::single(
        "notification_settings",
        schema.with_attribute(SchemaAttribute::optional(
            "reminders_reviewer_before_campaign_close_in_secs",
            AttributeType::List(Box::new(AttributeType::Int64)),
            "Reminder offsets before close, in seconds.",
        )),
    )
}

fn principal_scope_block() -> NestedBlock {
    NestedBlock::single(
        "principal_scope_settings",
        Schema::new("Principals covered by the campaign.")
            .with_attribute(SchemaAttribute::required_string("type", "Scope type, e.g. USERS."))
            .with_attribute(string_list("user_ids", "Scoped users (at most 100).", true))
            .with_attribute(string_list("group_ids", "Scoped groups (at most 5).", true))
            .with_attribute(string_list(
                "excluded_user_ids",
                "Users removed from the scope (at most 50).",
                true,
            ))
            .with_attribute(SchemaAttribute::optional_string(
                "user_scope_expression",
                "Okta expression selecting users.",
            ))
            .with_attribute(SchemaAttribute::optional_bool(
                "include_only_active_users",
                "Only active users. Defaults to false.",
            ))
            .with_attribute(SchemaAttribute::optional_bool(
                "only_include_users_with_sod_conflicts",
                "Only users with separation-of-duties conflicts. Defaults to false.",
            ))
            .with_block(
                NestedBlock::list(
                    "predefined_inactive_users_scope",
                    Schema::new("Inactive-user selection.").with_attribute(
                        SchemaAttribute::optional_int64(
                            "inactive_days",
                            "Inactivity threshold, 30 to 365 days.",
                        ),
                    ),
                )
                .max_items(1),
            ),
    )
}

/// Campaign resource schema.
#[must_use]
pub fn campaign_schema() -> Schema {
    let schema = Schema::new(
        "Access-review campaign. Settings cannot change in place; only launch and end transitions apply to an existing campaign.",
    )
    .with_attribute(SchemaAttribute::computed_string("id", "Server-assigned id."))
    .with_attribute(SchemaAttribute::required_string("name", "Display name."))
    .with_attribute(SchemaAttribute::optional_string("description", "Description."))
    .with_attribute(SchemaAttribute::optional_computed_string(
        "campaign_type",
        "RESOURCE or USER.",
    ))
    .with_attribute(SchemaAttribute::optional_computed_string(
        "campaign_tier",
        "Licensing tier.",
    ))
    .with_attribute(SchemaAttribute::computed_string("status", "Server status."))
    .with_attribute(SchemaAttribute::optional_bool(
        "launch_campaign",
        "Launch the campaign once it exists. Defaults to false.",
    ))
    .with_attribute(SchemaAttribute::optional_bool(
        "end_campaign",
        "End an active campaign. Defaults to false.",
    ))
    .with_block(remediation_block())
    .with_block(resource_settings_block())
    .with_block(reviewer_settings_block())
    .with_block(schedule_block())
    .with_block(notification_block())
    .with_block(principal_scope_block());

    with_audit_attributes(schema)
}
