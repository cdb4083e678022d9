//! Request condition resource: who may request what on a resource.
//!
//! Status changes use the dedicated activate and deactivate calls; every
//! other change is a partial PATCH carrying only the differing fields.

use async_trait::async_trait;
use oig_core::{
    AppError, AppResult, Attr, AttributePath, AttributeType, Diagnostic, Diagnostics, NestedBlock,
    RequestContext, Schema, SchemaAttribute,
};
use oig_domain::validation::iso8601_duration;
use oig_domain::{
    ACCESS_DURATION_TYPES, ACCESS_SCOPE_TYPES, AccessDurationSettings, IdRef,
    REQUEST_CONDITION_STATUSES, REQUESTER_TYPES, RequestCondition, RequestConditionRequest,
    ScopeSettings,
};
use tracing::debug;

use crate::governance_ports::GovernanceClient;
use crate::provider::{ImportId, ManagedResource, check};
use crate::resources::common::{
    AuditState, LinksModel, check_one_of, check_required_when, known_list, links_block,
    list_or_null, require, require_block, state_id, string_list, supplied_list,
    with_audit_attributes,
};

const ACTIVE: &str = "ACTIVE";

oig_core::host_record! {
    /// Host-facing request condition record.
    pub struct RequestConditionModel {
        /// Server-assigned id.
        pub id: String,
        /// Owning resource id.
        pub resource_id: String,
        /// Display name.
        pub name: String,
        /// Description.
        pub description: String,
        /// Evaluation order; lower wins.
        pub priority: i64,
        /// `ACTIVE` or `INACTIVE`.
        pub status: String,
        /// Approval sequence applied to matching requests.
        pub approval_sequence_id: String,
        /// Requestable access.
        pub access_scope_settings: ScopeModel,
        /// Eligible requesters.
        pub requester_settings: ScopeModel,
        /// Duration of granted access.
        pub access_duration_settings: AccessDurationModel,
        /// Hypermedia links.
        pub links: LinksModel,
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
    /// Scope type with the scoped object ids.
    pub struct ScopeModel {
        /// Scope type.
        pub kind as "type": String,
        /// Scoped object ids.
        pub ids: Vec<String>,
    }
}

oig_core::host_record! {
    /// Duration applied to granted access.
    pub struct AccessDurationModel {
        /// Duration type.
        pub kind as "type": String,
        /// ISO-8601 duration.
        pub duration: String,
    }
}

impl ScopeModel {
    fn to_settings(&self) -> Option<ScopeSettings> {
        Some(ScopeSettings {
            kind: self.kind.known_cloned()?,
            ids: known_list(&self.ids)
                .into_iter()
                .map(|id| IdRef { id })
                .collect(),
        })
    }

    fn from_settings(settings: &ScopeSettings) -> Self {
        Self {
            kind: Attr::known(settings.kind.clone()),
            ids: list_or_null(settings.ids.iter().map(|id| id.id.clone()).collect()),
        }
    }
}

impl AccessDurationModel {
    fn to_settings(&self) -> Option<AccessDurationSettings> {
        Some(AccessDurationSettings {
            kind: self.kind.known_cloned()?,
            duration: self.duration.known_cloned(),
        })
    }
}

fn scope_schema(description: &str, types: &str) -> Schema {
    Schema::new(description)
        .with_attribute(SchemaAttribute::required_string("type", types))
        .with_attribute(string_list("ids", "Scoped object ids.", true))
}

/// Request condition resource schema.
#[must_use]
pub fn request_condition_schema() -> Schema {
    let schema = Schema::new(
        "Request condition of a resource. Import with resource_id/condition_id.",
    )
    .with_attribute(SchemaAttribute::computed_string("id", "Server-assigned id."))
    .with_attribute(SchemaAttribute::required_string("resource_id", "Owning resource id."))
    .with_attribute(SchemaAttribute::required_string("name", "Display name."))
    .with_attribute(SchemaAttribute::optional_string("description", "Description."))
    .with_attribute(SchemaAttribute::optional_computed(
        "priority",
        AttributeType::Int64,
        "Evaluation order; lower wins.",
    ))
    .with_attribute(SchemaAttribute::optional_computed_string(
        "status",
        "ACTIVE or INACTIVE. New conditions start INACTIVE.",
    ))
    .with_attribute(SchemaAttribute::optional_string(
        "approval_sequence_id",
        "Approval sequence applied to matching requests.",
    ))
    .with_block(NestedBlock::single(
        "access_scope_settings",
        scope_schema(
            "Requestable access.",
            "RESOURCE_DEFAULT, GROUPS, or ENTITLEMENT_BUNDLES.",
        ),
    ))
    .with_block(NestedBlock::single(
        "requester_settings",
        scope_schema("Eligible requesters.", "EVERYONE, GROUPS, or TEAMS."),
    ))
    .with_block(NestedBlock::single(
        "access_duration_settings",
        Schema::new("Duration of granted access.")
            .with_attribute(SchemaAttribute::required_string(
                "type",
                "ADMIN_FIXED_DURATION or REQUESTER_SPECIFIED_DURATION.",
            ))
            .with_attribute(SchemaAttribute::optional_string(
                "duration",
                "ISO-8601 duration such as P30D.",
            )),
    ))
    .with_block(links_block());

    with_audit_attributes(schema)
}

fn validate_scope(
    diagnostics: &mut Diagnostics,
    name: &str,
    scope: &Attr<ScopeModel>,
    types: &[&str],
    unscoped: &str,
) {
    match scope {
        Attr::Known(scope) => {
            let path = AttributePath::attribute(name);
            check_one_of(diagnostics, path.child("type"), &scope.kind, types);
            if let Some(kind) = scope.kind.as_deref()
                && kind != unscoped
            {
                check(
                    diagnostics,
                    path.child("ids"),
                    oig_domain::validation::required_when(
                        &format!("{name}.ids"),
                        supplied_list(&scope.ids),
                        &format!("{name}.type is {kind}"),
                    ),
                );
            }
        }
        Attr::Null => require_block(diagnostics, name),
        Attr::Unknown => {}
    }
}

/// Checks vocabularies, scope ids, and the duration shape.
pub fn validate_request_condition(model: &RequestConditionModel, diagnostics: &mut Diagnostics) {
    check_one_of(
        diagnostics,
        AttributePath::attribute("status"),
        &model.status,
        REQUEST_CONDITION_STATUSES,
    );
    validate_scope(
        diagnostics,
        "access_scope_settings",
        &model.access_scope_settings,
        ACCESS_SCOPE_TYPES,
        "RESOURCE_DEFAULT",
    );
    validate_scope(
        diagnostics,
        "requester_settings",
        &model.requester_settings,
        REQUESTER_TYPES,
        "EVERYONE",
    );

    if let Some(duration) = model.access_duration_settings.as_known() {
        let path = AttributePath::attribute("access_duration_settings");
        check_one_of(diagnostics, path.child("type"), &duration.kind, ACCESS_DURATION_TYPES);
        if duration.kind.as_deref() == Some("ADMIN_FIXED_DURATION") {
            check_required_when(
                diagnostics,
                path.child("duration"),
                &duration.duration,
                "access_duration_settings.type is ADMIN_FIXED_DURATION",
            );
        }
        if let Some(value) = duration.duration.non_blank() {
            check(
                diagnostics,
                path.child("duration"),
                iso8601_duration("access_duration_settings.duration", value),
            );
        }
    }
}

fn priority_of(model: &RequestConditionModel) -> AppResult<Option<i32>> {
    model
        .priority
        .known_cloned()
        .map(|priority| {
            i32::try_from(priority).map_err(|_| {
                AppError::Validation(format!("priority {priority} is out of range"))
            })
        })
        .transpose()
}

fn build_request(plan: &RequestConditionModel) -> AppResult<RequestConditionRequest> {
    Ok(RequestConditionRequest {
        name: Some(require(&plan.name, "name")?),
        description: plan.description.known_cloned(),
        priority: priority_of(plan)?,
        approval_sequence_id: plan.approval_sequence_id.known_cloned(),
        access_scope_settings: plan
            .access_scope_settings
            .as_known()
            .and_then(ScopeModel::to_settings),
        requester_settings: plan
            .requester_settings
            .as_known()
            .and_then(ScopeModel::to_settings),
        access_duration_settings: plan
            .access_duration_settings
            .as_known()
            .and_then(AccessDurationModel::to_settings),
    })
}

fn differing<T: PartialEq>(planned: Option<T>, stored: Option<T>) -> Option<T> {
    if planned == stored { None } else { planned }
}

/// Builds a PATCH body holding only the fields that differ from state.
pub fn build_patch(
    plan: &RequestConditionModel,
    state: &RequestConditionModel,
) -> AppResult<RequestConditionRequest> {
    let planned = build_request(plan)?;
    let stored = RequestConditionRequest {
        name: state.name.known_cloned(),
        description: state.description.known_cloned(),
        priority: priority_of(state)?,
        approval_sequence_id: state.approval_sequence_id.known_cloned(),
        access_scope_settings: state
            .access_scope_settings
            .as_known()
            .and_then(ScopeModel::to_settings),
        requester_settings: state
            .requester_settings
            .as_known()
            .and_then(ScopeModel::to_settings),
        access_duration_settings: state
            .access_duration_settings
            .as_known()
            .and_then(AccessDurationModel::to_settings),
    };

    Ok(RequestConditionRequest {
        name: differing(planned.name, stored.name),
        description: differing(planned.description, stored.description),
        priority: differing(planned.priority, stored.priority),
        approval_sequence_id: differing(planned.approval_sequence_id, stored.approval_sequence_id),
        access_scope_settings: differing(
            planned.access_scope_settings,
            stored.access_scope_settings,
        ),
        requester_settings: differing(planned.requester_settings, stored.requester_settings),
        access_duration_settings: differing(
            planned.access_duration_settings,
            stored.access_duration_settings,
        ),
    })
}

/// Projects a server condition onto the host record.
#[must_use]
pub fn request_condition_state(
    resource_id: &str,
    condition: &RequestCondition,
) -> RequestConditionModel {
    let audit = AuditState::from_metadata(&condition.audit);

    RequestConditionModel {
        id: Attr::known(condition.id.clone()),
        resource_id: Attr::known(
            condition
                .resource_id
                .clone()
                .unwrap_or_else(|| resource_id.to_owned()),
        ),
        name: Attr::known(condition.name.clone()),
        description: Attr::from_option(condition.description.clone()),
        priority: Attr::from_option(condition.priority.map(i64::from)),
        status: Attr::from_option(condition.status.clone()),
        approval_sequence_id: Attr::from_option(condition.approval_sequence_id.clone()),
        access_scope_settings: Attr::from_option(
            condition
                .access_scope_settings
                .as_ref()
                .map(ScopeModel::from_settings),
        ),
        requester_settings: Attr::from_option(
            condition
                .requester_settings
                .as_ref()
                .map(ScopeModel::from_settings),
        ),
        access_duration_settings: Attr::from_option(
            condition
                .access_duration_settings
                .as_ref()
                .map(|settings| AccessDurationModel {
                    kind: Attr::known(settings.kind.clone()),
                    duration: Attr::from_option(settings.duration.clone()),
                }),
        ),
        links: LinksModel::from_links(condition.links.as_ref()),
        created: audit.created,
        created_by: audit.created_by,
        last_updated: audit.last_updated,
        last_updated_by: audit.last_updated_by,
    }
}

/// Request condition resource.
pub struct RequestConditionResource {
    client: GovernanceClient,
}

impl RequestConditionResource {
    /// Creates the resource over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }

    async fn apply_status(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        condition: RequestCondition,
        wanted: Option<&str>,
    ) -> AppResult<RequestCondition> {
        let Some(wanted) = wanted else {
            return Ok(condition);
        };
        if condition.status.as_deref() == Some(wanted) {
            return Ok(condition);
        }

        debug!(id = %condition.id, status = wanted, "changing request condition status");
        let conditions = self.client.request_conditions();
        if wanted == ACTIVE {
            conditions
                .activate_request_condition(ctx, resource_id, &condition.id)
                .await
        } else {
            conditions
                .deactivate_request_condition(ctx, resource_id, &condition.id)
                .await
        }
    }
}

#[async_trait]
impl ManagedResource for RequestConditionResource {
    type Model = RequestConditionModel;

    const NAME: &'static str = "request_condition";
    const LABEL: &'static str = "Request Condition";

    fn schema(&self) -> Schema {
        request_condition_schema()
    }

    fn id_of(model: &RequestConditionModel) -> Option<String> {
        model.id.known_cloned()
    }

    fn validate(&self, model: &RequestConditionModel, diagnostics: &mut Diagnostics) {
        validate_request_condition(model, diagnostics);
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        plan: RequestConditionModel,
        diagnostics: &mut Diagnostics,
    ) -> AppResult<RequestConditionModel> {
        let resource_id = require(&plan.resource_id, "resource_id")?;
        let request = build_request(&plan)?;
        let created = self
            .client
            .request_conditions()
            .create_request_condition(ctx, &resource_id, &request)
            .await?;
        let created_state = request_condition_state(&resource_id, &created);
        match self
            .apply_status(ctx, &resource_id, created, plan.status.as_deref())
            .await
        {
            Ok(condition) => Ok(request_condition_state(&resource_id, &condition)),
            Err(error) => {
                diagnostics.push(Diagnostic::error(
                    "Error changing Request Condition status",
                    format!(
                        "Request condition '{}' was created but its status could not be set: {error}",
                        created_state.id.as_deref().unwrap_or_default()
                    ),
                ));
                Ok(created_state)
            }
        }
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        state: RequestConditionModel,
    ) -> AppResult<RequestConditionModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let resource_id = require(&state.resource_id, "resource_id")?;
        let condition = self
            .client
            .request_conditions()
            .get_request_condition(ctx, &resource_id, &id)
            .await?;
        Ok(request_condition_state(&resource_id, &condition))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: RequestConditionModel,
        state: RequestConditionModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<RequestConditionModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let resource_id = require(&state.resource_id, "resource_id")?;
        if plan.resource_id.as_deref().is_some_and(|planned| planned != resource_id) {
            return Err(AppError::Unsupported(
                "resource_id cannot change in place; recreate the condition".to_owned(),
            ));
        }

        let conditions = self.client.request_conditions();
        let patch = build_patch(&plan, &state)?;
        let condition = if patch.is_empty() {
            conditions.get_request_condition(ctx, &resource_id, &id).await?
        } else {
            conditions
                .patch_request_condition(ctx, &resource_id, &id, &patch)
                .await?
        };
        let condition = self
            .apply_status(ctx, &resource_id, condition, plan.status.as_deref())
            .await?;
        Ok(request_condition_state(&resource_id, &condition))
    }

    async fn delete(
        &self,
        ctx: &RequestContext,
        state: RequestConditionModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<()> {
        let id = state_id(&state.id, Self::LABEL)?;
        let resource_id = require(&state.resource_id, "resource_id")?;
        self.client
            .request_conditions()
            .delete_request_condition(ctx, &resource_id, &id)
            .await
    }

    fn import(&self, id: &ImportId) -> AppResult<RequestConditionModel> {
        let (resource_id, condition_id) = id.pair("resource_id/condition_id")?;
        Ok(RequestConditionModel {
            id: Attr::known(condition_id.to_owned()),
            resource_id: Attr::known(resource_id.to_owned()),
            ..RequestConditionModel::default()
        })
    }
}

#[cfg(test)]
mod tests;
