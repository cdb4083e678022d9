//! Request type resource. The service has no update endpoint: only the
//! publish status can move after creation.

use async_trait::async_trait;
use oig_core::{
    AppError, AppResult, Attr, AttributePath, Diagnostic, Diagnostics, HostType, NestedBlock,
    RequestContext, Schema, SchemaAttribute,
};
use oig_domain::{
    APPROVAL_TYPES, APPROVER_TYPES, Approval, ApprovalSettings, IdRef, REQUEST_TYPE_STATUSES,
    RequestType, RequestTypeCreate, RequestTypeRequesterSettings, RequestTypeResourceSettings,
    RequestTypeTarget,
};
use tracing::debug;

use crate::governance_ports::GovernanceClient;
use crate::provider::{ImportId, ManagedResource, changed_attributes, check};
use crate::resources::common::{
    AuditState, LinksModel, check_one_of, check_required_when, known_list, links_block,
    list_or_null, require, require_block, state_id, string_list, supplied_list,
    with_audit_attributes,
};

const PUBLISHED: &str = "ACTIVE";

const MUTABLE_ATTRIBUTES: &[&str] = &[
    "id",
    "status",
    "links",
    "created",
    "created_by",
    "last_updated",
    "last_updated_by",
];

oig_core::host_record! {
    /// Host-facing request type record.
    pub struct RequestTypeModel {
        /// Server-assigned id.
        pub id: String,
        /// Display name.
        pub name: String,
        /// Description.
        pub description: String,
        /// Owning team or group id.
        pub owner_id: String,
        /// `ACTIVE` when published, `PENDING` otherwise.
        pub status: String,
        /// Target resources.
        pub resource_settings: TargetSettingsModel,
        /// Eligible requesters.
        pub requester_settings: RequesterModel,
        /// Approval chain.
        pub approval_settings: ApprovalSettingsModel,
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
    /// Target resource type and ids.
    pub struct TargetSettingsModel {
        /// Target resource type, e.g. `GROUPS`.
        pub kind as "type": String,
        /// Target resource ids.
        pub target_resource_ids: Vec<String>,
    }
}

oig_core::host_record! {
    /// Requester type and eligible group ids.
    pub struct RequesterModel {
        /// `EVERYONE` or `GROUPS`.
        pub kind as "type": String,
        /// Eligible group ids.
        pub ids: Vec<String>,
    }
}

oig_core::host_record! {
    /// Approval type and ordered steps.
    pub struct ApprovalSettingsModel {
        /// `NONE` or `SERIAL`.
        pub kind as "type": String,
        /// Approval steps in order.
        pub approvals: Vec<ApprovalModel>,
    }
}

oig_core::host_record! {
    /// One approval step.
    pub struct ApprovalModel {
        /// Approver type.
        pub approver_type: String,
        /// Approver user for `USER`.
        pub approver_user_id: String,
        /// Approver groups for `MEMBER_OF`.
        pub approver_member_of: Vec<String>,
    }
}

fn ids_to_refs(ids: &Attr<Vec<String>>) -> Vec<IdRef> {
    known_list(ids).into_iter().map(|id| IdRef { id }).collect()
}

fn refs_to_ids(refs: &[IdRef]) -> Attr<Vec<String>> {
    list_or_null(refs.iter().map(|reference| reference.id.clone()).collect())
}

impl ApprovalModel {
    fn to_approval(&self) -> Option<Approval> {
        Some(Approval {
            approver_type: self.approver_type.known_cloned()?,
            approver_user_id: self.approver_user_id.known_cloned(),
            approver_member_of: ids_to_refs(&self.approver_member_of),
        })
    }

    fn from_approval(approval: &Approval) -> Self {
        Self {
            approver_type: Attr::known(approval.approver_type.clone()),
            approver_user_id: Attr::from_option(approval.approver_user_id.clone()),
            approver_member_of: refs_to_ids(&approval.approver_member_of),
        }
    }
}

fn approvals_schema() -> Schema {
    Schema::new("One approval step.")
        .with_attribute(SchemaAttribute::required_string(
            "approver_type",
            "GROUP_OWNER, MANAGER, MEMBER_OF or USER.",
        ))
        .with_attribute(SchemaAttribute::optional_string(
            "approver_user_id",
            "Approver user; required for USER.",
        ))
        .with_attribute(string_list(
            "approver_member_of",
            "Approver groups; required for MEMBER_OF.",
            true,
        ))
}

/// Request type resource schema.
#[must_use]
pub fn request_type_schema() -> Schema {
    let schema = Schema::new(
        "Request type. Only status can change after creation: ACTIVE publishes, PENDING unpublishes.",
    )
    .with_attribute(SchemaAttribute::computed_string("id", "Server-assigned id."))
    .with_attribute(SchemaAttribute::required_string("name", "Display name."))
    .with_attribute(SchemaAttribute::optional_string("description", "Description."))
    .with_attribute(SchemaAttribute::required_string("owner_id", "Owning team or group id."))
    .with_attribute(SchemaAttribute::optional_computed_string(
        "status",
        "ACTIVE or PENDING. New request types start PENDING.",
    ))
    .with_block(NestedBlock::single(
        "resource_settings",
        Schema::new("Target resources.")
            .with_attribute(SchemaAttribute::required_string("type", "Target resource type."))
            .with_attribute(string_list("target_resource_ids", "Target resource ids.", false)),
    ))
    .with_block(NestedBlock::single(
        "requester_settings",
        Schema::new("Eligible requesters.")
            .with_attribute(SchemaAttribute::required_string("type", "EVERYONE or GROUPS."))
            .with_attribute(string_list("ids", "Eligible group ids; required for GROUPS.", true)),
    ))
    .with_block(NestedBlock::single(
        "approval_settings",
        Schema::new("Approval chain.")
            .with_attribute(SchemaAttribute::required_string("type", "NONE or SERIAL."))
            .with_block(NestedBlock::list("approvals", approvals_schema())),
    ))
    .with_block(links_block());

    with_audit_attributes(schema)
}

/// Checks vocabularies and the approver fields each approval type needs.
pub fn validate_request_type(model: &RequestTypeModel, diagnostics: &mut Diagnostics) {
    check_one_of(
        diagnostics,
        AttributePath::attribute("status"),
        &model.status,
        REQUEST_TYPE_STATUSES,
    );

    match model.resource_settings.as_known() {
        Some(settings) => {
            if settings.target_resource_ids.as_known().is_some_and(Vec::is_empty) {
                diagnostics.attribute_error(
                    AttributePath::attribute("resource_settings").child("target_resource_ids"),
                    "Invalid attribute value",
                    "target_resource_ids must name at least one resource",
                );
            }
        }
        None if model.resource_settings.is_null() => require_block(diagnostics, "resource_settings"),
        None => {}
    }

    if let Some(requester) = model.requester_settings.as_known()
        && requester.kind.as_deref() == Some("GROUPS")
    {
        let path = AttributePath::attribute("requester_settings").child("ids");
        let field = path.to_string();
        check(
            diagnostics,
            path,
            oig_domain::validation::required_when(
                &field,
                supplied_list(&requester.ids),
                "type is GROUPS",
            ),
        );
    }

    if let Some(approval) = model.approval_settings.as_known() {
        validate_approvals(approval, diagnostics);
    }
}

fn validate_approvals(approval: &ApprovalSettingsModel, diagnostics: &mut Diagnostics) {
    let base = AttributePath::attribute("approval_settings");
    check_one_of(diagnostics, base.child("type"), &approval.kind, APPROVAL_TYPES);

    let steps = known_list(&approval.approvals);
    if approval.kind.as_deref() == Some("SERIAL") && steps.is_empty() && !approval.approvals.is_unknown()
    {
        diagnostics.attribute_error(
            base.child("approvals"),
            "Invalid attribute value",
            "approvals must contain at least one step when type is SERIAL",
        );
    }

    for (position, step) in steps.iter().enumerate() {
        let path = base.child("approvals").index(position);
        check_one_of(
            diagnostics,
            path.child("approver_type"),
            &step.approver_type,
            APPROVER_TYPES,
        );
        match step.approver_type.as_deref() {
            Some("USER") => check_required_when(
                diagnostics,
                path.child("approver_user_id"),
                &step.approver_user_id,
                "approver_type is USER",
            ),
            Some("MEMBER_OF") => {
                let member_path = path.child("approver_member_of");
                let field = member_path.to_string();
                check(
                    diagnostics,
                    member_path,
                    oig_domain::validation::required_when(
                        &field,
                        supplied_list(&step.approver_member_of),
                        "approver_type is MEMBER_OF",
                    ),
                );
            }
            _ => {}
        }
    }
}

/// Builds the create body from the plan.
pub fn build_request(plan: &RequestTypeModel) -> AppResult<RequestTypeCreate> {
    let resource_settings = require(&plan.resource_settings, "resource_settings")?;

    Ok(RequestTypeCreate {
        name: require(&plan.name, "name")?,
        description: plan.description.known_cloned(),
        owner_id: require(&plan.owner_id, "owner_id")?,
        resource_settings: RequestTypeResourceSettings {
            kind: require(&resource_settings.kind, "resource_settings.type")?,
            target_resources: known_list(&resource_settings.target_resource_ids)
                .into_iter()
                .map(|resource_id| RequestTypeTarget { resource_id })
                .collect(),
        },
        requester_settings: plan.requester_settings.as_known().and_then(|requester| {
            Some(RequestTypeRequesterSettings {
                kind: requester.kind.known_cloned()?,
                ids: ids_to_refs(&requester.ids),
            })
        }),
        approval_settings: plan.approval_settings.as_known().and_then(|approval| {
            Some(ApprovalSettings {
                kind: approval.kind.known_cloned()?,
                approvals: known_list(&approval.approvals)
                    .iter()
                    .filter_map(ApprovalModel::to_approval)
                    .collect(),
            })
        }),
    })
}

/// Projects a server request type onto the host record.
#[must_use]
pub fn request_type_state(request_type: &RequestType) -> RequestTypeModel {
    let audit = AuditState::from_metadata(&request_type.audit);

    RequestTypeModel {
        id: Attr::known(request_type.id.clone()),
        name: Attr::known(request_type.name.clone()),
        description: Attr::from_option(request_type.description.clone()),
        owner_id: Attr::from_option(request_type.owner_id.clone()),
        status: Attr::from_option(request_type.status.clone()),
        resource_settings: Attr::from_option(request_type.resource_settings.as_ref().map(
            |settings| TargetSettingsModel {
                kind: Attr::known(settings.kind.clone()),
                target_resource_ids: list_or_null(
                    settings
                        .target_resources
                        .iter()
                        .map(|target| target.resource_id.clone())
                        .collect(),
                ),
            },
        )),
        requester_settings: Attr::from_option(request_type.requester_settings.as_ref().map(
            |requester| RequesterModel {
                kind: Attr::known(requester.kind.clone()),
                ids: refs_to_ids(&requester.ids),
            },
        )),
        approval_settings: Attr::from_option(request_type.approval_settings.as_ref().map(
            |approval| ApprovalSettingsModel {
                kind: Attr::known(approval.kind.clone()),
                approvals: list_or_null(
                    approval
                        .approvals
                        .iter()
                        .map(ApprovalModel::from_approval)
                        .collect(),
                ),
            },
        )),
        links: LinksModel::from_links(request_type.links.as_ref()),
        created: audit.created,
        created_by: audit.created_by,
        last_updated: audit.last_updated,
        last_updated_by: audit.last_updated_by,
    }
}

/// Request type resource.
pub struct RequestTypeResource {
    client: GovernanceClient,
}

impl RequestTypeResource {
    /// Creates the resource over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }

    async fn apply_status(
        &self,
        ctx: &RequestContext,
        wanted: &Attr<String>,
        current: RequestType,
    ) -> AppResult<RequestType> {
        let Some(wanted) = wanted.as_deref() else {
            return Ok(current);
        };
        if current.status.as_deref() == Some(wanted) {
            return Ok(current);
        }

        debug!(request_type_id = %current.id, status = wanted, "changing request type status");
        let request_types = self.client.request_types();
        if wanted == PUBLISHED {
            request_types.publish_request_type(ctx, &current.id).await
        } else {
            request_types.unpublish_request_type(ctx, &current.id).await
        }
    }
}

#[async_trait]
impl ManagedResource for RequestTypeResource {
    type Model = RequestTypeModel;

    const NAME: &'static str = "request_type";
    const LABEL: &'static str = "Request Type";

    fn schema(&self) -> Schema {
        request_type_schema()
    }

    fn id_of(model: &RequestTypeModel) -> Option<String> {
        model.id.known_cloned()
    }

    fn validate(&self, model: &RequestTypeModel, diagnostics: &mut Diagnostics) {
        validate_request_type(model, diagnostics);
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        plan: RequestTypeModel,
        diagnostics: &mut Diagnostics,
    ) -> AppResult<RequestTypeModel> {
        let request = build_request(&plan)?;
        let created = self
            .client
            .request_types()
            .create_request_type(ctx, &request)
            .await?;
        let created_state = request_type_state(&created);
        match self.apply_status(ctx, &plan.status, created).await {
            Ok(current) => Ok(request_type_state(&current)),
            Err(error) => {
                diagnostics.push(Diagnostic::error(
                    "Error publishing Request Type",
                    format!(
                        "Request type '{}' was created but its status could not be set: {error}",
                        created_state.id.as_deref().unwrap_or_default()
                    ),
                ));
                Ok(created_state)
            }
        }
    }

    async fn read(&self, ctx: &RequestContext, state: RequestTypeModel) -> AppResult<RequestTypeModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let request_type = self.client.request_types().get_request_type(ctx, &id).await?;
        Ok(request_type_state(&request_type))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: RequestTypeModel,
        state: RequestTypeModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<RequestTypeModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let changed = changed_attributes(&plan.to_host(), &state.to_host(), MUTABLE_ATTRIBUTES);
        if !changed.is_empty() {
            return Err(AppError::Unsupported(format!(
                "{} cannot change after creation; destroy and recreate the request type",
                changed.join(", ")
            )));
        }

        let current = self.client.request_types().get_request_type(ctx, &id).await?;
        let current = self.apply_status(ctx, &plan.status, current).await?;
        Ok(request_type_state(&current))
    }

    async fn delete(
        &self,
        ctx: &RequestContext,
        state: RequestTypeModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<()> {
        let id = state_id(&state.id, Self::LABEL)?;
        self.client.request_types().delete_request_type(ctx, &id).await
    }

    fn import(&self, id: &ImportId) -> AppResult<RequestTypeModel> {
        Ok(RequestTypeModel {
            id: Attr::known(id.single()?.to_owned()),
            ..RequestTypeModel::default()
        })
    }
}

#[cfg(test)]
mod tests;
