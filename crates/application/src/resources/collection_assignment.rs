//! Collection assignment resource: grants a collection to a user or group.
//!
//! The service has no single-assignment read, so Read scans the collection's
//! assignments. Expiration changes are sent as JSON-patch operations.

use async_trait::async_trait;
use oig_core::{
    AppError, AppResult, Attr, AttributePath, Diagnostics, HostType, NestedBlock, RequestContext,
    Schema, SchemaAttribute,
};
use oig_domain::validation::rfc3339;
use oig_domain::{
    ASSIGNMENT_PRINCIPAL_TYPES, Actor, CollectionAssignment, CollectionAssignmentRequest,
    ListQuery, PatchOperation,
};

use crate::governance_ports::GovernanceClient;
use crate::pagination::collect_all;
use crate::provider::{ImportId, ManagedResource, changed_attributes, check};
use crate::resources::common::{
    AuditState, ExternalRefModel, LinksModel, check_one_of, external_ref_schema, links_block,
    require, require_block, state_id, supplied, with_audit_attributes,
};

const IN_PLACE_ATTRIBUTES: &[&str] = &[
    "id",
    "expiration_time",
    "time_zone",
    "assignment_type",
    "status",
    "links",
    "created",
    "created_by",
    "last_updated",
    "last_updated_by",
];

oig_core::host_record! {
    /// Host-facing collection assignment record.
    pub struct CollectionAssignmentModel {
        /// Server-assigned id.
        pub id: String,
        /// Assigned collection.
        pub collection_id: String,
        /// Assigned principal.
        pub principal: ExternalRefModel,
        /// Source of the assignment.
        pub actor: String,
        /// Expiration time (RFC3339).
        pub expiration_time: String,
        /// Time zone of the expiration.
        pub time_zone: String,
        /// Assignment type reported by the service.
        pub assignment_type: String,
        /// `ACTIVE` or `INACTIVE`.
        pub status: String,
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

/// Collection assignment resource schema.
#[must_use]
pub fn collection_assignment_schema() -> Schema {
    let schema = Schema::new(
        "Assignment of a collection to a user or group. Import with collection_id/assignment_id.",
    )
    .with_attribute(SchemaAttribute::computed_string("id", "Server-assigned id."))
    .with_attribute(SchemaAttribute::required_string("collection_id", "Assigned collection."))
    .with_attribute(SchemaAttribute::optional_computed_string(
        "actor",
        "ACCESS_REQUEST, ADMIN, API, or NONE.",
    ))
    .with_attribute(SchemaAttribute::optional_string(
        "expiration_time",
        "Expiration time (RFC3339).",
    ))
    .with_attribute(SchemaAttribute::optional_string(
        "time_zone",
        "IANA time zone of expiration_time.",
    ))
    .with_attribute(SchemaAttribute::computed_string(
        "assignment_type",
        "Assignment type reported by the service.",
    ))
    .with_attribute(SchemaAttribute::computed_string("status", "ACTIVE or INACTIVE."))
    .with_block(NestedBlock::single(
        "principal",
        external_ref_schema("Assigned principal.", "OKTA_USER or OKTA_GROUP."),
    ))
    .with_block(links_block());

    with_audit_attributes(schema)
}

fn build_request(plan: &CollectionAssignmentModel) -> AppResult<CollectionAssignmentRequest> {
    let principal = require(&plan.principal, "principal")?
        .to_ref()
        .ok_or_else(|| {
            AppError::Validation("principal.external_id and principal.type are required".to_owned())
        })?;

    Ok(CollectionAssignmentRequest {
        principal,
        actor: plan.actor.known_cloned(),
        expiration_time: plan.expiration_time.known_cloned(),
        time_zone: plan.time_zone.known_cloned(),
    })
}

/// Builds patch operations for the expiration fields that differ from state.
#[must_use]
pub fn expiration_patch(
    plan: &CollectionAssignmentModel,
    state: &CollectionAssignmentModel,
) -> Vec<PatchOperation> {
    let mut operations = Vec::new();
    if plan.expiration_time.non_blank() != state.expiration_time.non_blank() {
        operations.push(PatchOperation::set_or_remove(
            "/expirationTime",
            plan.expiration_time.non_blank(),
        ));
    }
    if plan.time_zone.non_blank() != state.time_zone.non_blank() {
        operations.push(PatchOperation::set_or_remove(
            "/timeZone",
            plan.time_zone.non_blank(),
        ));
    }
    operations
}

/// Projects a server assignment onto the host record.
#[must_use]
pub fn collection_assignment_state(
    collection_id: &str,
    assignment: &CollectionAssignment,
) -> CollectionAssignmentModel {
    let audit = AuditState::from_metadata(&assignment.audit);

    CollectionAssignmentModel {
        id: Attr::known(assignment.id.clone()),
        collection_id: Attr::known(collection_id.to_owned()),
        principal: Attr::from_option(assignment.principal.as_ref().map(ExternalRefModel::from_ref)),
        actor: Attr::from_option(assignment.actor.clone()),
        expiration_time: Attr::from_option(assignment.expiration_time.clone()),
        time_zone: Attr::from_option(assignment.time_zone.clone()),
        assignment_type: Attr::from_option(assignment.assignment_type.clone()),
        status: Attr::from_option(assignment.status.clone()),
        links: LinksModel::from_links(assignment.links.as_ref()),
        created: audit.created,
        created_by: audit.created_by,
        last_updated: audit.last_updated,
        last_updated_by: audit.last_updated_by,
    }
}

/// Collection assignment resource.
pub struct CollectionAssignmentResource {
    client: GovernanceClient,
}

impl CollectionAssignmentResource {
    /// Creates the resource over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }

    async fn find(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
        assignment_id: &str,
    ) -> AppResult<CollectionAssignment> {
        let collections = self.client.collections();
        let assignments = collect_all(ctx, &ListQuery::default(), |query| async move {
            collections
                .list_collection_assignments(ctx, collection_id, &query)
                .await
        })
        .await?;

        assignments
            .into_iter()
            .find(|assignment| assignment.id == assignment_id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "assignment '{assignment_id}' of collection '{collection_id}'"
                ))
            })
    }
}

#[async_trait]
impl ManagedResource for CollectionAssignmentResource {
    type Model = CollectionAssignmentModel;

    const NAME: &'static str = "collection_assignment";
    const LABEL: &'static str = "Collection Assignment";

    fn schema(&self) -> Schema {
        collection_assignment_schema()
    }

    fn id_of(model: &CollectionAssignmentModel) -> Option<String> {
        model.id.known_cloned()
    }

    fn validate(&self, model: &CollectionAssignmentModel, diagnostics: &mut Diagnostics) {
        check_one_of(diagnostics, AttributePath::attribute("actor"), &model.actor, Actor::VALUES);
        match &model.principal {
            Attr::Known(principal) => check_one_of(
                diagnostics,
                AttributePath::attribute("principal").child("type"),
                &principal.kind,
                ASSIGNMENT_PRINCIPAL_TYPES,
            ),
            Attr::Null => require_block(diagnostics, "principal"),
            Attr::Unknown => {}
        }
        if let Some(expiration) = model.expiration_time.non_blank() {
            check(
                diagnostics,
                AttributePath::attribute("expiration_time"),
                rfc3339("expiration_time", expiration).map(|_| ()),
            );
        }
        if model.time_zone.non_blank().is_some() && !supplied(&model.expiration_time) {
            diagnostics.attribute_error(
                AttributePath::attribute("time_zone"),
                "Invalid attribute combination",
                "time_zone can only be set together with expiration_time",
            );
        }
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        plan: CollectionAssignmentModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<CollectionAssignmentModel> {
        let collection_id = require(&plan.collection_id, "collection_id")?;
        let request = build_request(&plan)?;
        let created = self
            .client
            .collections()
            .create_collection_assignments(ctx, &collection_id, std::slice::from_ref(&request))
            .await?;
        let assignment = created.into_iter().next().ok_or_else(|| {
            AppError::Decode("assignment response contained no assignments".to_owned())
        })?;
        Ok(collection_assignment_state(&collection_id, &assignment))
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        state: CollectionAssignmentModel,
    ) -> AppResult<CollectionAssignmentModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let collection_id = require(&state.collection_id, "collection_id")?;
        let assignment = self.find(ctx, &collection_id, &id).await?;
        Ok(collection_assignment_state(&collection_id, &assignment))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: CollectionAssignmentModel,
        state: CollectionAssignmentModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<CollectionAssignmentModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let collection_id = require(&state.collection_id, "collection_id")?;
        let changed = changed_attributes(&plan.to_host(), &state.to_host(), IN_PLACE_ATTRIBUTES);
        if !changed.is_empty() {
            return Err(AppError::Unsupported(format!(
                "{} cannot change in place; only expiration_time and time_zone can be updated",
                changed.join(", ")
            )));
        }

        let operations = expiration_patch(&plan, &state);
        if operations.is_empty() {
            let assignment = self.find(ctx, &collection_id, &id).await?;
            return Ok(collection_assignment_state(&collection_id, &assignment));
        }
        let patched = self
            .client
            .collections()
            .patch_collection_assignment(ctx, &collection_id, &id, &operations)
            .await?;
        Ok(collection_assignment_state(&collection_id, &patched))
    }

    async fn delete(
        &self,
        ctx: &RequestContext,
        state: CollectionAssignmentModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<()> {
        let id = state_id(&state.id, Self::LABEL)?;
        let collection_id = require(&state.collection_id, "collection_id")?;
        self.client
            .collections()
            .delete_collection_assignment(ctx, &collection_id, &id)
            .await
    }

    fn import(&self, id: &ImportId) -> AppResult<CollectionAssignmentModel> {
        let (collection_id, assignment_id) = id.pair("collection_id/assignment_id")?;
        Ok(CollectionAssignmentModel {
            id: Attr::known(assignment_id.to_owned()),
            collection_id: Attr::known(collection_id.to_owned()),
            ..CollectionAssignmentModel::default()
        })
    }
}
