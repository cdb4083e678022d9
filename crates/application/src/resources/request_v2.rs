//! Access request resource (v2 requests API). Requests are immutable once
//! submitted and the API cannot delete them.

use async_trait::async_trait;
use oig_core::{
    AppError, AppResult, Attr, AttributePath, Diagnostics, HostType, NestedBlock, RequestContext,
    Schema, SchemaAttribute,
};
use oig_domain::{RequestV2, RequestV2Create};

use crate::governance_ports::GovernanceClient;
use crate::provider::{ImportId, ManagedResource, changed_attributes};
use crate::resources::common::{
    AuditState, ExternalRefModel, FieldValueModel, LinksModel, RequestedItemModel,
    external_ref_schema, field_values, field_values_block, links_block, list_or_null, require,
    require_block, requested_item_schema, state_id, with_audit_attributes,
};

const COMPUTED_ATTRIBUTES: &[&str] = &[
    "id",
    "requester",
    "status",
    "links",
    "created",
    "created_by",
    "last_updated",
    "last_updated_by",
];

oig_core::host_record! {
    /// Host-facing access request record.
    pub struct RequestV2Model {
        /// Server-assigned id.
        pub id: String,
        /// Requested access.
        pub requested: RequestedItemModel,
        /// Principal that receives access.
        pub requested_for: ExternalRefModel,
        /// Principal that submitted the request.
        pub requester: ExternalRefModel,
        /// Lifecycle status.
        pub status: String,
        /// Answers to requester fields.
        pub requester_field_values: Vec<FieldValueModel>,
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

/// Access request resource schema.
#[must_use]
pub fn request_v2_schema() -> Schema {
    let schema = Schema::new(
        "Access request. Requests cannot change after submission; destroying only forgets the request.",
    )
    .with_attribute(SchemaAttribute::computed_string("id", "Server-assigned id."))
    .with_attribute(SchemaAttribute::computed_string("status", "Lifecycle status."))
    .with_block(NestedBlock::single(
        "requested",
        requested_item_schema("Requested access: a catalog entry or a resource."),
    ))
    .with_block(NestedBlock::single(
        "requested_for",
        external_ref_schema("Principal that receives access.", "Principal type, e.g. OKTA_USER."),
    ))
    .with_block(NestedBlock::single(
        "requester",
        external_ref_schema("Principal that submitted the request.", "Principal type.")
            .into_computed(),
    ))
    .with_block(field_values_block())
    .with_block(links_block());

    with_audit_attributes(schema)
}

/// Requires the requested item and recipient blocks.
pub fn validate_request_v2(model: &RequestV2Model, diagnostics: &mut Diagnostics) {
    match model.requested.as_known() {
        Some(requested) => {
            let names_target = [&requested.entry_id, &requested.resource_id]
                .iter()
                .any(|field| field.is_unknown() || field.non_blank().is_some());
            if !names_target {
                diagnostics.attribute_error(
                    AttributePath::attribute("requested"),
                    "Invalid attribute combination",
                    "requested must name an entry_id or a resource_id",
                );
            }
        }
        None if model.requested.is_null() => require_block(diagnostics, "requested"),
        None => {}
    }

    if model.requested_for.is_null() {
        require_block(diagnostics, "requested_for");
    }
}

fn build_request(plan: &RequestV2Model) -> AppResult<RequestV2Create> {
    let requested_for = require(&plan.requested_for, "requested_for")?;

    Ok(RequestV2Create {
        requested: require(&plan.requested, "requested")?.to_item(),
        requested_for: requested_for.to_ref().ok_or_else(|| {
            AppError::Validation("requested_for needs a known external_id and type".to_owned())
        })?,
        requester_field_values: field_values(&plan.requester_field_values),
    })
}

/// Projects a server request onto the host record.
///
/// The requested block keeps the configured shape: fields the server fills
/// in on its own are only reported when they were configured.
#[must_use]
pub fn request_v2_state(request: &RequestV2, prior: &RequestV2Model) -> RequestV2Model {
    let audit = AuditState::from_metadata(&request.audit);
    let requested = request.requested.as_ref().map(RequestedItemModel::from_item);
    let requested = match (requested, prior.requested.as_known()) {
        (Some(mut server), Some(configured)) => {
            for (field, wanted) in [
                (&mut server.entry_id, &configured.entry_id),
                (&mut server.resource_id, &configured.resource_id),
                (&mut server.access_scope_id, &configured.access_scope_id),
                (&mut server.access_scope_type, &configured.access_scope_type),
                (&mut server.kind, &configured.kind),
            ] {
                if wanted.is_null() {
                    *field = Attr::Null;
                }
            }
            Attr::known(server)
        }
        (server, _) => Attr::from_option(server),
    };

    RequestV2Model {
        id: Attr::known(request.id.clone()),
        requested,
        requested_for: Attr::from_option(
            request.requested_for.as_ref().map(ExternalRefModel::from_ref),
        ),
        requester: Attr::from_option(request.requester.as_ref().map(ExternalRefModel::from_ref)),
        status: Attr::from_option(request.status.clone()),
        requester_field_values: list_or_null(
            request
                .requester_field_values
                .iter()
                .map(FieldValueModel::from_value)
                .collect(),
        ),
        links: LinksModel::from_links(request.links.as_ref()),
        created: audit.created,
        created_by: audit.created_by,
        last_updated: audit.last_updated,
        last_updated_by: audit.last_updated_by,
    }
}

/// Access request resource.
pub struct RequestV2Resource {
    client: GovernanceClient,
}

impl RequestV2Resource {
    /// Creates the resource over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedResource for RequestV2Resource {
    type Model = RequestV2Model;

    const NAME: &'static str = "request_v2";
    const LABEL: &'static str = "Request";

    fn schema(&self) -> Schema {
        request_v2_schema()
    }

    fn id_of(model: &RequestV2Model) -> Option<String> {
        model.id.known_cloned()
    }

    fn validate(&self, model: &RequestV2Model, diagnostics: &mut Diagnostics) {
        validate_request_v2(model, diagnostics);
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        plan: RequestV2Model,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<RequestV2Model> {
        let request = build_request(&plan)?;
        let created = self.client.requests().create_request(ctx, &request).await?;
        Ok(request_v2_state(&created, &plan))
    }

    async fn read(&self, ctx: &RequestContext, state: RequestV2Model) -> AppResult<RequestV2Model> {
        let id = state_id(&state.id, Self::LABEL)?;
        let request = self.client.requests().get_request(ctx, &id).await?;
        Ok(request_v2_state(&request, &state))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: RequestV2Model,
        state: RequestV2Model,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<RequestV2Model> {
        let changed = changed_attributes(&plan.to_host(), &state.to_host(), COMPUTED_ATTRIBUTES);
        if !changed.is_empty() {
            return Err(AppError::Unsupported(format!(
                "{} cannot change after submission; submit a new request instead",
                changed.join(", ")
            )));
        }
        self.read(ctx, state).await
    }

    async fn delete(
        &self,
        _ctx: &RequestContext,
        _state: RequestV2Model,
        diagnostics: &mut Diagnostics,
    ) -> AppResult<()> {
        diagnostics.warning(
            "Request left in place",
            "Access requests cannot be deleted; the request was only removed from state.",
        );
        Ok(())
    }

    fn import(&self, id: &ImportId) -> AppResult<RequestV2Model> {
        Ok(RequestV2Model {
            id: Attr::known(id.single()?.to_owned()),
            ..RequestV2Model::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use oig_core::{Attr, AttributePath, Diagnostics, HostType, HostValue, RequestContext};

    use crate::provider::{ResourceAdapter, ResourceHandler};
    use crate::resources::common::{ExternalRefModel, RequestedItemModel};
    use crate::testing::FakeGovernanceApi;

    use super::{RequestV2Model, RequestV2Resource, validate_request_v2};

    fn plan() -> RequestV2Model {
        RequestV2Model {
            id: Attr::Unknown,
            requested: Attr::known(RequestedItemModel {
                entry_id: Attr::known("cen1".to_owned()),
                ..RequestedItemModel::default()
            }),
            requested_for: Attr::known(ExternalRefModel {
                external_id: Attr::known("00ujane".to_owned()),
                kind: Attr::known("OKTA_USER".to_owned()),
            }),
            requester: Attr::Unknown,
            status: Attr::Unknown,
            links: Attr::Unknown,
            created: Attr::Unknown,
            created_by: Attr::Unknown,
            last_updated: Attr::Unknown,
            last_updated_by: Attr::Unknown,
            ..RequestV2Model::default()
        }
    }

    fn handler(api: &std::sync::Arc<FakeGovernanceApi>) -> ResourceAdapter<RequestV2Resource> {
        ResourceAdapter::new(RequestV2Resource::new(FakeGovernanceApi::client(api)))
    }

    #[tokio::test]
    async fn create_then_read_is_stable() {
        let api = FakeGovernanceApi::shared();
        let handler = handler(&api);
        let ctx = RequestContext::new();

        let created = handler.create(&ctx, &plan().to_host()).await;
        assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
        let state = created.state.unwrap_or(HostValue::Null);
        assert_eq!(state.get("status").and_then(HostValue::as_str), Some("PENDING"));

        let read = handler.read(&ctx, &state).await;
        assert_eq!(read.state, Some(state));
    }

    #[tokio::test]
    async fn changing_the_recipient_is_unsupported() {
        let api = FakeGovernanceApi::shared();
        let handler = handler(&api);
        let ctx = RequestContext::new();
        let state = handler
            .create(&ctx, &plan().to_host())
            .await
            .state
            .unwrap_or(HostValue::Null);
        let stored =
            RequestV2Model::from_host(&state, &AttributePath::root()).unwrap_or_else(|_| unreachable!());

        let redirected = RequestV2Model {
            requested_for: Attr::known(ExternalRefModel {
                external_id: Attr::known("00ujohn".to_owned()),
                kind: Attr::known("OKTA_USER".to_owned()),
            }),
            ..stored
        };
        let response = handler.update(&ctx, &redirected.to_host(), &state).await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.state, Some(state));
        assert_eq!(api.count("create_request").await, 1);
    }

    #[tokio::test]
    async fn delete_only_forgets_the_request() {
        let api = FakeGovernanceApi::shared();
        let handler = handler(&api);
        let ctx = RequestContext::new();
        let state = handler
            .create(&ctx, &plan().to_host())
            .await
            .state
            .unwrap_or(HostValue::Null);

        let response = handler.delete(&ctx, &state).await;

        assert!(response.state.is_none());
        assert_eq!(response.diagnostics.len(), 1);
        assert!(!response.diagnostics.has_errors());
        assert_eq!(api.requests.lock().await.len(), 1);
    }

    #[test]
    fn requested_item_must_name_a_target() {
        let mut diagnostics = Diagnostics::new();
        let config = RequestV2Model {
            requested: Attr::known(RequestedItemModel::default()),
            requested_for: Attr::Null,
            ..plan()
        };

        validate_request_v2(&config, &mut diagnostics);

        let paths: Vec<String> = diagnostics
            .iter()
            .filter_map(|diagnostic| diagnostic.path.as_ref().map(ToString::to_string))
            .collect();
        assert_eq!(paths, vec!["requested".to_owned(), "requested_for".to_owned()]);
    }
}
