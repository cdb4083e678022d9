//! Request sequence resource: an approval workflow attached to a resource.

use async_trait::async_trait;
use oig_core::{
    AppError, AppResult, Attr, AttributePath, Diagnostics, RequestContext, Schema, SchemaAttribute,
};
use oig_domain::{COMPATIBLE_RESOURCE_TYPES, RequestSequence, RequestSequenceRequest};

use crate::governance_ports::GovernanceClient;
use crate::provider::{ImportId, ManagedResource, check};
use crate::resources::common::{
    AuditState, LinksModel, known_list, links_block, list_or_null, require, state_id,
    string_list, with_audit_attributes,
};

oig_core::host_record! {
    /// Host-facing request sequence record.
    pub struct RequestSequenceModel {
        /// Server-assigned id.
        pub id: String,
        /// Owning resource id.
        pub resource_id: String,
        /// Display name.
        pub name: String,
        /// Description.
        pub description: String,
        /// Admin console link of the workflow.
        pub link: String,
        /// Resource types the sequence applies to.
        pub compatible_resource_types: Vec<String>,
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

/// Request sequence resource schema.
#[must_use]
pub fn request_sequence_schema() -> Schema {
    let schema = Schema::new(
        "Approval sequence of a resource. Import with resource_id/sequence_id.",
    )
    .with_attribute(SchemaAttribute::computed_string("id", "Server-assigned id."))
    .with_attribute(SchemaAttribute::required_string("resource_id", "Owning resource id."))
    .with_attribute(SchemaAttribute::required_string("name", "Display name."))
    .with_attribute(SchemaAttribute::optional_string("description", "Description."))
    .with_attribute(SchemaAttribute::optional_computed_string(
        "link",
        "Admin console link of the workflow.",
    ))
    .with_attribute(string_list(
        "compatible_resource_types",
        "Resource types the sequence applies to: APP, GROUP.",
        true,
    ))
    .with_block(links_block());

    with_audit_attributes(schema)
}

fn build_request(plan: &RequestSequenceModel) -> AppResult<RequestSequenceRequest> {
    Ok(RequestSequenceRequest {
        name: require(&plan.name, "name")?,
        description: plan.description.known_cloned(),
        link: plan.link.known_cloned(),
        compatible_resource_types: known_list(&plan.compatible_resource_types),
    })
}

/// Projects a server sequence onto the host record.
#[must_use]
pub fn request_sequence_state(resource_id: &str, sequence: &RequestSequence) -> RequestSequenceModel {
    let audit = AuditState::from_metadata(&sequence.audit);

    RequestSequenceModel {
        id: Attr::known(sequence.id.clone()),
        resource_id: Attr::known(
            sequence
                .resource_id
                .clone()
                .unwrap_or_else(|| resource_id.to_owned()),
        ),
        name: Attr::known(sequence.name.clone()),
        description: Attr::from_option(sequence.description.clone()),
        link: Attr::from_option(sequence.link.clone()),
        compatible_resource_types: list_or_null(sequence.compatible_resource_types.clone()),
        links: LinksModel::from_links(sequence.links.as_ref()),
        created: audit.created,
        created_by: audit.created_by,
        last_updated: audit.last_updated,
        last_updated_by: audit.last_updated_by,
    }
}

/// Request sequence resource.
pub struct RequestSequenceResource {
    client: GovernanceClient,
}

impl RequestSequenceResource {
    /// Creates the resource over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedResource for RequestSequenceResource {
    type Model = RequestSequenceModel;

    const NAME: &'static str = "request_sequence";
    const LABEL: &'static str = "Request Sequence";

    fn schema(&self) -> Schema {
        request_sequence_schema()
    }

    fn id_of(model: &RequestSequenceModel) -> Option<String> {
        model.id.known_cloned()
    }

    fn validate(&self, model: &RequestSequenceModel, diagnostics: &mut Diagnostics) {
        let Some(types) = model.compatible_resource_types.as_known() else {
            return;
        };
        for (position, kind) in types.iter().enumerate() {
            let path = AttributePath::attribute("compatible_resource_types").index(position);
            check(
                diagnostics,
                path,
                oig_domain::validation::one_of(
                    "compatible_resource_types",
                    kind,
                    COMPATIBLE_RESOURCE_TYPES,
                ),
            );
        }
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        plan: RequestSequenceModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<RequestSequenceModel> {
        let resource_id = require(&plan.resource_id, "resource_id")?;
        let request = build_request(&plan)?;
        let created = self
            .client
            .request_sequences()
            .create_request_sequence(ctx, &resource_id, &request)
            .await?;
        Ok(request_sequence_state(&resource_id, &created))
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        state: RequestSequenceModel,
    ) -> AppResult<RequestSequenceModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let resource_id = require(&state.resource_id, "resource_id")?;
        let sequence = self
            .client
            .request_sequences()
            .get_request_sequence(ctx, &resource_id, &id)
            .await?;
        Ok(request_sequence_state(&resource_id, &sequence))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: RequestSequenceModel,
        state: RequestSequenceModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<RequestSequenceModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let resource_id = require(&state.resource_id, "resource_id")?;
        if plan.resource_id.as_deref().is_some_and(|planned| planned != resource_id) {
            return Err(AppError::Unsupported(
                "resource_id cannot change in place; recreate the sequence".to_owned(),
            ));
        }
        let request = build_request(&plan)?;
        let replaced = self
            .client
            .request_sequences()
            .replace_request_sequence(ctx, &resource_id, &id, &request)
            .await?;
        Ok(request_sequence_state(&resource_id, &replaced))
    }

    async fn delete(
        &self,
        ctx: &RequestContext,
        state: RequestSequenceModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<()> {
        let id = state_id(&state.id, Self::LABEL)?;
        let resource_id = require(&state.resource_id, "resource_id")?;
        self.client
            .request_sequences()
            .delete_request_sequence(ctx, &resource_id, &id)
            .await
    }

    fn import(&self, id: &ImportId) -> AppResult<RequestSequenceModel> {
        let (resource_id, sequence_id) = id.pair("resource_id/sequence_id")?;
        Ok(RequestSequenceModel {
            id: Attr::known(sequence_id.to_owned()),
            resource_id: Attr::known(resource_id.to_owned()),
            ..RequestSequenceModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use oig_core::{Attr, HostType, HostValue, RequestContext};

    use crate::provider::{ResourceAdapter, ResourceHandler};
    use crate::testing::FakeGovernanceApi;

    use super::{RequestSequenceModel, RequestSequenceResource};

    fn plan() -> RequestSequenceModel {
        RequestSequenceModel {
            resource_id: Attr::known("0oa1crm".to_owned()),
            name: Attr::known("Manager then owner".to_owned()),
            link: Attr::Unknown,
            compatible_resource_types: Attr::known(vec!["APP".to_owned()]),
            ..RequestSequenceModel::default()
        }
    }

    #[tokio::test]
    async fn moving_to_another_resource_is_refused() {
        let api = FakeGovernanceApi::shared();
        let handler =
            ResourceAdapter::new(RequestSequenceResource::new(FakeGovernanceApi::client(&api)));
        let ctx = RequestContext::new();
        let state = handler
            .create(&ctx, &plan().to_host())
            .await
            .state
            .unwrap_or(HostValue::Null);

        let moved = RequestSequenceModel {
            id: Attr::known("rsq0001".to_owned()),
            resource_id: Attr::known("0oa2hr".to_owned()),
            ..plan()
        };
        let response = handler.update(&ctx, &moved.to_host(), &state).await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.state, Some(state));
        assert_eq!(api.count("replace_request_sequence").await, 0);
    }

    #[test]
    fn unknown_resource_types_are_rejected_by_position() {
        let api = FakeGovernanceApi::shared();
        let handler =
            ResourceAdapter::new(RequestSequenceResource::new(FakeGovernanceApi::client(&api)));
        let config = RequestSequenceModel {
            compatible_resource_types: Attr::known(vec!["APP".to_owned(), "ROLE".to_owned()]),
            ..plan()
        };

        let diagnostics = handler.validate(&config.to_host());

        let paths: Vec<String> = diagnostics
            .iter()
            .filter_map(|diagnostic| diagnostic.path.as_ref().map(ToString::to_string))
            .collect();
        assert_eq!(paths, vec!["compatible_resource_types[1]".to_owned()]);
    }
}
