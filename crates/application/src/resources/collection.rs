//! Collection resource: a named, curated group of resources.

use async_trait::async_trait;
use oig_core::{AppResult, Attr, Diagnostics, RequestContext, Schema, SchemaAttribute};
use oig_domain::{Collection, CollectionRequest};

use crate::governance_ports::GovernanceClient;
use crate::provider::{ImportId, ManagedResource};
use crate::resources::common::{
    AuditState, LinksModel, links_block, require, state_id, with_audit_attributes,
};

oig_core::host_record! {
    /// Host-facing collection record.
    pub struct CollectionModel {
        /// Server-assigned id.
        pub id: String,
        /// Display name.
        pub name: String,
        /// Description.
        pub description: String,
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

/// Collection resource schema.
#[must_use]
pub fn collection_schema() -> Schema {
    let schema = Schema::new("Curated group of resources that can be assigned together.")
        .with_attribute(SchemaAttribute::computed_string("id", "Server-assigned id."))
        .with_attribute(SchemaAttribute::required_string("name", "Display name."))
        .with_attribute(SchemaAttribute::optional_string("description", "Description."))
        .with_block(links_block());

    with_audit_attributes(schema)
}

fn build_request(plan: &CollectionModel) -> AppResult<CollectionRequest> {
    Ok(CollectionRequest {
        name: require(&plan.name, "name")?,
        description: plan.description.known_cloned(),
    })
}

/// Projects a server collection onto the host record.
#[must_use]
pub fn collection_state(collection: &Collection) -> CollectionModel {
    let audit = AuditState::from_metadata(&collection.audit);

    CollectionModel {
        id: Attr::known(collection.id.clone()),
        name: Attr::known(collection.name.clone()),
        description: Attr::from_option(collection.description.clone()),
        links: LinksModel::from_links(collection.links.as_ref()),
        created: audit.created,
        created_by: audit.created_by,
        last_updated: audit.last_updated,
        last_updated_by: audit.last_updated_by,
    }
}

/// Collection resource.
pub struct CollectionResource {
    client: GovernanceClient,
}

impl CollectionResource {
    /// Creates the resource over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedResource for CollectionResource {
    type Model = CollectionModel;

    const NAME: &'static str = "collection";
    const LABEL: &'static str = "Collection";

    fn schema(&self) -> Schema {
        collection_schema()
    }

    fn id_of(model: &CollectionModel) -> Option<String> {
        model.id.known_cloned()
    }

    fn validate(&self, _model: &CollectionModel, _diagnostics: &mut Diagnostics) {}

    async fn create(
        &self,
        ctx: &RequestContext,
        plan: CollectionModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<CollectionModel> {
        let request = build_request(&plan)?;
        let created = self.client.collections().create_collection(ctx, &request).await?;
        Ok(collection_state(&created))
    }

    async fn read(&self, ctx: &RequestContext, state: CollectionModel) -> AppResult<CollectionModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let collection = self.client.collections().get_collection(ctx, &id).await?;
        Ok(collection_state(&collection))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: CollectionModel,
        state: CollectionModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<CollectionModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let request = build_request(&plan)?;
        let replaced = self
            .client
            .collections()
            .replace_collection(ctx, &id, &request)
            .await?;
        Ok(collection_state(&replaced))
    }

    async fn delete(
        &self,
        ctx: &RequestContext,
        state: CollectionModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<()> {
        let id = state_id(&state.id, Self::LABEL)?;
        self.client.collections().delete_collection(ctx, &id).await
    }

    fn import(&self, id: &ImportId) -> AppResult<CollectionModel> {
        Ok(CollectionModel {
            id: Attr::known(id.single()?.to_owned()),
            ..CollectionModel::default()
        })
    }
}
