use async_trait::async_trait;
use oig_core::{
    AppResult, Attr, NestedBlock, RequestContext, Requirement, Schema, SchemaAttribute,
};
use oig_domain::{CollectionResource, FilterBuilder, ListQuery};

use crate::governance_ports::GovernanceClient;
use crate::pagination::collect_all;
use crate::provider::ManagedDataSource;
use crate::resources::collection_assignment::{
    CollectionAssignmentModel, collection_assignment_schema, collection_assignment_state,
};
use crate::resources::common::{
    EntitlementSelectionModel, LinksModel, entitlement_selection_schema, links_block,
    list_or_null, require,
};

use super::list_schema;

oig_core::host_record! {
    /// Resource included in a collection.
    pub struct CollectionResourceModel {
        /// Owning collection.
        pub collection_id: String,
        /// Resource id inside the collection.
        pub resource_id: String,
        /// ORN of the resource.
        pub resource_orn: String,
        /// Included entitlements and values.
        pub entitlements: Vec<EntitlementSelectionModel>,
        /// Hypermedia links.
        pub links: LinksModel,
    }
}

fn collection_resource_state(collection_id: &str, resource: &CollectionResource) -> CollectionResourceModel {
    CollectionResourceModel {
        collection_id: Attr::known(collection_id.to_owned()),
        resource_id: Attr::known(resource.resource_id.clone()),
        resource_orn: Attr::from_option(resource.resource_orn.clone()),
        entitlements: list_or_null(
            resource
                .entitlements
                .iter()
                .map(EntitlementSelectionModel::from_selection)
                .collect(),
        ),
        links: LinksModel::from_links(resource.links.as_ref()),
    }
}

fn collection_resource_schema() -> Schema {
    Schema::new("Resource included in a collection.")
        .with_attribute(SchemaAttribute::computed_string("collection_id", "Owning collection."))
        .with_attribute(SchemaAttribute::computed_string(
            "resource_id",
            "Resource id inside the collection.",
        ))
        .with_attribute(SchemaAttribute::computed_string("resource_orn", "ORN of the resource."))
        .with_block(NestedBlock::list(
            "entitlements",
            entitlement_selection_schema("Included entitlement.").into_computed(),
        ))
        .with_block(links_block())
}

/// Looks up one resource of a collection.
pub struct CollectionResourceDataSource {
    client: GovernanceClient,
}

impl CollectionResourceDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for CollectionResourceDataSource {
    type Model = CollectionResourceModel;

    const NAME: &'static str = "collection_resource";
    const LABEL: &'static str = "Collection Resource";

    fn schema(&self) -> Schema {
        collection_resource_schema()
            .with_requirement("collection_id", Requirement::Required)
            .with_requirement("resource_id", Requirement::Required)
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        config: CollectionResourceModel,
    ) -> AppResult<CollectionResourceModel> {
        let collection_id = require(&config.collection_id, "collection_id")?;
        let resource_id = require(&config.resource_id, "resource_id")?;
        let resource = self
            .client
            .collections()
            .get_collection_resource(ctx, &collection_id, &resource_id)
            .await?;
        Ok(collection_resource_state(&collection_id, &resource))
    }
}

oig_core::host_record! {
    /// Resource listing of one collection.
    pub struct CollectionResourcesModel {
        /// Owning collection.
        pub collection_id: String,
        /// Resources in server order.
        pub resources: Vec<CollectionResourceModel>,
    }
}

/// Lists the resources of a collection.
pub struct CollectionResourcesDataSource {
    client: GovernanceClient,
}

impl CollectionResourcesDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for CollectionResourcesDataSource {
    type Model = CollectionResourcesModel;

    const NAME: &'static str = "collection_resources";
    const LABEL: &'static str = "Collection Resources";

    fn schema(&self) -> Schema {
        list_schema("Resources of a collection.", "resources", collection_resource_schema())
            .with_attribute(SchemaAttribute::required_string("collection_id", "Owning collection."))
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        mut config: CollectionResourcesModel,
    ) -> AppResult<CollectionResourcesModel> {
        let collection_id = require(&config.collection_id, "collection_id")?;
        let collection = collection_id.as_str();

        let resources = collect_all(ctx, &ListQuery::default(), |query| async move {
            self.client
                .collections()
                .list_collection_resources(ctx, collection, &query)
                .await
        })
        .await?;

        config.resources = Attr::known(
            resources
                .iter()
                .map(|resource| collection_resource_state(collection, resource))
                .collect(),
        );
        Ok(config)
    }
}

oig_core::host_record! {
    /// Assignment listing of one collection.
    pub struct CollectionAssignmentsModel {
        /// Owning collection.
        pub collection_id: String,
        /// Exact principal id.
        pub principal_external_id: String,
        /// Exact assignment status.
        pub status: String,
        /// Matching assignments in server order.
        pub assignments: Vec<CollectionAssignmentModel>,
    }
}

/// Lists the principals assigned to a collection.
pub struct CollectionAssignmentsDataSource {
    client: GovernanceClient,
}

impl CollectionAssignmentsDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for CollectionAssignmentsDataSource {
    type Model = CollectionAssignmentsModel;

    const NAME: &'static str = "collection_assignments";
    const LABEL: &'static str = "Collection Assignments";

    fn schema(&self) -> Schema {
        list_schema(
            "Principals assigned to a collection.",
            "assignments",
            collection_assignment_schema(),
        )
        .with_attribute(SchemaAttribute::required_string("collection_id", "Owning collection."))
        .with_attribute(SchemaAttribute::optional_string(
            "principal_external_id",
            "Only assignments of this principal.",
        ))
        .with_attribute(SchemaAttribute::optional_string(
            "status",
            "Only assignments in this status.",
        ))
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        mut config: CollectionAssignmentsModel,
    ) -> AppResult<CollectionAssignmentsModel> {
        let collection_id = require(&config.collection_id, "collection_id")?;
        let collection = collection_id.as_str();
        let filter = FilterBuilder::new()
            .eq_if("principal.externalId", config.principal_external_id.as_deref())
            .eq_if("status", config.status.as_deref())
            .render();

        let assignments = collect_all(ctx, &ListQuery::filtered(filter), |query| async move {
            self.client
                .collections()
                .list_collection_assignments(ctx, collection, &query)
                .await
        })
        .await?;

        config.assignments = Attr::known(
            assignments
                .iter()
                .map(|assignment| collection_assignment_state(collection, assignment))
                .collect(),
        );
        Ok(config)
    }
}
