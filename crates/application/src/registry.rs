//! Canonical set of resource types and data sources the provider publishes.

use crate::data_sources::{
    CampaignsDataSource, CatalogEntryDataSource, CollectionAssignmentsDataSource,
    CollectionResourceDataSource, CollectionResourcesDataSource, EntitlementsDataSource,
    GrantsDataSource, MyCatalogEntryDataSource, MyCatalogEntryRequestFieldsDataSource,
    PrincipalAccessDataSource, PrincipalEntitlementsDataSource, RequestConditionsDataSource,
    RequestSequencesDataSource, ResourceRequestSettingsDataSource, ReviewsDataSource,
    RiskRulesDataSource, UserCatalogEntriesDataSource, UserRequestFieldsDataSource,
};
use crate::governance_ports::GovernanceClient;
use crate::provider::{DataSourceAdapter, DataSourceHandler, ResourceAdapter, ResourceHandler, ResourceLookup};
use crate::resources::{
    CampaignResource, CollectionAssignmentResource, CollectionResource, EntitlementBundleResource,
    EntitlementResource, GrantResource, MyRequestResource, OrgRequestSettingsResource,
    RequestConditionResource, RequestSequenceResource, RequestTypeResource, RequestV2Resource,
    ResourceRequestSettingsResource, ReviewResource, RiskRuleResource,
};

/// Type-name prefix used when none is configured.
pub const DEFAULT_TYPE_NAME_PREFIX: &str = "okta_governance";

const BY_ID: &[&str] = &["id"];
const BY_RESOURCE_AND_ID: &[&str] = &["resource_id", "id"];

/// Every resource and data source of the provider, addressed by full type name.
pub struct GovernanceProvider {
    prefix: String,
    resources: Vec<Box<dyn ResourceHandler>>,
    data_sources: Vec<Box<dyn DataSourceHandler>>,
}

impl GovernanceProvider {
    /// Registers every handler over one governance client.
    #[must_use]
    pub fn new(client: &GovernanceClient, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            resources: resource_handlers(client),
            data_sources: data_source_handlers(client),
        }
    }

    /// Type-name prefix, e.g. `okta_governance`.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resource handler for a full type name such as `okta_governance_campaign`.
    #[must_use]
    pub fn resource(&self, type_name: &str) -> Option<&dyn ResourceHandler> {
        let name = self.short_name(type_name)?;
        self.resources
            .iter()
            .find(|handler| handler.name() == name)
            .map(Box::as_ref)
    }

    /// Data source handler for a full type name.
    #[must_use]
    pub fn data_source(&self, type_name: &str) -> Option<&dyn DataSourceHandler> {
        let name = self.short_name(type_name)?;
        self.data_sources
            .iter()
            .find(|handler| handler.name() == name)
            .map(Box::as_ref)
    }

    /// Full type names of every resource, in registration order.
    #[must_use]
    pub fn resource_type_names(&self) -> Vec<String> {
        self.resources
            .iter()
            .map(|handler| self.type_name(handler.name()))
            .collect()
    }

    /// Full type names of every data source, in registration order.
    #[must_use]
    pub fn data_source_type_names(&self) -> Vec<String> {
        self.data_sources
            .iter()
            .map(|handler| self.type_name(handler.name()))
            .collect()
    }

    fn type_name(&self, name: &str) -> String {
        format!("{}_{name}", self.prefix)
    }

    fn short_name<'a>(&self, type_name: &'a str) -> Option<&'a str> {
        type_name
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
    }
}

fn resource_handlers(client: &GovernanceClient) -> Vec<Box<dyn ResourceHandler>> {
    vec![
        Box::new(ResourceAdapter::new(CampaignResource::new(client.clone()))),
        Box::new(ResourceAdapter::new(ReviewResource::new(client.clone()))),
        Box::new(ResourceAdapter::new(EntitlementResource::new(client.clone()))),
        Box::new(ResourceAdapter::new(EntitlementBundleResource::new(client.clone()))),
        Box::new(ResourceAdapter::new(GrantResource::new(client.clone()))),
        Box::new(ResourceAdapter::new(RiskRuleResource::new(client.clone()))),
        Box::new(ResourceAdapter::new(CollectionResource::new(client.clone()))),
        Box::new(ResourceAdapter::new(CollectionAssignmentResource::new(client.clone()))),
        Box::new(ResourceAdapter::new(RequestTypeResource::new(client.clone()))),
        Box::new(ResourceAdapter::new(RequestConditionResource::new(client.clone()))),
        Box::new(ResourceAdapter::new(RequestSequenceResource::new(client.clone()))),
        Box::new(ResourceAdapter::new(OrgRequestSettingsResource::new(client.clone()))),
        Box::new(ResourceAdapter::new(ResourceRequestSettingsResource::new(client.clone()))),
        Box::new(ResourceAdapter::new(RequestV2Resource::new(client.clone()))),
        Box::new(ResourceAdapter::new(MyRequestResource::new(client.clone()))),
    ]
}

fn data_source_handlers(client: &GovernanceClient) -> Vec<Box<dyn DataSourceHandler>> {
    vec![
        // Single-object lookups backed by the resource read path.
        Box::new(ResourceLookup::new(CampaignResource::new(client.clone()), BY_ID)),
        Box::new(ResourceLookup::new(ReviewResource::new(client.clone()), BY_ID)),
        Box::new(ResourceLookup::new(EntitlementResource::new(client.clone()), BY_ID)),
        Box::new(ResourceLookup::new(EntitlementBundleResource::new(client.clone()), BY_ID)),
        Box::new(ResourceLookup::new(GrantResource::new(client.clone()), BY_ID)),
        Box::new(ResourceLookup::new(RiskRuleResource::new(client.clone()), BY_ID)),
        Box::new(ResourceLookup::new(CollectionResource::new(client.clone()), BY_ID)),
        Box::new(ResourceLookup::new(
            CollectionAssignmentResource::new(client.clone()),
            &["collection_id", "id"],
        )),
        Box::new(ResourceLookup::new(RequestTypeResource::new(client.clone()), BY_ID)),
        Box::new(ResourceLookup::new(
            RequestConditionResource::new(client.clone()),
            BY_RESOURCE_AND_ID,
        )),
        Box::new(ResourceLookup::new(
            RequestSequenceResource::new(client.clone()),
            BY_RESOURCE_AND_ID,
        )),
        Box::new(ResourceLookup::new(OrgRequestSettingsResource::new(client.clone()), &[])),
        Box::new(DataSourceAdapter::new(ResourceRequestSettingsDataSource::new(client.clone()))),
        Box::new(ResourceLookup::new(RequestV2Resource::new(client.clone()), BY_ID)),
        Box::new(ResourceLookup::new(
            MyRequestResource::new(client.clone()),
            &["entry_id", "id"],
        )),
        // Listings and views.
        Box::new(DataSourceAdapter::new(CampaignsDataSource::new(client.clone()))),
        Box::new(DataSourceAdapter::new(ReviewsDataSource::new(client.clone()))),
        Box::new(DataSourceAdapter::new(EntitlementsDataSource::new(client.clone()))),
        Box::new(DataSourceAdapter::new(PrincipalEntitlementsDataSource::new(client.clone()))),
        Box::new(DataSourceAdapter::new(PrincipalAccessDataSource::new(client.clone()))),
        Box::new(DataSourceAdapter::new(GrantsDataSource::new(client.clone()))),
        Box::new(DataSourceAdapter::new(RiskRulesDataSource::new(client.clone()))),
        Box::new(DataSourceAdapter::new(CollectionResourceDataSource::new(client.clone()))),
        Box::new(DataSourceAdapter::new(CollectionResourcesDataSource::new(client.clone()))),
        Box::new(DataSourceAdapter::new(CollectionAssignmentsDataSource::new(client.clone()))),
        Box::new(DataSourceAdapter::new(RequestConditionsDataSource::new(client.clone()))),
        Box::new(DataSourceAdapter::new(RequestSequencesDataSource::new(client.clone()))),
        Box::new(DataSourceAdapter::new(CatalogEntryDataSource::new(client.clone()))),
        Box::new(DataSourceAdapter::new(MyCatalogEntryDataSource::new(client.clone()))),
        Box::new(DataSourceAdapter::new(UserRequestFieldsDataSource::new(client.clone()))),
        Box::new(DataSourceAdapter::new(MyCatalogEntryRequestFieldsDataSource::new(
            client.clone(),
        ))),
        Box::new(DataSourceAdapter::new(UserCatalogEntriesDataSource::new(client.clone()))),
    ]
}
