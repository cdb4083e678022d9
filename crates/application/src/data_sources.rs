//! Read-only data sources: list projections over paginated endpoints, access
//! summaries, catalog views, and lookups the resource lifecycle cannot serve.

mod access_requests;
mod campaigns;
mod catalogs;
mod collections;
mod entitlements;
mod grants;

use oig_core::{NestedBlock, Schema};

pub use access_requests::{
    RequestConditionsDataSource, RequestSequencesDataSource, ResourceRequestSettingsDataSource,
};
pub use campaigns::{CampaignsDataSource, ReviewsDataSource};
pub use catalogs::{
    CatalogEntryDataSource, CatalogView, MyCatalogEntryDataSource,
    MyCatalogEntryRequestFieldsDataSource, UserCatalogEntriesDataSource,
    UserRequestFieldsDataSource,
};
pub use collections::{
    CollectionAssignmentsDataSource, CollectionResourceDataSource, CollectionResourcesDataSource,
};
pub use entitlements::{
    EntitlementsDataSource, PrincipalAccessDataSource, PrincipalEntitlementsDataSource,
};
pub use grants::{GrantsDataSource, RiskRulesDataSource};

/// Schema of a list data source: one computed list block holding the items.
///
/// Filter inputs are added by the caller.
fn list_schema(description: &str, items: &str, item_schema: Schema) -> Schema {
    Schema::new(description).with_block(NestedBlock::list(items, item_schema.into_computed()))
}
