//! Request catalog views. The administrative and end-user API groups return
//! the same entry and request field shapes, so both views share one record
//! per shape and differ only in the API group they call.

use async_trait::async_trait;
use oig_core::{AppResult, Attr, NestedBlock, RequestContext, Schema, SchemaAttribute};
use oig_domain::{CatalogEntry, FilterBuilder, ListQuery, RequestField, RequestFieldSet};

use crate::governance_ports::GovernanceClient;
use crate::pagination::collect_all;
use crate::provider::ManagedDataSource;
use crate::resources::common::{LinksModel, links_block, list_or_null, require, string_list};

use super::list_schema;

/// API group a catalog view reads through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogView {
    /// Administrative view of the default catalog.
    Admin,
    /// Catalog as seen by the calling user.
    EndUser,
}

impl CatalogView {
    async fn entry(
        self,
        client: &GovernanceClient,
        ctx: &RequestContext,
        entry_id: &str,
    ) -> AppResult<CatalogEntry> {
        match self {
            Self::Admin => client.catalogs().get_catalog_entry(ctx, entry_id).await,
            Self::EndUser => client.my_catalogs().get_my_catalog_entry(ctx, entry_id).await,
        }
    }
}

oig_core::host_record! {
    /// Catalog entry looked up by id.
    pub struct CatalogEntryModel {
        /// Entry to look up.
        pub entry_id: String,
        /// Entry id.
        pub id: String,
        /// Whether the entry can be requested directly.
        pub requestable: bool,
        /// Display label.
        pub label: String,
        /// Description.
        pub description: String,
        /// Parent entry id.
        pub parent: String,
        /// Hypermedia links.
        pub links: LinksModel,
    }
}

oig_core::host_record! {
    /// Catalog entry inside a listing.
    pub struct CatalogItemModel {
        /// Entry id.
        pub id: String,
        /// Whether the entry can be requested directly.
        pub requestable: bool,
        /// Display label.
        pub label: String,
        /// Description.
        pub description: String,
        /// Parent entry id.
        pub parent: String,
        /// Hypermedia links.
        pub links: LinksModel,
    }
}

impl CatalogItemModel {
    fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            id: Attr::known(entry.id.clone()),
            requestable: Attr::known(entry.requestable),
            label: Attr::known(entry.label.clone()),
            description: Attr::from_option(entry.description.clone()),
            parent: Attr::from_option(entry.parent.clone()),
            links: LinksModel::from_links(entry.links.as_ref()),
        }
    }
}

fn entry_state(entry_id: String, entry: &CatalogEntry) -> CatalogEntryModel {
    let item = CatalogItemModel::from_entry(entry);
    CatalogEntryModel {
        entry_id: Attr::known(entry_id),
        id: item.id,
        requestable: item.requestable,
        label: item.label,
        description: item.description,
        parent: item.parent,
        links: item.links,
    }
}

fn catalog_item_schema(description: &str) -> Schema {
    Schema::new(description)
        .with_attribute(SchemaAttribute::computed_string("id", "Entry id."))
        .with_attribute(SchemaAttribute::computed_bool(
            "requestable",
            "Whether the entry can be requested directly.",
        ))
        .with_attribute(SchemaAttribute::computed_string("label", "Display label."))
        .with_attribute(SchemaAttribute::computed_string("description", "Description."))
        .with_attribute(SchemaAttribute::computed_string("parent", "Parent entry id."))
        .with_block(links_block())
}

fn entry_schema(description: &str) -> Schema {
    catalog_item_schema(description)
        .with_attribute(SchemaAttribute::required_string("entry_id", "Entry to look up."))
}

async fn read_entry(
    client: &GovernanceClient,
    view: CatalogView,
    ctx: &RequestContext,
    config: &CatalogEntryModel,
) -> AppResult<CatalogEntryModel> {
    let entry_id = require(&config.entry_id, "entry_id")?;
    let entry = view.entry(client, ctx, &entry_id).await?;
    Ok(entry_state(entry_id, &entry))
}

/// One entry of the default catalog, administrative view.
pub struct CatalogEntryDataSource {
    client: GovernanceClient,
}

impl CatalogEntryDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for CatalogEntryDataSource {
    type Model = CatalogEntryModel;

    const NAME: &'static str = "catalog_entry_default";
    const LABEL: &'static str = "Catalog Entry";

    fn schema(&self) -> Schema {
        entry_schema("Entry of the default request catalog.")
    }

    async fn read(&self, ctx: &RequestContext, config: CatalogEntryModel) -> AppResult<CatalogEntryModel> {
        read_entry(&self.client, CatalogView::Admin, ctx, &config).await
    }
}

/// One catalog entry visible to the calling user.
pub struct MyCatalogEntryDataSource {
    client: GovernanceClient,
}

impl MyCatalogEntryDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for MyCatalogEntryDataSource {
    type Model = CatalogEntryModel;

    const NAME: &'static str = "end_user_my_catalogs_entry";
    const LABEL: &'static str = "My Catalog Entry";

    fn schema(&self) -> Schema {
        entry_schema("Catalog entry visible to the calling user.")
    }

    async fn read(&self, ctx: &RequestContext, config: CatalogEntryModel) -> AppResult<CatalogEntryModel> {
        read_entry(&self.client, CatalogView::EndUser, ctx, &config).await
    }
}

oig_core::host_record! {
    /// Field a requester fills in.
    pub struct RequestFieldModel {
        /// Field id.
        pub id: String,
        /// Field type, e.g. TEXT or SELECT.
        pub kind as "type": String,
        /// Display label.
        pub label: String,
        /// Answer is mandatory.
        pub required: bool,
        /// Field cannot be edited.
        pub read_only: bool,
        /// Upper bound for duration fields.
        pub maximum_value: String,
        /// Choices for select fields.
        pub choices: Vec<String>,
    }
}

impl RequestFieldModel {
    fn from_field(field: &RequestField) -> Self {
        Self {
            id: Attr::known(field.id.clone()),
            kind: Attr::known(field.kind.clone()),
            label: Attr::known(field.label.clone()),
            required: Attr::known(field.required),
            read_only: Attr::from_option(field.read_only),
            maximum_value: Attr::from_option(field.maximum_value.clone()),
            choices: list_or_null(field.choices.iter().map(|choice| choice.choice.clone()).collect()),
        }
    }
}

fn request_fields(set: &RequestFieldSet) -> Attr<Vec<RequestFieldModel>> {
    Attr::known(set.data.iter().map(RequestFieldModel::from_field).collect())
}

fn request_fields_block() -> NestedBlock {
    NestedBlock::list(
        "fields",
        Schema::new("Request field in display order.")
            .with_attribute(SchemaAttribute::computed_string("id", "Field id."))
            .with_attribute(SchemaAttribute::computed_string("type", "Field type."))
            .with_attribute(SchemaAttribute::computed_string("label", "Display label."))
            .with_attribute(SchemaAttribute::computed_bool("required", "Answer is mandatory."))
            .with_attribute(SchemaAttribute::computed_bool(
                "read_only",
                "Field cannot be edited.",
            ))
            .with_attribute(SchemaAttribute::computed_string(
                "maximum_value",
                "Upper bound for duration fields.",
            ))
            .with_attribute(string_list("choices", "Choices for select fields.", false)),
    )
}

oig_core::host_record! {
    /// Request fields of an entry for a given user.
    pub struct UserRequestFieldsModel {
        /// Requested entry.
        pub entry_id: String,
        /// User the request would be made for.
        pub user_id: String,
        /// Fields in display order.
        pub fields: Vec<RequestFieldModel>,
    }
}

/// Request fields a user must fill in for an entry, administrative view.
pub struct UserRequestFieldsDataSource {
    client: GovernanceClient,
}

impl UserRequestFieldsDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for UserRequestFieldsDataSource {
    type Model = UserRequestFieldsModel;

    const NAME: &'static str = "catalog_entry_user_access_request_fields";
    const LABEL: &'static str = "Catalog Entry Request Fields";

    fn schema(&self) -> Schema {
        Schema::new("Fields a user fills in when requesting a catalog entry.")
            .with_attribute(SchemaAttribute::required_string("entry_id", "Requested entry."))
            .with_attribute(SchemaAttribute::required_string(
                "user_id",
                "User the request would be made for.",
            ))
            .with_block(request_fields_block())
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        mut config: UserRequestFieldsModel,
    ) -> AppResult<UserRequestFieldsModel> {
        let entry_id = require(&config.entry_id, "entry_id")?;
        let user_id = require(&config.user_id, "user_id")?;
        let fields = self
            .client
            .catalogs()
            .get_entry_request_fields(ctx, &entry_id, &user_id)
            .await?;
        config.fields = request_fields(&fields);
        Ok(config)
    }
}

oig_core::host_record! {
    /// Request fields of an entry for the calling user.
    pub struct MyRequestFieldsModel {
        /// Requested entry.
        pub entry_id: String,
        /// Fields in display order.
        pub fields: Vec<RequestFieldModel>,
    }
}

/// Request fields the calling user must fill in for an entry.
pub struct MyCatalogEntryRequestFieldsDataSource {
    client: GovernanceClient,
}

impl MyCatalogEntryRequestFieldsDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for MyCatalogEntryRequestFieldsDataSource {
    type Model = MyRequestFieldsModel;

    const NAME: &'static str = "end_user_my_catalogs_entry_request_fields";
    const LABEL: &'static str = "My Catalog Entry Request Fields";

    fn schema(&self) -> Schema {
        Schema::new("Fields the calling user fills in when requesting a catalog entry.")
            .with_attribute(SchemaAttribute::required_string("entry_id", "Requested entry."))
            .with_block(request_fields_block())
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        mut config: MyRequestFieldsModel,
    ) -> AppResult<MyRequestFieldsModel> {
        let entry_id = require(&config.entry_id, "entry_id")?;
        let fields = self
            .client
            .my_catalogs()
            .get_my_catalog_entry_request_fields(ctx, &entry_id)
            .await?;
        config.fields = request_fields(&fields);
        Ok(config)
    }
}

oig_core::host_record! {
    /// Entries one user can request.
    pub struct UserCatalogEntriesModel {
        /// User the entries are listed for.
        pub user_id: String,
        /// Only children of this entry.
        pub parent_id: String,
        /// Entries in server order.
        pub entries: Vec<CatalogItemModel>,
    }
}

/// Lists the catalog entries a user can request.
pub struct UserCatalogEntriesDataSource {
    client: GovernanceClient,
}

impl UserCatalogEntriesDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for UserCatalogEntriesDataSource {
    type Model = UserCatalogEntriesModel;

    const NAME: &'static str = "catalog_entries_user";
    const LABEL: &'static str = "User Catalog Entries";

    fn schema(&self) -> Schema {
        list_schema(
            "Catalog entries a user can request.",
            "entries",
            catalog_item_schema("Catalog entry."),
        )
        .with_attribute(SchemaAttribute::required_string(
            "user_id",
            "User the entries are listed for.",
        ))
        .with_attribute(SchemaAttribute::optional_string(
            "parent_id",
            "Only children of this entry.",
        ))
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        mut config: UserCatalogEntriesModel,
    ) -> AppResult<UserCatalogEntriesModel> {
        let user_id = require(&config.user_id, "user_id")?;
        let user = user_id.as_str();
        let filter = FilterBuilder::new()
            .eq_if("parent", config.parent_id.as_deref())
            .render();

        let entries = collect_all(ctx, &ListQuery::filtered(filter), |query| async move {
            self.client
                .catalogs()
                .list_user_catalog_entries(ctx, user, &query)
                .await
        })
        .await?;

        config.entries = Attr::known(entries.iter().map(CatalogItemModel::from_entry).collect());
        Ok(config)
    }
}

#[cfg(test)]
mod tests;
