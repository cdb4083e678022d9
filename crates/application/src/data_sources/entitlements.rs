use async_trait::async_trait;
use oig_core::{
    AppError, AppResult, Attr, NestedBlock, RequestContext, Schema, SchemaAttribute,
};
use oig_domain::{
    AccessItem, FilterBuilder, ListQuery, PrincipalAccess, PrincipalAccessQuery,
    PrincipalEntitlement, most_specific,
};

use crate::governance_ports::GovernanceClient;
use crate::pagination::collect_all;
use crate::provider::ManagedDataSource;
use crate::resources::common::{
    ExternalRefModel, LinksModel, external_ref_schema, links_block, list_or_null, require,
};
use crate::resources::entitlement::{
    EntitlementModel, EntitlementValueModel, entitlement_schema, entitlement_state,
};

use super::list_schema;

/// Fixed id of the principal access summary; the service assigns none.
const PRINCIPAL_ACCESS_ID: &str = "principal_access";

oig_core::host_record! {
    /// Entitlement listing.
    pub struct EntitlementsModel {
        /// Id of the owning application.
        pub parent_external_id: String,
        /// Type of the owning application.
        pub parent_type: String,
        /// Exact entitlement name.
        pub name: String,
        /// Exact value as known to the application.
        pub external_value: String,
        /// Matching entitlements in server order.
        pub entitlements: Vec<EntitlementModel>,
    }
}

/// Rejects a half-specified parent; the service only filters on both parts.
fn parent_pair<'a>(
    external_id: &'a Attr<String>,
    kind: &'a Attr<String>,
) -> AppResult<Option<(&'a str, &'a str)>> {
    match (external_id.non_blank(), kind.non_blank()) {
        (Some(external_id), Some(kind)) => Ok(Some((external_id, kind))),
        (None, None) => Ok(None),
        _ => Err(AppError::Validation(
            "parent_external_id and parent_type must be set together".to_owned(),
        )),
    }
}

/// Composes the entitlement filter, scoped to the parent when one is given.
#[must_use]
pub fn entitlements_filter(config: &EntitlementsModel, parent: Option<(&str, &str)>) -> String {
    let by_value = |builder: FilterBuilder| {
        builder
            .eq_if("name", config.name.as_deref())
            .eq_if("externalValue", config.external_value.as_deref())
    };
    let scoped = match parent {
        Some((external_id, kind)) => by_value(
            FilterBuilder::new()
                .eq_if("parent.externalId", Some(external_id))
                .eq_if("parent.type", Some(kind)),
        ),
        None => FilterBuilder::new(),
    };

    most_specific([scoped, by_value(FilterBuilder::new())])
}

/// Lists entitlements, filtered by parent application, name, or value.
pub struct EntitlementsDataSource {
    client: GovernanceClient,
}

impl EntitlementsDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for EntitlementsDataSource {
    type Model = EntitlementsModel;

    const NAME: &'static str = "entitlements";
    const LABEL: &'static str = "Entitlements";

    fn schema(&self) -> Schema {
        list_schema("Entitlements of governed applications.", "entitlements", entitlement_schema())
            .with_attribute(SchemaAttribute::optional_string(
                "parent_external_id",
                "Id of the owning application; requires parent_type.",
            ))
            .with_attribute(SchemaAttribute::optional_string(
                "parent_type",
                "Type of the owning application, e.g. APPLICATION.",
            ))
            .with_attribute(SchemaAttribute::optional_string("name", "Exact entitlement name."))
            .with_attribute(SchemaAttribute::optional_string(
                "external_value",
                "Exact value as known to the application.",
            ))
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        mut config: EntitlementsModel,
    ) -> AppResult<EntitlementsModel> {
        let parent = parent_pair(&config.parent_external_id, &config.parent_type)?;
        let filter = entitlements_filter(&config, parent);

        let entitlements = collect_all(ctx, &ListQuery::filtered(filter), |query| async move {
            self.client.entitlements().list_entitlements(ctx, &query).await
        })
        .await?;

        config.entitlements = Attr::known(entitlements.iter().map(entitlement_state).collect());
        Ok(config)
    }
}

oig_core::host_record! {
    /// Entitlement held by a principal.
    pub struct PrincipalEntitlementModel {
        /// Entitlement id.
        pub id: String,
        /// Display name.
        pub name: String,
        /// Value as known to the application.
        pub external_value: String,
        /// Description.
        pub description: String,
        /// Whether several values may be held.
        pub multi_value: bool,
        /// `string` or `array`.
        pub data_type: String,
        /// Owning application.
        pub parent: ExternalRefModel,
        /// ORN of the owning application.
        pub parent_resource_orn: String,
        /// Principal holding the entitlement.
        pub target_principal: ExternalRefModel,
        /// ORN of the principal.
        pub target_principal_orn: String,
        /// Held values.
        pub values: Vec<EntitlementValueModel>,
        /// Hypermedia links.
        pub links: LinksModel,
    }
}

impl PrincipalEntitlementModel {
    fn from_entitlement(entitlement: &PrincipalEntitlement) -> Self {
        Self {
            id: Attr::from_option(entitlement.id.clone()),
            name: Attr::known(entitlement.name.clone()),
            external_value: Attr::from_option(entitlement.external_value.clone()),
            description: Attr::from_option(entitlement.description.clone()),
            multi_value: Attr::known(entitlement.multi_value),
            data_type: Attr::from_option(entitlement.data_type.clone()),
            parent: Attr::from_option(entitlement.parent.as_ref().map(ExternalRefModel::from_ref)),
            parent_resource_orn: Attr::from_option(entitlement.parent_resource_orn.clone()),
            target_principal: Attr::from_option(
                entitlement
                    .target_principal
                    .as_ref()
                    .map(ExternalRefModel::from_ref),
            ),
            target_principal_orn: Attr::from_option(entitlement.target_principal_orn.clone()),
            values: list_or_null(
                entitlement
                    .values
                    .iter()
                    .map(EntitlementValueModel::from_value)
                    .collect(),
            ),
            links: LinksModel::from_links(entitlement.links.as_ref()),
        }
    }
}

fn principal_entitlement_schema() -> Schema {
    Schema::new("Entitlement held by a principal.")
        .with_attribute(SchemaAttribute::computed_string("id", "Entitlement id."))
        .with_attribute(SchemaAttribute::computed_string("name", "Display name."))
        .with_attribute(SchemaAttribute::computed_string(
            "external_value",
            "Value as known to the application.",
        ))
        .with_attribute(SchemaAttribute::computed_string("description", "Description."))
        .with_attribute(SchemaAttribute::computed_bool(
            "multi_value",
            "Whether several values may be held.",
        ))
        .with_attribute(SchemaAttribute::computed_string("data_type", "`string` or `array`."))
        .with_attribute(SchemaAttribute::computed_string(
            "parent_resource_orn",
            "ORN of the owning application.",
        ))
        .with_attribute(SchemaAttribute::computed_string(
            "target_principal_orn",
            "ORN of the principal.",
        ))
        .with_block(NestedBlock::single(
            "parent",
            external_ref_schema("Owning application.", "Application type."),
        ))
        .with_block(NestedBlock::single(
            "target_principal",
            external_ref_schema("Principal holding the entitlement.", "Principal type."),
        ))
        .with_block(NestedBlock::list(
            "values",
            Schema::new("Held value.")
                .with_attribute(SchemaAttribute::computed_string("id", "Value id."))
                .with_attribute(SchemaAttribute::computed_string("name", "Display name."))
                .with_attribute(SchemaAttribute::computed_string(
                    "external_value",
                    "Value as known to the application.",
                ))
                .with_attribute(SchemaAttribute::computed_string("description", "Description.")),
        ))
        .with_block(links_block())
}

oig_core::host_record! {
    /// Principal entitlement listing.
    pub struct PrincipalEntitlementsModel {
        /// ORN of the owning application.
        pub parent_resource_orn: String,
        /// Id of the owning application.
        pub parent_external_id: String,
        /// Type of the owning application.
        pub parent_type: String,
        /// Id of the principal.
        pub target_principal_external_id: String,
        /// Type of the principal, e.g. OKTA_USER.
        pub target_principal_type: String,
        /// Matching entitlements in server order.
        pub principal_entitlements: Vec<PrincipalEntitlementModel>,
    }
}

/// Composes the principal entitlement filter, preferring the resource ORN.
#[must_use]
pub fn principal_entitlements_filter(config: &PrincipalEntitlementsModel) -> String {
    let for_principal = |builder: FilterBuilder| {
        builder
            .eq_if(
                "targetPrincipal.externalId",
                config.target_principal_external_id.as_deref(),
            )
            .eq_if("targetPrincipal.type", config.target_principal_type.as_deref())
    };
    let by_orn = match config.parent_resource_orn.non_blank() {
        Some(orn) => for_principal(FilterBuilder::new().eq_if("parentResourceOrn", Some(orn))),
        None => FilterBuilder::new(),
    };
    let by_parent = for_principal(
        FilterBuilder::new()
            .eq_if("parent.externalId", config.parent_external_id.as_deref())
            .eq_if("parent.type", config.parent_type.as_deref()),
    );

    most_specific([by_orn, by_parent])
}

/// Lists effective entitlements of principals; the service requires a filter.
pub struct PrincipalEntitlementsDataSource {
    client: GovernanceClient,
}

impl PrincipalEntitlementsDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for PrincipalEntitlementsDataSource {
    type Model = PrincipalEntitlementsModel;

    const NAME: &'static str = "principal_entitlements";
    const LABEL: &'static str = "Principal Entitlements";

    fn schema(&self) -> Schema {
        list_schema(
            "Effective entitlements of principals. At least one filter input is required.",
            "principal_entitlements",
            principal_entitlement_schema(),
        )
        .with_attribute(SchemaAttribute::optional_string(
            "parent_resource_orn",
            "ORN of the owning application.",
        ))
        .with_attribute(SchemaAttribute::optional_string(
            "parent_external_id",
            "Id of the owning application.",
        ))
        .with_attribute(SchemaAttribute::optional_string(
            "parent_type",
            "Type of the owning application.",
        ))
        .with_attribute(SchemaAttribute::optional_string(
            "target_principal_external_id",
            "Id of the principal.",
        ))
        .with_attribute(SchemaAttribute::optional_string(
            "target_principal_type",
            "Type of the principal, e.g. OKTA_USER.",
        ))
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        mut config: PrincipalEntitlementsModel,
    ) -> AppResult<PrincipalEntitlementsModel> {
        let filter = principal_entitlements_filter(&config);
        if filter.is_empty() {
            return Err(AppError::Validation(
                "principal entitlements need parent_resource_orn, a parent, or a target principal"
                    .to_owned(),
            ));
        }

        let entitlements = collect_all(ctx, &ListQuery::filtered(filter), |query| async move {
            self.client
                .principal_entitlements()
                .list_principal_entitlements(ctx, &query)
                .await
        })
        .await?;

        config.principal_entitlements = Attr::known(
            entitlements
                .iter()
                .map(PrincipalEntitlementModel::from_entitlement)
                .collect(),
        );
        Ok(config)
    }
}

oig_core::host_record! {
    /// Grant contributing to a principal's access.
    pub struct AccessGrantModel {
        /// Grant id.
        pub id: String,
        /// Grant type.
        pub grant_type: String,
        /// Grant status.
        pub status: String,
    }
}

oig_core::host_record! {
    /// Entitlement or bundle named in an access summary.
    pub struct AccessItemModel {
        /// Item id.
        pub id: String,
        /// Display name.
        pub name: String,
    }
}

impl AccessItemModel {
    fn from_item(item: &AccessItem) -> Self {
        Self {
            id: Attr::known(item.id.clone()),
            name: Attr::known(item.name.clone()),
        }
    }
}

oig_core::host_record! {
    /// Access summary of one principal on one resource.
    pub struct PrincipalAccessModel {
        /// Always `principal_access`.
        pub id: String,
        /// ORN of the principal.
        pub target_principal_orn: String,
        /// ORN of the resource.
        pub parent_resource_orn: String,
        /// Contributing grants.
        pub grants: Vec<AccessGrantModel>,
        /// Effective entitlements.
        pub entitlements: Vec<AccessItemModel>,
        /// Effective bundles.
        pub bundles: Vec<AccessItemModel>,
        /// Earliest expiration of the access.
        pub expiration_time: String,
        /// Hypermedia links.
        pub links: LinksModel,
    }
}

fn access_state(config: PrincipalAccessModel, access: &PrincipalAccess) -> PrincipalAccessModel {
    PrincipalAccessModel {
        id: Attr::known(PRINCIPAL_ACCESS_ID.to_owned()),
        grants: list_or_null(
            access
                .grants
                .iter()
                .map(|grant| AccessGrantModel {
                    id: Attr::known(grant.id.clone()),
                    grant_type: Attr::from_option(grant.grant_type.clone()),
                    status: Attr::from_option(grant.status.clone()),
                })
                .collect(),
        ),
        entitlements: list_or_null(access.entitlements.iter().map(AccessItemModel::from_item).collect()),
        bundles: list_or_null(access.bundles.iter().map(AccessItemModel::from_item).collect()),
        expiration_time: Attr::from_option(access.expiration_time.clone()),
        links: LinksModel::from_links(access.links.as_ref()),
        ..config
    }
}

fn access_item_schema(description: &str) -> Schema {
    Schema::new(description)
        .with_attribute(SchemaAttribute::computed_string("id", "Item id."))
        .with_attribute(SchemaAttribute::computed_string("name", "Display name."))
}

/// Summarizes what a principal can access on one resource.
pub struct PrincipalAccessDataSource {
    client: GovernanceClient,
}

impl PrincipalAccessDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for PrincipalAccessDataSource {
    type Model = PrincipalAccessModel;

    const NAME: &'static str = "principal_access";
    const LABEL: &'static str = "Principal Access";

    fn schema(&self) -> Schema {
        Schema::new("Grants, entitlements, and bundles a principal holds on a resource.")
            .with_attribute(SchemaAttribute::computed_string("id", "Always `principal_access`."))
            .with_attribute(SchemaAttribute::required_string(
                "target_principal_orn",
                "ORN of the principal.",
            ))
            .with_attribute(SchemaAttribute::required_string(
                "parent_resource_orn",
                "ORN of the resource.",
            ))
            .with_attribute(SchemaAttribute::computed_string(
                "expiration_time",
                "Earliest expiration of the access.",
            ))
            .with_block(NestedBlock::list(
                "grants",
                Schema::new("Contributing grant.")
                    .with_attribute(SchemaAttribute::computed_string("id", "Grant id."))
                    .with_attribute(SchemaAttribute::computed_string("grant_type", "Grant type."))
                    .with_attribute(SchemaAttribute::computed_string("status", "Grant status.")),
            ))
            .with_block(NestedBlock::list("entitlements", access_item_schema("Effective entitlement.")))
            .with_block(NestedBlock::list("bundles", access_item_schema("Effective bundle.")))
            .with_block(links_block())
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        config: PrincipalAccessModel,
    ) -> AppResult<PrincipalAccessModel> {
        let query = PrincipalAccessQuery {
            target_principal_orn: require(&config.target_principal_orn, "target_principal_orn")?,
            parent_resource_orn: require(&config.parent_resource_orn, "parent_resource_orn")?,
        };
        let access = self
            .client
            .principal_access()
            .get_principal_access(ctx, &query)
            .await?;
        Ok(access_state(config, &access))
    }
}

#[cfg(test)]
mod tests;
