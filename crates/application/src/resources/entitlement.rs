//! Entitlement resource: an application permission property and its values.

use async_trait::async_trait;
use oig_core::{
    AppError, AppResult, Attr, AttributePath, Diagnostics, NestedBlock, RequestContext, Schema,
    SchemaAttribute,
};
use oig_domain::{
    ENTITLEMENT_DATA_TYPES, ENTITLEMENT_PARENT_TYPES, Entitlement, EntitlementRequest,
    EntitlementValue,
};

use crate::governance_ports::GovernanceClient;
use crate::provider::{ImportId, ManagedResource};
use crate::resources::common::{
    AuditState, ExternalRefModel, LinksModel, check_one_of, external_ref_schema, known_list,
    links_block, list_or_null, require, require_block, state_id, with_audit_attributes,
};

oig_core::host_record! {
    /// Host-facing entitlement record.
    pub struct EntitlementModel {
        /// Server-assigned id.
        pub id: String,
        /// Display name.
        pub name: String,
        /// Value as known to the application.
        pub external_value: String,
        /// Description.
        pub description: String,
        /// Whether a principal may hold several values.
        pub multi_value: bool,
        /// `string` or `array`.
        pub data_type: String,
        /// Owning application.
        pub parent: ExternalRefModel,
        /// ORN of the owning application.
        pub parent_resource_orn: String,
        /// Allowed values.
        pub values: Vec<EntitlementValueModel>,
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
    /// One allowed entitlement value.
    pub struct EntitlementValueModel {
        /// Server-assigned id.
        pub id: String,
        /// Display name.
        pub name: String,
        /// Value as known to the application.
        pub external_value: String,
        /// Description.
        pub description: String,
    }
}

impl EntitlementValueModel {
    /// Maps a server value.
    #[must_use]
    pub fn from_value(value: &EntitlementValue) -> Self {
        Self {
            id: Attr::from_option(value.id.clone()),
            name: Attr::known(value.name.clone()),
            external_value: Attr::known(value.external_value.clone()),
            description: Attr::from_option(value.description.clone()),
        }
    }
}

/// Entitlement resource schema.
#[must_use]
pub fn entitlement_schema() -> Schema {
    let value = Schema::new("Allowed value.")
        .with_attribute(SchemaAttribute::computed_string("id", "Server-assigned id."))
        .with_attribute(SchemaAttribute::required_string("name", "Display name."))
        .with_attribute(SchemaAttribute::required_string(
            "external_value",
            "Value as known to the application.",
        ))
        .with_attribute(SchemaAttribute::optional_string("description", "Description."));

    let schema = Schema::new("Entitlement of an application.")
        .with_attribute(SchemaAttribute::computed_string("id", "Server-assigned id."))
        .with_attribute(SchemaAttribute::required_string("name", "Display name."))
        .with_attribute(SchemaAttribute::required_string(
            "external_value",
            "Value as known to the application.",
        ))
        .with_attribute(SchemaAttribute::optional_string("description", "Description."))
        .with_attribute(SchemaAttribute::optional_bool(
            "multi_value",
            "Whether a principal may hold several values. Defaults to false.",
        ))
        .with_attribute(SchemaAttribute::optional_computed_string(
            "data_type",
            "string or array.",
        ))
        .with_attribute(SchemaAttribute::computed_string(
            "parent_resource_orn",
            "ORN of the owning application.",
        ))
        .with_block(NestedBlock::single(
            "parent",
            external_ref_schema("Owning application.", "APPLICATION."),
        ))
        .with_block(NestedBlock::list("values", value))
        .with_block(links_block());

    with_audit_attributes(schema)
}

fn build_request(plan: &EntitlementModel) -> AppResult<EntitlementRequest> {
    let parent = require(&plan.parent, "parent")?
        .to_ref()
        .ok_or_else(|| AppError::Validation("parent.external_id and parent.type are required".to_owned()))?;

    Ok(EntitlementRequest {
        name: require(&plan.name, "name")?,
        external_value: require(&plan.external_value, "external_value")?,
        description: plan.description.known_cloned(),
        multi_value: plan.multi_value.is_true(),
        data_type: plan.data_type.known_cloned(),
        parent,
        values: known_list(&plan.values)
            .iter()
            .filter_map(|value| {
                Some(EntitlementValue {
                    id: value.id.known_cloned(),
                    name: value.name.known_cloned()?,
                    external_value: value.external_value.known_cloned()?,
                    description: value.description.known_cloned(),
                })
            })
            .collect(),
    })
}

/// Projects a server entitlement onto the host record.
#[must_use]
pub fn entitlement_state(entitlement: &Entitlement) -> EntitlementModel {
    let audit = AuditState::from_metadata(&entitlement.audit);

    EntitlementModel {
        id: Attr::known(entitlement.id.clone()),
        name: Attr::known(entitlement.name.clone()),
        external_value: Attr::known(entitlement.external_value.clone()),
        description: Attr::from_option(entitlement.description.clone()),
        multi_value: Attr::known(entitlement.multi_value),
        data_type: Attr::from_option(entitlement.data_type.clone()),
        parent: Attr::from_option(entitlement.parent.as_ref().map(ExternalRefModel::from_ref)),
        parent_resource_orn: Attr::from_option(entitlement.parent_resource_orn.clone()),
        values: list_or_null(
            entitlement
                .values
                .iter()
                .map(EntitlementValueModel::from_value)
                .collect(),
        ),
        links: LinksModel::from_links(entitlement.links.as_ref()),
        created: audit.created,
        created_by: audit.created_by,
        last_updated: audit.last_updated,
        last_updated_by: audit.last_updated_by,
    }
}

/// Entitlement resource.
pub struct EntitlementResource {
    client: GovernanceClient,
}

impl EntitlementResource {
    /// Creates the resource over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedResource for EntitlementResource {
    type Model = EntitlementModel;

    const NAME: &'static str = "entitlement";
    const LABEL: &'static str = "Entitlement";

    fn schema(&self) -> Schema {
        entitlement_schema()
    }

    fn id_of(model: &EntitlementModel) -> Option<String> {
        model.id.known_cloned()
    }

    fn validate(&self, model: &EntitlementModel, diagnostics: &mut Diagnostics) {
        check_one_of(
            diagnostics,
            AttributePath::attribute("data_type"),
            &model.data_type,
            ENTITLEMENT_DATA_TYPES,
        );
        match &model.parent {
            Attr::Known(parent) => check_one_of(
                diagnostics,
                AttributePath::attribute("parent").child("type"),
                &parent.kind,
                ENTITLEMENT_PARENT_TYPES,
            ),
            Attr::Null => require_block(diagnostics, "parent"),
            Attr::Unknown => {}
        }
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        plan: EntitlementModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<EntitlementModel> {
        let request = build_request(&plan)?;
        let created = self.client.entitlements().create_entitlement(ctx, &request).await?;
        Ok(entitlement_state(&created))
    }

    async fn read(&self, ctx: &RequestContext, state: EntitlementModel) -> AppResult<EntitlementModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let entitlement = self.client.entitlements().get_entitlement(ctx, &id).await?;
        Ok(entitlement_state(&entitlement))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: EntitlementModel,
        state: EntitlementModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<EntitlementModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let request = build_request(&plan)?;
        let replaced = self
            .client
            .entitlements()
            .replace_entitlement(ctx, &id, &request)
            .await?;
        Ok(entitlement_state(&replaced))
    }

    async fn delete(
        &self,
        ctx: &RequestContext,
        state: EntitlementModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<()> {
        let id = state_id(&state.id, Self::LABEL)?;
        self.client.entitlements().delete_entitlement(ctx, &id).await
    }

    fn import(&self, id: &ImportId) -> AppResult<EntitlementModel> {
        Ok(EntitlementModel {
            id: Attr::known(id.single()?.to_owned()),
            ..EntitlementModel::default()
        })
    }
}
