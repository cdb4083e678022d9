//! Entitlement bundle resource: a named set of entitlement values.

use async_trait::async_trait;
use oig_core::{
    AppError, AppResult, Attr, AttributePath, Diagnostics, NestedBlock, RequestContext, Schema,
    SchemaAttribute,
};
use oig_domain::{BUNDLE_STATUSES, EntitlementBundle, EntitlementBundleRequest};

use crate::governance_ports::GovernanceClient;
use crate::provider::{ImportId, ManagedResource};
use crate::resources::common::{
    AuditState, EntitlementSelectionModel, ExternalRefModel, LinksModel, check_one_of,
    entitlement_selection_schema, external_ref_schema, known_list, links_block, list_or_null,
    require, require_block, state_id, with_audit_attributes,
};

oig_core::host_record! {
    /// Host-facing entitlement bundle record.
    pub struct EntitlementBundleModel {
        /// Server-assigned id.
        pub id: String,
        /// Display name.
        pub name: String,
        /// Description.
        pub description: String,
        /// `ACTIVE` or `INACTIVE`.
        pub status: String,
        /// Application the bundle belongs to.
        pub target: ExternalRefModel,
        /// ORN of the target application.
        pub target_resource_orn: String,
        /// Bundled entitlements.
        pub entitlements: Vec<EntitlementSelectionModel>,
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

/// Entitlement bundle resource schema.
#[must_use]
pub fn entitlement_bundle_schema() -> Schema {
    let schema = Schema::new("Named set of entitlement values of one application.")
        .with_attribute(SchemaAttribute::computed_string("id", "Server-assigned id."))
        .with_attribute(SchemaAttribute::required_string("name", "Display name."))
        .with_attribute(SchemaAttribute::optional_string("description", "Description."))
        .with_attribute(SchemaAttribute::optional_computed_string(
            "status",
            "ACTIVE or INACTIVE.",
        ))
        .with_attribute(SchemaAttribute::computed_string(
            "target_resource_orn",
            "ORN of the target application.",
        ))
        .with_block(NestedBlock::single(
            "target",
            external_ref_schema("Application the bundle belongs to.", "APPLICATION."),
        ))
        .with_block(NestedBlock::list(
            "entitlements",
            entitlement_selection_schema("Bundled entitlement."),
        ))
        .with_block(links_block());

    with_audit_attributes(schema)
}

fn build_request(plan: &EntitlementBundleModel) -> AppResult<EntitlementBundleRequest> {
    let target = require(&plan.target, "target")?
        .to_ref()
        .ok_or_else(|| AppError::Validation("target.external_id and target.type are required".to_owned()))?;

    Ok(EntitlementBundleRequest {
        name: require(&plan.name, "name")?,
        description: plan.description.known_cloned(),
        status: plan.status.known_cloned(),
        target,
        entitlements: known_list(&plan.entitlements)
            .iter()
            .filter_map(EntitlementSelectionModel::to_selection)
            .collect(),
    })
}

/// Projects a server bundle onto the host record.
#[must_use]
pub fn entitlement_bundle_state(bundle: &EntitlementBundle) -> EntitlementBundleModel {
    let audit = AuditState::from_metadata(&bundle.audit);

    EntitlementBundleModel {
        id: Attr::known(bundle.id.clone()),
        name: Attr::known(bundle.name.clone()),
        description: Attr::from_option(bundle.description.clone()),
        status: Attr::from_option(bundle.status.clone()),
        target: Attr::from_option(bundle.target.as_ref().map(ExternalRefModel::from_ref)),
        target_resource_orn: Attr::from_option(bundle.target_resource_orn.clone()),
        entitlements: list_or_null(
            bundle
                .entitlements
                .iter()
                .map(EntitlementSelectionModel::from_selection)
                .collect(),
        ),
        links: LinksModel::from_links(bundle.links.as_ref()),
        created: audit.created,
        created_by: audit.created_by,
        last_updated: audit.last_updated,
        last_updated_by: audit.last_updated_by,
    }
}

/// Entitlement bundle resource.
pub struct EntitlementBundleResource {
    client: GovernanceClient,
}

impl EntitlementBundleResource {
    /// Creates the resource over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedResource for EntitlementBundleResource {
    type Model = EntitlementBundleModel;

    const NAME: &'static str = "entitlement_bundle";
    const LABEL: &'static str = "Entitlement Bundle";

    fn schema(&self) -> Schema {
        entitlement_bundle_schema()
    }

    fn id_of(model: &EntitlementBundleModel) -> Option<String> {
        model.id.known_cloned()
    }

    fn validate(&self, model: &EntitlementBundleModel, diagnostics: &mut Diagnostics) {
        check_one_of(
            diagnostics,
            AttributePath::attribute("status"),
            &model.status,
            BUNDLE_STATUSES,
        );
        if model.target.is_null() {
            require_block(diagnostics, "target");
        }
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        plan: EntitlementBundleModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<EntitlementBundleModel> {
        let request = build_request(&plan)?;
        let created = self
            .client
            .entitlement_bundles()
            .create_entitlement_bundle(ctx, &request)
            .await?;
        Ok(entitlement_bundle_state(&created))
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        state: EntitlementBundleModel,
    ) -> AppResult<EntitlementBundleModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let bundle = self
            .client
            .entitlement_bundles()
            .get_entitlement_bundle(ctx, &id)
            .await?;
        Ok(entitlement_bundle_state(&bundle))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: EntitlementBundleModel,
        state: EntitlementBundleModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<EntitlementBundleModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let request = build_request(&plan)?;
        let replaced = self
            .client
            .entitlement_bundles()
            .replace_entitlement_bundle(ctx, &id, &request)
            .await?;
        Ok(entitlement_bundle_state(&replaced))
    }

    async fn delete(
        &self,
        ctx: &RequestContext,
        state: EntitlementBundleModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<()> {
        let id = state_id(&state.id, Self::LABEL)?;
        self.client
            .entitlement_bundles()
            .delete_entitlement_bundle(ctx, &id)
            .await
    }

    fn import(&self, id: &ImportId) -> AppResult<EntitlementBundleModel> {
        Ok(EntitlementBundleModel {
            id: Attr::known(id.single()?.to_owned()),
            ..EntitlementBundleModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use oig_core::{Attr, HostType, HostValue, RequestContext};

    use crate::provider::{ResourceAdapter, ResourceHandler};
    use crate::resources::common::{EntitlementSelectionModel, ExternalRefModel, IdModel};
    use crate::testing::FakeGovernanceApi;

    use super::{EntitlementBundleModel, EntitlementBundleResource};

    fn plan() -> EntitlementBundleModel {
        EntitlementBundleModel {
            id: Attr::Unknown,
            name: Attr::known("Sales starter".to_owned()),
            status: Attr::Unknown,
            target: Attr::known(ExternalRefModel {
                external_id: Attr::known("0oa1crm".to_owned()),
                kind: Attr::known("APPLICATION".to_owned()),
            }),
            entitlements: Attr::known(vec![EntitlementSelectionModel {
                id: Attr::known("esp1".to_owned()),
                values: Attr::known(vec![IdModel {
                    id: Attr::known("ent1".to_owned()),
                }]),
            }]),
            ..EntitlementBundleModel::default()
        }
    }

    #[tokio::test]
    async fn create_reports_server_defaults() {
        let api = FakeGovernanceApi::shared();
        let handler =
            ResourceAdapter::new(EntitlementBundleResource::new(FakeGovernanceApi::client(&api)));

        let response = handler.create(&RequestContext::new(), &plan().to_host()).await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let state = response.state.unwrap_or(HostValue::Null);
        assert_eq!(state.get("status").and_then(HostValue::as_str), Some("ACTIVE"));
        assert_eq!(
            state.get("target_resource_orn").and_then(HostValue::as_str),
            Some("orn:okta:idp:00o1:apps:oidc:0oa1crm")
        );
        let bundles = api.bundles.lock().await;
        let stored = bundles.get("enb0001").map(|bundle| bundle.entitlements.len());
        assert_eq!(stored, Some(1));
    }

    #[tokio::test]
    async fn missing_target_is_a_configuration_error() {
        let api = FakeGovernanceApi::shared();
        let handler =
            ResourceAdapter::new(EntitlementBundleResource::new(FakeGovernanceApi::client(&api)));
        let config = EntitlementBundleModel {
            target: Attr::Null,
            ..plan()
        };

        let diagnostics = handler.validate(&config.to_host());

        let paths: Vec<String> = diagnostics
            .iter()
            .filter_map(|diagnostic| diagnostic.path.as_ref().map(ToString::to_string))
            .collect();
        assert_eq!(paths, vec!["target".to_owned()]);
    }
}
