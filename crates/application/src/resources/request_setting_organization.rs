//! Organization request settings: a singleton where only the subprocessor
//! acknowledgement is writable.

use async_trait::async_trait;
use oig_core::{
    AppError, AppResult, Attr, AttributeType, Diagnostics, HostType, RequestContext, Schema,
    SchemaAttribute,
};
use oig_domain::{OrgRequestSettings, OrgRequestSettingsPatch};

use crate::governance_ports::GovernanceClient;
use crate::provider::{ImportId, ManagedResource, changed_attributes};
use crate::resources::common::{LinksModel, links_block, list_or_null};

/// Id stored for the singleton.
pub const ORGANIZATION_SETTINGS_ID: &str = "default";

const IN_PLACE_ATTRIBUTES: &[&str] = &[
    "id",
    "subprocessors_acknowledged",
    "provisioning_status",
    "request_experiences",
    "long_time_past_provisioned",
    "links",
];

oig_core::host_record! {
    /// Host-facing organization request settings.
    pub struct OrgRequestSettingsModel {
        /// Constant singleton id.
        pub id: String,
        /// Subprocessor terms accepted.
        pub subprocessors_acknowledged: bool,
        /// Provisioning status of the request experience.
        pub provisioning_status: String,
        /// Enabled request experiences.
        pub request_experiences: Vec<String>,
        /// Provisioning finished long ago.
        pub long_time_past_provisioned: bool,
        /// Hypermedia links.
        pub links: LinksModel,
    }
}

/// Organization request settings schema.
#[must_use]
pub fn org_request_settings_schema() -> Schema {
    Schema::new(
        "Organization-wide access request settings. Import with the id \"default\"; only subprocessors_acknowledged can be changed and destroying leaves the settings in place.",
    )
    .with_attribute(SchemaAttribute::computed_string("id", "Always \"default\"."))
    .with_attribute(SchemaAttribute::optional_computed(
        "subprocessors_acknowledged",
        AttributeType::Bool,
        "Subprocessor terms accepted.",
    ))
    .with_attribute(SchemaAttribute::computed_string(
        "provisioning_status",
        "Provisioning status of the request experience.",
    ))
    .with_attribute(SchemaAttribute::computed(
        "request_experiences",
        AttributeType::string_list(),
        "Enabled request experiences.",
    ))
    .with_attribute(SchemaAttribute::computed_bool(
        "long_time_past_provisioned",
        "Provisioning finished long ago.",
    ))
    .with_block(links_block())
}

/// Projects the server settings onto the host record.
#[must_use]
pub fn org_request_settings_state(settings: &OrgRequestSettings) -> OrgRequestSettingsModel {
    OrgRequestSettingsModel {
        id: Attr::known(ORGANIZATION_SETTINGS_ID.to_owned()),
        subprocessors_acknowledged: Attr::known(settings.subprocessors_acknowledged),
        provisioning_status: Attr::from_option(settings.provisioning_status.clone()),
        request_experiences: list_or_null(settings.request_experiences.clone()),
        long_time_past_provisioned: Attr::known(
            settings.long_time_past_provisioned.unwrap_or(false),
        ),
        links: LinksModel::from_links(settings.links.as_ref()),
    }
}

/// Organization request settings resource.
pub struct OrgRequestSettingsResource {
    client: GovernanceClient,
}

impl OrgRequestSettingsResource {
    /// Creates the resource over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }

    async fn converge(
        &self,
        ctx: &RequestContext,
        plan: &OrgRequestSettingsModel,
    ) -> AppResult<OrgRequestSettingsModel> {
        let settings = self.client.request_settings();
        let current = settings.get_org_request_settings(ctx).await?;
        let Some(acknowledged) = plan.subprocessors_acknowledged.known_cloned() else {
            return Ok(org_request_settings_state(&current));
        };
        if acknowledged == current.subprocessors_acknowledged {
            return Ok(org_request_settings_state(&current));
        }

        let patched = settings
            .patch_org_request_settings(
                ctx,
                &OrgRequestSettingsPatch {
                    subprocessors_acknowledged: acknowledged,
                },
            )
            .await?;
        Ok(org_request_settings_state(&patched))
    }
}

#[async_trait]
impl ManagedResource for OrgRequestSettingsResource {
    type Model = OrgRequestSettingsModel;

    const NAME: &'static str = "request_setting_organization";
    const LABEL: &'static str = "Organization Request Settings";

    fn schema(&self) -> Schema {
        org_request_settings_schema()
    }

    fn id_of(model: &OrgRequestSettingsModel) -> Option<String> {
        model.id.known_cloned()
    }

    fn validate(&self, _model: &OrgRequestSettingsModel, _diagnostics: &mut Diagnostics) {}

    async fn create(
        &self,
        _ctx: &RequestContext,
        _plan: OrgRequestSettingsModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<OrgRequestSettingsModel> {
        Err(AppError::Unsupported(format!(
            "organization request settings always exist; import them with the id \"{ORGANIZATION_SETTINGS_ID}\""
        )))
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        _state: OrgRequestSettingsModel,
    ) -> AppResult<OrgRequestSettingsModel> {
        let settings = self
            .client
            .request_settings()
            .get_org_request_settings(ctx)
            .await?;
        Ok(org_request_settings_state(&settings))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: OrgRequestSettingsModel,
        state: OrgRequestSettingsModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<OrgRequestSettingsModel> {
        let changed = changed_attributes(&plan.to_host(), &state.to_host(), IN_PLACE_ATTRIBUTES);
        if !changed.is_empty() {
            return Err(AppError::Unsupported(format!(
                "{} cannot change; only subprocessors_acknowledged is writable",
                changed.join(", ")
            )));
        }
        self.converge(ctx, &plan).await
    }

    async fn delete(
        &self,
        _ctx: &RequestContext,
        _state: OrgRequestSettingsModel,
        diagnostics: &mut Diagnostics,
    ) -> AppResult<()> {
        diagnostics.warning(
            "Organization request settings left in place",
            "The settings cannot be deleted; they were only removed from state.",
        );
        Ok(())
    }

    fn import(&self, id: &ImportId) -> AppResult<OrgRequestSettingsModel> {
        let id = id.single()?;
        if id != ORGANIZATION_SETTINGS_ID {
            return Err(AppError::Validation(format!(
                "organization request settings are imported with the id '{ORGANIZATION_SETTINGS_ID}', got '{id}'"
            )));
        }
        Ok(OrgRequestSettingsModel {
            id: Attr::known(ORGANIZATION_SETTINGS_ID.to_owned()),
            ..OrgRequestSettingsModel::default()
        })
    }
}
