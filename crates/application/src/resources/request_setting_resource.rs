//! Request settings of one resource. The settings always exist on the
//! server; this resource only steers the writable subset.

use async_trait::async_trait;
use oig_core::{
    AppError, AppResult, Attr, AttributePath, AttributeType, Diagnostics, NestedBlock,
    RequestContext, Schema, SchemaAttribute,
};
use oig_domain::{
    AccessDurationLimits, RISK_SUBMISSION_TYPES, RequestOnBehalfOfSettings,
    ResourceRequestSettings, ResourceRequestSettingsPatch, RiskDefaultSetting, RiskSettings,
};

use crate::governance_ports::GovernanceClient;
use crate::provider::{ImportId, ManagedResource};
use crate::resources::common::{
    LinksModel, check_one_of, known_list, links_block, list_or_null, require, string_list,
};

oig_core::host_record! {
    /// Host-facing resource request settings.
    pub struct ResourceRequestSettingsModel {
        /// Same as `resource_id`.
        pub id: String,
        /// Resource the settings belong to.
        pub resource_id: String,
        /// Request-on-behalf-of rules.
        pub request_on_behalf_of_settings: OnBehalfOfModel,
        /// Default handling of risky requests.
        pub risk_settings: RiskSettingsModel,
        /// Access scope types a condition may use.
        pub valid_access_scope_types: Vec<String>,
        /// Requester types a condition may use.
        pub valid_requester_types: Vec<String>,
        /// Duration rules for requests.
        pub valid_access_duration_settings: DurationLimitsModel,
        /// Hypermedia links.
        pub links: LinksModel,
    }
}

oig_core::host_record! {
    /// Who may request on behalf of others.
    pub struct OnBehalfOfModel {
        /// Requesting for others is enabled.
        pub allowed: bool,
        /// Principal types that may be requested for.
        pub only_for: Vec<String>,
    }
}

oig_core::host_record! {
    /// Default risk behaviour.
    pub struct RiskSettingsModel {
        /// `ALLOWED_WITH_OVERRIDES` or `RESTRICTED`.
        pub request_submission_type: String,
        /// Approval sequence for risky requests.
        pub approval_sequence_id: String,
    }
}

oig_core::host_record! {
    /// Duration rules reported by the server.
    pub struct DurationLimitsModel {
        /// Upper bound in days.
        pub maximum_days: i64,
        /// Upper bound in weeks.
        pub maximum_weeks: i64,
        /// Upper bound in hours.
        pub maximum_hours: i64,
        /// Duration is mandatory.
        pub required: bool,
        /// Supported duration types.
        pub supported_types: Vec<String>,
    }
}

impl OnBehalfOfModel {
    fn to_settings(&self) -> RequestOnBehalfOfSettings {
        RequestOnBehalfOfSettings {
            allowed: self.allowed.is_true(),
            only_for: known_list(&self.only_for),
        }
    }

    fn from_settings(settings: &RequestOnBehalfOfSettings) -> Self {
        Self {
            allowed: Attr::known(settings.allowed),
            only_for: list_or_null(settings.only_for.clone()),
        }
    }
}

impl RiskSettingsModel {
    fn to_settings(&self) -> RiskSettings {
        RiskSettings {
            default_setting: Some(RiskDefaultSetting {
                request_submission_type: self.request_submission_type.known_cloned(),
                approval_sequence_id: self.approval_sequence_id.known_cloned(),
            }),
        }
    }

    fn from_settings(settings: &RiskSettings) -> Self {
        let default = settings.default_setting.clone().unwrap_or_default();
        Self {
            request_submission_type: Attr::from_option(default.request_submission_type),
            approval_sequence_id: Attr::from_option(default.approval_sequence_id),
        }
    }
}

impl DurationLimitsModel {
    fn from_limits(limits: &AccessDurationLimits) -> Self {
        Self {
            maximum_days: Attr::from_option(limits.maximum_days),
            maximum_weeks: Attr::from_option(limits.maximum_weeks),
            maximum_hours: Attr::from_option(limits.maximum_hours),
            required: Attr::known(limits.required),
            supported_types: list_or_null(limits.supported_types.clone()),
        }
    }
}

/// Resource request settings schema.
#[must_use]
pub fn resource_request_settings_schema() -> Schema {
    Schema::new(
        "Access request settings of one resource. Only the on-behalf-of and risk blocks are writable; destroying leaves the settings in place. Import with the resource id.",
    )
    .with_attribute(SchemaAttribute::computed_string("id", "Same as resource_id."))
    .with_attribute(SchemaAttribute::required_string(
        "resource_id",
        "Resource the settings belong to.",
    ))
    .with_attribute(SchemaAttribute::computed(
        "valid_access_scope_types",
        AttributeType::string_list(),
        "Access scope types a condition may use.",
    ))
    .with_attribute(SchemaAttribute::computed(
        "valid_requester_types",
        AttributeType::string_list(),
        "Requester types a condition may use.",
    ))
    .with_block(
        NestedBlock::single(
            "request_on_behalf_of_settings",
            Schema::new("Request-on-behalf-of rules.")
                .with_attribute(SchemaAttribute::optional_bool(
                    "allowed",
                    "Requesting for others is enabled.",
                ))
                .with_attribute(string_list(
                    "only_for",
                    "Principal types that may be requested for.",
                    true,
                )),
        ),
    )
    .with_block(
        NestedBlock::single(
            "risk_settings",
            Schema::new("Default handling of risky requests.")
                .with_attribute(SchemaAttribute::optional_string(
                    "request_submission_type",
                    "ALLOWED_WITH_OVERRIDES or RESTRICTED.",
                ))
                .with_attribute(SchemaAttribute::optional_string(
                    "approval_sequence_id",
                    "Approval sequence for risky requests.",
                )),
        ),
    )
    .with_block(NestedBlock::single(
        "valid_access_duration_settings",
        Schema::new("Duration rules for requests.")
            .with_attribute(SchemaAttribute::computed_int64("maximum_days", "Upper bound in days."))
            .with_attribute(SchemaAttribute::computed_int64(
                "maximum_weeks",
                "Upper bound in weeks.",
            ))
            .with_attribute(SchemaAttribute::computed_int64(
                "maximum_hours",
                "Upper bound in hours.",
            ))
            .with_attribute(SchemaAttribute::computed_bool("required", "Duration is mandatory."))
            .with_attribute(SchemaAttribute::computed(
                "supported_types",
                AttributeType::string_list(),
                "Supported duration types.",
            ))
            .into_computed(),
    ))
    .with_block(links_block())
}

/// Patch for the writable blocks the plan configures.
#[must_use]
pub fn settings_patch(plan: &ResourceRequestSettingsModel) -> ResourceRequestSettingsPatch {
    ResourceRequestSettingsPatch {
        request_on_behalf_of_settings: plan
            .request_on_behalf_of_settings
            .as_known()
            .map(OnBehalfOfModel::to_settings),
        risk_settings: plan.risk_settings.as_known().map(RiskSettingsModel::to_settings),
    }
}

/// Refreshes a writable block: unconfigured blocks stay null so server
/// defaults never show up as drift.
fn refresh_block<T, S>(prior: &Attr<T>, server: Option<&S>, map: impl FnOnce(&S) -> T) -> Attr<T> {
    if prior.is_null() {
        return Attr::Null;
    }
    Attr::from_option(server.map(map))
}

/// Projects the server settings onto the host record.
#[must_use]
pub fn resource_request_settings_state(
    resource_id: &str,
    settings: &ResourceRequestSettings,
    prior: &ResourceRequestSettingsModel,
) -> ResourceRequestSettingsModel {
    ResourceRequestSettingsModel {
        id: Attr::known(resource_id.to_owned()),
        resource_id: Attr::known(resource_id.to_owned()),
        request_on_behalf_of_settings: refresh_block(
            &prior.request_on_behalf_of_settings,
            settings.request_on_behalf_of_settings.as_ref(),
            OnBehalfOfModel::from_settings,
        ),
        risk_settings: refresh_block(
            &prior.risk_settings,
            settings.risk_settings.as_ref(),
            RiskSettingsModel::from_settings,
        ),
        valid_access_scope_types: list_or_null(
            settings
                .valid_access_scope_settings
                .iter()
                .map(|setting| setting.kind.clone())
                .collect(),
        ),
        valid_requester_types: list_or_null(
            settings
                .valid_requester_settings
                .iter()
                .map(|setting| setting.kind.clone())
                .collect(),
        ),
        valid_access_duration_settings: Attr::from_option(
            settings
                .valid_access_duration_settings
                .as_ref()
                .map(DurationLimitsModel::from_limits),
        ),
        links: LinksModel::from_links(settings.links.as_ref()),
    }
}

/// Resource request settings resource.
pub struct ResourceRequestSettingsResource {
    client: GovernanceClient,
}

impl ResourceRequestSettingsResource {
    /// Creates the resource over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }

    async fn apply(
        &self,
        ctx: &RequestContext,
        plan: &ResourceRequestSettingsModel,
    ) -> AppResult<ResourceRequestSettingsModel> {
        let resource_id = require(&plan.resource_id, "resource_id")?;
        let settings = self.client.request_settings();
        let patch = settings_patch(plan);
        let current = if patch.request_on_behalf_of_settings.is_none() && patch.risk_settings.is_none()
        {
            settings.get_resource_request_settings(ctx, &resource_id).await?
        } else {
            settings
                .patch_resource_request_settings(ctx, &resource_id, &patch)
                .await?
        };
        Ok(resource_request_settings_state(&resource_id, &current, plan))
    }
}

#[async_trait]
impl ManagedResource for ResourceRequestSettingsResource {
    type Model = ResourceRequestSettingsModel;

    const NAME: &'static str = "request_setting_resource";
    const LABEL: &'static str = "Resource Request Settings";

    fn schema(&self) -> Schema {
        resource_request_settings_schema()
    }

    fn id_of(model: &ResourceRequestSettingsModel) -> Option<String> {
        model.id.known_cloned()
    }

    fn validate(&self, model: &ResourceRequestSettingsModel, diagnostics: &mut Diagnostics) {
        if let Some(risk) = model.risk_settings.as_known() {
            check_one_of(
                diagnostics,
                AttributePath::attribute("risk_settings").child("request_submission_type"),
                &risk.request_submission_type,
                RISK_SUBMISSION_TYPES,
            );
        }
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        plan: ResourceRequestSettingsModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<ResourceRequestSettingsModel> {
        self.apply(ctx, &plan).await
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        state: ResourceRequestSettingsModel,
    ) -> AppResult<ResourceRequestSettingsModel> {
        let resource_id = require(&state.resource_id, "resource_id")?;
        let settings = self
            .client
            .request_settings()
            .get_resource_request_settings(ctx, &resource_id)
            .await?;
        Ok(resource_request_settings_state(&resource_id, &settings, &state))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: ResourceRequestSettingsModel,
        state: ResourceRequestSettingsModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<ResourceRequestSettingsModel> {
        let resource_id = require(&state.resource_id, "resource_id")?;
        if plan.resource_id.as_deref().is_some_and(|planned| planned != resource_id) {
            return Err(AppError::Unsupported(
                "resource_id cannot change in place; recreate the settings".to_owned(),
            ));
        }
        self.apply(ctx, &plan).await
    }

    async fn delete(
        &self,
        _ctx: &RequestContext,
        _state: ResourceRequestSettingsModel,
        diagnostics: &mut Diagnostics,
    ) -> AppResult<()> {
        diagnostics.warning(
            "Resource request settings left in place",
            "The settings cannot be deleted; they were only removed from state.",
        );
        Ok(())
    }

    fn import(&self, id: &ImportId) -> AppResult<ResourceRequestSettingsModel> {
        let resource_id = id.single()?;
        Ok(ResourceRequestSettingsModel {
            id: Attr::known(resource_id.to_owned()),
            resource_id: Attr::known(resource_id.to_owned()),
            ..ResourceRequestSettingsModel::default()
        })
    }
}
