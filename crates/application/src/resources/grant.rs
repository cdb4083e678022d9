//! Grant resource: assigns custom entitlements, a bundle, or a policy to a
//! principal. Only the expiration schedule changes in place.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use oig_core::{
    AppError, AppResult, Attr, AttributePath, Diagnostics, HostType, NestedBlock, RequestContext,
    Schema, SchemaAttribute,
};
use oig_domain::validation::{future_timestamp, required_when, rfc3339};
use oig_domain::{
    Actor, GRANT_ACTIONS, GRANT_PRINCIPAL_TYPES, GRANT_TARGET_TYPES, GrantPatch, GrantRequest,
    GrantResponse, GrantSchedule, GrantSchedulePatch, GrantType, parse_timestamp,
};

use crate::governance_ports::GovernanceClient;
use crate::provider::{ImportId, ManagedResource, changed_attributes, check};
use crate::resources::common::{
    AuditState, EntitlementSelectionModel, ExternalRefModel, LinksModel, check_one_of,
    check_required_when,
    entitlement_selection_schema, external_ref_schema, known_list, links_block, list_or_null,
    require, require_block, state_id, supplied, supplied_list, with_audit_attributes,
};

/// Attributes an update may change without replacing the grant.
const IN_PLACE_ATTRIBUTES: &[&str] = &[
    "id",
    "expiration_date",
    "time_zone",
    "status",
    "target_principal_orn",
    "target_resource_orn",
    "links",
    "created",
    "created_by",
    "last_updated",
    "last_updated_by",
];

oig_core::host_record! {
    /// Host-facing grant record.
    pub struct GrantModel {
        /// Server-assigned id.
        pub id: String,
        /// `CUSTOM`, `ENTITLEMENT-BUNDLE`, or `POLICY`.
        pub grant_type: String,
        /// Principal receiving the grant.
        pub target_principal: ExternalRefModel,
        /// ORN of the principal.
        pub target_principal_orn: String,
        /// Application the grant applies to.
        pub target: ExternalRefModel,
        /// ORN of the target application.
        pub target_resource_orn: String,
        /// Granted bundle, bundle grants only.
        pub entitlement_bundle_id: String,
        /// Granted entitlements, custom grants only.
        pub entitlements: Vec<EntitlementSelectionModel>,
        /// `ALLOW` or `DENY`.
        pub action: String,
        /// Source of the grant.
        pub actor: String,
        /// Expiration time (RFC3339).
        pub expiration_date: String,
        /// Time zone of the expiration.
        pub time_zone: String,
        /// Server status.
        pub status: String,
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

/// Grant resource schema.
#[must_use]
pub fn grant_schema() -> Schema {
    let schema = Schema::new(
        "Grant of entitlements, an entitlement bundle, or a policy to a principal. Only expiration_date and time_zone change in place.",
    )
    .with_attribute(SchemaAttribute::computed_string("id", "Server-assigned id."))
    .with_attribute(SchemaAttribute::required_string(
        "grant_type",
        "CUSTOM, ENTITLEMENT-BUNDLE, or POLICY.",
    ))
    .with_attribute(SchemaAttribute::computed_string(
        "target_principal_orn",
        "ORN of the principal.",
    ))
    .with_attribute(SchemaAttribute::computed_string(
        "target_resource_orn",
        "ORN of the target application.",
    ))
    .with_attribute(SchemaAttribute::optional_string(
        "entitlement_bundle_id",
        "Granted bundle; ENTITLEMENT-BUNDLE grants only.",
    ))
    .with_attribute(SchemaAttribute::optional_computed_string("action", "ALLOW or DENY."))
    .with_attribute(SchemaAttribute::optional_computed_string(
        "actor",
        "ACCESS_REQUEST, ADMIN, API, or NONE.",
    ))
    .with_attribute(SchemaAttribute::optional_string(
        "expiration_date",
        "Future expiration time (RFC3339).",
    ))
    .with_attribute(SchemaAttribute::optional_string(
        "time_zone",
        "IANA time zone of expiration_date; requires expiration_date.",
    ))
    .with_attribute(SchemaAttribute::computed_string("status", "Server status."))
    .with_block(NestedBlock::single(
        "target_principal",
        external_ref_schema("Principal receiving the grant.", "OKTA_USER."),
    ))
    .with_block(NestedBlock::single(
        "target",
        external_ref_schema("Application the grant applies to.", "APPLICATION."),
    ))
    .with_block(NestedBlock::list(
        "entitlements",
        entitlement_selection_schema("Granted entitlement; CUSTOM grants only."),
    ))
    .with_block(links_block());

    with_audit_attributes(schema)
}

/// Checks grant shape rules against the current time.
pub fn validate_grant(grant: &GrantModel, now: DateTime<Utc>, diagnostics: &mut Diagnostics) {
    check_one_of(
        diagnostics,
        AttributePath::attribute("grant_type"),
        &grant.grant_type,
        GrantType::VALUES,
    );
    check_one_of(diagnostics, AttributePath::attribute("action"), &grant.action, GRANT_ACTIONS);
    check_one_of(diagnostics, AttributePath::attribute("actor"), &grant.actor, Actor::VALUES);

    match &grant.target_principal {
        Attr::Known(principal) => check_one_of(
            diagnostics,
            AttributePath::attribute("target_principal").child("type"),
            &principal.kind,
            GRANT_PRINCIPAL_TYPES,
        ),
        Attr::Null => require_block(diagnostics, "target_principal"),
        Attr::Unknown => {}
    }
    if let Some(target) = grant.target.as_known() {
        check_one_of(
            diagnostics,
            AttributePath::attribute("target").child("type"),
            &target.kind,
            GRANT_TARGET_TYPES,
        );
    }

    validate_schedule(grant, now, diagnostics);

    if let Some(kind) = grant.grant_type.as_deref()
        && let Ok(kind) = kind.parse::<GrantType>()
    {
        validate_payload(grant, kind, diagnostics);
    }
}

fn validate_schedule(grant: &GrantModel, now: DateTime<Utc>, diagnostics: &mut Diagnostics) {
    if let Some(expiration) = grant.expiration_date.non_blank() {
        check(
            diagnostics,
            AttributePath::attribute("expiration_date"),
            future_timestamp("expiration_date", expiration, now).map(|_| ()),
        );
    }
    if grant.time_zone.non_blank().is_some() && !supplied(&grant.expiration_date) {
        diagnostics.attribute_error(
            AttributePath::attribute("time_zone"),
            "Invalid attribute combination",
            "time_zone can only be set together with expiration_date",
        );
    }
}

fn validate_payload(grant: &GrantModel, kind: GrantType, diagnostics: &mut Diagnostics) {
    let has_bundle = grant.entitlement_bundle_id.non_blank().is_some();
    let has_entitlements = matches!(&grant.entitlements, Attr::Known(items) if !items.is_empty());
    let condition = format!("grant_type is {}", kind.as_str());

    match kind {
        GrantType::EntitlementBundle => {
            if has_entitlements {
                diagnostics.attribute_error(
                    AttributePath::attribute("entitlements"),
                    "Invalid attribute combination",
                    "entitlement_bundle_id and entitlements cannot both be set: ENTITLEMENT-BUNDLE grants take entitlement_bundle_id only",
                );
            } else {
                check_required_when(
                    diagnostics,
                    AttributePath::attribute("entitlement_bundle_id"),
                    &grant.entitlement_bundle_id,
                    &condition,
                );
            }
        }
        GrantType::Custom => {
            if has_bundle {
                diagnostics.attribute_error(
                    AttributePath::attribute("entitlement_bundle_id"),
                    "Invalid attribute combination",
                    "entitlement_bundle_id and entitlements cannot both be set: CUSTOM grants take entitlements only",
                );
            } else if !supplied_list(&grant.entitlements) {
                check(
                    diagnostics,
                    AttributePath::attribute("entitlements"),
                    required_when("entitlements", false, &condition),
                );
            }
            if grant.target.is_null() {
                require_block(diagnostics, "target");
            }
        }
        GrantType::Policy => {
            if has_bundle || has_entitlements {
                diagnostics.attribute_error(
                    AttributePath::attribute("grant_type"),
                    "Invalid attribute combination",
                    "POLICY grants take neither entitlement_bundle_id nor entitlements",
                );
            }
            if grant.target.is_null() {
                require_block(diagnostics, "target");
            }
        }
    }
}

fn schedule_of(plan: &GrantModel) -> Option<GrantSchedule> {
    let schedule = GrantSchedule {
        expiration_date: plan.expiration_date.non_blank().map(str::to_owned),
        time_zone: plan.time_zone.non_blank().map(str::to_owned),
    };
    (schedule != GrantSchedule::default()).then_some(schedule)
}

/// Builds the create body; the payload fields follow the grant type.
pub fn build_request(plan: &GrantModel) -> AppResult<GrantRequest> {
    let grant_type = require(&plan.grant_type, "grant_type")?;
    let kind = grant_type.parse::<GrantType>()?;
    let target_principal = require(&plan.target_principal, "target_principal")?
        .to_ref()
        .ok_or_else(|| {
            AppError::Validation("target_principal.external_id and type are required".to_owned())
        })?;
    if let Some(expiration) = plan.expiration_date.non_blank() {
        rfc3339("expiration_date", expiration)?;
    }

    Ok(GrantRequest {
        grant_type,
        target_principal,
        target: plan.target.as_known().and_then(ExternalRefModel::to_ref),
        entitlement_bundle_id: match kind {
            GrantType::EntitlementBundle => plan.entitlement_bundle_id.known_cloned(),
            _ => None,
        },
        entitlements: match kind {
            GrantType::Custom => Some(
                known_list(&plan.entitlements)
                    .iter()
                    .filter_map(EntitlementSelectionModel::to_selection)
                    .collect(),
            ),
            _ => None,
        },
        action: plan.action.known_cloned(),
        actor: plan.actor.known_cloned(),
        schedule_settings: schedule_of(plan),
    })
}

/// Keeps the configured expiration text when it names the server instant.
fn refresh_expiration(prior: &Attr<String>, server: Option<&str>) -> Attr<String> {
    let Some(server) = server else {
        return Attr::Null;
    };
    let same_instant = match (prior.as_deref().map(parse_timestamp), parse_timestamp(server)) {
        (Some(Ok(configured)), Ok(returned)) => configured == returned,
        _ => false,
    };

    if same_instant {
        prior.clone()
    } else {
        Attr::known(server.to_owned())
    }
}

/// Projects either response variant onto the host record.
#[must_use]
pub fn grant_state(response: &GrantResponse, prior: &GrantModel) -> GrantModel {
    let grant = response.grant();
    let audit = AuditState::from_metadata(&grant.audit);
    let schedule = grant.schedule_settings.clone().unwrap_or_default();

    GrantModel {
        id: Attr::known(grant.id.clone()),
        grant_type: Attr::known(grant.grant_type.clone()),
        target_principal: Attr::from_option(
            grant.target_principal.as_ref().map(ExternalRefModel::from_ref),
        ),
        target_principal_orn: Attr::from_option(grant.target_principal_orn.clone()),
        target: Attr::from_option(grant.target.as_ref().map(ExternalRefModel::from_ref)),
        target_resource_orn: Attr::from_option(grant.target_resource_orn.clone()),
        entitlement_bundle_id: Attr::from_option(grant.entitlement_bundle_id.clone()),
        entitlements: list_or_null(
            response
                .entitlements()
                .iter()
                .map(EntitlementSelectionModel::from_selection)
                .collect(),
        ),
        action: Attr::from_option(grant.action.clone()),
        actor: Attr::from_option(grant.actor.clone()),
        expiration_date: refresh_expiration(
            &prior.expiration_date,
            schedule.expiration_date.as_deref(),
        ),
        time_zone: Attr::from_option(schedule.time_zone),
        status: Attr::from_option(grant.status.clone()),
        links: LinksModel::from_links(grant.links.as_ref()),
        created: audit.created,
        created_by: audit.created_by,
        last_updated: audit.last_updated,
        last_updated_by: audit.last_updated_by,
    }
}

/// Grant resource.
pub struct GrantResource {
    client: GovernanceClient,
}

impl GrantResource {
    /// Creates the resource over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedResource for GrantResource {
    type Model = GrantModel;

    const NAME: &'static str = "grant";
    const LABEL: &'static str = "Grant";

    fn schema(&self) -> Schema {
        grant_schema()
    }

    fn id_of(model: &GrantModel) -> Option<String> {
        model.id.known_cloned()
    }

    fn validate(&self, model: &GrantModel, diagnostics: &mut Diagnostics) {
        validate_grant(model, Utc::now(), diagnostics);
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        plan: GrantModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<GrantModel> {
        let request = build_request(&plan)?;
        let created = self.client.grants().create_grant(ctx, &request).await?;
        Ok(grant_state(&created, &plan))
    }

    async fn read(&self, ctx: &RequestContext, state: GrantModel) -> AppResult<GrantModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let grant = self.client.grants().get_grant(ctx, &id).await?;
        Ok(grant_state(&grant, &state))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: GrantModel,
        state: GrantModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<GrantModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let changed = changed_attributes(&plan.to_host(), &state.to_host(), IN_PLACE_ATTRIBUTES);
        if !changed.is_empty() {
            return Err(AppError::Unsupported(format!(
                "{} cannot change in place; only expiration_date and time_zone can be updated",
                changed.join(", ")
            )));
        }

        let patch = GrantPatch {
            id: id.clone(),
            schedule_settings: GrantSchedulePatch {
                expiration_date: plan.expiration_date.non_blank().map(str::to_owned),
                time_zone: plan.time_zone.non_blank().map(str::to_owned),
            },
        };
        let patched = self.client.grants().patch_grant(ctx, &patch).await?;
        Ok(grant_state(&patched, &plan))
    }

    async fn delete(
        &self,
        ctx: &RequestContext,
        state: GrantModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<()> {
        let id = state_id(&state.id, Self::LABEL)?;
        self.client.grants().delete_grant(ctx, &id).await
    }

    fn import(&self, id: &ImportId) -> AppResult<GrantModel> {
        Ok(GrantModel {
            id: Attr::known(id.single()?.to_owned()),
            ..GrantModel::default()
        })
    }
}
