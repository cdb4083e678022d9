//! Campaign Subsystem: access-review campaigns with nested settings,
//! cross-field validation, and launch/end control transitions.

mod mapper;
mod model;
mod schema;
mod validate;

use async_trait::async_trait;
use oig_core::{AppError, AppResult, Attr, Diagnostic, Diagnostics, HostType, RequestContext, Schema};
use oig_domain::{Campaign, CampaignStatus};
use tracing::info;

use crate::governance_ports::GovernanceClient;
use crate::provider::{ImportId, ManagedResource, changed_attributes};
use crate::resources::common::state_id;

pub use mapper::{build_request, campaign_state};
pub use model::{
    AutoRemediationModel, CampaignModel, InactiveUsersModel, NotificationModel,
    PrincipalScopeModel, RecurrenceModel, RemediationModel, ResourceSettingsModel,
    ReviewerLevelModel, ReviewerSettingsModel, ScheduleModel, StartReviewModel,
    TargetEntitlementModel, TargetResourceModel,
};
pub use schema::campaign_schema;
pub use validate::validate_campaign;

/// Attributes that never force a replacement: control flags and
/// server-computed values.
const IN_PLACE_ATTRIBUTES: &[&str] = &[
    "id",
    "status",
    "launch_campaign",
    "end_campaign",
    "created",
    "created_by",
    "last_updated",
    "last_updated_by",
];

/// Campaign resource.
pub struct CampaignResource {
    client: GovernanceClient,
}

impl CampaignResource {
    /// Creates the resource over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }

    async fn fetch(&self, ctx: &RequestContext, id: &str) -> AppResult<Campaign> {
        self.client.campaigns().get_campaign(ctx, id).await
    }

    async fn launch(&self, ctx: &RequestContext, campaign: &Campaign) -> AppResult<bool> {
        let status = current_status(campaign)?;
        if status.can_launch() {
            self.client.campaigns().launch_campaign(ctx, &campaign.id).await?;
            info!(id = %campaign.id, "campaign launched");
            return Ok(true);
        }
        if matches!(
            status,
            CampaignStatus::Launching
                | CampaignStatus::Active
                | CampaignStatus::Completing
                | CampaignStatus::Completed
        ) {
            return Ok(false);
        }

        Err(AppError::Unsupported(format!(
            "launch is not allowed from status {}",
            status.as_str()
        )))
    }

    async fn end(&self, ctx: &RequestContext, campaign: &Campaign) -> AppResult<bool> {
        let status = current_status(campaign)?;
        if status.can_end() {
            self.client.campaigns().end_campaign(ctx, &campaign.id).await?;
            info!(id = %campaign.id, "campaign ended");
            return Ok(true);
        }
        if matches!(status, CampaignStatus::Completing | CampaignStatus::Completed) {
            return Ok(false);
        }

        Err(AppError::Unsupported(format!(
            "end is only allowed from status ACTIVE, the campaign is {}",
            status.as_str()
        )))
    }
}

fn current_status(campaign: &Campaign) -> AppResult<CampaignStatus> {
    campaign
        .status
        .as_deref()
        .unwrap_or("DRAFT")
        .parse::<CampaignStatus>()
        .map_err(|error| AppError::Decode(error.to_string()))
}

#[async_trait]
impl ManagedResource for CampaignResource {
    type Model = CampaignModel;

    const NAME: &'static str = "campaign";
    const LABEL: &'static str = "Campaign";

    fn schema(&self) -> Schema {
        campaign_schema()
    }

    fn id_of(model: &CampaignModel) -> Option<String> {
        model.id.known_cloned()
    }

    fn validate(&self, model: &CampaignModel, diagnostics: &mut Diagnostics) {
        validate_campaign(model, diagnostics);
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        plan: CampaignModel,
        diagnostics: &mut Diagnostics,
    ) -> AppResult<CampaignModel> {
        let request = build_request(&plan)?;
        let created = self.client.campaigns().create_campaign(ctx, &request).await?;

        if !plan.launch_campaign.is_true() {
            return Ok(campaign_state(&created, &plan));
        }

        match self.launch(ctx, &created).await {
            Ok(_) => match self.fetch(ctx, &created.id).await {
                Ok(launched) => Ok(campaign_state(&launched, &plan)),
                Err(error) => {
                    diagnostics.push(Diagnostic::warning(
                        "Campaign launched",
                        format!(
                            "Campaign '{}' was launched but could not be re-read; the next refresh updates its status: {error}",
                            created.id
                        ),
                    ));
                    Ok(campaign_state(&created, &plan))
                }
            },
            Err(error) => {
                diagnostics.push(Diagnostic::error(
                    "Error launching Campaign",
                    format!(
                        "Campaign '{}' was created but could not be launched: {error}",
                        created.id
                    ),
                ));
                let prior = CampaignModel {
                    launch_campaign: Attr::known(false),
                    ..plan
                };
                Ok(campaign_state(&created, &prior))
            }
        }
    }

    async fn read(&self, ctx: &RequestContext, state: CampaignModel) -> AppResult<CampaignModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let campaign = self.fetch(ctx, &id).await?;
        Ok(campaign_state(&campaign, &state))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: CampaignModel,
        state: CampaignModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<CampaignModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let changed = changed_attributes(&plan.to_host(), &state.to_host(), IN_PLACE_ATTRIBUTES);
        if !changed.is_empty() {
            return Err(AppError::Unsupported(format!(
                "{} cannot change in place; destroy and recreate the campaign to apply this change",
                changed.join(", ")
            )));
        }

        let mut campaign = self.fetch(ctx, &id).await?;
        let mut transitioned = false;
        if plan.launch_campaign.is_true() && !state.launch_campaign.is_true() {
            transitioned |= self.launch(ctx, &campaign).await?;
        }
        if plan.end_campaign.is_true() && !state.end_campaign.is_true() {
            if transitioned {
                campaign = self.fetch(ctx, &id).await?;
            }
            transitioned |= self.end(ctx, &campaign).await?;
        }
        if transitioned {
            campaign = self.fetch(ctx, &id).await?;
        }

        let prior = CampaignModel {
            schedule_settings: state.schedule_settings,
            principal_scope_settings: state.principal_scope_settings,
            ..plan
        };
        Ok(campaign_state(&campaign, &prior))
    }

    async fn delete(
        &self,
        ctx: &RequestContext,
        state: CampaignModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<()> {
        let id = state_id(&state.id, Self::LABEL)?;
        self.client.campaigns().delete_campaign(ctx, &id).await
    }

    fn import(&self, id: &ImportId) -> AppResult<CampaignModel> {
        Ok(CampaignModel {
            id: Attr::known(id.single()?.to_owned()),
            ..CampaignModel::default()
        })
    }
}
