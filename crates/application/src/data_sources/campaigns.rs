use async_trait::async_trait;
use oig_core::{AppResult, Attr, RequestContext, Schema, SchemaAttribute};
use oig_domain::{FilterBuilder, ListQuery};

use crate::governance_ports::GovernanceClient;
use crate::pagination::collect_all;
use crate::provider::ManagedDataSource;
use crate::resources::campaign::{CampaignModel, campaign_schema, campaign_state};
use crate::resources::review::{ReviewModel, review_schema, review_state};

use super::list_schema;

oig_core::host_record! {
    /// Campaign listing.
    pub struct CampaignsModel {
        /// Substring of the campaign name.
        pub name: String,
        /// Exact campaign status.
        pub status: String,
        /// Matching campaigns in server order.
        pub campaigns: Vec<CampaignModel>,
    }
}

/// Lists campaigns, optionally filtered by name and status.
pub struct CampaignsDataSource {
    client: GovernanceClient,
}

impl CampaignsDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for CampaignsDataSource {
    type Model = CampaignsModel;

    const NAME: &'static str = "campaigns";
    const LABEL: &'static str = "Campaigns";

    fn schema(&self) -> Schema {
        list_schema("Access-review campaigns.", "campaigns", campaign_schema())
            .with_attribute(SchemaAttribute::optional_string(
                "name",
                "Only campaigns whose name contains this text.",
            ))
            .with_attribute(SchemaAttribute::optional_string(
                "status",
                "Only campaigns in this status, e.g. ACTIVE.",
            ))
    }

    async fn read(&self, ctx: &RequestContext, mut config: CampaignsModel) -> AppResult<CampaignsModel> {
        let filter = FilterBuilder::new()
            .contains_if("name", config.name.as_deref())
            .eq_if("status", config.status.as_deref())
            .render();

        let campaigns = collect_all(ctx, &ListQuery::filtered(filter), |query| async move {
            self.client.campaigns().list_campaigns(ctx, &query).await
        })
        .await?;

        let prior = CampaignModel::default();
        config.campaigns = Attr::known(
            campaigns
                .iter()
                .map(|campaign| campaign_state(campaign, &prior))
                .collect(),
        );
        Ok(config)
    }
}

oig_core::host_record! {
    /// Review listing of one campaign.
    pub struct ReviewsModel {
        /// Owning campaign.
        pub campaign_id: String,
        /// Assigned reviewer.
        pub reviewer_id: String,
        /// Decision, e.g. UNREVIEWED.
        pub decision: String,
        /// Matching reviews in server order.
        pub reviews: Vec<ReviewModel>,
    }
}

/// Lists the reviews of a campaign.
pub struct ReviewsDataSource {
    client: GovernanceClient,
}

impl ReviewsDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for ReviewsDataSource {
    type Model = ReviewsModel;

    const NAME: &'static str = "reviews";
    const LABEL: &'static str = "Reviews";

    fn schema(&self) -> Schema {
        list_schema("Reviews generated by a campaign.", "reviews", review_schema())
            .with_attribute(SchemaAttribute::required_string("campaign_id", "Owning campaign."))
            .with_attribute(SchemaAttribute::optional_string(
                "reviewer_id",
                "Only reviews assigned to this reviewer.",
            ))
            .with_attribute(SchemaAttribute::optional_string(
                "decision",
                "Only reviews with this decision.",
            ))
    }

    async fn read(&self, ctx: &RequestContext, mut config: ReviewsModel) -> AppResult<ReviewsModel> {
        let filter = FilterBuilder::new()
            .eq_if("campaignId", config.campaign_id.as_deref())
            .eq_if("reviewerId", config.reviewer_id.as_deref())
            .eq_if("decision", config.decision.as_deref())
            .render();

        let reviews = collect_all(ctx, &ListQuery::filtered(filter), |query| async move {
            self.client.reviews().list_reviews(ctx, &query).await
        })
        .await?;

        config.reviews = Attr::known(
            reviews
                .iter()
                .map(|review| review_state(review, &Attr::Null))
                .collect(),
        );
        Ok(config)
    }
}
