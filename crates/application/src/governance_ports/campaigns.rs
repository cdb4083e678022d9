use async_trait::async_trait;
use oig_core::{AppResult, RequestContext};
use oig_domain::{Campaign, CampaignRequest, ListQuery, Page, Review, ReviewDecision};

/// Access certification campaign endpoints.
#[async_trait]
pub trait CampaignsApi: Send + Sync {
    /// Creates a campaign.
    async fn create_campaign(
        &self,
        ctx: &RequestContext,
        request: &CampaignRequest,
    ) -> AppResult<Campaign>;

    /// Returns one campaign.
    async fn get_campaign(&self, ctx: &RequestContext, campaign_id: &str) -> AppResult<Campaign>;

    /// Lists one page of campaigns.
    async fn list_campaigns(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<Campaign>>;

    /// Deletes a campaign.
    async fn delete_campaign(&self, ctx: &RequestContext, campaign_id: &str) -> AppResult<()>;

    /// Launches a ready or scheduled campaign.
    async fn launch_campaign(&self, ctx: &RequestContext, campaign_id: &str) -> AppResult<()>;

    /// Ends an active campaign.
    async fn end_campaign(&self, ctx: &RequestContext, campaign_id: &str) -> AppResult<()>;
}

/// Review endpoints.
#[async_trait]
pub trait ReviewsApi: Send + Sync {
    /// Returns one review.
    async fn get_review(&self, ctx: &RequestContext, review_id: &str) -> AppResult<Review>;

    /// Lists one page of reviews.
    async fn list_reviews(&self, ctx: &RequestContext, query: &ListQuery)
    -> AppResult<Page<Review>>;

    /// Records a reviewer decision.
    async fn decide_review(
        &self,
        ctx: &RequestContext,
        review_id: &str,
        decision: &ReviewDecision,
    ) -> AppResult<Review>;
}
