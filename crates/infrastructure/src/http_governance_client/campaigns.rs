use async_trait::async_trait;
use oig_application::governance_ports::{CampaignsApi, ReviewsApi};
use oig_core::{AppResult, RequestContext};
use oig_domain::{Campaign, CampaignRequest, ListQuery, Page, Review, ReviewDecision};
use reqwest::Method;

use super::HttpGovernanceClient;

#[async_trait]
impl CampaignsApi for HttpGovernanceClient {
    async fn create_campaign(
        &self,
        ctx: &RequestContext,
        request: &CampaignRequest,
    ) -> AppResult<Campaign> {
        self.send(ctx, Method::POST, self.v1(&["campaigns"])?, request)
            .await
    }

    async fn get_campaign(&self, ctx: &RequestContext, campaign_id: &str) -> AppResult<Campaign> {
        self.get(ctx, self.v1(&["campaigns", campaign_id])?).await
    }

    async fn list_campaigns(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<Campaign>> {
        self.list(ctx, self.v1(&["campaigns"])?, query).await
    }

    async fn delete_campaign(&self, ctx: &RequestContext, campaign_id: &str) -> AppResult<()> {
        self.execute(ctx, Method::DELETE, self.v1(&["campaigns", campaign_id])?)
            .await
    }

    async fn launch_campaign(&self, ctx: &RequestContext, campaign_id: &str) -> AppResult<()> {
        self.execute(ctx, Method::POST, self.v1(&["campaigns", campaign_id, "launch"])?)
            .await
    }

    async fn end_campaign(&self, ctx: &RequestContext, campaign_id: &str) -> AppResult<()> {
        self.execute(ctx, Method::POST, self.v1(&["campaigns", campaign_id, "end"])?)
            .await
    }
}

#[async_trait]
impl ReviewsApi for HttpGovernanceClient {
    async fn get_review(&self, ctx: &RequestContext, review_id: &str) -> AppResult<Review> {
        self.get(ctx, self.v1(&["reviews", review_id])?).await
    }

    async fn list_reviews(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<Review>> {
        self.list(ctx, self.v1(&["reviews"])?, query).await
    }

    async fn decide_review(
        &self,
        ctx: &RequestContext,
        review_id: &str,
        decision: &ReviewDecision,
    ) -> AppResult<Review> {
        self.send(
            ctx,
            Method::POST,
            self.v1(&["reviews", review_id, "decide"])?,
            decision,
        )
        .await
    }
}
