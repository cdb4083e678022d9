use async_trait::async_trait;
use oig_application::governance_ports::{GrantsApi, RiskRulesApi};
use oig_core::{AppResult, RequestContext};
use oig_domain::{
    GrantPatch, GrantRequest, GrantResponse, ListQuery, Page, RiskRule, RiskRuleRequest,
};
use reqwest::Method;

use super::HttpGovernanceClient;

#[async_trait]
impl GrantsApi for HttpGovernanceClient {
    async fn create_grant(
        &self,
        ctx: &RequestContext,
        request: &GrantRequest,
    ) -> AppResult<GrantResponse> {
        self.send(ctx, Method::POST, self.v1(&["grants"])?, request).await
    }

    async fn get_grant(&self, ctx: &RequestContext, grant_id: &str) -> AppResult<GrantResponse> {
        self.get(ctx, self.v1(&["grants", grant_id])?).await
    }

    async fn patch_grant(
        &self,
        ctx: &RequestContext,
        patch: &GrantPatch,
    ) -> AppResult<GrantResponse> {
        self.send(ctx, Method::PATCH, self.v1(&["grants", patch.id.as_str()])?, patch)
            .await
    }

    async fn delete_grant(&self, ctx: &RequestContext, grant_id: &str) -> AppResult<()> {
        self.execute(ctx, Method::DELETE, self.v1(&["grants", grant_id])?)
            .await
    }

    async fn list_grants(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<GrantResponse>> {
        self.list(ctx, self.v1(&["grants"])?, query).await
    }
}

#[async_trait]
impl RiskRulesApi for HttpGovernanceClient {
    async fn create_risk_rule(
        &self,
        ctx: &RequestContext,
        request: &RiskRuleRequest,
    ) -> AppResult<RiskRule> {
        self.send(ctx, Method::POST, self.v1(&["risk-rules"])?, request)
            .await
    }

    async fn get_risk_rule(&self, ctx: &RequestContext, rule_id: &str) -> AppResult<RiskRule> {
        self.get(ctx, self.v1(&["risk-rules", rule_id])?).await
    }

    async fn replace_risk_rule(
        &self,
        ctx: &RequestContext,
        rule_id: &str,
        request: &RiskRuleRequest,
    ) -> AppResult<RiskRule> {
        self.send(ctx, Method::PUT, self.v1(&["risk-rules", rule_id])?, request)
            .await
    }

    async fn delete_risk_rule(&self, ctx: &RequestContext, rule_id: &str) -> AppResult<()> {
        self.execute(ctx, Method::DELETE, self.v1(&["risk-rules", rule_id])?)
            .await
    }

    async fn list_risk_rules(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<RiskRule>> {
        self.list(ctx, self.v1(&["risk-rules"])?, query).await
    }
}
