use async_trait::async_trait;
use oig_core::{AppResult, RequestContext};
use oig_domain::{
    GrantPatch, GrantRequest, GrantResponse, ListQuery, Page, RiskRule, RiskRuleRequest,
};

/// Grant endpoints.
#[async_trait]
pub trait GrantsApi: Send + Sync {
    /// Creates a grant.
    async fn create_grant(
        &self,
        ctx: &RequestContext,
        request: &GrantRequest,
    ) -> AppResult<GrantResponse>;

    /// Returns one grant.
    async fn get_grant(&self, ctx: &RequestContext, grant_id: &str) -> AppResult<GrantResponse>;

    /// Changes the schedule of a grant.
    async fn patch_grant(&self, ctx: &RequestContext, patch: &GrantPatch)
    -> AppResult<GrantResponse>;

    /// Revokes a grant.
    async fn delete_grant(&self, ctx: &RequestContext, grant_id: &str) -> AppResult<()>;

    /// Lists one page of grants.
    async fn list_grants(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<GrantResponse>>;
}

/// Separation-of-duties risk rule endpoints.
#[async_trait]
pub trait RiskRulesApi: Send + Sync {
    /// Creates a risk rule.
    async fn create_risk_rule(
        &self,
        ctx: &RequestContext,
        request: &RiskRuleRequest,
    ) -> AppResult<RiskRule>;

    /// Returns one risk rule.
    async fn get_risk_rule(&self, ctx: &RequestContext, rule_id: &str) -> AppResult<RiskRule>;

    /// Replaces a risk rule.
    async fn replace_risk_rule(
        &self,
        ctx: &RequestContext,
        rule_id: &str,
        request: &RiskRuleRequest,
    ) -> AppResult<RiskRule>;

    /// Deletes a risk rule.
    async fn delete_risk_rule(&self, ctx: &RequestContext, rule_id: &str) -> AppResult<()>;

    /// Lists one page of risk rules.
    async fn list_risk_rules(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<RiskRule>>;
}
