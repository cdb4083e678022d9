use async_trait::async_trait;
use oig_core::{AppResult, Attr, RequestContext, Schema, SchemaAttribute};
use oig_domain::{FilterBuilder, ListQuery};

use crate::governance_ports::GovernanceClient;
use crate::pagination::collect_all;
use crate::provider::ManagedDataSource;
use crate::resources::grant::{GrantModel, grant_schema, grant_state};
use crate::resources::risk_rule::{RiskRuleModel, risk_rule_schema, risk_rule_state};

use super::list_schema;

oig_core::host_record! {
    /// Grant listing.
    pub struct GrantsModel {
        /// Id of the target application.
        pub target_external_id: String,
        /// Type of the target application.
        pub target_type: String,
        /// Id of the principal.
        pub target_principal_external_id: String,
        /// Type of the principal, e.g. OKTA_USER.
        pub target_principal_type: String,
        /// Matching grants in server order.
        pub grants: Vec<GrantModel>,
    }
}

/// Lists grants by target application and principal.
pub struct GrantsDataSource {
    client: GovernanceClient,
}

impl GrantsDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for GrantsDataSource {
    type Model = GrantsModel;

    const NAME: &'static str = "grants";
    const LABEL: &'static str = "Grants";

    fn schema(&self) -> Schema {
        list_schema("Grants of entitlements and bundles.", "grants", grant_schema())
            .with_attribute(SchemaAttribute::optional_string(
                "target_external_id",
                "Id of the target application.",
            ))
            .with_attribute(SchemaAttribute::optional_string(
                "target_type",
                "Type of the target application, e.g. APPLICATION.",
            ))
            .with_attribute(SchemaAttribute::optional_string(
                "target_principal_external_id",
                "Id of the principal.",
            ))
            .with_attribute(SchemaAttribute::optional_string(
                "target_principal_type",
                "Type of the principal, e.g. OKTA_USER.",
            ))
    }

    async fn read(&self, ctx: &RequestContext, mut config: GrantsModel) -> AppResult<GrantsModel> {
        let filter = FilterBuilder::new()
            .eq_if("target.externalId", config.target_external_id.as_deref())
            .eq_if("target.type", config.target_type.as_deref())
            .eq_if(
                "targetPrincipal.externalId",
                config.target_principal_external_id.as_deref(),
            )
            .eq_if("targetPrincipal.type", config.target_principal_type.as_deref())
            .render();

        let grants = collect_all(ctx, &ListQuery::filtered(filter), |query| async move {
            self.client.grants().list_grants(ctx, &query).await
        })
        .await?;

        let prior = GrantModel::default();
        config.grants = Attr::known(grants.iter().map(|grant| grant_state(grant, &prior)).collect());
        Ok(config)
    }
}

oig_core::host_record! {
    /// Risk rule listing.
    pub struct RiskRulesModel {
        /// Prefix of the rule name.
        pub name: String,
        /// Matching rules in server order.
        pub risk_rules: Vec<RiskRuleModel>,
    }
}

/// Lists separation-of-duties risk rules.
pub struct RiskRulesDataSource {
    client: GovernanceClient,
}

impl RiskRulesDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for RiskRulesDataSource {
    type Model = RiskRulesModel;

    const NAME: &'static str = "risk_rules";
    const LABEL: &'static str = "Risk Rules";

    fn schema(&self) -> Schema {
        list_schema("Separation-of-duties risk rules.", "risk_rules", risk_rule_schema())
            .with_attribute(SchemaAttribute::optional_string(
                "name",
                "Only rules whose name starts with this text.",
            ))
    }

    async fn read(&self, ctx: &RequestContext, mut config: RiskRulesModel) -> AppResult<RiskRulesModel> {
        let filter = FilterBuilder::new()
            .starts_with_if("name", config.name.as_deref())
            .render();

        let rules = collect_all(ctx, &ListQuery::filtered(filter), |query| async move {
            self.client.risk_rules().list_risk_rules(ctx, &query).await
        })
        .await?;

        config.risk_rules = Attr::known(rules.iter().map(risk_rule_state).collect());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use oig_core::{Attr, HostType, HostValue, RequestContext};
    use oig_domain::RiskRule;

    use crate::provider::{DataSourceAdapter, DataSourceHandler};
    use crate::resources::risk_rule::risk_rule_state;
    use crate::testing::{FakeGovernanceApi, audit, self_links};

    use super::{GrantsDataSource, GrantsModel, RiskRulesDataSource, RiskRulesModel};

    #[tokio::test]
    async fn grant_filter_names_target_and_principal() {
        let api = FakeGovernanceApi::shared();
        let handler = DataSourceAdapter::new(GrantsDataSource::new(FakeGovernanceApi::client(&api)));
        let config = GrantsModel {
            target_external_id: Attr::known("0oa1".to_owned()),
            target_type: Attr::known("APPLICATION".to_owned()),
            target_principal_external_id: Attr::known("00ujane".to_owned()),
            ..GrantsModel::default()
        };

        let response = handler.read(&RequestContext::new(), &config.to_host()).await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let filter = api.queries.lock().await.first().and_then(|query| query.filter.clone());
        assert_eq!(
            filter.as_deref(),
            Some(
                r#"target.externalId eq "0oa1" AND target.type eq "APPLICATION" AND targetPrincipal.externalId eq "00ujane""#
            )
        );
    }

    #[tokio::test]
    async fn rule_items_use_the_resource_projection() {
        let api = FakeGovernanceApi::shared();
        let rules: Vec<RiskRule> = (1..=3)
            .map(|index| RiskRule {
                id: format!("rr{index}"),
                name: format!("SoD {index}"),
                kind: Some("SEPARATION_OF_DUTIES".to_owned()),
                audit: audit(),
                links: self_links(&format!("risk-rules/rr{index}")),
                ..RiskRule::default()
            })
            .collect();
        api.risk_rules
            .lock()
            .await
            .extend(rules.iter().map(|rule| (rule.id.clone(), rule.clone())));
        let handler = DataSourceAdapter::new(RiskRulesDataSource::new(FakeGovernanceApi::client(&api)));
        let config = RiskRulesModel {
            name: Attr::known("SoD".to_owned()),
            ..RiskRulesModel::default()
        };

        let response = handler.read(&RequestContext::new(), &config.to_host()).await;

        let expected = HostValue::List(rules.iter().map(|rule| risk_rule_state(rule).to_host()).collect());
        assert_eq!(
            response.state.as_ref().and_then(|state| state.get("risk_rules")),
            Some(&expected)
        );
        let filter = api.queries.lock().await.first().and_then(|query| query.filter.clone());
        assert_eq!(filter.as_deref(), Some(r#"name sw "SoD""#));
    }
}
