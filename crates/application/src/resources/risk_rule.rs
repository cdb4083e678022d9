//! Risk rule resource: separation-of-duties conflicts between entitlements.

use async_trait::async_trait;
use oig_core::{
    AppResult, Attr, AttributePath, Diagnostics, NestedBlock, RequestContext, Schema,
    SchemaAttribute,
};
use oig_domain::{
    ConflictCriteria, ConflictCriterion, CriterionEntitlement, CriterionValue, RISK_RULE_TYPES,
    RiskRule, RiskRuleRequest, RiskRuleResource as WatchedResource,
};

use crate::governance_ports::GovernanceClient;
use crate::provider::{ImportId, ManagedResource};
use crate::resources::common::{
    AuditState, IdModel, LinksModel, check_one_of, id_schema, known_list, links_block,
    list_or_null, require, state_id, with_audit_attributes,
};

/// Rule type sent when none is configured.
const DEFAULT_RULE_TYPE: &str = "SEPARATION_OF_DUTIES";

oig_core::host_record! {
    /// Host-facing risk rule record.
    pub struct RiskRuleModel {
        /// Server-assigned id.
        pub id: String,
        /// Display name.
        pub name: String,
        /// Description.
        pub description: String,
        /// Rule type.
        pub rule_type as "type": String,
        /// Watched resources.
        pub resources: Vec<RuleResourceModel>,
        /// Criteria that must all match for a conflict.
        pub conflict_criteria: Vec<CriterionModel>,
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

oig_core::host_record! {
    /// Resource watched by a rule.
    pub struct RuleResourceModel {
        /// ORN of the resource.
        pub resource_orn: String,
    }
}

oig_core::host_record! {
    /// One side of a conflict.
    pub struct CriterionModel {
        /// Criterion name.
        pub name: String,
        /// Attribute compared.
        pub attribute: String,
        /// Comparison.
        pub operation: String,
        /// Value type, e.g. `ENTITLEMENTS`.
        pub value_type: String,
        /// Compared entitlements.
        pub entitlements: Vec<CriterionEntitlementModel>,
    }
}

oig_core::host_record! {
    /// Entitlement compared by a criterion.
    pub struct CriterionEntitlementModel {
        /// Entitlement id.
        pub id: String,
        /// Selected values.
        pub values: Vec<IdModel>,
    }
}

/// Risk rule resource schema.
#[must_use]
pub fn risk_rule_schema() -> Schema {
    let entitlement = Schema::new("Compared entitlement.")
        .with_attribute(SchemaAttribute::required_string("id", "Entitlement id."))
        .with_block(NestedBlock::list("values", id_schema("Selected value.")));
    let criterion = Schema::new("One side of the conflict; all criteria must match.")
        .with_attribute(SchemaAttribute::required_string("name", "Criterion name."))
        .with_attribute(SchemaAttribute::required_string("attribute", "Attribute compared."))
        .with_attribute(SchemaAttribute::required_string(
            "operation",
            "Comparison, e.g. CONTAINS_ONE or CONTAINS_ALL.",
        ))
        .with_attribute(SchemaAttribute::required_string(
            "value_type",
            "Value type, e.g. ENTITLEMENTS.",
        ))
        .with_block(NestedBlock::list("entitlements", entitlement));

    let schema = Schema::new("Separation-of-duties risk rule.")
        .with_attribute(SchemaAttribute::computed_string("id", "Server-assigned id."))
        .with_attribute(SchemaAttribute::required_string("name", "Display name."))
        .with_attribute(SchemaAttribute::optional_string("description", "Description."))
        .with_attribute(SchemaAttribute::optional_computed_string(
            "type",
            "Rule type. Defaults to SEPARATION_OF_DUTIES.",
        ))
        .with_block(NestedBlock::list(
            "resources",
            Schema::new("Watched resource.").with_attribute(SchemaAttribute::required_string(
                "resource_orn",
                "ORN of the resource.",
            )),
        ))
        .with_block(NestedBlock::list("conflict_criteria", criterion))
        .with_block(links_block());

    with_audit_attributes(schema)
}

fn build_request(plan: &RiskRuleModel) -> AppResult<RiskRuleRequest> {
    let criteria: Vec<ConflictCriterion> = known_list(&plan.conflict_criteria)
        .iter()
        .filter_map(|criterion| {
            Some(ConflictCriterion {
                name: criterion.name.known_cloned()?,
                attribute: criterion.attribute.known_cloned()?,
                operation: criterion.operation.known_cloned()?,
                value: CriterionValue {
                    kind: criterion.value_type.known_cloned()?,
                    value: known_list(&criterion.entitlements)
                        .iter()
                        .filter_map(|entitlement| {
                            Some(CriterionEntitlement {
                                id: entitlement.id.known_cloned()?,
                                values: known_list(&entitlement.values)
                                    .iter()
                                    .filter_map(IdModel::to_ref)
                                    .collect(),
                            })
                        })
                        .collect(),
                },
            })
        })
        .collect();

    Ok(RiskRuleRequest {
        name: require(&plan.name, "name")?,
        description: plan.description.known_cloned(),
        kind: plan
            .rule_type
            .known_cloned()
            .unwrap_or_else(|| DEFAULT_RULE_TYPE.to_owned()),
        resources: known_list(&plan.resources)
            .iter()
            .filter_map(|resource| {
                Some(WatchedResource {
                    resource_orn: resource.resource_orn.known_cloned()?,
                })
            })
            .collect(),
        conflict_criteria: (!criteria.is_empty()).then_some(ConflictCriteria { and: criteria }),
    })
}

fn criterion_state(criterion: &ConflictCriterion) -> CriterionModel {
    CriterionModel {
        name: Attr::known(criterion.name.clone()),
        attribute: Attr::known(criterion.attribute.clone()),
        operation: Attr::known(criterion.operation.clone()),
        value_type: Attr::known(criterion.value.kind.clone()),
        entitlements: list_or_null(
            criterion
                .value
                .value
                .iter()
                .map(|entitlement| CriterionEntitlementModel {
                    id: Attr::known(entitlement.id.clone()),
                    values: list_or_null(entitlement.values.iter().map(IdModel::from_ref).collect()),
                })
                .collect(),
        ),
    }
}

/// Projects a server rule onto the host record.
#[must_use]
pub fn risk_rule_state(rule: &RiskRule) -> RiskRuleModel {
    let audit = AuditState::from_metadata(&rule.audit);
    let criteria = rule
        .conflict_criteria
        .as_ref()
        .map(|criteria| criteria.and.iter().map(criterion_state).collect())
        .unwrap_or_default();

    RiskRuleModel {
        id: Attr::known(rule.id.clone()),
        name: Attr::known(rule.name.clone()),
        description: Attr::from_option(rule.description.clone()),
        rule_type: Attr::from_option(rule.kind.clone()),
        resources: list_or_null(
            rule.resources
                .iter()
                .map(|resource| RuleResourceModel {
                    resource_orn: Attr::known(resource.resource_orn.clone()),
                })
                .collect(),
        ),
        conflict_criteria: list_or_null(criteria),
        links: LinksModel::from_links(rule.links.as_ref()),
        created: audit.created,
        created_by: audit.created_by,
        last_updated: audit.last_updated,
        last_updated_by: audit.last_updated_by,
    }
}

/// Risk rule resource.
pub struct RiskRuleResource {
    client: GovernanceClient,
}

impl RiskRuleResource {
    /// Creates the resource over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedResource for RiskRuleResource {
    type Model = RiskRuleModel;

    const NAME: &'static str = "risk_rule";
    const LABEL: &'static str = "Risk Rule";

    fn schema(&self) -> Schema {
        risk_rule_schema()
    }

    fn id_of(model: &RiskRuleModel) -> Option<String> {
        model.id.known_cloned()
    }

    fn validate(&self, model: &RiskRuleModel, diagnostics: &mut Diagnostics) {
        check_one_of(
            diagnostics,
            AttributePath::attribute("type"),
            &model.rule_type,
            RISK_RULE_TYPES,
        );
        if matches!(&model.resources, Attr::Null) {
            diagnostics.attribute_error(
                AttributePath::attribute("resources"),
                "Missing required block",
                "At least one \"resources\" block is required.",
            );
        }
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        plan: RiskRuleModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<RiskRuleModel> {
        let request = build_request(&plan)?;
        let created = self.client.risk_rules().create_risk_rule(ctx, &request).await?;
        Ok(risk_rule_state(&created))
    }

    async fn read(&self, ctx: &RequestContext, state: RiskRuleModel) -> AppResult<RiskRuleModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let rule = self.client.risk_rules().get_risk_rule(ctx, &id).await?;
        Ok(risk_rule_state(&rule))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: RiskRuleModel,
        state: RiskRuleModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<RiskRuleModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let request = build_request(&plan)?;
        let replaced = self
            .client
            .risk_rules()
            .replace_risk_rule(ctx, &id, &request)
            .await?;
        Ok(risk_rule_state(&replaced))
    }

    async fn delete(
        &self,
        ctx: &RequestContext,
        state: RiskRuleModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<()> {
        let id = state_id(&state.id, Self::LABEL)?;
        self.client.risk_rules().delete_risk_rule(ctx, &id).await
    }

    fn import(&self, id: &ImportId) -> AppResult<RiskRuleModel> {
        Ok(RiskRuleModel {
            id: Attr::known(id.single()?.to_owned()),
            ..RiskRuleModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use oig_core::{Attr, HostType, HostValue, RequestContext};

    use crate::provider::{ResourceAdapter, ResourceHandler};
    use crate::resources::common::IdModel;
    use crate::testing::FakeGovernanceApi;

    use super::{
        CriterionEntitlementModel, CriterionModel, RiskRuleModel, RiskRuleResource,
        RuleResourceModel, build_request,
    };

    fn criterion(name: &str, entitlement: &str) -> CriterionModel {
        CriterionModel {
            name: Attr::known(name.to_owned()),
            attribute: Attr::known("principal.effective_grants".to_owned()),
            operation: Attr::known("CONTAINS_ONE".to_owned()),
            value_type: Attr::known("ENTITLEMENTS".to_owned()),
            entitlements: Attr::known(vec![CriterionEntitlementModel {
                id: Attr::known(entitlement.to_owned()),
                values: Attr::known(vec![IdModel {
                    id: Attr::known(format!("{entitlement}v0")),
                }]),
            }]),
        }
    }

    fn plan() -> RiskRuleModel {
        RiskRuleModel {
            id: Attr::Unknown,
            name: Attr::known("Payments maker-checker".to_owned()),
            rule_type: Attr::Unknown,
            resources: Attr::known(vec![RuleResourceModel {
                resource_orn: Attr::known("orn:okta:idp:00o1:apps:oidc:0oa1pay".to_owned()),
            }]),
            conflict_criteria: Attr::known(vec![
                criterion("Creates payments", "esp1"),
                criterion("Approves payments", "esp2"),
            ]),
            ..RiskRuleModel::default()
        }
    }

    #[test]
    fn request_defaults_to_separation_of_duties() {
        let request = build_request(&plan()).unwrap_or_else(|_| unreachable!());

        assert_eq!(request.kind, "SEPARATION_OF_DUTIES");
        let criteria = request.conflict_criteria.unwrap_or_default();
        assert_eq!(criteria.and.len(), 2);
        assert_eq!(criteria.and[1].value.value[0].id, "esp2");
        assert_eq!(criteria.and[1].value.value[0].values[0].id, "esp2v0");
    }

    #[tokio::test]
    async fn create_then_read_is_stable() {
        let api = FakeGovernanceApi::shared();
        let handler =
            ResourceAdapter::new(RiskRuleResource::new(FakeGovernanceApi::client(&api)));
        let ctx = RequestContext::new();

        let state = handler
            .create(&ctx, &plan().to_host())
            .await
            .state
            .unwrap_or(HostValue::Null);
        let read = handler.read(&ctx, &state).await;

        assert_eq!(read.state, Some(state.clone()));
        assert_eq!(state.get("type").and_then(HostValue::as_str), Some("SEPARATION_OF_DUTIES"));
    }

    #[tokio::test]
    async fn missing_resources_fail_validation() {
        let api = FakeGovernanceApi::shared();
        let handler =
            ResourceAdapter::new(RiskRuleResource::new(FakeGovernanceApi::client(&api)));
        let config = RiskRuleModel {
            resources: Attr::Null,
            rule_type: Attr::known("TOXIC".to_owned()),
            ..plan()
        };

        let response = handler.create(&RequestContext::new(), &config.to_host()).await;

        assert_eq!(response.diagnostics.len(), 2);
        assert!(api.call_log().await.is_empty());
    }
}
