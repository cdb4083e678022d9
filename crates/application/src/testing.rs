//! In-memory governance service shared by application tests.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use oig_core::{AppError, AppResult, RequestContext};
use oig_domain::{
    AuditMetadata, Campaign, CampaignRequest, CatalogEntry, Collection, CollectionAssignment,
    CollectionAssignmentRequest, CollectionRequest, CollectionResource, Entitlement,
    EntitlementBundle, EntitlementBundleRequest, EntitlementRequest, EntitlementValue, GrantFull,
    GrantFullWithEntitlements, GrantPatch, GrantRequest, GrantResponse, GrantSchedule, Link, Links,
    ListQuery, MyRequest, MyRequestCreate, OrgRequestSettings, OrgRequestSettingsPatch, Page,
    PatchOperation, PrincipalAccess, PrincipalAccessQuery, PrincipalEntitlement, RequestCondition,
    RequestConditionRequest, RequestFieldSet, RequestSequence, RequestSequenceRequest,
    RequestType, RequestTypeCreate, RequestV2, RequestV2Create, ResourceRequestSettings,
    ResourceRequestSettingsPatch, Review, ReviewDecision, RiskRule, RiskRuleRequest,
    parse_timestamp,
};
use tokio::sync::Mutex;

use crate::governance_ports::{
    CampaignsApi, CatalogsApi, CollectionsApi, EntitlementBundlesApi, EntitlementsApi,
    GovernanceClient, GrantsApi, MyCatalogsApi, MyRequestsApi, PrincipalAccessApi,
    PrincipalEntitlementsApi, RequestConditionsApi, RequestSequencesApi, RequestSettingsApi,
    RequestTypesApi, RequestsApi, ReviewsApi, RiskRulesApi,
};

pub(crate) const ORG_URL: &str = "https://example.okta.com";
pub(crate) const ACTOR_ID: &str = "00uadmin";
const PAGE_SIZE: usize = 2;

type Scoped<T> = Mutex<BTreeMap<(String, String), T>>;

/// Fake service: records every call and keeps one store per entity.
#[derive(Default)]
pub(crate) struct FakeGovernanceApi {
    pub(crate) calls: Mutex<Vec<String>>,
    pub(crate) queries: Mutex<Vec<ListQuery>>,
    pub(crate) failures: Mutex<HashMap<String, u16>>,
    sequence: Mutex<u64>,
    pub(crate) campaigns: Mutex<BTreeMap<String, Campaign>>,
    pub(crate) campaign_pages: Mutex<VecDeque<Page<Campaign>>>,
    pub(crate) campaign_requests: Mutex<Vec<CampaignRequest>>,
    pub(crate) reviews: Mutex<BTreeMap<String, Review>>,
    pub(crate) entitlements: Mutex<BTreeMap<String, Entitlement>>,
    pub(crate) bundles: Mutex<BTreeMap<String, EntitlementBundle>>,
    pub(crate) principal_entitlements: Mutex<Vec<PrincipalEntitlement>>,
    pub(crate) principal_access: Mutex<Option<PrincipalAccess>>,
    pub(crate) grants: Mutex<BTreeMap<String, GrantResponse>>,
    pub(crate) grant_requests: Mutex<Vec<GrantRequest>>,
    pub(crate) risk_rules: Mutex<BTreeMap<String, RiskRule>>,
    pub(crate) collections: Mutex<BTreeMap<String, Collection>>,
    pub(crate) collection_resources: Mutex<BTreeMap<String, Vec<CollectionResource>>>,
    pub(crate) collection_assignments: Mutex<BTreeMap<String, Vec<CollectionAssignment>>>,
    pub(crate) assignment_patches: Mutex<Vec<Vec<PatchOperation>>>,
    pub(crate) request_conditions: Scoped<RequestCondition>,
    pub(crate) request_sequences: Scoped<RequestSequence>,
    pub(crate) org_settings: Mutex<OrgRequestSettings>,
    pub(crate) resource_settings: Mutex<BTreeMap<String, ResourceRequestSettings>>,
    pub(crate) requests: Mutex<BTreeMap<String, RequestV2>>,
    pub(crate) request_types: Mutex<BTreeMap<String, RequestType>>,
    pub(crate) my_requests: Scoped<MyRequest>,
    pub(crate) catalog: Mutex<Vec<CatalogEntry>>,
    pub(crate) request_fields: Mutex<RequestFieldSet>,
}

impl FakeGovernanceApi {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn client(api: &Arc<Self>) -> GovernanceClient {
        GovernanceClient::from_api(api.clone())
    }

    pub(crate) async fn fail(&self, call: &str, status: u16) {
        self.failures.lock().await.insert(call.to_owned(), status);
    }

    pub(crate) async fn recover(&self, call: &str) {
        self.failures.lock().await.remove(call);
    }

    pub(crate) async fn call_log(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn count(&self, call: &str) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|name| name.as_str() == call)
            .count()
    }

    async fn enter(&self, call: &str) -> AppResult<()> {
        self.calls.lock().await.push(call.to_owned());
        match self.failures.lock().await.get(call) {
            Some(404) => Err(AppError::NotFound(format!("{call}: resource not found"))),
            Some(status) => Err(AppError::Remote {
                status: *status,
                message: format!("E0000009: {call} failed"),
            }),
            None => Ok(()),
        }
    }

    async fn enter_list(&self, call: &str, query: &ListQuery) -> AppResult<()> {
        self.queries.lock().await.push(query.clone());
        self.enter(call).await
    }

    async fn next_id(&self, prefix: &str) -> String {
        let mut sequence = self.sequence.lock().await;
        *sequence += 1;
        format!("{prefix}{:04}", *sequence)
    }
}

pub(crate) fn stamp() -> DateTime<Utc> {
    parse_timestamp("2026-01-15T10:00:00Z").unwrap_or_else(|_| unreachable!())
}

pub(crate) fn audit() -> AuditMetadata {
    AuditMetadata {
        created: Some(stamp()),
        created_by: Some(ACTOR_ID.to_owned()),
        last_updated: Some(stamp()),
        last_updated_by: Some(ACTOR_ID.to_owned()),
    }
}

pub(crate) fn self_links(path: &str) -> Option<Links> {
    Some(Links {
        self_link: Some(Link {
            href: format!("{ORG_URL}/governance/api/v1/{path}"),
        }),
        next: None,
    })
}

fn missing(kind: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{kind} '{id}'"))
}

/// Serves `items` in pages of two, encoding the offset as the cursor.
pub(crate) fn paginate<T: Clone>(items: &[T], query: &ListQuery, path: &str) -> Page<T> {
    let start = query
        .after
        .as_deref()
        .and_then(|after| after.parse::<usize>().ok())
        .unwrap_or(0)
        .min(items.len());
    let size = query
        .limit
        .and_then(|limit| usize::try_from(limit).ok())
        .unwrap_or(PAGE_SIZE);
    let end = (start + size).min(items.len());
    let next = (end < items.len()).then(|| format!("/governance/api/v1/{path}?after={end}"));

    Page::new(items[start..end].to_vec(), next)
}

#[async_trait]
impl CampaignsApi for FakeGovernanceApi {
    async fn create_campaign(
        &self,
        _ctx: &RequestContext,
        request: &CampaignRequest,
    ) -> AppResult<Campaign> {
        self.enter("create_campaign").await?;
        self.campaign_requests.lock().await.push(request.clone());
        let id = self.next_id("icm").await;

        let mut schedule = request.schedule_settings.clone();
        if let (Some(start), Some(days)) = (schedule.start_date, schedule.duration_in_days) {
            schedule.end_date = Some(start + Duration::days(days));
        }
        let campaign = Campaign {
            id: id.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            campaign_type: Some(
                request
                    .campaign_type
                    .clone()
                    .unwrap_or_else(|| "RESOURCE".to_owned()),
            ),
            campaign_tier: request.campaign_tier.clone(),
            status: Some("READY".to_owned()),
            remediation_settings: Some(request.remediation_settings.clone()),
            resource_settings: Some(request.resource_settings.clone()),
            reviewer_settings: Some(request.reviewer_settings.clone()),
            schedule_settings: Some(schedule),
            notification_settings: request.notification_settings.clone(),
            principal_scope_settings: request.principal_scope_settings.clone(),
            audit: audit(),
            links: self_links(&format!("campaigns/{id}")),
        };
        self.campaigns.lock().await.insert(id, campaign.clone());
        Ok(campaign)
    }

    async fn get_campaign(&self, _ctx: &RequestContext, campaign_id: &str) -> AppResult<Campaign> {
        self.enter("get_campaign").await?;
        self.campaigns
            .lock()
            .await
            .get(campaign_id)
            .cloned()
            .ok_or_else(|| missing("campaign", campaign_id))
    }

    async fn list_campaigns(
        &self,
        _ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<Campaign>> {
        self.enter_list("list_campaigns", query).await?;
        if let Some(page) = self.campaign_pages.lock().await.pop_front() {
            return Ok(page);
        }
        let items: Vec<Campaign> = self.campaigns.lock().await.values().cloned().collect();
        Ok(paginate(&items, query, "campaigns"))
    }

    async fn delete_campaign(&self, _ctx: &RequestContext, campaign_id: &str) -> AppResult<()> {
        self.enter("delete_campaign").await?;
        self.campaigns
            .lock()
            .await
            .remove(campaign_id)
            .map(|_| ())
            .ok_or_else(|| missing("campaign", campaign_id))
    }

    async fn launch_campaign(&self, _ctx: &RequestContext, campaign_id: &str) -> AppResult<()> {
        self.enter("launch_campaign").await?;
        let mut campaigns = self.campaigns.lock().await;
        let campaign = campaigns
            .get_mut(campaign_id)
            .ok_or_else(|| missing("campaign", campaign_id))?;
        campaign.status = Some("ACTIVE".to_owned());
        Ok(())
    }

    async fn end_campaign(&self, _ctx: &RequestContext, campaign_id: &str) -> AppResult<()> {
        self.enter("end_campaign").await?;
        let mut campaigns = self.campaigns.lock().await;
        let campaign = campaigns
            .get_mut(campaign_id)
            .ok_or_else(|| missing("campaign", campaign_id))?;
        campaign.status = Some("COMPLETED".to_owned());
        Ok(())
    }
}

#[async_trait]
impl ReviewsApi for FakeGovernanceApi {
    async fn get_review(&self, _ctx: &RequestContext, review_id: &str) -> AppResult<Review> {
        self.enter("get_review").await?;
        self.reviews
            .lock()
            .await
            .get(review_id)
            .cloned()
            .ok_or_else(|| missing("review", review_id))
    }

    async fn list_reviews(&self, _ctx: &RequestContext, query: &ListQuery) -> AppResult<Page<Review>> {
        self.enter_list("list_reviews", query).await?;
        let items: Vec<Review> = self.reviews.lock().await.values().cloned().collect();
        Ok(paginate(&items, query, "reviews"))
    }

    async fn decide_review(
        &self,
        _ctx: &RequestContext,
        review_id: &str,
        decision: &ReviewDecision,
    ) -> AppResult<Review> {
        self.enter("decide_review").await?;
        let mut reviews = self.reviews.lock().await;
        let review = reviews
            .get_mut(review_id)
            .ok_or_else(|| missing("review", review_id))?;
        review.decision = Some(decision.decision.clone());
        review.note = decision.note.clone().map(|note| oig_domain::ReviewNote {
            id: Some("rnt0001".to_owned()),
            note,
        });
        review.decided = Some("2026-01-16T08:30:00Z".to_owned());
        Ok(review.clone())
    }
}

fn entitlement_from(id: String, request: &EntitlementRequest) -> Entitlement {
    Entitlement {
        id: id.clone(),
        name: request.name.clone(),
        external_value: request.external_value.clone(),
        description: request.description.clone(),
        multi_value: request.multi_value,
        data_type: request.data_type.clone(),
        parent: Some(request.parent.clone()),
        parent_resource_orn: Some(format!(
            "orn:okta:idp:00o1:apps:oidc:{}",
            request.parent.external_id
        )),
        values: request
            .values
            .iter()
            .enumerate()
            .map(|(index, value)| EntitlementValue {
                id: Some(
                    value
                        .id
                        .clone()
                        .unwrap_or_else(|| format!("{id}v{index}")),
                ),
                ..value.clone()
            })
            .collect(),
        audit: audit(),
        links: self_links(&format!("entitlements/{id}")),
    }
}

#[async_trait]
impl EntitlementsApi for FakeGovernanceApi {
    async fn create_entitlement(
        &self,
        _ctx: &RequestContext,
        request: &EntitlementRequest,
    ) -> AppResult<Entitlement> {
        self.enter("create_entitlement").await?;
        let id = self.next_id("esp").await;
        let entitlement = entitlement_from(id.clone(), request);
        self.entitlements.lock().await.insert(id, entitlement.clone());
        Ok(entitlement)
    }

    async fn get_entitlement(
        &self,
        _ctx: &RequestContext,
        entitlement_id: &str,
    ) -> AppResult<Entitlement> {
        self.enter("get_entitlement").await?;
        self.entitlements
            .lock()
            .await
            .get(entitlement_id)
            .cloned()
            .ok_or_else(|| missing("entitlement", entitlement_id))
    }

    async fn replace_entitlement(
        &self,
        _ctx: &RequestContext,
        entitlement_id: &str,
        request: &EntitlementRequest,
    ) -> AppResult<Entitlement> {
        self.enter("replace_entitlement").await?;
        let mut entitlements = self.entitlements.lock().await;
        if !entitlements.contains_key(entitlement_id) {
            return Err(missing("entitlement", entitlement_id));
        }
        let entitlement = entitlement_from(entitlement_id.to_owned(), request);
        entitlements.insert(entitlement_id.to_owned(), entitlement.clone());
        Ok(entitlement)
    }

    async fn delete_entitlement(&self, _ctx: &RequestContext, entitlement_id: &str) -> AppResult<()> {
        self.enter("delete_entitlement").await?;
        self.entitlements
            .lock()
            .await
            .remove(entitlement_id)
            .map(|_| ())
            .ok_or_else(|| missing("entitlement", entitlement_id))
    }

    async fn list_entitlements(
        &self,
        _ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<Entitlement>> {
        self.enter_list("list_entitlements", query).await?;
        let items: Vec<Entitlement> = self.entitlements.lock().await.values().cloned().collect();
        Ok(paginate(&items, query, "entitlements"))
    }
}

fn bundle_from(id: String, request: &EntitlementBundleRequest) -> EntitlementBundle {
    EntitlementBundle {
        id: id.clone(),
        name: request.name.clone(),
        description: request.description.clone(),
        status: Some(request.status.clone().unwrap_or_else(|| "ACTIVE".to_owned())),
        target: Some(request.target.clone()),
        target_resource_orn: Some(format!(
            "orn:okta:idp:00o1:apps:oidc:{}",
            request.target.external_id
        )),
        entitlements: request.entitlements.clone(),
        audit: audit(),
        links: self_links(&format!("entitlement-bundles/{id}")),
    }
}

#[async_trait]
impl EntitlementBundlesApi for FakeGovernanceApi {
    async fn create_entitlement_bundle(
        &self,
        _ctx: &RequestContext,
        request: &EntitlementBundleRequest,
    ) -> AppResult<EntitlementBundle> {
        self.enter("create_entitlement_bundle").await?;
        let id = self.next_id("enb").await;
        let bundle = bundle_from(id.clone(), request);
        self.bundles.lock().await.insert(id, bundle.clone());
        Ok(bundle)
    }

    async fn get_entitlement_bundle(
        &self,
        _ctx: &RequestContext,
        bundle_id: &str,
    ) -> AppResult<EntitlementBundle> {
        self.enter("get_entitlement_bundle").await?;
        self.bundles
            .lock()
            .await
            .get(bundle_id)
            .cloned()
            .ok_or_else(|| missing("entitlement bundle", bundle_id))
    }

    async fn replace_entitlement_bundle(
        &self,
        _ctx: &RequestContext,
        bundle_id: &str,
        request: &EntitlementBundleRequest,
    ) -> AppResult<EntitlementBundle> {
        self.enter("replace_entitlement_bundle").await?;
        let mut bundles = self.bundles.lock().await;
        if !bundles.contains_key(bundle_id) {
            return Err(missing("entitlement bundle", bundle_id));
        }
        let bundle = bundle_from(bundle_id.to_owned(), request);
        bundles.insert(bundle_id.to_owned(), bundle.clone());
        Ok(bundle)
    }

    async fn delete_entitlement_bundle(&self, _ctx: &RequestContext, bundle_id: &str) -> AppResult<()> {
        self.enter("delete_entitlement_bundle").await?;
        self.bundles
            .lock()
            .await
            .remove(bundle_id)
            .map(|_| ())
            .ok_or_else(|| missing("entitlement bundle", bundle_id))
    }

    async fn list_entitlement_bundles(
        &self,
        _ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<EntitlementBundle>> {
        self.enter_list("list_entitlement_bundles", query).await?;
        let items: Vec<EntitlementBundle> = self.bundles.lock().await.values().cloned().collect();
        Ok(paginate(&items, query, "entitlement-bundles"))
    }
}

#[async_trait]
impl PrincipalEntitlementsApi for FakeGovernanceApi {
    async fn list_principal_entitlements(
        &self,
        _ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<PrincipalEntitlement>> {
        self.enter_list("list_principal_entitlements", query).await?;
        let items = self.principal_entitlements.lock().await.clone();
        Ok(paginate(&items, query, "principal-entitlements"))
    }
}

#[async_trait]
impl PrincipalAccessApi for FakeGovernanceApi {
    async fn get_principal_access(
        &self,
        _ctx: &RequestContext,
        query: &PrincipalAccessQuery,
    ) -> AppResult<PrincipalAccess> {
        self.enter("get_principal_access").await?;
        self.principal_access
            .lock()
            .await
            .clone()
            .ok_or_else(|| missing("principal access", &query.target_principal_orn))
    }
}

#[async_trait]
impl GrantsApi for FakeGovernanceApi {
    async fn create_grant(
        &self,
        _ctx: &RequestContext,
        request: &GrantRequest,
    ) -> AppResult<GrantResponse> {
        self.enter("create_grant").await?;
        self.grant_requests.lock().await.push(request.clone());
        let id = self.next_id("gra").await;

        let grant = GrantFull {
            id: id.clone(),
            grant_type: request.grant_type.clone(),
            target_principal: Some(request.target_principal.clone()),
            target_principal_orn: Some(format!(
                "orn:okta:directory:00o1:users:{}",
                request.target_principal.external_id
            )),
            target: request.target.clone(),
            target_resource_orn: request
                .target
                .as_ref()
                .map(|target| format!("orn:okta:idp:00o1:apps:oidc:{}", target.external_id)),
            entitlement_bundle_id: request.entitlement_bundle_id.clone(),
            action: Some(request.action.clone().unwrap_or_else(|| "ALLOW".to_owned())),
            actor: Some(request.actor.clone().unwrap_or_else(|| "API".to_owned())),
            status: Some("ACTIVE".to_owned()),
            schedule_settings: request.schedule_settings.clone(),
            audit: audit(),
            links: self_links(&format!("grants/{id}")),
        };
        let response = match request.entitlements.as_ref() {
            Some(entitlements) if !entitlements.is_empty() => {
                GrantResponse::WithEntitlements(GrantFullWithEntitlements {
                    grant,
                    entitlements: entitlements.clone(),
                })
            }
            _ => GrantResponse::Full(grant),
        };
        self.grants.lock().await.insert(id, response.clone());
        Ok(response)
    }

    async fn get_grant(&self, _ctx: &RequestContext, grant_id: &str) -> AppResult<GrantResponse> {
        self.enter("get_grant").await?;
        self.grants
            .lock()
            .await
            .get(grant_id)
            .cloned()
            .ok_or_else(|| missing("grant", grant_id))
    }

    async fn patch_grant(&self, _ctx: &RequestContext, patch: &GrantPatch) -> AppResult<GrantResponse> {
        self.enter("patch_grant").await?;
        let mut grants = self.grants.lock().await;
        let response = grants
            .get_mut(&patch.id)
            .ok_or_else(|| missing("grant", &patch.id))?;
        let grant = match response {
            GrantResponse::WithEntitlements(full) => &mut full.grant,
            GrantResponse::Full(grant) => grant,
        };
        let schedule = GrantSchedule {
            expiration_date: patch.schedule_settings.expiration_date.clone(),
            time_zone: patch.schedule_settings.time_zone.clone(),
        };
        grant.schedule_settings = (schedule != GrantSchedule::default()).then_some(schedule);
        Ok(response.clone())
    }

    async fn delete_grant(&self, _ctx: &RequestContext, grant_id: &str) -> AppResult<()> {
        self.enter("delete_grant").await?;
        self.grants
            .lock()
            .await
            .remove(grant_id)
            .map(|_| ())
            .ok_or_else(|| missing("grant", grant_id))
    }

    async fn list_grants(
        &self,
        _ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<GrantResponse>> {
        self.enter_list("list_grants", query).await?;
        let items: Vec<GrantResponse> = self.grants.lock().await.values().cloned().collect();
        Ok(paginate(&items, query, "grants"))
    }
}

fn risk_rule_from(id: String, request: &RiskRuleRequest) -> RiskRule {
    RiskRule {
        id: id.clone(),
        name: request.name.clone(),
        description: request.description.clone(),
        kind: Some(request.kind.clone()),
        resources: request.resources.clone(),
        conflict_criteria: request.conflict_criteria.clone(),
        audit: audit(),
        links: self_links(&format!("risk-rules/{id}")),
    }
}

#[async_trait]
impl RiskRulesApi for FakeGovernanceApi {
    async fn create_risk_rule(
        &self,
        _ctx: &RequestContext,
        request: &RiskRuleRequest,
    ) -> AppResult<RiskRule> {
        self.enter("create_risk_rule").await?;
        let id = self.next_id("rul").await;
        let rule = risk_rule_from(id.clone(), request);
        self.risk_rules.lock().await.insert(id, rule.clone());
        Ok(rule)
    }

    async fn get_risk_rule(&self, _ctx: &RequestContext, rule_id: &str) -> AppResult<RiskRule> {
        self.enter("get_risk_rule").await?;
        self.risk_rules
            .lock()
            .await
            .get(rule_id)
            .cloned()
            .ok_or_else(|| missing("risk rule", rule_id))
    }

    async fn replace_risk_rule(
        &self,
        _ctx: &RequestContext,
        rule_id: &str,
        request: &RiskRuleRequest,
    ) -> AppResult<RiskRule> {
        self.enter("replace_risk_rule").await?;
        let mut rules = self.risk_rules.lock().await;
        if !rules.contains_key(rule_id) {
            return Err(missing("risk rule", rule_id));
        }
        let rule = risk_rule_from(rule_id.to_owned(), request);
        rules.insert(rule_id.to_owned(), rule.clone());
        Ok(rule)
    }

    async fn delete_risk_rule(&self, _ctx: &RequestContext, rule_id: &str) -> AppResult<()> {
        self.enter("delete_risk_rule").await?;
        self.risk_rules
            .lock()
            .await
            .remove(rule_id)
            .map(|_| ())
            .ok_or_else(|| missing("risk rule", rule_id))
    }

    async fn list_risk_rules(
        &self,
        _ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<RiskRule>> {
        self.enter_list("list_risk_rules", query).await?;
        let items: Vec<RiskRule> = self.risk_rules.lock().await.values().cloned().collect();
        Ok(paginate(&items, query, "risk-rules"))
    }
}

fn apply_assignment_patch(assignment: &mut CollectionAssignment, operation: &PatchOperation) {
    let value = operation
        .value
        .as_ref()
        .and_then(|value| value.as_str())
        .map(str::to_owned);
    let value = if operation.op == "remove" { None } else { value };
    match operation.path.as_str() {
        "/expirationTime" => assignment.expiration_time = value,
        "/timeZone" => assignment.time_zone = value,
        _ => {}
    }
}

#[async_trait]
impl CollectionsApi for FakeGovernanceApi {
    async fn create_collection(
        &self,
        _ctx: &RequestContext,
        request: &CollectionRequest,
    ) -> AppResult<Collection> {
        self.enter("create_collection").await?;
        let id = self.next_id("col").await;
        let collection = Collection {
            id: id.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            audit: audit(),
            links: self_links(&format!("collections/{id}")),
        };
        self.collections.lock().await.insert(id, collection.clone());
        Ok(collection)
    }

    async fn get_collection(&self, _ctx: &RequestContext, collection_id: &str) -> AppResult<Collection> {
        self.enter("get_collection").await?;
        self.collections
            .lock()
            .await
            .get(collection_id)
            .cloned()
            .ok_or_else(|| missing("collection", collection_id))
    }

    async fn replace_collection(
        &self,
        _ctx: &RequestContext,
        collection_id: &str,
        request: &CollectionRequest,
    ) -> AppResult<Collection> {
        self.enter("replace_collection").await?;
        let mut collections = self.collections.lock().await;
        let collection = collections
            .get_mut(collection_id)
            .ok_or_else(|| missing("collection", collection_id))?;
        collection.name = request.name.clone();
        collection.description = request.description.clone();
        Ok(collection.clone())
    }

    async fn delete_collection(&self, _ctx: &RequestContext, collection_id: &str) -> AppResult<()> {
        self.enter("delete_collection").await?;
        self.collections
            .lock()
            .await
            .remove(collection_id)
            .map(|_| ())
            .ok_or_else(|| missing("collection", collection_id))
    }

    async fn list_collections(
        &self,
        _ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<Collection>> {
        self.enter_list("list_collections", query).await?;
        let items: Vec<Collection> = self.collections.lock().await.values().cloned().collect();
        Ok(paginate(&items, query, "collections"))
    }

    async fn get_collection_resource(
        &self,
        _ctx: &RequestContext,
        collection_id: &str,
        resource_id: &str,
    ) -> AppResult<CollectionResource> {
        self.enter("get_collection_resource").await?;
        self.collection_resources
            .lock()
            .await
            .get(collection_id)
            .and_then(|resources| {
                resources
                    .iter()
                    .find(|resource| resource.resource_id == resource_id)
                    .cloned()
            })
            .ok_or_else(|| missing("collection resource", resource_id))
    }

    async fn list_collection_resources(
        &self,
        _ctx: &RequestContext,
        collection_id: &str,
        query: &ListQuery,
    ) -> AppResult<Page<CollectionResource>> {
        self.enter_list("list_collection_resources", query).await?;
        let items = self
            .collection_resources
            .lock()
            .await
            .get(collection_id)
            .cloned()
            .unwrap_or_default();
        Ok(paginate(
            &items,
            query,
            &format!("collections/{collection_id}/resources"),
        ))
    }

    async fn create_collection_assignments(
        &self,
        _ctx: &RequestContext,
        collection_id: &str,
        requests: &[CollectionAssignmentRequest],
    ) -> AppResult<Vec<CollectionAssignment>> {
        self.enter("create_collection_assignments").await?;
        let mut created = Vec::with_capacity(requests.len());
        for request in requests {
            let id = self.next_id("cas").await;
            created.push(CollectionAssignment {
                id: id.clone(),
                principal: Some(request.principal.clone()),
                actor: Some(request.actor.clone().unwrap_or_else(|| "API".to_owned())),
                expiration_time: request.expiration_time.clone(),
                time_zone: request.time_zone.clone(),
                assignment_type: Some("INDIVIDUAL".to_owned()),
                status: Some("ACTIVE".to_owned()),
                audit: audit(),
                links: self_links(&format!("collections/{collection_id}/assignments/{id}")),
            });
        }
        self.collection_assignments
            .lock()
            .await
            .entry(collection_id.to_owned())
            .or_default()
            .extend(created.iter().cloned());
        Ok(created)
    }

    async fn list_collection_assignments(
        &self,
        _ctx: &RequestContext,
        collection_id: &str,
        query: &ListQuery,
    ) -> AppResult<Page<CollectionAssignment>> {
        self.enter_list("list_collection_assignments", query).await?;
        let items = self
            .collection_assignments
            .lock()
            .await
            .get(collection_id)
            .cloned()
            .unwrap_or_default();
        Ok(paginate(
            &items,
            query,
            &format!("collections/{collection_id}/assignments"),
        ))
    }

    async fn patch_collection_assignment(
        &self,
        _ctx: &RequestContext,
        collection_id: &str,
        assignment_id: &str,
        operations: &[PatchOperation],
    ) -> AppResult<CollectionAssignment> {
        self.enter("patch_collection_assignment").await?;
        self.assignment_patches.lock().await.push(operations.to_vec());
        let mut assignments = self.collection_assignments.lock().await;
        let assignment = assignments
            .get_mut(collection_id)
            .and_then(|items| items.iter_mut().find(|item| item.id == assignment_id))
            .ok_or_else(|| missing("collection assignment", assignment_id))?;
        for operation in operations {
            apply_assignment_patch(assignment, operation);
        }
        Ok(assignment.clone())
    }

    async fn delete_collection_assignment(
        &self,
        _ctx: &RequestContext,
        collection_id: &str,
        assignment_id: &str,
    ) -> AppResult<()> {
        self.enter("delete_collection_assignment").await?;
        let mut assignments = self.collection_assignments.lock().await;
        let items = assignments
            .get_mut(collection_id)
            .ok_or_else(|| missing("collection assignment", assignment_id))?;
        let before = items.len();
        items.retain(|item| item.id != assignment_id);
        if items.len() == before {
            return Err(missing("collection assignment", assignment_id));
        }
        Ok(())
    }
}

fn merge_condition(condition: &mut RequestCondition, request: &RequestConditionRequest) {
    if let Some(name) = &request.name {
        condition.name = name.clone();
    }
    if request.description.is_some() {
        condition.description = request.description.clone();
    }
    if request.priority.is_some() {
        condition.priority = request.priority;
    }
    if request.approval_sequence_id.is_some() {
        condition.approval_sequence_id = request.approval_sequence_id.clone();
    }
    if request.access_scope_settings.is_some() {
        condition.access_scope_settings = request.access_scope_settings.clone();
    }
    if request.requester_settings.is_some() {
        condition.requester_settings = request.requester_settings.clone();
    }
    if request.access_duration_settings.is_some() {
        condition.access_duration_settings = request.access_duration_settings.clone();
    }
}

impl FakeGovernanceApi {
    async fn set_condition_status(
        &self,
        resource_id: &str,
        condition_id: &str,
        status: &str,
    ) -> AppResult<RequestCondition> {
        let mut conditions = self.request_conditions.lock().await;
        let condition = conditions
            .get_mut(&(resource_id.to_owned(), condition_id.to_owned()))
            .ok_or_else(|| missing("request condition", condition_id))?;
        condition.status = Some(status.to_owned());
        Ok(condition.clone())
    }
}

#[async_trait]
impl RequestConditionsApi for FakeGovernanceApi {
    async fn create_request_condition(
        &self,
        _ctx: &RequestContext,
        resource_id: &str,
        request: &RequestConditionRequest,
    ) -> AppResult<RequestCondition> {
        self.enter("create_request_condition").await?;
        let id = self.next_id("rcd").await;
        let mut condition = RequestCondition {
            id: id.clone(),
            resource_id: Some(resource_id.to_owned()),
            priority: Some(0),
            status: Some("INACTIVE".to_owned()),
            audit: audit(),
            links: self_links(&format!("resources/{resource_id}/request-conditions/{id}")),
            ..RequestCondition::default()
        };
        merge_condition(&mut condition, request);
        self.request_conditions
            .lock()
            .await
            .insert((resource_id.to_owned(), id), condition.clone());
        Ok(condition)
    }

    async fn get_request_condition(
        &self,
        _ctx: &RequestContext,
        resource_id: &str,
        condition_id: &str,
    ) -> AppResult<RequestCondition> {
        self.enter("get_request_condition").await?;
        self.request_conditions
            .lock()
            .await
            .get(&(resource_id.to_owned(), condition_id.to_owned()))
            .cloned()
            .ok_or_else(|| missing("request condition", condition_id))
    }

    async fn patch_request_condition(
        &self,
        _ctx: &RequestContext,
        resource_id: &str,
        condition_id: &str,
        request: &RequestConditionRequest,
    ) -> AppResult<RequestCondition> {
        self.enter("patch_request_condition").await?;
        let mut conditions = self.request_conditions.lock().await;
        let condition = conditions
            .get_mut(&(resource_id.to_owned(), condition_id.to_owned()))
            .ok_or_else(|| missing("request condition", condition_id))?;
        merge_condition(condition, request);
        Ok(condition.clone())
    }

    async fn delete_request_condition(
        &self,
        _ctx: &RequestContext,
        resource_id: &str,
        condition_id: &str,
    ) -> AppResult<()> {
        self.enter("delete_request_condition").await?;
        self.request_conditions
            .lock()
            .await
            .remove(&(resource_id.to_owned(), condition_id.to_owned()))
            .map(|_| ())
            .ok_or_else(|| missing("request condition", condition_id))
    }

    async fn list_request_conditions(
        &self,
        _ctx: &RequestContext,
        resource_id: &str,
        query: &ListQuery,
    ) -> AppResult<Page<RequestCondition>> {
        self.enter_list("list_request_conditions", query).await?;
        let items: Vec<RequestCondition> = self
            .request_conditions
            .lock()
            .await
            .iter()
            .filter(|((resource, _), _)| resource == resource_id)
            .map(|(_, condition)| condition.clone())
            .collect();
        Ok(paginate(
            &items,
            query,
            &format!("resources/{resource_id}/request-conditions"),
        ))
    }

    async fn activate_request_condition(
        &self,
        _ctx: &RequestContext,
        resource_id: &str,
        condition_id: &str,
    ) -> AppResult<RequestCondition> {
        self.enter("activate_request_condition").await?;
        self.set_condition_status(resource_id, condition_id, "ACTIVE")
            .await
    }

    async fn deactivate_request_condition(
        &self,
        _ctx: &RequestContext,
        resource_id: &str,
        condition_id: &str,
    ) -> AppResult<RequestCondition> {
        self.enter("deactivate_request_condition").await?;
        self.set_condition_status(resource_id, condition_id, "INACTIVE")
            .await
    }
}

fn sequence_from(id: String, resource_id: &str, request: &RequestSequenceRequest) -> RequestSequence {
    RequestSequence {
        id: id.clone(),
        resource_id: Some(resource_id.to_owned()),
        name: request.name.clone(),
        description: request.description.clone(),
        link: request.link.clone(),
        compatible_resource_types: request.compatible_resource_types.clone(),
        audit: audit(),
        links: self_links(&format!("resources/{resource_id}/request-sequences/{id}")),
    }
}

#[async_trait]
impl RequestSequencesApi for FakeGovernanceApi {
    async fn create_request_sequence(
        &self,
        _ctx: &RequestContext,
        resource_id: &str,
        request: &RequestSequenceRequest,
    ) -> AppResult<RequestSequence> {
        self.enter("create_request_sequence").await?;
        let id = self.next_id("rsq").await;
        let sequence = sequence_from(id.clone(), resource_id, request);
        self.request_sequences
            .lock()
            .await
            .insert((resource_id.to_owned(), id), sequence.clone());
        Ok(sequence)
    }

    async fn get_request_sequence(
        &self,
        _ctx: &RequestContext,
        resource_id: &str,
        sequence_id: &str,
    ) -> AppResult<RequestSequence> {
        self.enter("get_request_sequence").await?;
        self.request_sequences
            .lock()
            .await
            .get(&(resource_id.to_owned(), sequence_id.to_owned()))
            .cloned()
            .ok_or_else(|| missing("request sequence", sequence_id))
    }

    async fn replace_request_sequence(
        &self,
        _ctx: &RequestContext,
        resource_id: &str,
        sequence_id: &str,
        request: &RequestSequenceRequest,
    ) -> AppResult<RequestSequence> {
        self.enter("replace_request_sequence").await?;
        let key = (resource_id.to_owned(), sequence_id.to_owned());
        let mut sequences = self.request_sequences.lock().await;
        if !sequences.contains_key(&key) {
            return Err(missing("request sequence", sequence_id));
        }
        let sequence = sequence_from(sequence_id.to_owned(), resource_id, request);
        sequences.insert(key, sequence.clone());
        Ok(sequence)
    }

    async fn delete_request_sequence(
        &self,
        _ctx: &RequestContext,
        resource_id: &str,
        sequence_id: &str,
    ) -> AppResult<()> {
        self.enter("delete_request_sequence").await?;
        self.request_sequences
            .lock()
            .await
            .remove(&(resource_id.to_owned(), sequence_id.to_owned()))
            .map(|_| ())
            .ok_or_else(|| missing("request sequence", sequence_id))
    }

    async fn list_request_sequences(
        &self,
        _ctx: &RequestContext,
        resource_id: &str,
        query: &ListQuery,
    ) -> AppResult<Page<RequestSequence>> {
        self.enter_list("list_request_sequences", query).await?;
        let items: Vec<RequestSequence> = self
            .request_sequences
            .lock()
            .await
            .iter()
            .filter(|((resource, _), _)| resource == resource_id)
            .map(|(_, sequence)| sequence.clone())
            .collect();
        Ok(paginate(
            &items,
            query,
            &format!("resources/{resource_id}/request-sequences"),
        ))
    }
}

#[async_trait]
impl RequestSettingsApi for FakeGovernanceApi {
    async fn get_org_request_settings(&self, _ctx: &RequestContext) -> AppResult<OrgRequestSettings> {
        self.enter("get_org_request_settings").await?;
        Ok(self.org_settings.lock().await.clone())
    }

    async fn patch_org_request_settings(
        &self,
        _ctx: &RequestContext,
        patch: &OrgRequestSettingsPatch,
    ) -> AppResult<OrgRequestSettings> {
        self.enter("patch_org_request_settings").await?;
        let mut settings = self.org_settings.lock().await;
        settings.subprocessors_acknowledged = patch.subprocessors_acknowledged;
        Ok(settings.clone())
    }

    async fn get_resource_request_settings(
        &self,
        _ctx: &RequestContext,
        resource_id: &str,
    ) -> AppResult<ResourceRequestSettings> {
        self.enter("get_resource_request_settings").await?;
        self.resource_settings
            .lock()
            .await
            .get(resource_id)
            .cloned()
            .ok_or_else(|| missing("resource request settings", resource_id))
    }

    async fn patch_resource_request_settings(
        &self,
        _ctx: &RequestContext,
        resource_id: &str,
        patch: &ResourceRequestSettingsPatch,
    ) -> AppResult<ResourceRequestSettings> {
        self.enter("patch_resource_request_settings").await?;
        let mut all = self.resource_settings.lock().await;
        let settings = all
            .get_mut(resource_id)
            .ok_or_else(|| missing("resource request settings", resource_id))?;
        if patch.request_on_behalf_of_settings.is_some() {
            settings.request_on_behalf_of_settings = patch.request_on_behalf_of_settings.clone();
        }
        if patch.risk_settings.is_some() {
            settings.risk_settings = patch.risk_settings.clone();
        }
        Ok(settings.clone())
    }
}

#[async_trait]
impl RequestsApi for FakeGovernanceApi {
    async fn create_request(
        &self,
        _ctx: &RequestContext,
        request: &RequestV2Create,
    ) -> AppResult<RequestV2> {
        self.enter("create_request").await?;
        let id = self.next_id("req").await;
        let created = RequestV2 {
            id: id.clone(),
            requested: Some(request.requested.clone()),
            requester: Some(oig_domain::ExternalRef {
                external_id: ACTOR_ID.to_owned(),
                kind: "OKTA_USER".to_owned(),
            }),
            requested_for: Some(request.requested_for.clone()),
            status: Some("PENDING".to_owned()),
            requester_field_values: request.requester_field_values.clone(),
            audit: audit(),
            links: self_links(&format!("requests/{id}")),
        };
        self.requests.lock().await.insert(id, created.clone());
        Ok(created)
    }

    async fn get_request(&self, _ctx: &RequestContext, request_id: &str) -> AppResult<RequestV2> {
        self.enter("get_request").await?;
        self.requests
            .lock()
            .await
            .get(request_id)
            .cloned()
            .ok_or_else(|| missing("request", request_id))
    }

    async fn list_requests(&self, _ctx: &RequestContext, query: &ListQuery) -> AppResult<Page<RequestV2>> {
        self.enter_list("list_requests", query).await?;
        let items: Vec<RequestV2> = self.requests.lock().await.values().cloned().collect();
        Ok(paginate(&items, query, "requests"))
    }
}

impl FakeGovernanceApi {
    async fn set_request_type_status(&self, id: &str, status: &str) -> AppResult<RequestType> {
        let mut types = self.request_types.lock().await;
        let request_type = types.get_mut(id).ok_or_else(|| missing("request type", id))?;
        request_type.status = Some(status.to_owned());
        Ok(request_type.clone())
    }
}

#[async_trait]
impl RequestTypesApi for FakeGovernanceApi {
    async fn create_request_type(
        &self,
        _ctx: &RequestContext,
        request: &RequestTypeCreate,
    ) -> AppResult<RequestType> {
        self.enter("create_request_type").await?;
        let id = self.next_id("rty").await;
        let created = RequestType {
            id: id.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            owner_id: Some(request.owner_id.clone()),
            status: Some("PENDING".to_owned()),
            resource_settings: Some(request.resource_settings.clone()),
            requester_settings: request.requester_settings.clone(),
            approval_settings: request.approval_settings.clone(),
            audit: audit(),
            links: self_links(&format!("request-types/{id}")),
        };
        self.request_types.lock().await.insert(id, created.clone());
        Ok(created)
    }

    async fn get_request_type(&self, _ctx: &RequestContext, request_type_id: &str) -> AppResult<RequestType> {
        self.enter("get_request_type").await?;
        self.request_types
            .lock()
            .await
            .get(request_type_id)
            .cloned()
            .ok_or_else(|| missing("request type", request_type_id))
    }

    async fn delete_request_type(&self, _ctx: &RequestContext, request_type_id: &str) -> AppResult<()> {
        self.enter("delete_request_type").await?;
        self.request_types
            .lock()
            .await
            .remove(request_type_id)
            .map(|_| ())
            .ok_or_else(|| missing("request type", request_type_id))
    }

    async fn list_request_types(
        &self,
        _ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<RequestType>> {
        self.enter_list("list_request_types", query).await?;
        let items: Vec<RequestType> = self.request_types.lock().await.values().cloned().collect();
        Ok(paginate(&items, query, "request-types"))
    }

    async fn publish_request_type(
        &self,
        _ctx: &RequestContext,
        request_type_id: &str,
    ) -> AppResult<RequestType> {
        self.enter("publish_request_type").await?;
        self.set_request_type_status(request_type_id, "ACTIVE").await
    }

    async fn unpublish_request_type(
        &self,
        _ctx: &RequestContext,
        request_type_id: &str,
    ) -> AppResult<RequestType> {
        self.enter("unpublish_request_type").await?;
        self.set_request_type_status(request_type_id, "PENDING").await
    }
}

#[async_trait]
impl MyRequestsApi for FakeGovernanceApi {
    async fn create_my_request(
        &self,
        _ctx: &RequestContext,
        entry_id: &str,
        request: &MyRequestCreate,
    ) -> AppResult<MyRequest> {
        self.enter("create_my_request").await?;
        let id = self.next_id("reqm").await;
        let created = MyRequest {
            id: id.clone(),
            requested: Some(oig_domain::RequestedItem {
                entry_id: Some(entry_id.to_owned()),
                ..oig_domain::RequestedItem::default()
            }),
            status: Some("SUBMITTED".to_owned()),
            grant_status: Some("PENDING".to_owned()),
            requester_field_values: request.requester_field_values.clone(),
            risk_assessment: None,
            audit: audit(),
            links: self_links(&format!("my/catalogs/default/entries/{entry_id}/requests/{id}")),
        };
        self.my_requests
            .lock()
            .await
            .insert((entry_id.to_owned(), id), created.clone());
        Ok(created)
    }

    async fn get_my_request(
        &self,
        _ctx: &RequestContext,
        entry_id: &str,
        request_id: &str,
    ) -> AppResult<MyRequest> {
        self.enter("get_my_request").await?;
        self.my_requests
            .lock()
            .await
            .get(&(entry_id.to_owned(), request_id.to_owned()))
            .cloned()
            .ok_or_else(|| missing("request", request_id))
    }
}

impl FakeGovernanceApi {
    async fn catalog_entry(&self, entry_id: &str) -> AppResult<CatalogEntry> {
        self.catalog
            .lock()
            .await
            .iter()
            .find(|entry| entry.id == entry_id)
            .cloned()
            .ok_or_else(|| missing("catalog entry", entry_id))
    }
}

#[async_trait]
impl CatalogsApi for FakeGovernanceApi {
    async fn get_catalog_entry(&self, _ctx: &RequestContext, entry_id: &str) -> AppResult<CatalogEntry> {
        self.enter("get_catalog_entry").await?;
        self.catalog_entry(entry_id).await
    }

    async fn list_catalog_entries(
        &self,
        _ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<CatalogEntry>> {
        self.enter_list("list_catalog_entries", query).await?;
        let items = self.catalog.lock().await.clone();
        Ok(paginate(&items, query, "catalogs/default/entries"))
    }

    async fn get_entry_request_fields(
        &self,
        _ctx: &RequestContext,
        entry_id: &str,
        _user_id: &str,
    ) -> AppResult<RequestFieldSet> {
        self.enter("get_entry_request_fields").await?;
        self.catalog_entry(entry_id).await?;
        Ok(self.request_fields.lock().await.clone())
    }

    async fn list_user_catalog_entries(
        &self,
        _ctx: &RequestContext,
        user_id: &str,
        query: &ListQuery,
    ) -> AppResult<Page<CatalogEntry>> {
        self.enter_list("list_user_catalog_entries", query).await?;
        let items = self.catalog.lock().await.clone();
        Ok(paginate(
            &items,
            query,
            &format!("catalogs/default/user/{user_id}/entries"),
        ))
    }
}

#[async_trait]
impl MyCatalogsApi for FakeGovernanceApi {
    async fn get_my_catalog_entry(&self, _ctx: &RequestContext, entry_id: &str) -> AppResult<CatalogEntry> {
        self.enter("get_my_catalog_entry").await?;
        self.catalog_entry(entry_id).await
    }

    async fn list_my_catalog_entries(
        &self,
        _ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<CatalogEntry>> {
        self.enter_list("list_my_catalog_entries", query).await?;
        let items = self.catalog.lock().await.clone();
        Ok(paginate(&items, query, "my/catalogs/default/entries"))
    }

    async fn get_my_catalog_entry_request_fields(
        &self,
        _ctx: &RequestContext,
        entry_id: &str,
    ) -> AppResult<RequestFieldSet> {
        self.enter("get_my_catalog_entry_request_fields").await?;
        self.catalog_entry(entry_id).await?;
        Ok(self.request_fields.lock().await.clone())
    }
}
