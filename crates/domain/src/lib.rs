//! Governance REST payload models, filter expressions, and shared validators.

#![forbid(unsafe_code)]

mod campaign;
mod catalog;
mod collection;
mod common;
mod entitlement;
mod filter;
mod grant;
mod principal;
mod request;
mod request_condition;
mod request_sequence;
mod request_settings;
mod review;
mod risk_rule;
/// Structural validators.
pub mod validation;

pub use campaign::{
    AutoRemediationSettings, CAMPAIGN_TYPES, Campaign, CampaignRequest, CampaignStatus,
    CampaignType, INACTIVE_DAYS_RANGE, MAX_EXCLUDED_USER_IDS, MAX_REVIEWER_LEVELS,
    MAX_SCOPE_GROUP_IDS, MAX_SCOPE_USER_IDS, MAX_START_REVIEW, NotificationSettings,
    PredefinedInactiveUsersScope, PrincipalScopeSettings, REMEDIATION_ACTIONS, REPEAT_ON_TYPES,
    RESOURCE_SETTINGS_TYPES, REVIEWER_TYPES, Recurrence, RemediationSettings, ResourceSettings,
    ReviewerLevel, ReviewerSettings, SCHEDULE_TYPES, START_REVIEW_WHEN, ScheduleSettings,
    StartReview, TARGET_RESOURCE_TYPES, TargetEntitlement, TargetResource,
};
pub use catalog::{CatalogEntry, RequestField, RequestFieldChoice, RequestFieldSet};
pub use collection::{
    ASSIGNMENT_PRINCIPAL_TYPES, Collection, CollectionAssignment, CollectionAssignmentRequest,
    CollectionRequest, CollectionResource, PatchOperation,
};
pub use common::{
    Actor, AuditMetadata, EntitlementSelection, ExternalRef, IdRef, Link, Links, ListQuery, Page,
    ResourceRef, format_timestamp, format_timestamp_millis, parse_timestamp,
};
pub use entitlement::{
    BUNDLE_STATUSES, ENTITLEMENT_DATA_TYPES, ENTITLEMENT_PARENT_TYPES, Entitlement,
    EntitlementBundle, EntitlementBundleRequest, EntitlementRequest, EntitlementValue,
};
pub use filter::{FilterBuilder, FilterExpression, FilterOperator, most_specific, quote_literal};
pub use grant::{
    GRANT_ACTIONS, GRANT_PRINCIPAL_TYPES, GRANT_TARGET_TYPES, GrantFull,
    GrantFullWithEntitlements, GrantPatch, GrantRequest, GrantResponse, GrantSchedule,
    GrantSchedulePatch, GrantType,
};
pub use principal::{AccessGrant, AccessItem, PrincipalAccess, PrincipalAccessQuery, PrincipalEntitlement};
pub use request::{
    APPROVAL_TYPES, APPROVER_TYPES, Approval, ApprovalSettings, MatchedRiskRule, MyRequest,
    MyRequestCreate, REQUEST_TYPE_STATUSES, RequestType, RequestTypeCreate,
    RequestTypeRequesterSettings, RequestTypeResourceSettings, RequestTypeTarget, RequestV2,
    RequestV2Create, RequestedItem, RequesterFieldValue, RiskAssessment,
};
pub use request_condition::{
    ACCESS_DURATION_TYPES, ACCESS_SCOPE_TYPES, AccessDurationSettings, REQUEST_CONDITION_STATUSES,
    REQUESTER_TYPES, RequestCondition, RequestConditionRequest, ScopeSettings,
};
pub use request_sequence::{COMPATIBLE_RESOURCE_TYPES, RequestSequence, RequestSequenceRequest};
pub use request_settings::{
    AccessDurationLimits, OrgRequestSettings, OrgRequestSettingsPatch, RequestOnBehalfOfSettings,
    RISK_SUBMISSION_TYPES, ResourceRequestSettings, ResourceRequestSettingsPatch,
    RiskDefaultSetting, RiskSettings, TypedSetting,
};
pub use review::{
    REVIEW_DECISIONS, Review, ReviewDecision, ReviewLevel, ReviewNote, ReviewProfile,
    ReviewedItem,
};
pub use risk_rule::{
    ConflictCriteria, ConflictCriterion, CriterionEntitlement, CriterionValue, RISK_RULE_TYPES,
    RiskRule, RiskRuleRequest, RiskRuleResource,
};
