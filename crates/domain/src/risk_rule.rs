use serde::{Deserialize, Serialize};

use crate::{AuditMetadata, IdRef, Links};

/// Allowed risk rule types.
pub const RISK_RULE_TYPES: &[&str] = &["SEPARATION_OF_DUTIES"];

/// Resource a risk rule watches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRuleResource {
    /// ORN of the resource.
    pub resource_orn: String,
}

/// Value side of a conflict criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionValue {
    /// Value type, e.g. `ENTITLEMENTS`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Entitlement references.
    #[serde(default)]
    pub value: Vec<CriterionEntitlement>,
}

/// Entitlement referenced by a criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionEntitlement {
    /// Entitlement id.
    pub id: String,
    /// Selected values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<IdRef>,
}

/// One side of a separation-of-duties conflict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictCriterion {
    /// Criterion name.
    pub name: String,
    /// Attribute compared.
    pub attribute: String,
    /// Comparison, e.g. `CONTAINS_ONE`.
    pub operation: String,
    /// Compared value.
    pub value: CriterionValue,
}

/// Criteria that must all match for a conflict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictCriteria {
    /// Conjunction of criteria.
    #[serde(default)]
    pub and: Vec<ConflictCriterion>,
}

/// Separation-of-duties risk rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRule {
    /// Server-assigned id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Rule type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Watched resources.
    #[serde(default)]
    pub resources: Vec<RiskRuleResource>,
    /// Conflict definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict_criteria: Option<ConflictCriteria>,
    /// Server audit fields.
    #[serde(flatten)]
    pub audit: AuditMetadata,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Body of risk rule create and replace calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRuleRequest {
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Rule type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Watched resources.
    pub resources: Vec<RiskRuleResource>,
    /// Conflict definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict_criteria: Option<ConflictCriteria>,
}
