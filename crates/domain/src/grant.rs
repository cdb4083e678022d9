use std::str::FromStr;

use oig_core::AppError;
use serde::{Deserialize, Serialize};

use crate::{AuditMetadata, EntitlementSelection, ExternalRef, Links};

/// Kind of permission a grant assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantType {
    /// Hand-picked entitlements.
    Custom,
    /// A named bundle of entitlements.
    EntitlementBundle,
    /// A policy reference.
    Policy,
}

impl GrantType {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Custom => "CUSTOM",
            Self::EntitlementBundle => "ENTITLEMENT-BUNDLE",
            Self::Policy => "POLICY",
        }
    }

    /// Every accepted wire value.
    pub const VALUES: &'static [&'static str] = &["CUSTOM", "ENTITLEMENT-BUNDLE", "POLICY"];
}

impl FromStr for GrantType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CUSTOM" => Ok(Self::Custom),
            "ENTITLEMENT-BUNDLE" => Ok(Self::EntitlementBundle),
            "POLICY" => Ok(Self::Policy),
            _ => Err(AppError::Validation(format!("unknown grant type '{value}'"))),
        }
    }
}

/// Allowed grant actions.
pub const GRANT_ACTIONS: &[&str] = &["ALLOW", "DENY"];
/// Allowed target principal types.
pub const GRANT_PRINCIPAL_TYPES: &[&str] = &["OKTA_USER"];
/// Allowed target resource types.
pub const GRANT_TARGET_TYPES: &[&str] = &["APPLICATION"];

/// Expiration schedule of a grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantSchedule {
    /// Expiration instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    /// IANA time zone of the expiration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Body of a create-grant call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRequest {
    /// Grant type wire value.
    pub grant_type: String,
    /// Principal receiving access.
    pub target_principal: ExternalRef,
    /// Resource the access applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<ExternalRef>,
    /// Bundle, `ENTITLEMENT-BUNDLE` grants only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entitlement_bundle_id: Option<String>,
    /// Entitlements, `CUSTOM` grants only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entitlements: Option<Vec<EntitlementSelection>>,
    /// `ALLOW` or `DENY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Source of the grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// Expiration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_settings: Option<GrantSchedule>,
}

/// Grant fields common to every response shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantFull {
    /// Server-assigned id.
    pub id: String,
    /// Grant type wire value.
    #[serde(default)]
    pub grant_type: String,
    /// Principal receiving access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_principal: Option<ExternalRef>,
    /// ORN of the principal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_principal_orn: Option<String>,
    /// Resource the access applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<ExternalRef>,
    /// ORN of the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_resource_orn: Option<String>,
    /// Bundle id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entitlement_bundle_id: Option<String>,
    /// `ALLOW` or `DENY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Source of the grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// `ACTIVE`, `SCHEDULED`, or `EXPIRED`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Expiration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_settings: Option<GrantSchedule>,
    /// Server audit fields.
    #[serde(flatten)]
    pub audit: AuditMetadata,
    /// Hypermedia links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Grant response that lists its entitlements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantFullWithEntitlements {
    /// Common fields.
    #[serde(flatten)]
    pub grant: GrantFull,
    /// Granted entitlements.
    pub entitlements: Vec<EntitlementSelection>,
}

/// Either grant response shape; exactly one is returned per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrantResponse {
    /// Response carrying `entitlements`.
    WithEntitlements(GrantFullWithEntitlements),
    /// Response without entitlements.
    Full(GrantFull),
}

impl GrantResponse {
    /// Returns the common projection.
    #[must_use]
    pub fn grant(&self) -> &GrantFull {
        match self {
            Self::WithEntitlements(response) => &response.grant,
            Self::Full(grant) => grant,
        }
    }

    /// Returns granted entitlements; empty for the plain shape.
    #[must_use]
    pub fn entitlements(&self) -> &[EntitlementSelection] {
        match self {
            Self::WithEntitlements(response) => &response.entitlements,
            Self::Full(_) => &[],
        }
    }

    /// Returns the server id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.grant().id.as_str()
    }
}

/// Body of a grant patch; both fields are always sent so null clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantPatch {
    /// Grant id.
    pub id: String,
    /// New schedule.
    pub schedule_settings: GrantSchedulePatch,
}

/// Schedule fields of a grant patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantSchedulePatch {
    /// New expiration; `null` removes it.
    pub expiration_date: Option<String>,
    /// New time zone; `null` removes it.
    pub time_zone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{GrantPatch, GrantResponse, GrantSchedulePatch};

    #[test]
    fn response_dispatches_on_entitlements_presence() {
        let bundle: Result<GrantResponse, _> = serde_json::from_str(
            r#"{"id":"gra1","grantType":"ENTITLEMENT-BUNDLE","entitlementBundleId":"enb1","targetPrincipal":{"externalId":"00u1","type":"OKTA_USER"}}"#,
        );
        let bundle = bundle.unwrap_or_else(|error| panic!("{error}"));
        assert!(matches!(bundle, GrantResponse::Full(_)));
        assert_eq!(bundle.grant().entitlement_bundle_id.as_deref(), Some("enb1"));
        assert!(bundle.entitlements().is_empty());

        let custom: Result<GrantResponse, _> = serde_json::from_str(
            r#"{"id":"gra2","grantType":"CUSTOM","entitlements":[{"id":"esp1","values":[{"id":"ent1"}]}]}"#,
        );
        let custom = custom.unwrap_or_else(|error| panic!("{error}"));
        assert!(matches!(custom, GrantResponse::WithEntitlements(_)));
        assert_eq!(custom.id(), "gra2");
        assert_eq!(custom.entitlements()[0].values[0].id, "ent1");
    }

    #[test]
    fn patch_sends_explicit_nulls() {
        let patch = GrantPatch {
            id: "gra1".to_owned(),
            schedule_settings: GrantSchedulePatch::default(),
        };
        let json = serde_json::to_value(&patch).unwrap_or_default();
        assert_eq!(
            json,
            serde_json::json!({"id": "gra1", "scheduleSettings": {"expirationDate": null, "timeZone": null}})
        );
    }
}
