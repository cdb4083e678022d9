use oig_core::{Attr, HostType, HostValue, RequestContext};
use oig_domain::{AccessGrant, AccessItem, ExternalRef, PrincipalAccess, PrincipalEntitlement};

use crate::provider::{DataSourceAdapter, DataSourceHandler};
use crate::testing::{FakeGovernanceApi, self_links};

use super::{
    EntitlementsDataSource, EntitlementsModel, PrincipalAccessDataSource, PrincipalAccessModel,
    PrincipalEntitlementsDataSource, PrincipalEntitlementsModel, entitlements_filter,
    principal_entitlements_filter,
};

fn text(value: &str) -> Attr<String> {
    Attr::known(value.to_owned())
}

async fn filters(api: &FakeGovernanceApi) -> Vec<Option<String>> {
    api.queries
        .lock()
        .await
        .iter()
        .map(|query| query.filter.clone())
        .collect()
}

#[test]
fn entitlement_filter_scopes_to_the_parent_first() {
    let config = EntitlementsModel {
        parent_external_id: text("0oa1"),
        parent_type: text("APPLICATION"),
        name: text("Role"),
        ..EntitlementsModel::default()
    };

    assert_eq!(
        entitlements_filter(&config, Some(("0oa1", "APPLICATION"))),
        r#"parent.externalId eq "0oa1" AND parent.type eq "APPLICATION" AND name eq "Role""#
    );
    assert_eq!(entitlements_filter(&config, None), r#"name eq "Role""#);
    assert_eq!(entitlements_filter(&EntitlementsModel::default(), None), "");
}

#[tokio::test]
async fn half_specified_parent_is_rejected_before_listing() {
    let api = FakeGovernanceApi::shared();
    let handler = DataSourceAdapter::new(EntitlementsDataSource::new(FakeGovernanceApi::client(&api)));
    let config = EntitlementsModel {
        parent_external_id: text("0oa1"),
        ..EntitlementsModel::default()
    };

    let response = handler.read(&RequestContext::new(), &config.to_host()).await;

    assert!(response.state.is_none());
    assert!(response.diagnostics.has_errors());
    assert!(api.call_log().await.is_empty());
}

#[tokio::test]
async fn unfiltered_listing_sends_no_filter() {
    let api = FakeGovernanceApi::shared();
    let handler = DataSourceAdapter::new(EntitlementsDataSource::new(FakeGovernanceApi::client(&api)));

    let response = handler
        .read(&RequestContext::new(), &EntitlementsModel::default().to_host())
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    assert_eq!(filters(&api).await, vec![None]);
}

#[test]
fn principal_filter_prefers_the_resource_orn() {
    let config = PrincipalEntitlementsModel {
        parent_resource_orn: text("orn:okta:idp:00o1:apps:salesforce:0oa1"),
        parent_external_id: text("0oa1"),
        parent_type: text("APPLICATION"),
        target_principal_external_id: text("00ujane"),
        target_principal_type: text("OKTA_USER"),
        ..PrincipalEntitlementsModel::default()
    };

    assert_eq!(
        principal_entitlements_filter(&config),
        concat!(
            r#"parentResourceOrn eq "orn:okta:idp:00o1:apps:salesforce:0oa1" AND "#,
            r#"targetPrincipal.externalId eq "00ujane" AND targetPrincipal.type eq "OKTA_USER""#
        )
    );

    let by_parent = PrincipalEntitlementsModel {
        parent_resource_orn: Attr::Null,
        ..config
    };
    assert_eq!(
        principal_entitlements_filter(&by_parent),
        concat!(
            r#"parent.externalId eq "0oa1" AND parent.type eq "APPLICATION" AND "#,
            r#"targetPrincipal.externalId eq "00ujane" AND targetPrincipal.type eq "OKTA_USER""#
        )
    );
}

#[tokio::test]
async fn principal_entitlements_require_a_filter() {
    let api = FakeGovernanceApi::shared();
    let handler =
        DataSourceAdapter::new(PrincipalEntitlementsDataSource::new(FakeGovernanceApi::client(&api)));

    let response = handler
        .read(&RequestContext::new(), &PrincipalEntitlementsModel::default().to_host())
        .await;

    assert!(response.state.is_none());
    assert_eq!(response.diagnostics.len(), 1);
    assert!(api.call_log().await.is_empty());
}

#[tokio::test]
async fn principal_entitlements_follow_every_page() {
    let api = FakeGovernanceApi::shared();
    api.principal_entitlements.lock().await.extend((1..=3).map(|index| {
        PrincipalEntitlement {
            id: Some(format!("esp{index}")),
            name: format!("Role {index}"),
            parent: Some(ExternalRef {
                external_id: "0oa1".to_owned(),
                kind: "APPLICATION".to_owned(),
            }),
            ..PrincipalEntitlement::default()
        }
    }));
    let handler =
        DataSourceAdapter::new(PrincipalEntitlementsDataSource::new(FakeGovernanceApi::client(&api)));
    let config = PrincipalEntitlementsModel {
        target_principal_external_id: text("00ujane"),
        target_principal_type: text("OKTA_USER"),
        ..PrincipalEntitlementsModel::default()
    };

    let response = handler.read(&RequestContext::new(), &config.to_host()).await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let ids: Vec<String> = match response
        .state
        .as_ref()
        .and_then(|state| state.get("principal_entitlements"))
    {
        Some(HostValue::List(items)) => items
            .iter()
            .filter_map(|item| item.get("id").and_then(HostValue::as_str))
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    };
    assert_eq!(ids, vec!["esp1", "esp2", "esp3"]);
    assert_eq!(api.count("list_principal_entitlements").await, 2);
}

#[tokio::test]
async fn principal_access_uses_a_fixed_id() {
    let api = FakeGovernanceApi::shared();
    *api.principal_access.lock().await = Some(PrincipalAccess {
        grants: vec![AccessGrant {
            id: "0ggb1".to_owned(),
            grant_type: Some("CUSTOM".to_owned()),
            status: Some("ACTIVE".to_owned()),
        }],
        entitlements: vec![AccessItem {
            id: "esp1".to_owned(),
            name: "Admin".to_owned(),
        }],
        bundles: Vec::new(),
        expiration_time: None,
        links: self_links("principal-access"),
    });
    let handler = DataSourceAdapter::new(PrincipalAccessDataSource::new(FakeGovernanceApi::client(&api)));
    let config = PrincipalAccessModel {
        target_principal_orn: text("orn:okta:directory:00o1:users:00ujane"),
        parent_resource_orn: text("orn:okta:idp:00o1:apps:salesforce:0oa1"),
        ..PrincipalAccessModel::default()
    };

    let response = handler.read(&RequestContext::new(), &config.to_host()).await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let state = response.state.unwrap_or(HostValue::Null);
    assert_eq!(state.get("id").and_then(HostValue::as_str), Some("principal_access"));
    assert_eq!(
        state.get("target_principal_orn").and_then(HostValue::as_str),
        Some("orn:okta:directory:00o1:users:00ujane")
    );
    assert_eq!(state.get("bundles"), Some(&HostValue::Null));
    assert_eq!(state.get("expiration_time"), Some(&HostValue::Null));
    let grant_type = match state.get("grants") {
        Some(HostValue::List(grants)) => grants
            .first()
            .and_then(|grant| grant.get("grant_type"))
            .and_then(HostValue::as_str)
            .map(str::to_owned),
        _ => None,
    };
    assert_eq!(grant_type.as_deref(), Some("CUSTOM"));
}

#[tokio::test]
async fn missing_principal_access_is_an_error() {
    let api = FakeGovernanceApi::shared();
    let handler = DataSourceAdapter::new(PrincipalAccessDataSource::new(FakeGovernanceApi::client(&api)));
    let config = PrincipalAccessModel {
        target_principal_orn: text("orn:okta:directory:00o1:users:00ujane"),
        parent_resource_orn: text("orn:okta:idp:00o1:apps:salesforce:0oa1"),
        ..PrincipalAccessModel::default()
    };

    let response = handler.read(&RequestContext::new(), &config.to_host()).await;

    assert!(response.state.is_none());
    assert!(response.diagnostics.has_errors());
}
