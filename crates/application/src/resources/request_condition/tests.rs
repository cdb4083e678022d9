use oig_core::{Attr, AttributePath, Diagnostics, HostType, HostValue, RequestContext};

use crate::provider::{ResourceAdapter, ResourceHandler};
use crate::testing::FakeGovernanceApi;

use super::{
    AccessDurationModel, RequestConditionModel, RequestConditionResource, ScopeModel, build_patch,
    validate_request_condition,
};

fn plan(status: &str) -> RequestConditionModel {
    RequestConditionModel {
        id: Attr::Unknown,
        resource_id: Attr::known("0oa1crm".to_owned()),
        name: Attr::known("Sales can request licenses".to_owned()),
        priority: Attr::Unknown,
        status: Attr::known(status.to_owned()),
        approval_sequence_id: Attr::known("rsq1".to_owned()),
        access_scope_settings: Attr::known(ScopeModel {
            kind: Attr::known("ENTITLEMENT_BUNDLES".to_owned()),
            ids: Attr::known(vec!["enb1".to_owned()]),
        }),
        requester_settings: Attr::known(ScopeModel {
            kind: Attr::known("EVERYONE".to_owned()),
            ids: Attr::Null,
        }),
        access_duration_settings: Attr::known(AccessDurationModel {
            kind: Attr::known("ADMIN_FIXED_DURATION".to_owned()),
            duration: Attr::known("P30D".to_owned()),
        }),
        ..RequestConditionModel::default()
    }
}

fn handler(api: &std::sync::Arc<FakeGovernanceApi>) -> ResourceAdapter<RequestConditionResource> {
    ResourceAdapter::new(RequestConditionResource::new(FakeGovernanceApi::client(api)))
}

fn decoded(state: &HostValue) -> RequestConditionModel {
    RequestConditionModel::from_host(state, &AttributePath::root())
        .unwrap_or_else(|_| unreachable!())
}

fn status_of(state: Option<&HostValue>) -> Option<String> {
    state
        .and_then(|state| state.get("status"))
        .and_then(HostValue::as_str)
        .map(str::to_owned)
}

#[tokio::test]
async fn active_conditions_are_activated_after_create() {
    let api = FakeGovernanceApi::shared();
    let response = handler(&api)
        .create(&RequestContext::new(), &plan("ACTIVE").to_host())
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    assert_eq!(status_of(response.state.as_ref()).as_deref(), Some("ACTIVE"));
    assert_eq!(
        api.call_log().await,
        vec!["create_request_condition", "activate_request_condition"]
    );
}

#[tokio::test]
async fn status_cycle_uses_the_dedicated_calls() {
    let api = FakeGovernanceApi::shared();
    let handler = handler(&api);
    let ctx = RequestContext::new();
    let inactive = handler
        .create(&ctx, &plan("INACTIVE").to_host())
        .await
        .state
        .unwrap_or(HostValue::Null);
    assert_eq!(status_of(Some(&inactive)).as_deref(), Some("INACTIVE"));

    let activating = RequestConditionModel {
        status: Attr::known("ACTIVE".to_owned()),
        ..decoded(&inactive)
    };
    let active = handler
        .update(&ctx, &activating.to_host(), &inactive)
        .await
        .state
        .unwrap_or(HostValue::Null);
    assert_eq!(status_of(Some(&active)).as_deref(), Some("ACTIVE"));

    let deactivating = RequestConditionModel {
        status: Attr::known("INACTIVE".to_owned()),
        ..decoded(&active)
    };
    let deactivated = handler.update(&ctx, &deactivating.to_host(), &active).await;
    assert_eq!(status_of(deactivated.state.as_ref()).as_deref(), Some("INACTIVE"));

    assert_eq!(api.count("activate_request_condition").await, 1);
    assert_eq!(api.count("deactivate_request_condition").await, 1);
    assert_eq!(api.count("patch_request_condition").await, 0);
}

#[test]
fn patch_carries_only_differing_fields() {
    let state = RequestConditionModel {
        id: Attr::known("rcd1".to_owned()),
        priority: Attr::known(0),
        ..plan("ACTIVE")
    };
    let renamed = RequestConditionModel {
        name: Attr::known("Sales and support can request licenses".to_owned()),
        priority: Attr::known(2),
        ..state.clone()
    };

    let patch = build_patch(&renamed, &state).unwrap_or_else(|_| unreachable!());

    assert_eq!(patch.name.as_deref(), Some("Sales and support can request licenses"));
    assert_eq!(patch.priority, Some(2));
    assert!(patch.access_scope_settings.is_none());
    assert!(patch.approval_sequence_id.is_none());
    assert!(build_patch(&state, &state).unwrap_or_else(|_| unreachable!()).is_empty());
}

#[test]
fn scoped_types_need_ids_and_fixed_durations_need_a_duration() {
    let mut diagnostics = Diagnostics::new();
    let config = RequestConditionModel {
        access_scope_settings: Attr::known(ScopeModel {
            kind: Attr::known("GROUPS".to_owned()),
            ids: Attr::Null,
        }),
        access_duration_settings: Attr::known(AccessDurationModel {
            kind: Attr::known("ADMIN_FIXED_DURATION".to_owned()),
            duration: Attr::Null,
        }),
        ..plan("ACTIVE")
    };

    validate_request_condition(&config, &mut diagnostics);

    let paths: Vec<String> = diagnostics
        .iter()
        .filter_map(|diagnostic| diagnostic.path.as_ref().map(ToString::to_string))
        .collect();
    assert_eq!(
        paths,
        vec![
            "access_scope_settings.ids".to_owned(),
            "access_duration_settings.duration".to_owned(),
        ]
    );
}

#[tokio::test]
async fn import_reads_the_scoped_condition() {
    let api = FakeGovernanceApi::shared();
    let handler = handler(&api);
    let ctx = RequestContext::new();
    let state = handler
        .create(&ctx, &plan("INACTIVE").to_host())
        .await
        .state
        .unwrap_or(HostValue::Null);

    let imported = handler.import("0oa1crm/rcd0001").state.unwrap_or(HostValue::Null);
    let read = handler.read(&ctx, &imported).await;

    assert_eq!(read.state, Some(state));
}

#[tokio::test]
async fn failed_activation_keeps_the_created_condition_in_state() {
    let api = FakeGovernanceApi::shared();
    let handler = handler(&api);
    let ctx = RequestContext::new();
    api.fail("activate_request_condition", 500).await;

    let response = handler.create(&ctx, &plan("ACTIVE").to_host()).await;

    let summaries: Vec<&str> = response
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.summary.as_str())
        .collect();
    assert_eq!(summaries, vec!["Error changing Request Condition status"]);
    let state = response.state.unwrap_or(HostValue::Null);
    assert_eq!(decoded(&state).id.as_deref(), Some("rcd0001"));
    assert_eq!(status_of(Some(&state)).as_deref(), Some("INACTIVE"));
    assert_eq!(api.request_conditions.lock().await.len(), 1);

    api.recover("activate_request_condition").await;
    let activating = RequestConditionModel {
        status: Attr::known("ACTIVE".to_owned()),
        ..decoded(&state)
    };
    let retried = handler.update(&ctx, &activating.to_host(), &state).await;

    assert!(retried.diagnostics.is_empty(), "{:?}", retried.diagnostics);
    assert_eq!(status_of(retried.state.as_ref()).as_deref(), Some("ACTIVE"));
    assert_eq!(api.count("create_request_condition").await, 1);
}

#[tokio::test]
async fn failed_patch_keeps_the_prior_state() {
    let api = FakeGovernanceApi::shared();
    let handler = handler(&api);
    let ctx = RequestContext::new();
    let state = handler
        .create(&ctx, &plan("INACTIVE").to_host())
        .await
        .state
        .unwrap_or(HostValue::Null);
    api.fail("patch_request_condition", 409).await;

    let renamed = RequestConditionModel {
        name: Attr::known("Support can request licenses".to_owned()),
        ..decoded(&state)
    };
    let response = handler.update(&ctx, &renamed.to_host(), &state).await;

    assert_eq!(response.diagnostics.len(), 1);
    assert!(response.diagnostics.has_errors());
    assert_eq!(response.state, Some(state));
}
