use oig_core::{Attr, AttributePath, Diagnostics, HostType, HostValue, RequestContext};

use crate::provider::{ResourceAdapter, ResourceHandler};
use crate::testing::FakeGovernanceApi;

use super::{
    ApprovalModel, ApprovalSettingsModel, RequestTypeModel, RequestTypeResource, RequesterModel,
    TargetSettingsModel, build_request, validate_request_type,
};

fn plan(status: &str) -> RequestTypeModel {
    RequestTypeModel {
        id: Attr::Unknown,
        name: Attr::known("Finance apps".to_owned()),
        owner_id: Attr::known("0oateam".to_owned()),
        status: Attr::known(status.to_owned()),
        resource_settings: Attr::known(TargetSettingsModel {
            kind: Attr::known("GROUPS".to_owned()),
            target_resource_ids: Attr::known(vec!["00gledger".to_owned()]),
        }),
        requester_settings: Attr::known(RequesterModel {
            kind: Attr::known("GROUPS".to_owned()),
            ids: Attr::known(vec!["00gfinance".to_owned()]),
        }),
        approval_settings: Attr::known(ApprovalSettingsModel {
            kind: Attr::known("SERIAL".to_owned()),
            approvals: Attr::known(vec![ApprovalModel {
                approver_type: Attr::known("MANAGER".to_owned()),
                approver_user_id: Attr::Null,
                approver_member_of: Attr::Null,
            }]),
        }),
        links: Attr::Unknown,
        created: Attr::Unknown,
        created_by: Attr::Unknown,
        last_updated: Attr::Unknown,
        last_updated_by: Attr::Unknown,
        ..RequestTypeModel::default()
    }
}

fn handler(api: &std::sync::Arc<FakeGovernanceApi>) -> ResourceAdapter<RequestTypeResource> {
    ResourceAdapter::new(RequestTypeResource::new(FakeGovernanceApi::client(api)))
}

fn decoded(state: &HostValue) -> RequestTypeModel {
    RequestTypeModel::from_host(state, &AttributePath::root()).unwrap_or_else(|_| unreachable!())
}

fn status_of(state: Option<&HostValue>) -> Option<String> {
    state
        .and_then(|state| state.get("status"))
        .and_then(HostValue::as_str)
        .map(str::to_owned)
}

#[tokio::test]
async fn active_request_types_are_published_after_create() {
    let api = FakeGovernanceApi::shared();
    let response = handler(&api)
        .create(&RequestContext::new(), &plan("ACTIVE").to_host())
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    assert_eq!(status_of(response.state.as_ref()).as_deref(), Some("ACTIVE"));
    assert_eq!(
        api.call_log().await,
        vec!["create_request_type", "publish_request_type"]
    );
}

#[tokio::test]
async fn status_change_unpublishes() {
    let api = FakeGovernanceApi::shared();
    let handler = handler(&api);
    let ctx = RequestContext::new();
    let published = handler
        .create(&ctx, &plan("ACTIVE").to_host())
        .await
        .state
        .unwrap_or(HostValue::Null);

    let pending = RequestTypeModel {
        status: Attr::known("PENDING".to_owned()),
        ..decoded(&published)
    };
    let response = handler.update(&ctx, &pending.to_host(), &published).await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    assert_eq!(status_of(response.state.as_ref()).as_deref(), Some("PENDING"));
    assert_eq!(api.count("unpublish_request_type").await, 1);
}

#[tokio::test]
async fn renaming_is_refused() {
    let api = FakeGovernanceApi::shared();
    let handler = handler(&api);
    let ctx = RequestContext::new();
    let state = handler
        .create(&ctx, &plan("PENDING").to_host())
        .await
        .state
        .unwrap_or(HostValue::Null);

    let renamed = RequestTypeModel {
        name: Attr::known("Finance and tax apps".to_owned()),
        ..decoded(&state)
    };
    let response = handler.update(&ctx, &renamed.to_host(), &state).await;

    let summaries: Vec<&str> = response
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.summary.as_str())
        .collect();
    assert_eq!(summaries, vec!["Unsupported change to Request Type"]);
    assert_eq!(response.state, Some(state));
    assert_eq!(api.call_log().await, vec!["create_request_type"]);
}

#[test]
fn approvers_need_the_fields_of_their_type() {
    let mut diagnostics = Diagnostics::new();
    let config = RequestTypeModel {
        approval_settings: Attr::known(ApprovalSettingsModel {
            kind: Attr::known("SERIAL".to_owned()),
            approvals: Attr::known(vec![
                ApprovalModel {
                    approver_type: Attr::known("USER".to_owned()),
                    approver_user_id: Attr::Null,
                    approver_member_of: Attr::Null,
                },
                ApprovalModel {
                    approver_type: Attr::known("MEMBER_OF".to_owned()),
                    approver_user_id: Attr::Null,
                    approver_member_of: Attr::Null,
                },
            ]),
        }),
        ..plan("ACTIVE")
    };

    validate_request_type(&config, &mut diagnostics);

    let paths: Vec<String> = diagnostics
        .iter()
        .filter_map(|diagnostic| diagnostic.path.as_ref().map(ToString::to_string))
        .collect();
    assert_eq!(
        paths,
        vec![
            "approval_settings.approvals[0].approver_user_id".to_owned(),
            "approval_settings.approvals[1].approver_member_of".to_owned(),
        ]
    );
}

#[test]
fn missing_resource_settings_and_group_ids_are_reported() {
    let mut diagnostics = Diagnostics::new();
    let config = RequestTypeModel {
        resource_settings: Attr::Null,
        requester_settings: Attr::known(RequesterModel {
            kind: Attr::known("GROUPS".to_owned()),
            ids: Attr::Null,
        }),
        ..plan("PENDING")
    };

    validate_request_type(&config, &mut diagnostics);

    let paths: Vec<String> = diagnostics
        .iter()
        .filter_map(|diagnostic| diagnostic.path.as_ref().map(ToString::to_string))
        .collect();
    assert_eq!(
        paths,
        vec!["resource_settings".to_owned(), "requester_settings.ids".to_owned()]
    );
}

#[test]
fn create_body_wraps_ids_in_references() {
    let request = build_request(&plan("ACTIVE")).unwrap_or_else(|_| unreachable!());

    assert_eq!(request.resource_settings.target_resources.len(), 1);
    assert_eq!(request.resource_settings.target_resources[0].resource_id, "00gledger");
    assert_eq!(
        request
            .requester_settings
            .map(|requester| requester.ids.into_iter().map(|id| id.id).collect::<Vec<_>>()),
        Some(vec!["00gfinance".to_owned()])
    );
    assert_eq!(
        request.approval_settings.map(|approval| approval.approvals.len()),
        Some(1)
    );
}

#[tokio::test]
async fn failed_publish_keeps_the_created_request_type_in_state() {
    let api = FakeGovernanceApi::shared();
    let handler = handler(&api);
    let ctx = RequestContext::new();
    api.fail("publish_request_type", 500).await;

    let response = handler.create(&ctx, &plan("ACTIVE").to_host()).await;

    let summaries: Vec<&str> = response
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.summary.as_str())
        .collect();
    assert_eq!(summaries, vec!["Error publishing Request Type"]);
    let state = response.state.unwrap_or(HostValue::Null);
    assert_eq!(decoded(&state).id.as_deref(), Some("rty0001"));
    assert_eq!(status_of(Some(&state)).as_deref(), Some("PENDING"));

    api.recover("publish_request_type").await;
    let activating = RequestTypeModel {
        status: Attr::known("ACTIVE".to_owned()),
        ..decoded(&state)
    };
    let retried = handler.update(&ctx, &activating.to_host(), &state).await;

    assert!(retried.diagnostics.is_empty(), "{:?}", retried.diagnostics);
    assert_eq!(status_of(retried.state.as_ref()).as_deref(), Some("ACTIVE"));
    assert_eq!(api.count("create_request_type").await, 1);
}
