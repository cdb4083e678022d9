use std::time::Duration;

use oig_application::governance_ports::{
    CampaignsApi, CollectionsApi, EntitlementsApi, GrantsApi, PrincipalAccessApi,
    RequestTypesApi,
};
use oig_application::pagination::collect_all;
use oig_core::{AppError, RequestContext};
use oig_domain::{
    CollectionAssignmentRequest, ExternalRef, GrantPatch, GrantSchedulePatch, ListQuery,
    PrincipalAccessQuery,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{Credentials, HttpGovernanceClient, HttpGovernanceConfig};

fn config(server: &MockServer, credentials: Credentials) -> HttpGovernanceConfig {
    HttpGovernanceConfig {
        org_url: Url::parse(&server.uri()).unwrap_or_else(|_| unreachable!()),
        credentials,
        timeout: Duration::from_secs(5),
        page_limit: 50,
    }
}

fn client(server: &MockServer) -> HttpGovernanceClient {
    HttpGovernanceClient::new(config(server, Credentials::ApiToken("test-token".to_owned())))
        .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn get_sends_ssws_credentials_and_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/governance/api/v1/campaigns/icicampaign1"))
        .and(header("authorization", "SSWS test-token"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "icicampaign1",
            "name": "Quarterly review",
            "status": "READY",
            "created": "2025-01-02T03:04:05Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let campaign = client(&server)
        .get_campaign(&RequestContext::new(), "icicampaign1")
        .await;

    let campaign = campaign.unwrap_or_else(|error| panic!("{error}"));
    assert_eq!(campaign.name, "Quarterly review");
    assert_eq!(campaign.status.as_deref(), Some("READY"));
}

#[tokio::test]
async fn access_tokens_use_the_bearer_scheme() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/governance/api/v1/entitlements/esp1"))
        .and(header("authorization", "Bearer oauth-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "esp1"})))
        .expect(1)
        .mount(&server)
        .await;
    let client = HttpGovernanceClient::new(config(
        &server,
        Credentials::AccessToken("oauth-token".to_owned()),
    ))
    .unwrap_or_else(|_| unreachable!());

    let entitlement = client.get_entitlement(&RequestContext::new(), "esp1").await;

    assert!(entitlement.is_ok(), "{entitlement:?}");
}

#[tokio::test]
async fn path_ids_are_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/governance/api/v1/entitlements/a%2Fb"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .delete_entitlement(&RequestContext::new(), "a/b")
        .await;

    assert!(result.is_ok(), "{result:?}");
}

#[tokio::test]
async fn list_sends_filter_and_default_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/governance/api/v1/entitlements"))
        .and(query_param("filter", r#"name co "admin""#))
        .and(query_param("limit", "50"))
        .and(query_param_is_missing("after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .list_entitlements(&RequestContext::new(), &ListQuery::filtered(r#"name co "admin""#))
        .await;

    let page = page.unwrap_or_else(|error| panic!("{error}"));
    assert!(page.data.is_empty());
    assert_eq!(page.next_href(), None);
}

#[tokio::test]
async fn explicit_limit_wins_over_the_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/governance/api/v1/request-types"))
        .and(query_param("limit", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;
    let query = ListQuery {
        limit: Some(7),
        ..ListQuery::default()
    };

    let page = client(&server)
        .list_request_types(&RequestContext::new(), &query)
        .await;

    assert!(page.is_ok(), "{page:?}");
}

#[tokio::test]
async fn listing_follows_absolute_next_links() {
    let server = MockServer::start().await;
    let next = format!("{}/governance/api/v1/campaigns?after=cursor%3D2&limit=50", server.uri());
    Mock::given(method("GET"))
        .and(path("/governance/api/v1/campaigns"))
        .and(query_param_is_missing("after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "c1"}, {"id": "c2"}],
            "_links": {"next": {"href": next}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/governance/api/v1/campaigns"))
        .and(query_param("after", "cursor=2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "c3"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client(&server);
    let ctx = RequestContext::new();

    let campaigns = collect_all(&ctx, &ListQuery::default(), |query| {
        let client = &client;
        let ctx = &ctx;
        async move { client.list_campaigns(ctx, &query).await }
    })
    .await;

    let ids: Vec<String> = campaigns
        .unwrap_or_else(|error| panic!("{error}"))
        .into_iter()
        .map(|campaign| campaign.id)
        .collect();
    assert_eq!(ids, vec!["c1", "c2", "c3"]);
}

#[tokio::test]
async fn okta_error_bodies_become_categorised_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/governance/api/v1/campaigns/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errorCode": "E0000007",
            "errorSummary": "Not found: Resource not found: missing (Campaign)",
            "errorCauses": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/governance/api/v1/campaigns"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorCode": "E0000001",
            "errorSummary": "Api validation failed",
            "errorCauses": [{"errorSummary": "scheduleSettings.startDate: must be in the future"}]
        })))
        .mount(&server)
        .await;
    let client = client(&server);
    let ctx = RequestContext::new();

    let missing = client.get_campaign(&ctx, "missing").await;
    let invalid = client
        .create_campaign(&ctx, &oig_domain::CampaignRequest::default())
        .await;

    match missing {
        Err(AppError::NotFound(message)) => {
            assert_eq!(
                message,
                "E0000007: Not found: Resource not found: missing (Campaign)"
            );
        }
        other => panic!("unexpected result: {other:?}"),
    }
    match invalid {
        Err(AppError::Remote { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("must be in the future"), "{message}");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/governance/api/v1/campaigns/icicampaign1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client(&server)
        .get_campaign(&RequestContext::new(), "icicampaign1")
        .await;

    assert!(matches!(result, Err(AppError::Decode(_))), "{result:?}");
}

#[tokio::test]
async fn grant_patch_targets_the_grant_and_sends_explicit_nulls() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/governance/api/v1/grants/gra1"))
        .and(body_json(json!({
            "id": "gra1",
            "scheduleSettings": {"expirationDate": null, "timeZone": null}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "gra1",
            "grantType": "ENTITLEMENT-BUNDLE",
            "entitlementBundleId": "enb1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let patch = GrantPatch {
        id: "gra1".to_owned(),
        schedule_settings: GrantSchedulePatch::default(),
    };

    let grant = client(&server).patch_grant(&RequestContext::new(), &patch).await;

    let grant = grant.unwrap_or_else(|error| panic!("{error}"));
    assert_eq!(grant.id(), "gra1");
}

#[tokio::test]
async fn principal_access_is_looked_up_by_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/governance/api/v1/principal-access"))
        .and(query_param(
            "filter",
            r#"targetPrincipalOrn eq "orn:okta:directory:00o1:users:00u1" AND parentResourceOrn eq "orn:okta:idp:00o1:apps:app:0oa1""#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    let query = PrincipalAccessQuery {
        target_principal_orn: "orn:okta:directory:00o1:users:00u1".to_owned(),
        parent_resource_orn: "orn:okta:idp:00o1:apps:app:0oa1".to_owned(),
    };

    let access = client(&server)
        .get_principal_access(&RequestContext::new(), &query)
        .await;

    assert!(access.is_ok(), "{access:?}");
}

#[tokio::test]
async fn assignment_batches_decode_bare_and_wrapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/governance/api/v1/collections/col1/assignments"))
        .and(body_json(json!([
            {"principal": {"externalId": "00u1", "type": "OKTA_USER"}}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "cas1"}])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/governance/api/v1/collections/col2/assignments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "cas2"}]})),
        )
        .mount(&server)
        .await;
    let client = client(&server);
    let ctx = RequestContext::new();
    let requests = vec![CollectionAssignmentRequest {
        principal: ExternalRef {
            external_id: "00u1".to_owned(),
            kind: "OKTA_USER".to_owned(),
        },
        ..CollectionAssignmentRequest::default()
    }];

    let bare = client.create_collection_assignments(&ctx, "col1", &requests).await;
    let wrapped = client.create_collection_assignments(&ctx, "col2", &requests).await;

    let ids = |result: Result<Vec<oig_domain::CollectionAssignment>, AppError>| -> Vec<String> {
        result
            .unwrap_or_else(|error| panic!("{error}"))
            .into_iter()
            .map(|assignment| assignment.id)
            .collect()
    };
    assert_eq!(ids(bare), vec!["cas1"]);
    assert_eq!(ids(wrapped), vec!["cas2"]);
}

#[tokio::test]
async fn cancelled_context_sends_nothing() {
    let server = MockServer::start().await;
    let token = CancellationToken::new();
    token.cancel();

    let result = client(&server)
        .launch_campaign(&RequestContext::with_cancellation(token), "icicampaign1")
        .await;

    assert!(matches!(result, Err(AppError::Cancelled)), "{result:?}");
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test]
async fn cancellation_interrupts_an_in_flight_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/governance/api/v1/campaigns/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "slow"}))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let result = client(&server)
        .get_campaign(&RequestContext::with_cancellation(token), "slow")
        .await;

    assert!(matches!(result, Err(AppError::Cancelled)), "{result:?}");
}

#[test]
fn zero_page_limit_is_rejected() {
    let result = HttpGovernanceClient::new(HttpGovernanceConfig {
        org_url: Url::parse("https://example.okta.com").unwrap_or_else(|_| unreachable!()),
        credentials: Credentials::ApiToken("token".to_owned()),
        timeout: Duration::from_secs(1),
        page_limit: 0,
    });

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[test]
fn credentials_never_print_their_secret() {
    let printed = format!("{:?}", Credentials::ApiToken("super-secret".to_owned()));

    assert!(!printed.contains("super-secret"));
}
