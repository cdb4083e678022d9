use oig_core::{Attr, HostType, HostValue, RequestContext};
use oig_domain::{CatalogEntry, RequestField, RequestFieldChoice, RequestFieldSet};

use crate::provider::{DataSourceAdapter, DataSourceHandler};
use crate::testing::{FakeGovernanceApi, ORG_URL, self_links};

use super::{
    CatalogEntryDataSource, CatalogEntryModel, MyCatalogEntryDataSource,
    MyCatalogEntryRequestFieldsDataSource, MyRequestFieldsModel, UserCatalogEntriesDataSource,
    UserCatalogEntriesModel, UserRequestFieldsDataSource, UserRequestFieldsModel,
};

const ENTRY_ID: &str = "cen1043mnuxScMKl91d7";

async fn seeded() -> std::sync::Arc<FakeGovernanceApi> {
    let api = FakeGovernanceApi::shared();
    api.catalog.lock().await.extend([
        CatalogEntry {
            id: ENTRY_ID.to_owned(),
            requestable: true,
            label: "Application".to_owned(),
            description: None,
            parent: None,
            links: self_links(&format!("catalogs/default/entries/{ENTRY_ID}")),
        },
        CatalogEntry {
            id: "cen2".to_owned(),
            requestable: false,
            label: "Finance".to_owned(),
            description: Some("Finance apps".to_owned()),
            parent: Some(ENTRY_ID.to_owned()),
            links: None,
        },
        CatalogEntry {
            id: "cen3".to_owned(),
            requestable: true,
            label: "Ledger".to_owned(),
            description: None,
            parent: Some(ENTRY_ID.to_owned()),
            links: None,
        },
    ]);
    *api.request_fields.lock().await = RequestFieldSet {
        data: vec![RequestField {
            id: "justification".to_owned(),
            kind: "SELECT".to_owned(),
            label: "Why?".to_owned(),
            required: true,
            read_only: None,
            maximum_value: None,
            choices: vec![
                RequestFieldChoice {
                    choice: "Project".to_owned(),
                },
                RequestFieldChoice {
                    choice: "Audit".to_owned(),
                },
            ],
        }],
    };
    api
}

fn entry_config() -> HostValue {
    CatalogEntryModel {
        entry_id: Attr::known(ENTRY_ID.to_owned()),
        ..CatalogEntryModel::default()
    }
    .to_host()
}

#[tokio::test]
async fn default_entry_reports_label_and_links() {
    let api = seeded().await;
    let handler = DataSourceAdapter::new(CatalogEntryDataSource::new(FakeGovernanceApi::client(&api)));

    let response = handler.read(&RequestContext::new(), &entry_config()).await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let state = response.state.unwrap_or(HostValue::Null);
    assert_eq!(state.get("id").and_then(HostValue::as_str), Some(ENTRY_ID));
    assert_eq!(state.get("requestable"), Some(&HostValue::Bool(true)));
    assert_eq!(state.get("label").and_then(HostValue::as_str), Some("Application"));
    assert_eq!(state.get("description"), Some(&HostValue::Null));
    let href = state
        .get("links")
        .and_then(|links| links.get("self"))
        .and_then(|link| link.get("href"))
        .and_then(HostValue::as_str)
        .map(str::to_owned);
    assert_eq!(
        href,
        Some(format!("{ORG_URL}/governance/api/v1/catalogs/default/entries/{ENTRY_ID}"))
    );
    assert_eq!(api.call_log().await, vec!["get_catalog_entry"]);
}

#[tokio::test]
async fn end_user_entry_shares_the_admin_shape() {
    let api = seeded().await;
    let admin = DataSourceAdapter::new(CatalogEntryDataSource::new(FakeGovernanceApi::client(&api)));
    let end_user =
        DataSourceAdapter::new(MyCatalogEntryDataSource::new(FakeGovernanceApi::client(&api)));
    let ctx = RequestContext::new();

    let admin_state = admin.read(&ctx, &entry_config()).await.state;
    let end_user_state = end_user.read(&ctx, &entry_config()).await.state;

    assert!(admin_state.is_some());
    assert_eq!(admin_state, end_user_state);
    assert_eq!(
        api.call_log().await,
        vec!["get_catalog_entry", "get_my_catalog_entry"]
    );
}

#[tokio::test]
async fn unknown_entry_is_an_error() {
    let api = seeded().await;
    let handler =
        DataSourceAdapter::new(MyCatalogEntryDataSource::new(FakeGovernanceApi::client(&api)));
    let config = CatalogEntryModel {
        entry_id: Attr::known("cen404".to_owned()),
        ..CatalogEntryModel::default()
    };

    let response = handler.read(&RequestContext::new(), &config.to_host()).await;

    assert!(response.state.is_none());
    let summary = response
        .diagnostics
        .iter()
        .next()
        .map(|diagnostic| diagnostic.summary.clone());
    assert_eq!(summary.as_deref(), Some("Error reading My Catalog Entry"));
}

#[tokio::test]
async fn request_fields_keep_display_order_and_choices() {
    let api = seeded().await;
    let admin =
        DataSourceAdapter::new(UserRequestFieldsDataSource::new(FakeGovernanceApi::client(&api)));
    let end_user = DataSourceAdapter::new(MyCatalogEntryRequestFieldsDataSource::new(
        FakeGovernanceApi::client(&api),
    ));
    let ctx = RequestContext::new();

    let admin_state = admin
        .read(
            &ctx,
            &UserRequestFieldsModel {
                entry_id: Attr::known(ENTRY_ID.to_owned()),
                user_id: Attr::known("00ujane".to_owned()),
                ..UserRequestFieldsModel::default()
            }
            .to_host(),
        )
        .await
        .state
        .unwrap_or(HostValue::Null);
    let end_user_state = end_user
        .read(
            &ctx,
            &MyRequestFieldsModel {
                entry_id: Attr::known(ENTRY_ID.to_owned()),
                ..MyRequestFieldsModel::default()
            }
            .to_host(),
        )
        .await
        .state
        .unwrap_or(HostValue::Null);

    let expected_choices = HostValue::List(vec![
        HostValue::string("Project"),
        HostValue::string("Audit"),
    ]);
    for state in [&admin_state, &end_user_state] {
        let field = match state.get("fields") {
            Some(HostValue::List(fields)) => fields.first().cloned(),
            _ => None,
        }
        .unwrap_or(HostValue::Null);
        assert_eq!(field.get("type").and_then(HostValue::as_str), Some("SELECT"));
        assert_eq!(field.get("choices"), Some(&expected_choices));
        assert_eq!(field.get("read_only"), Some(&HostValue::Null));
    }
    assert_eq!(admin_state.get("fields"), end_user_state.get("fields"));
}

#[tokio::test]
async fn user_entries_follow_pagination_with_a_parent_filter() {
    let api = seeded().await;
    let handler =
        DataSourceAdapter::new(UserCatalogEntriesDataSource::new(FakeGovernanceApi::client(&api)));
    let config = UserCatalogEntriesModel {
        user_id: Attr::known("00ujane".to_owned()),
        parent_id: Attr::known(ENTRY_ID.to_owned()),
        ..UserCatalogEntriesModel::default()
    };

    let response = handler.read(&RequestContext::new(), &config.to_host()).await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let labels: Vec<String> = match response.state.as_ref().and_then(|state| state.get("entries")) {
        Some(HostValue::List(items)) => items
            .iter()
            .filter_map(|item| item.get("label").and_then(HostValue::as_str))
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    };
    assert_eq!(labels, vec!["Application", "Finance", "Ledger"]);
    let filters: Vec<Option<String>> = api
        .queries
        .lock()
        .await
        .iter()
        .map(|query| query.filter.clone())
        .collect();
    let expected = Some(format!(r#"parent eq "{ENTRY_ID}""#));
    assert_eq!(filters, vec![expected.clone(), expected]);
}
