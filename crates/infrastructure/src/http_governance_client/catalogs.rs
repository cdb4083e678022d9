use async_trait::async_trait;
use oig_application::governance_ports::{CatalogsApi, MyCatalogsApi};
use oig_core::{AppResult, RequestContext};
use oig_domain::{CatalogEntry, ListQuery, Page, RequestFieldSet};

use super::HttpGovernanceClient;

const DEFAULT_CATALOG: [&str; 2] = ["catalogs", "default"];
const MY_DEFAULT_CATALOG: [&str; 3] = ["my", "catalogs", "default"];

fn under<'a>(root: &[&'a str], rest: &[&'a str]) -> Vec<&'a str> {
    root.iter().chain(rest).copied().collect()
}

#[async_trait]
impl CatalogsApi for HttpGovernanceClient {
    async fn get_catalog_entry(
        &self,
        ctx: &RequestContext,
        entry_id: &str,
    ) -> AppResult<CatalogEntry> {
        self.get(ctx, self.v2(&under(&DEFAULT_CATALOG, &["entries", entry_id]))?)
            .await
    }

    async fn list_catalog_entries(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<CatalogEntry>> {
        self.list(ctx, self.v2(&under(&DEFAULT_CATALOG, &["entries"]))?, query)
            .await
    }

    async fn get_entry_request_fields(
        &self,
        ctx: &RequestContext,
        entry_id: &str,
        user_id: &str,
    ) -> AppResult<RequestFieldSet> {
        let path = under(
            &DEFAULT_CATALOG,
            &["entries", entry_id, "users", user_id, "request-fields"],
        );
        self.get(ctx, self.v2(&path)?).await
    }

    async fn list_user_catalog_entries(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        query: &ListQuery,
    ) -> AppResult<Page<CatalogEntry>> {
        let path = under(&DEFAULT_CATALOG, &["users", user_id, "entries"]);
        self.list(ctx, self.v2(&path)?, query).await
    }
}

#[async_trait]
impl MyCatalogsApi for HttpGovernanceClient {
    async fn get_my_catalog_entry(
        &self,
        ctx: &RequestContext,
        entry_id: &str,
    ) -> AppResult<CatalogEntry> {
        self.get(ctx, self.v2(&under(&MY_DEFAULT_CATALOG, &["entries", entry_id]))?)
            .await
    }

    async fn list_my_catalog_entries(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<CatalogEntry>> {
        self.list(ctx, self.v2(&under(&MY_DEFAULT_CATALOG, &["entries"]))?, query)
            .await
    }

    async fn get_my_catalog_entry_request_fields(
        &self,
        ctx: &RequestContext,
        entry_id: &str,
    ) -> AppResult<RequestFieldSet> {
        let path = under(&MY_DEFAULT_CATALOG, &["entries", entry_id, "request-fields"]);
        self.get(ctx, self.v2(&path)?).await
    }
}
