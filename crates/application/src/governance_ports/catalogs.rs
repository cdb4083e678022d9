use async_trait::async_trait;
use oig_core::{AppResult, RequestContext};
use oig_domain::{CatalogEntry, ListQuery, Page, RequestFieldSet};

/// Administrative view of the default request catalog.
#[async_trait]
pub trait CatalogsApi: Send + Sync {
    /// Returns one entry of the default catalog.
    async fn get_catalog_entry(
        &self,
        ctx: &RequestContext,
        entry_id: &str,
    ) -> AppResult<CatalogEntry>;

    /// Lists one page of default catalog entries.
    async fn list_catalog_entries(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<CatalogEntry>>;

    /// Returns the request fields a user must fill for an entry.
    async fn get_entry_request_fields(
        &self,
        ctx: &RequestContext,
        entry_id: &str,
        user_id: &str,
    ) -> AppResult<RequestFieldSet>;

    /// Lists one page of entries a user can request.
    async fn list_user_catalog_entries(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        query: &ListQuery,
    ) -> AppResult<Page<CatalogEntry>>;
}

/// End-user view of the request catalog.
#[async_trait]
pub trait MyCatalogsApi: Send + Sync {
    /// Returns one entry visible to the caller.
    async fn get_my_catalog_entry(
        &self,
        ctx: &RequestContext,
        entry_id: &str,
    ) -> AppResult<CatalogEntry>;

    /// Lists one page of entries visible to the caller.
    async fn list_my_catalog_entries(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<CatalogEntry>>;

    /// Returns the request fields the caller must fill for an entry.
    async fn get_my_catalog_entry_request_fields(
        &self,
        ctx: &RequestContext,
        entry_id: &str,
    ) -> AppResult<RequestFieldSet>;
}
