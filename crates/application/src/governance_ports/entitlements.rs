use async_trait::async_trait;
use oig_core::{AppResult, RequestContext};
use oig_domain::{
    Entitlement, EntitlementBundle, EntitlementBundleRequest, EntitlementRequest, ListQuery, Page,
    PrincipalAccess, PrincipalAccessQuery, PrincipalEntitlement,
};

/// Entitlement endpoints.
#[async_trait]
pub trait EntitlementsApi: Send + Sync {
    /// Creates an entitlement.
    async fn create_entitlement(
        &self,
        ctx: &RequestContext,
        request: &EntitlementRequest,
    ) -> AppResult<Entitlement>;

    /// Returns one entitlement.
    async fn get_entitlement(
        &self,
        ctx: &RequestContext,
        entitlement_id: &str,
    ) -> AppResult<Entitlement>;

    /// Replaces an entitlement.
    async fn replace_entitlement(
        &self,
        ctx: &RequestContext,
        entitlement_id: &str,
        request: &EntitlementRequest,
    ) -> AppResult<Entitlement>;

    /// Deletes an entitlement.
    async fn delete_entitlement(&self, ctx: &RequestContext, entitlement_id: &str)
    -> AppResult<()>;

    /// Lists one page of entitlements.
    async fn list_entitlements(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<Entitlement>>;
}

/// Entitlement bundle endpoints.
#[async_trait]
pub trait EntitlementBundlesApi: Send + Sync {
    /// Creates a bundle.
    async fn create_entitlement_bundle(
        &self,
        ctx: &RequestContext,
        request: &EntitlementBundleRequest,
    ) -> AppResult<EntitlementBundle>;

    /// Returns one bundle.
    async fn get_entitlement_bundle(
        &self,
        ctx: &RequestContext,
        bundle_id: &str,
    ) -> AppResult<EntitlementBundle>;

    /// Replaces a bundle.
    async fn replace_entitlement_bundle(
        &self,
        ctx: &RequestContext,
        bundle_id: &str,
        request: &EntitlementBundleRequest,
    ) -> AppResult<EntitlementBundle>;

    /// Deletes a bundle.
    async fn delete_entitlement_bundle(&self, ctx: &RequestContext, bundle_id: &str)
    -> AppResult<()>;

    /// Lists one page of bundles.
    async fn list_entitlement_bundles(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<EntitlementBundle>>;
}

/// Effective entitlements held by principals.
#[async_trait]
pub trait PrincipalEntitlementsApi: Send + Sync {
    /// Lists one page of principal entitlements; a filter is required.
    async fn list_principal_entitlements(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<PrincipalEntitlement>>;
}

/// Access summaries of principals.
#[async_trait]
pub trait PrincipalAccessApi: Send + Sync {
    /// Returns what a principal can access on one resource.
    async fn get_principal_access(
        &self,
        ctx: &RequestContext,
        query: &PrincipalAccessQuery,
    ) -> AppResult<PrincipalAccess>;
}
