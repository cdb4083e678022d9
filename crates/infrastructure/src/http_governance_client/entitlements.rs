use async_trait::async_trait;
use oig_application::governance_ports::{
    EntitlementBundlesApi, EntitlementsApi, PrincipalAccessApi, PrincipalEntitlementsApi,
};
use oig_core::{AppResult, RequestContext};
use oig_domain::{
    Entitlement, EntitlementBundle, EntitlementBundleRequest, EntitlementRequest, FilterBuilder,
    ListQuery, Page, PrincipalAccess, PrincipalAccessQuery, PrincipalEntitlement,
};
use reqwest::Method;

use super::HttpGovernanceClient;

#[async_trait]
impl EntitlementsApi for HttpGovernanceClient {
    async fn create_entitlement(
        &self,
        ctx: &RequestContext,
        request: &EntitlementRequest,
    ) -> AppResult<Entitlement> {
        self.send(ctx, Method::POST, self.v1(&["entitlements"])?, request)
            .await
    }

    async fn get_entitlement(
        &self,
        ctx: &RequestContext,
        entitlement_id: &str,
    ) -> AppResult<Entitlement> {
        self.get(ctx, self.v1(&["entitlements", entitlement_id])?)
            .await
    }

    async fn replace_entitlement(
        &self,
        ctx: &RequestContext,
        entitlement_id: &str,
        request: &EntitlementRequest,
    ) -> AppResult<Entitlement> {
        self.send(
            ctx,
            Method::PUT,
            self.v1(&["entitlements", entitlement_id])?,
            request,
        )
        .await
    }

    async fn delete_entitlement(
        &self,
        ctx: &RequestContext,
        entitlement_id: &str,
    ) -> AppResult<()> {
        self.execute(ctx, Method::DELETE, self.v1(&["entitlements", entitlement_id])?)
            .await
    }

    async fn list_entitlements(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<Entitlement>> {
        self.list(ctx, self.v1(&["entitlements"])?, query).await
    }
}

#[async_trait]
impl EntitlementBundlesApi for HttpGovernanceClient {
    async fn create_entitlement_bundle(
        &self,
        ctx: &RequestContext,
        request: &EntitlementBundleRequest,
    ) -> AppResult<EntitlementBundle> {
        self.send(ctx, Method::POST, self.v1(&["entitlement-bundles"])?, request)
            .await
    }

    async fn get_entitlement_bundle(
        &self,
        ctx: &RequestContext,
        bundle_id: &str,
    ) -> AppResult<EntitlementBundle> {
        self.get(ctx, self.v1(&["entitlement-bundles", bundle_id])?)
            .await
    }

    async fn replace_entitlement_bundle(
        &self,
        ctx: &RequestContext,
        bundle_id: &str,
        request: &EntitlementBundleRequest,
    ) -> AppResult<EntitlementBundle> {
        self.send(
            ctx,
            Method::PUT,
            self.v1(&["entitlement-bundles", bundle_id])?,
            request,
        )
        .await
    }

    async fn delete_entitlement_bundle(
        &self,
        ctx: &RequestContext,
        bundle_id: &str,
    ) -> AppResult<()> {
        self.execute(
            ctx,
            Method::DELETE,
            self.v1(&["entitlement-bundles", bundle_id])?,
        )
        .await
    }

    async fn list_entitlement_bundles(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<EntitlementBundle>> {
        self.list(ctx, self.v1(&["entitlement-bundles"])?, query)
            .await
    }
}

#[async_trait]
impl PrincipalEntitlementsApi for HttpGovernanceClient {
    async fn list_principal_entitlements(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<PrincipalEntitlement>> {
        self.list(ctx, self.v1(&["principal-entitlements"])?, query)
            .await
    }
}

#[async_trait]
impl PrincipalAccessApi for HttpGovernanceClient {
    async fn get_principal_access(
        &self,
        ctx: &RequestContext,
        query: &PrincipalAccessQuery,
    ) -> AppResult<PrincipalAccess> {
        let filter = FilterBuilder::new()
            .eq_if("targetPrincipalOrn", Some(query.target_principal_orn.as_str()))
            .eq_if("parentResourceOrn", Some(query.parent_resource_orn.as_str()))
            .render();
        let mut url = self.v1(&["principal-access"])?;
        url.query_pairs_mut().append_pair("filter", &filter);
        self.get(ctx, url).await
    }
}
