use async_trait::async_trait;
use oig_application::governance_ports::CollectionsApi;
use oig_core::{AppResult, RequestContext};
use oig_domain::{
    Collection, CollectionAssignment, CollectionAssignmentRequest, CollectionRequest,
    CollectionResource, ListQuery, Page, PatchOperation,
};
use reqwest::Method;
use serde::Deserialize;

use super::HttpGovernanceClient;

/// Bulk assignment responses come back either bare or wrapped in `data`.
#[derive(Deserialize)]
#[serde(untagged)]
enum AssignmentBatch {
    Bare(Vec<CollectionAssignment>),
    Wrapped { data: Vec<CollectionAssignment> },
}

impl AssignmentBatch {
    fn into_assignments(self) -> Vec<CollectionAssignment> {
        match self {
            Self::Bare(assignments) | Self::Wrapped { data: assignments } => assignments,
        }
    }
}

#[async_trait]
impl CollectionsApi for HttpGovernanceClient {
    async fn create_collection(
        &self,
        ctx: &RequestContext,
        request: &CollectionRequest,
    ) -> AppResult<Collection> {
        self.send(ctx, Method::POST, self.v1(&["collections"])?, request)
            .await
    }

    async fn get_collection(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
    ) -> AppResult<Collection> {
        self.get(ctx, self.v1(&["collections", collection_id])?)
            .await
    }

    async fn replace_collection(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
        request: &CollectionRequest,
    ) -> AppResult<Collection> {
        self.send(
            ctx,
            Method::PUT,
            self.v1(&["collections", collection_id])?,
            request,
        )
        .await
    }

    async fn delete_collection(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
    ) -> AppResult<()> {
        self.execute(ctx, Method::DELETE, self.v1(&["collections", collection_id])?)
            .await
    }

    async fn list_collections(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<Collection>> {
        self.list(ctx, self.v1(&["collections"])?, query).await
    }

    async fn get_collection_resource(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
        resource_id: &str,
    ) -> AppResult<CollectionResource> {
        self.get(
            ctx,
            self.v1(&["collections", collection_id, "resources", resource_id])?,
        )
        .await
    }

    async fn list_collection_resources(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
        query: &ListQuery,
    ) -> AppResult<Page<CollectionResource>> {
        self.list(
            ctx,
            self.v1(&["collections", collection_id, "resources"])?,
            query,
        )
        .await
    }

    async fn create_collection_assignments(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
        requests: &[CollectionAssignmentRequest],
    ) -> AppResult<Vec<CollectionAssignment>> {
        let batch: AssignmentBatch = self
            .send(
                ctx,
                Method::POST,
                self.v1(&["collections", collection_id, "assignments"])?,
                requests,
            )
            .await?;
        Ok(batch.into_assignments())
    }

    async fn list_collection_assignments(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
        query: &ListQuery,
    ) -> AppResult<Page<CollectionAssignment>> {
        self.list(
            ctx,
            self.v1(&["collections", collection_id, "assignments"])?,
            query,
        )
        .await
    }

    async fn patch_collection_assignment(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
        assignment_id: &str,
        operations: &[PatchOperation],
    ) -> AppResult<CollectionAssignment> {
        self.send(
            ctx,
            Method::PATCH,
            self.v1(&["collections", collection_id, "assignments", assignment_id])?,
            operations,
        )
        .await
    }

    async fn delete_collection_assignment(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
        assignment_id: &str,
    ) -> AppResult<()> {
        self.execute(
            ctx,
            Method::DELETE,
            self.v1(&["collections", collection_id, "assignments", assignment_id])?,
        )
        .await
    }
}
