use async_trait::async_trait;
use oig_core::{AppResult, RequestContext};
use oig_domain::{
    Collection, CollectionAssignment, CollectionAssignmentRequest, CollectionRequest,
    CollectionResource, ListQuery, Page, PatchOperation,
};

/// Collection endpoints.
#[async_trait]
pub trait CollectionsApi: Send + Sync {
    /// Creates a collection.
    async fn create_collection(
        &self,
        ctx: &RequestContext,
        request: &CollectionRequest,
    ) -> AppResult<Collection>;

    /// Returns one collection.
    async fn get_collection(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
    ) -> AppResult<Collection>;

    /// Replaces a collection.
    async fn replace_collection(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
        request: &CollectionRequest,
    ) -> AppResult<Collection>;

    /// Deletes a collection.
    async fn delete_collection(&self, ctx: &RequestContext, collection_id: &str)
    -> AppResult<()>;

    /// Lists one page of collections.
    async fn list_collections(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<Collection>>;

    /// Returns one resource of a collection.
    async fn get_collection_resource(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
        resource_id: &str,
    ) -> AppResult<CollectionResource>;

    /// Lists one page of collection resources.
    async fn list_collection_resources(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
        query: &ListQuery,
    ) -> AppResult<Page<CollectionResource>>;

    /// Assigns principals to a collection.
    async fn create_collection_assignments(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
        requests: &[CollectionAssignmentRequest],
    ) -> AppResult<Vec<CollectionAssignment>>;

    /// Lists one page of collection assignments.
    async fn list_collection_assignments(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
        query: &ListQuery,
    ) -> AppResult<Page<CollectionAssignment>>;

    /// Applies JSON-patch operations to an assignment.
    async fn patch_collection_assignment(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
        assignment_id: &str,
        operations: &[PatchOperation],
    ) -> AppResult<CollectionAssignment>;

    /// Removes an assignment.
    async fn delete_collection_assignment(
        &self,
        ctx: &RequestContext,
        collection_id: &str,
        assignment_id: &str,
    ) -> AppResult<()>;
}
