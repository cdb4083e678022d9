use async_trait::async_trait;
use oig_core::{AppResult, RequestContext};
use oig_domain::{
    ListQuery, MyRequest, MyRequestCreate, OrgRequestSettings, OrgRequestSettingsPatch, Page,
    RequestCondition, RequestConditionRequest, RequestSequence, RequestSequenceRequest,
    RequestType, RequestTypeCreate, RequestV2, RequestV2Create, ResourceRequestSettings,
    ResourceRequestSettingsPatch,
};

/// Request condition endpoints scoped to a resource.
#[async_trait]
pub trait RequestConditionsApi: Send + Sync {
    /// Creates a request condition.
    async fn create_request_condition(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        request: &RequestConditionRequest,
    ) -> AppResult<RequestCondition>;

    /// Returns one request condition.
    async fn get_request_condition(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        condition_id: &str,
    ) -> AppResult<RequestCondition>;

    /// Patches the set fields of a request condition.
    async fn patch_request_condition(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        condition_id: &str,
        request: &RequestConditionRequest,
    ) -> AppResult<RequestCondition>;

    /// Deletes a request condition.
    async fn delete_request_condition(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        condition_id: &str,
    ) -> AppResult<()>;

    /// Lists one page of request conditions.
    async fn list_request_conditions(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        query: &ListQuery,
    ) -> AppResult<Page<RequestCondition>>;

    /// Activates a request condition.
    async fn activate_request_condition(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        condition_id: &str,
    ) -> AppResult<RequestCondition>;

    /// Deactivates a request condition.
    async fn deactivate_request_condition(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        condition_id: &str,
    ) -> AppResult<RequestCondition>;
}

/// Request sequence endpoints scoped to a resource.
#[async_trait]
pub trait RequestSequencesApi: Send + Sync {
    /// Creates a request sequence.
    async fn create_request_sequence(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        request: &RequestSequenceRequest,
    ) -> AppResult<RequestSequence>;

    /// Returns one request sequence.
    async fn get_request_sequence(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        sequence_id: &str,
    ) -> AppResult<RequestSequence>;

    /// Replaces a request sequence.
    async fn replace_request_sequence(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        sequence_id: &str,
        request: &RequestSequenceRequest,
    ) -> AppResult<RequestSequence>;

    /// Deletes a request sequence.
    async fn delete_request_sequence(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        sequence_id: &str,
    ) -> AppResult<()>;

    /// Lists one page of request sequences.
    async fn list_request_sequences(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        query: &ListQuery,
    ) -> AppResult<Page<RequestSequence>>;
}

/// Organization and resource request settings endpoints.
#[async_trait]
pub trait RequestSettingsApi: Send + Sync {
    /// Returns the organization settings.
    async fn get_org_request_settings(&self, ctx: &RequestContext)
    -> AppResult<OrgRequestSettings>;

    /// Changes the organization settings.
    async fn patch_org_request_settings(
        &self,
        ctx: &RequestContext,
        patch: &OrgRequestSettingsPatch,
    ) -> AppResult<OrgRequestSettings>;

    /// Returns the settings of one resource.
    async fn get_resource_request_settings(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
    ) -> AppResult<ResourceRequestSettings>;

    /// Changes the writable settings of one resource.
    async fn patch_resource_request_settings(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        patch: &ResourceRequestSettingsPatch,
    ) -> AppResult<ResourceRequestSettings>;
}

/// Access request endpoints.
#[async_trait]
pub trait RequestsApi: Send + Sync {
    /// Submits an access request.
    async fn create_request(
        &self,
        ctx: &RequestContext,
        request: &RequestV2Create,
    ) -> AppResult<RequestV2>;

    /// Returns one access request.
    async fn get_request(&self, ctx: &RequestContext, request_id: &str) -> AppResult<RequestV2>;

    /// Lists one page of access requests.
    async fn list_requests(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<RequestV2>>;
}

/// Request type endpoints.
#[async_trait]
pub trait RequestTypesApi: Send + Sync {
    /// Creates a request type in `PENDING` status.
    async fn create_request_type(
        &self,
        ctx: &RequestContext,
        request: &RequestTypeCreate,
    ) -> AppResult<RequestType>;

    /// Returns one request type.
    async fn get_request_type(
        &self,
        ctx: &RequestContext,
        request_type_id: &str,
    ) -> AppResult<RequestType>;

    /// Deletes a request type.
    async fn delete_request_type(&self, ctx: &RequestContext, request_type_id: &str)
    -> AppResult<()>;

    /// Lists one page of request types.
    async fn list_request_types(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<RequestType>>;

    /// Publishes a request type.
    async fn publish_request_type(
        &self,
        ctx: &RequestContext,
        request_type_id: &str,
    ) -> AppResult<RequestType>;

    /// Unpublishes a request type.
    async fn unpublish_request_type(
        &self,
        ctx: &RequestContext,
        request_type_id: &str,
    ) -> AppResult<RequestType>;
}

/// Requests submitted by the calling end user.
#[async_trait]
pub trait MyRequestsApi: Send + Sync {
    /// Requests a catalog entry.
    async fn create_my_request(
        &self,
        ctx: &RequestContext,
        entry_id: &str,
        request: &MyRequestCreate,
    ) -> AppResult<MyRequest>;

    /// Returns one of the caller's requests.
    async fn get_my_request(
        &self,
        ctx: &RequestContext,
        entry_id: &str,
        request_id: &str,
    ) -> AppResult<MyRequest>;
}
