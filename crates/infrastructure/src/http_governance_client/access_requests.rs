use async_trait::async_trait;
use oig_application::governance_ports::{
    MyRequestsApi, RequestConditionsApi, RequestSequencesApi, RequestSettingsApi,
    RequestTypesApi, RequestsApi,
};
use oig_core::{AppResult, RequestContext};
use oig_domain::{
    ListQuery, MyRequest, MyRequestCreate, OrgRequestSettings, OrgRequestSettingsPatch, Page,
    RequestCondition, RequestConditionRequest, RequestSequence, RequestSequenceRequest,
    RequestType, RequestTypeCreate, RequestV2, RequestV2Create, ResourceRequestSettings,
    ResourceRequestSettingsPatch,
};
use reqwest::Method;

use super::HttpGovernanceClient;

#[async_trait]
impl RequestConditionsApi for HttpGovernanceClient {
    async fn create_request_condition(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        request: &RequestConditionRequest,
    ) -> AppResult<RequestCondition> {
        let url = self.v2(&["resources", resource_id, "request-conditions"])?;
        self.send(ctx, Method::POST, url, request).await
    }

    async fn get_request_condition(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        condition_id: &str,
    ) -> AppResult<RequestCondition> {
        let url = self.v2(&["resources", resource_id, "request-conditions", condition_id])?;
        self.get(ctx, url).await
    }

    async fn patch_request_condition(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        condition_id: &str,
        request: &RequestConditionRequest,
    ) -> AppResult<RequestCondition> {
        let url = self.v2(&["resources", resource_id, "request-conditions", condition_id])?;
        self.send(ctx, Method::PATCH, url, request).await
    }

    async fn delete_request_condition(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        condition_id: &str,
    ) -> AppResult<()> {
        let url = self.v2(&["resources", resource_id, "request-conditions", condition_id])?;
        self.execute(ctx, Method::DELETE, url).await
    }

    async fn list_request_conditions(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        query: &ListQuery,
    ) -> AppResult<Page<RequestCondition>> {
        let url = self.v2(&["resources", resource_id, "request-conditions"])?;
        self.list(ctx, url, query).await
    }

    async fn activate_request_condition(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        condition_id: &str,
    ) -> AppResult<RequestCondition> {
        let url = self.v2(&[
            "resources",
            resource_id,
            "request-conditions",
            condition_id,
            "activate",
        ])?;
        self.post_action(ctx, url).await
    }

    async fn deactivate_request_condition(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        condition_id: &str,
    ) -> AppResult<RequestCondition> {
        let url = self.v2(&[
            "resources",
            resource_id,
            "request-conditions",
            condition_id,
            "deactivate",
        ])?;
        self.post_action(ctx, url).await
    }
}

#[async_trait]
impl RequestSequencesApi for HttpGovernanceClient {
    async fn create_request_sequence(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        request: &RequestSequenceRequest,
    ) -> AppResult<RequestSequence> {
        let url = self.v2(&["resources", resource_id, "request-sequences"])?;
        self.send(ctx, Method::POST, url, request).await
    }

    async fn get_request_sequence(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        sequence_id: &str,
    ) -> AppResult<RequestSequence> {
        let url = self.v2(&["resources", resource_id, "request-sequences", sequence_id])?;
        self.get(ctx, url).await
    }

    async fn replace_request_sequence(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        sequence_id: &str,
        request: &RequestSequenceRequest,
    ) -> AppResult<RequestSequence> {
        let url = self.v2(&["resources", resource_id, "request-sequences", sequence_id])?;
        self.send(ctx, Method::PUT, url, request).await
    }

    async fn delete_request_sequence(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        sequence_id: &str,
    ) -> AppResult<()> {
        let url = self.v2(&["resources", resource_id, "request-sequences", sequence_id])?;
        self.execute(ctx, Method::DELETE, url).await
    }

    async fn list_request_sequences(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        query: &ListQuery,
    ) -> AppResult<Page<RequestSequence>> {
        let url = self.v2(&["resources", resource_id, "request-sequences"])?;
        self.list(ctx, url, query).await
    }
}

#[async_trait]
impl RequestSettingsApi for HttpGovernanceClient {
    async fn get_org_request_settings(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<OrgRequestSettings> {
        self.get(ctx, self.v2(&["request-settings"])?).await
    }

    async fn patch_org_request_settings(
        &self,
        ctx: &RequestContext,
        patch: &OrgRequestSettingsPatch,
    ) -> AppResult<OrgRequestSettings> {
        self.send(ctx, Method::PATCH, self.v2(&["request-settings"])?, patch)
            .await
    }

    async fn get_resource_request_settings(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
    ) -> AppResult<ResourceRequestSettings> {
        self.get(ctx, self.v2(&["resources", resource_id, "request-settings"])?)
            .await
    }

    async fn patch_resource_request_settings(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        patch: &ResourceRequestSettingsPatch,
    ) -> AppResult<ResourceRequestSettings> {
        let url = self.v2(&["resources", resource_id, "request-settings"])?;
        self.send(ctx, Method::PATCH, url, patch).await
    }
}

#[async_trait]
impl RequestsApi for HttpGovernanceClient {
    async fn create_request(
        &self,
        ctx: &RequestContext,
        request: &RequestV2Create,
    ) -> AppResult<RequestV2> {
        self.send(ctx, Method::POST, self.v2(&["requests"])?, request)
            .await
    }

    async fn get_request(&self, ctx: &RequestContext, request_id: &str) -> AppResult<RequestV2> {
        self.get(ctx, self.v2(&["requests", request_id])?).await
    }

    async fn list_requests(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<RequestV2>> {
        self.list(ctx, self.v2(&["requests"])?, query).await
    }
}

#[async_trait]
impl RequestTypesApi for HttpGovernanceClient {
    async fn create_request_type(
        &self,
        ctx: &RequestContext,
        request: &RequestTypeCreate,
    ) -> AppResult<RequestType> {
        self.send(ctx, Method::POST, self.v1(&["request-types"])?, request)
            .await
    }

    async fn get_request_type(
        &self,
        ctx: &RequestContext,
        request_type_id: &str,
    ) -> AppResult<RequestType> {
        self.get(ctx, self.v1(&["request-types", request_type_id])?)
            .await
    }

    async fn delete_request_type(
        &self,
        ctx: &RequestContext,
        request_type_id: &str,
    ) -> AppResult<()> {
        self.execute(
            ctx,
            Method::DELETE,
            self.v1(&["request-types", request_type_id])?,
        )
        .await
    }

    async fn list_request_types(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<Page<RequestType>> {
        self.list(ctx, self.v1(&["request-types"])?, query).await
    }

    async fn publish_request_type(
        &self,
        ctx: &RequestContext,
        request_type_id: &str,
    ) -> AppResult<RequestType> {
        self.post_action(ctx, self.v1(&["request-types", request_type_id, "publish"])?)
            .await
    }

    async fn unpublish_request_type(
        &self,
        ctx: &RequestContext,
        request_type_id: &str,
    ) -> AppResult<RequestType> {
        self.post_action(ctx, self.v1(&["request-types", request_type_id, "un-publish"])?)
            .await
    }
}

#[async_trait]
impl MyRequestsApi for HttpGovernanceClient {
    async fn create_my_request(
        &self,
        ctx: &RequestContext,
        entry_id: &str,
        request: &MyRequestCreate,
    ) -> AppResult<MyRequest> {
        let url = self.v2(&["my", "catalogs", "default", "entries", entry_id, "requests"])?;
        self.send(ctx, Method::POST, url, request).await
    }

    async fn get_my_request(
        &self,
        ctx: &RequestContext,
        entry_id: &str,
        request_id: &str,
    ) -> AppResult<MyRequest> {
        let url = self.v2(&[
            "my",
            "catalogs",
            "default",
            "entries",
            entry_id,
            "requests",
            request_id,
        ])?;
        self.get(ctx, url).await
    }
}
