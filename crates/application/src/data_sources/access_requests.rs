use async_trait::async_trait;
use oig_core::{AppResult, Attr, RequestContext, Schema, SchemaAttribute};
use oig_domain::ListQuery;

use crate::governance_ports::GovernanceClient;
use crate::pagination::collect_all;
use crate::provider::ManagedDataSource;
use crate::resources::common::require;
use crate::resources::request_condition::{
    RequestConditionModel, request_condition_schema, request_condition_state,
};
use crate::resources::request_sequence::{
    RequestSequenceModel, request_sequence_schema, request_sequence_state,
};
use crate::resources::request_setting_resource::{
    ResourceRequestSettingsModel, resource_request_settings_schema,
    resource_request_settings_state,
};

use super::list_schema;

oig_core::host_record! {
    /// Request condition listing of one resource.
    pub struct RequestConditionsModel {
        /// Owning resource id.
        pub resource_id: String,
        /// Conditions in server order.
        pub request_conditions: Vec<RequestConditionModel>,
    }
}

/// Lists the request conditions of a resource.
pub struct RequestConditionsDataSource {
    client: GovernanceClient,
}

impl RequestConditionsDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for RequestConditionsDataSource {
    type Model = RequestConditionsModel;

    const NAME: &'static str = "request_conditions";
    const LABEL: &'static str = "Request Conditions";

    fn schema(&self) -> Schema {
        list_schema(
            "Access request conditions of a resource.",
            "request_conditions",
            request_condition_schema(),
        )
        .with_attribute(SchemaAttribute::required_string("resource_id", "Owning resource id."))
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        mut config: RequestConditionsModel,
    ) -> AppResult<RequestConditionsModel> {
        let resource_id = require(&config.resource_id, "resource_id")?;
        let resource = resource_id.as_str();

        let conditions = collect_all(ctx, &ListQuery::default(), |query| async move {
            self.client
                .request_conditions()
                .list_request_conditions(ctx, resource, &query)
                .await
        })
        .await?;

        config.request_conditions = Attr::known(
            conditions
                .iter()
                .map(|condition| request_condition_state(resource, condition))
                .collect(),
        );
        Ok(config)
    }
}

oig_core::host_record! {
    /// Request sequence listing of one resource.
    pub struct RequestSequencesModel {
        /// Owning resource id.
        pub resource_id: String,
        /// Sequences in server order.
        pub request_sequences: Vec<RequestSequenceModel>,
    }
}

/// Lists the approval sequences of a resource.
pub struct RequestSequencesDataSource {
    client: GovernanceClient,
}

impl RequestSequencesDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for RequestSequencesDataSource {
    type Model = RequestSequencesModel;

    const NAME: &'static str = "request_sequences";
    const LABEL: &'static str = "Request Sequences";

    fn schema(&self) -> Schema {
        list_schema(
            "Approval sequences of a resource.",
            "request_sequences",
            request_sequence_schema(),
        )
        .with_attribute(SchemaAttribute::required_string("resource_id", "Owning resource id."))
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        mut config: RequestSequencesModel,
    ) -> AppResult<RequestSequencesModel> {
        let resource_id = require(&config.resource_id, "resource_id")?;
        let resource = resource_id.as_str();

        let sequences = collect_all(ctx, &ListQuery::default(), |query| async move {
            self.client
                .request_sequences()
                .list_request_sequences(ctx, resource, &query)
                .await
        })
        .await?;

        config.request_sequences = Attr::known(
            sequences
                .iter()
                .map(|sequence| request_sequence_state(resource, sequence))
                .collect(),
        );
        Ok(config)
    }
}

/// Reads the request settings of a resource, writable blocks included.
pub struct ResourceRequestSettingsDataSource {
    client: GovernanceClient,
}

impl ResourceRequestSettingsDataSource {
    /// Creates the data source over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedDataSource for ResourceRequestSettingsDataSource {
    type Model = ResourceRequestSettingsModel;

    const NAME: &'static str = "request_setting_resource";
    const LABEL: &'static str = "Resource Request Settings";

    fn schema(&self) -> Schema {
        resource_request_settings_schema()
            .into_computed()
            .with_requirement("resource_id", oig_core::Requirement::Required)
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        config: ResourceRequestSettingsModel,
    ) -> AppResult<ResourceRequestSettingsModel> {
        let resource_id = require(&config.resource_id, "resource_id")?;
        let settings = self
            .client
            .request_settings()
            .get_resource_request_settings(ctx, &resource_id)
            .await?;

        let report_all = ResourceRequestSettingsModel {
            request_on_behalf_of_settings: Attr::Unknown,
            risk_settings: Attr::Unknown,
            ..ResourceRequestSettingsModel::default()
        };
        Ok(resource_request_settings_state(&resource_id, &settings, &report_all))
    }
}
