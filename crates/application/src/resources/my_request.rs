//! Requests submitted by the calling end user against a catalog entry.

use async_trait::async_trait;
use oig_core::{
    AppError, AppResult, Attr, Diagnostics, HostType, NestedBlock, RequestContext, Schema,
    SchemaAttribute,
};
use oig_domain::{MyRequest, MyRequestCreate, RiskAssessment};

use crate::governance_ports::GovernanceClient;
use crate::provider::{ImportId, ManagedResource, changed_attributes};
use crate::resources::common::{
    AuditState, FieldValueModel, LinksModel, RequestedItemModel, field_values, field_values_block,
    links_block, list_or_null, require, requested_item_schema, state_id, with_audit_attributes,
};

const COMPUTED_ATTRIBUTES: &[&str] = &[
    "id",
    "status",
    "grant_status",
    "requested",
    "risk_assessment",
    "links",
    "created",
    "created_by",
    "last_updated",
    "last_updated_by",
];

oig_core::host_record! {
    /// Host-facing end-user request record.
    pub struct MyRequestModel {
        /// Server-assigned id.
        pub id: String,
        /// Requested catalog entry.
        pub entry_id: String,
        /// Answers to requester fields.
        pub requester_field_values: Vec<FieldValueModel>,
        /// Lifecycle status.
        pub status: String,
        /// Status of the resulting grant.
        pub grant_status: String,
        /// Requested access as resolved by the server.
        pub requested: RequestedItemModel,
        /// Risk evaluation.
        pub risk_assessment: RiskAssessmentModel,
        /// Hypermedia links.
        pub links: LinksModel,
        /// Creation time.
        pub created: String,
        /// Creator id.
        pub created_by: String,
        /// Last modification time.
        pub last_updated: String,
        /// Last modifier id.
        pub last_updated_by: String,
    }
}

oig_core::host_record! {
    /// Risk evaluation of the request.
    pub struct RiskAssessmentModel {
        /// Submission behaviour applied.
        pub request_submission_type: String,
        /// Matched risk rules.
        pub risk_rules: Vec<MatchedRuleModel>,
    }
}

oig_core::host_record! {
    /// Risk rule matched by the request.
    pub struct MatchedRuleModel {
        /// Rule name.
        pub name: String,
        /// Name of the conflicting resource.
        pub resource_name: String,
    }
}

impl RiskAssessmentModel {
    fn from_assessment(assessment: &RiskAssessment) -> Self {
        Self {
            request_submission_type: Attr::from_option(assessment.request_submission_type.clone()),
            risk_rules: list_or_null(
                assessment
                    .risk_rules
                    .iter()
                    .map(|rule| MatchedRuleModel {
                        name: Attr::known(rule.name.clone()),
                        resource_name: Attr::from_option(rule.resource_name.clone()),
                    })
                    .collect(),
            ),
        }
    }
}

/// End-user request resource schema.
#[must_use]
pub fn my_request_schema() -> Schema {
    let schema = Schema::new(
        "Request for a catalog entry submitted as the calling user. Import with entry_id/request_id.",
    )
    .with_attribute(SchemaAttribute::computed_string("id", "Server-assigned id."))
    .with_attribute(SchemaAttribute::required_string("entry_id", "Requested catalog entry."))
    .with_attribute(SchemaAttribute::computed_string("status", "Lifecycle status."))
    .with_attribute(SchemaAttribute::computed_string(
        "grant_status",
        "Status of the resulting grant.",
    ))
    .with_block(field_values_block())
    .with_block(NestedBlock::single(
        "requested",
        requested_item_schema("Requested access as resolved by the server.").into_computed(),
    ))
    .with_block(NestedBlock::single(
        "risk_assessment",
        Schema::new("Risk evaluation.")
            .with_attribute(SchemaAttribute::computed_string(
                "request_submission_type",
                "Submission behaviour applied.",
            ))
            .with_block(NestedBlock::list(
                "risk_rules",
                Schema::new("Matched risk rule.")
                    .with_attribute(SchemaAttribute::computed_string("name", "Rule name."))
                    .with_attribute(SchemaAttribute::computed_string(
                        "resource_name",
                        "Name of the conflicting resource.",
                    )),
            ))
            .into_computed(),
    ))
    .with_block(links_block());

    with_audit_attributes(schema)
}

/// Projects a server request onto the host record.
#[must_use]
pub fn my_request_state(entry_id: &str, request: &MyRequest) -> MyRequestModel {
    let audit = AuditState::from_metadata(&request.audit);

    MyRequestModel {
        id: Attr::known(request.id.clone()),
        entry_id: Attr::known(entry_id.to_owned()),
        requester_field_values: list_or_null(
            request
                .requester_field_values
                .iter()
                .map(FieldValueModel::from_value)
                .collect(),
        ),
        status: Attr::from_option(request.status.clone()),
        grant_status: Attr::from_option(request.grant_status.clone()),
        requested: Attr::from_option(request.requested.as_ref().map(RequestedItemModel::from_item)),
        risk_assessment: Attr::from_option(
            request
                .risk_assessment
                .as_ref()
                .map(RiskAssessmentModel::from_assessment),
        ),
        links: LinksModel::from_links(request.links.as_ref()),
        created: audit.created,
        created_by: audit.created_by,
        last_updated: audit.last_updated,
        last_updated_by: audit.last_updated_by,
    }
}

/// End-user request resource.
pub struct MyRequestResource {
    client: GovernanceClient,
}

impl MyRequestResource {
    /// Creates the resource over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedResource for MyRequestResource {
    type Model = MyRequestModel;

    const NAME: &'static str = "end_user_my_requests";
    const LABEL: &'static str = "My Request";

    fn schema(&self) -> Schema {
        my_request_schema()
    }

    fn id_of(model: &MyRequestModel) -> Option<String> {
        model.id.known_cloned()
    }

    fn validate(&self, _model: &MyRequestModel, _diagnostics: &mut Diagnostics) {}

    async fn create(
        &self,
        ctx: &RequestContext,
        plan: MyRequestModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<MyRequestModel> {
        let entry_id = require(&plan.entry_id, "entry_id")?;
        let request = MyRequestCreate {
            requester_field_values: field_values(&plan.requester_field_values),
        };
        let created = self
            .client
            .my_requests()
            .create_my_request(ctx, &entry_id, &request)
            .await?;
        Ok(my_request_state(&entry_id, &created))
    }

    async fn read(&self, ctx: &RequestContext, state: MyRequestModel) -> AppResult<MyRequestModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let entry_id = require(&state.entry_id, "entry_id")?;
        let request = self
            .client
            .my_requests()
            .get_my_request(ctx, &entry_id, &id)
            .await?;
        Ok(my_request_state(&entry_id, &request))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: MyRequestModel,
        state: MyRequestModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<MyRequestModel> {
        let changed = changed_attributes(&plan.to_host(), &state.to_host(), COMPUTED_ATTRIBUTES);
        if !changed.is_empty() {
            return Err(AppError::Unsupported(format!(
                "{} cannot change after submission; submit a new request instead",
                changed.join(", ")
            )));
        }
        self.read(ctx, state).await
    }

    async fn delete(
        &self,
        _ctx: &RequestContext,
        _state: MyRequestModel,
        diagnostics: &mut Diagnostics,
    ) -> AppResult<()> {
        diagnostics.warning(
            "Request left in place",
            "Submitted requests cannot be deleted; the request was only removed from state.",
        );
        Ok(())
    }

    fn import(&self, id: &ImportId) -> AppResult<MyRequestModel> {
        let (entry_id, request_id) = id.pair("entry_id/request_id")?;
        Ok(MyRequestModel {
            id: Attr::known(request_id.to_owned()),
            entry_id: Attr::known(entry_id.to_owned()),
            ..MyRequestModel::default()
        })
    }
}
