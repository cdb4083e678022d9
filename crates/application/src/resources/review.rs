//! Review resource: adopts a campaign review by id and records decisions.

use async_trait::async_trait;
use oig_core::{
    AppError, AppResult, Attr, AttributePath, Diagnostics, HostType, NestedBlock, RequestContext,
    Schema, SchemaAttribute,
};
use oig_domain::{REVIEW_DECISIONS, Review, ReviewDecision, ReviewProfile, ReviewedItem};

use crate::governance_ports::GovernanceClient;
use crate::provider::{ImportId, ManagedResource, changed_attributes};
use crate::resources::common::{
    AuditState, LinksModel, check_one_of, links_block, state_id, with_audit_attributes,
};

const DECISION_ATTRIBUTES: &[&str] = &["decision", "note"];

oig_core::host_record! {
    /// Host-facing review record.
    pub struct ReviewModel {
        /// Review id.
        pub id: String,
        /// Owning campaign.
        pub campaign_id: String,
        /// Reviewed resource.
        pub resource_id: String,
        /// `APPROVE` or `REVOKE`; `UNREVIEWED` until decided.
        pub decision: String,
        /// Justification sent with the decision.
        pub note: String,
        /// Remediation progress.
        pub remediation_status: String,
        /// Reviewer type.
        pub reviewer_type: String,
        /// Current stage id.
        pub current_reviewer_level: String,
        /// Decision time.
        pub decided: String,
        /// Reviewed principal.
        pub principal_profile: ReviewProfileModel,
        /// Assigned reviewer.
        pub reviewer_profile: ReviewProfileModel,
        /// Reviewed entitlement value.
        pub entitlement_value: ReviewedItemModel,
        /// Reviewed bundle.
        pub entitlement_bundle: ReviewedItemModel,
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
    /// Identity shown on a review.
    pub struct ReviewProfileModel {
        /// User id.
        pub id: String,
        /// Login.
        pub login: String,
        /// Email address.
        pub email: String,
        /// Given name.
        pub first_name: String,
        /// Family name.
        pub last_name: String,
        /// User status.
        pub status: String,
    }
}

oig_core::host_record! {
    /// Entitlement value or bundle under review.
    pub struct ReviewedItemModel {
        /// Item id.
        pub id: String,
        /// Display name.
        pub name: String,
        /// Value used by the application.
        pub external_value: String,
    }
}

impl ReviewProfileModel {
    fn from_profile(profile: &ReviewProfile) -> Self {
        Self {
            id: Attr::known(profile.id.clone()),
            login: Attr::from_option(profile.login.clone()),
            email: Attr::from_option(profile.email.clone()),
            first_name: Attr::from_option(profile.first_name.clone()),
            last_name: Attr::from_option(profile.last_name.clone()),
            status: Attr::from_option(profile.status.clone()),
        }
    }
}

impl ReviewedItemModel {
    fn from_item(item: &ReviewedItem) -> Self {
        Self {
            id: Attr::known(item.id.clone()),
            name: Attr::from_option(item.name.clone()),
            external_value: Attr::from_option(item.external_value.clone()),
        }
    }
}

fn profile_schema(description: &str) -> Schema {
    Schema::new(description)
        .with_attribute(SchemaAttribute::computed_string("id", "User id."))
        .with_attribute(SchemaAttribute::computed_string("login", "Login."))
        .with_attribute(SchemaAttribute::computed_string("email", "Email address."))
        .with_attribute(SchemaAttribute::computed_string("first_name", "Given name."))
        .with_attribute(SchemaAttribute::computed_string("last_name", "Family name."))
        .with_attribute(SchemaAttribute::computed_string("status", "User status."))
}

fn item_schema(description: &str) -> Schema {
    Schema::new(description)
        .with_attribute(SchemaAttribute::computed_string("id", "Item id."))
        .with_attribute(SchemaAttribute::computed_string("name", "Display name."))
        .with_attribute(SchemaAttribute::computed_string(
            "external_value",
            "Value used by the application.",
        ))
}

/// Review schema; the data source reuses it fully computed.
#[must_use]
pub fn review_schema() -> Schema {
    let schema = Schema::new(
        "Reviewer decision record of a campaign. The review must already exist; only decision and note change.",
    )
    .with_attribute(SchemaAttribute::required_string("id", "Review id."))
    .with_attribute(SchemaAttribute::computed_string("campaign_id", "Owning campaign."))
    .with_attribute(SchemaAttribute::computed_string("resource_id", "Reviewed resource."))
    .with_attribute(SchemaAttribute::optional_computed_string(
        "decision",
        "APPROVE or REVOKE.",
    ))
    .with_attribute(SchemaAttribute::optional_string(
        "note",
        "Justification sent with the decision.",
    ))
    .with_attribute(SchemaAttribute::computed_string(
        "remediation_status",
        "Remediation progress.",
    ))
    .with_attribute(SchemaAttribute::computed_string("reviewer_type", "Reviewer type."))
    .with_attribute(SchemaAttribute::computed_string(
        "current_reviewer_level",
        "Current stage id.",
    ))
    .with_attribute(SchemaAttribute::computed_string("decided", "Decision time."))
    .with_block(NestedBlock::single(
        "principal_profile",
        profile_schema("Reviewed principal.").into_computed(),
    ))
    .with_block(NestedBlock::single(
        "reviewer_profile",
        profile_schema("Assigned reviewer.").into_computed(),
    ))
    .with_block(NestedBlock::single(
        "entitlement_value",
        item_schema("Reviewed entitlement value.").into_computed(),
    ))
    .with_block(NestedBlock::single(
        "entitlement_bundle",
        item_schema("Reviewed bundle.").into_computed(),
    ))
    .with_block(links_block());

    with_audit_attributes(schema)
}

/// Projects a server review onto the host record, keeping the configured note.
#[must_use]
pub fn review_state(review: &Review, prior_note: &Attr<String>) -> ReviewModel {
    let audit = AuditState::from_metadata(&review.audit);
    let mut note = prior_note.clone();
    note.refresh(
        review
            .note
            .as_ref()
            .map(|note| note.note.clone())
            .filter(|note| !note.is_empty()),
    );

    ReviewModel {
        id: Attr::known(review.id.clone()),
        campaign_id: Attr::from_option(review.campaign_id.clone()),
        resource_id: Attr::from_option(review.resource_id.clone()),
        decision: Attr::from_option(review.decision.clone()),
        note,
        remediation_status: Attr::from_option(review.remediation_status.clone()),
        reviewer_type: Attr::from_option(review.reviewer_type.clone()),
        current_reviewer_level: Attr::from_option(review.current_reviewer_level.clone()),
        decided: Attr::from_option(review.decided.clone()),
        principal_profile: Attr::from_option(
            review
                .principal_profile
                .as_ref()
                .map(ReviewProfileModel::from_profile),
        ),
        reviewer_profile: Attr::from_option(
            review
                .reviewer_profile
                .as_ref()
                .map(ReviewProfileModel::from_profile),
        ),
        entitlement_value: Attr::from_option(
            review
                .entitlement_value
                .as_ref()
                .map(ReviewedItemModel::from_item),
        ),
        entitlement_bundle: Attr::from_option(
            review
                .entitlement_bundle
                .as_ref()
                .map(ReviewedItemModel::from_item),
        ),
        links: LinksModel::from_links(review.links.as_ref()),
        created: audit.created,
        created_by: audit.created_by,
        last_updated: audit.last_updated,
        last_updated_by: audit.last_updated_by,
    }
}

/// Review resource.
pub struct ReviewResource {
    client: GovernanceClient,
}

impl ReviewResource {
    /// Creates the resource over a governance client.
    #[must_use]
    pub fn new(client: GovernanceClient) -> Self {
        Self { client }
    }

    async fn decide_if_needed(
        &self,
        ctx: &RequestContext,
        plan: &ReviewModel,
        current: Review,
    ) -> AppResult<Review> {
        let Some(decision) = plan.decision.as_deref() else {
            return Ok(current);
        };
        let note = plan.note.known_cloned();
        let current_note = current.note.as_ref().map(|note| note.note.clone());
        if current.decision.as_deref() == Some(decision) && (note.is_none() || note == current_note)
        {
            return Ok(current);
        }

        self.client
            .reviews()
            .decide_review(
                ctx,
                &current.id,
                &ReviewDecision {
                    decision: decision.to_owned(),
                    note,
                },
            )
            .await
    }
}

#[async_trait]
impl ManagedResource for ReviewResource {
    type Model = ReviewModel;

    const NAME: &'static str = "review";
    const LABEL: &'static str = "Review";

    fn schema(&self) -> Schema {
        review_schema()
    }

    fn id_of(model: &ReviewModel) -> Option<String> {
        model.id.known_cloned()
    }

    fn validate(&self, model: &ReviewModel, diagnostics: &mut Diagnostics) {
        check_one_of(
            diagnostics,
            AttributePath::attribute("decision"),
            &model.decision,
            REVIEW_DECISIONS,
        );
        if model.note.non_blank().is_some() && model.decision.is_null() {
            diagnostics.attribute_error(
                AttributePath::attribute("note"),
                "Invalid attribute combination",
                "note can only be set together with decision",
            );
        }
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        plan: ReviewModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<ReviewModel> {
        let id = state_id(&plan.id, Self::LABEL)?;
        let current = self.client.reviews().get_review(ctx, &id).await?;
        let decided = self.decide_if_needed(ctx, &plan, current).await?;
        Ok(review_state(&decided, &plan.note))
    }

    async fn read(&self, ctx: &RequestContext, state: ReviewModel) -> AppResult<ReviewModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let review = self.client.reviews().get_review(ctx, &id).await?;
        Ok(review_state(&review, &state.note))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: ReviewModel,
        state: ReviewModel,
        _diagnostics: &mut Diagnostics,
    ) -> AppResult<ReviewModel> {
        let id = state_id(&state.id, Self::LABEL)?;
        let changed: Vec<String> = changed_attributes(&plan.to_host(), &state.to_host(), &[])
            .into_iter()
            .filter(|name| !DECISION_ATTRIBUTES.contains(&name.as_str()))
            .collect();
        if !changed.is_empty() {
            return Err(AppError::Unsupported(format!(
                "{} cannot change; reviews only accept a new decision and note",
                changed.join(", ")
            )));
        }

        let current = self.client.reviews().get_review(ctx, &id).await?;
        let decided = self.decide_if_needed(ctx, &plan, current).await?;
        Ok(review_state(&decided, &plan.note))
    }

    async fn delete(
        &self,
        _ctx: &RequestContext,
        state: ReviewModel,
        diagnostics: &mut Diagnostics,
    ) -> AppResult<()> {
        let id = state_id(&state.id, Self::LABEL)?;
        diagnostics.warning(
            "Review left in place",
            format!("Reviews cannot be deleted; review '{id}' was only removed from state."),
        );
        Ok(())
    }

    fn import(&self, id: &ImportId) -> AppResult<ReviewModel> {
        Ok(ReviewModel {
            id: Attr::known(id.single()?.to_owned()),
            ..ReviewModel::default()
        })
    }
}
