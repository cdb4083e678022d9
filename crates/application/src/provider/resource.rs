use async_trait::async_trait;
use oig_core::{
    AppResult, AttributePath, Diagnostics, HostType, HostValue, RequestContext, Schema,
};
use tracing::{info, warn};

use super::errors::{Operation, operation_error};
use super::import::ImportId;

/// Outcome of one host operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResponse {
    /// State to persist; `None` removes the record from the host inventory.
    pub state: Option<HostValue>,
    /// Diagnostics in emission order.
    pub diagnostics: Diagnostics,
}

impl OperationResponse {
    /// Persists a state value, resolving any residual unknowns to null.
    #[must_use]
    pub fn with_state(state: HostValue, diagnostics: Diagnostics) -> Self {
        Self {
            state: Some(state.resolve_unknowns()),
            diagnostics,
        }
    }

    /// Removes the record from the host inventory.
    #[must_use]
    pub fn removed(diagnostics: Diagnostics) -> Self {
        Self {
            state: None,
            diagnostics,
        }
    }

    /// Keeps an unchanged prior state, typically next to an error.
    #[must_use]
    pub fn unchanged(prior: &HostValue, diagnostics: Diagnostics) -> Self {
        Self {
            state: Some(prior.clone()),
            diagnostics,
        }
    }
}

/// Typed lifecycle of one resource kind.
///
/// Implementations work on the native model and return errors; the generic
/// [`ResourceAdapter`] owns conversion, diagnostics, and not-found handling.
#[async_trait]
pub trait ManagedResource: Send + Sync {
    /// Native model exchanged with the host runtime.
    type Model: HostType + Clone + Send + Sync + 'static;

    /// Entity name appended to the provider prefix.
    const NAME: &'static str;

    /// Human-readable entity name used in diagnostics.
    const LABEL: &'static str;

    /// Resource schema.
    fn schema(&self) -> Schema;

    /// Returns the server id carried by a model, when known.
    fn id_of(model: &Self::Model) -> Option<String>;

    /// Cross-field validation; unknown values must be skipped.
    fn validate(&self, _model: &Self::Model, _diagnostics: &mut Diagnostics) {}

    /// Creates the remote record and returns its full state.
    async fn create(
        &self,
        ctx: &RequestContext,
        plan: Self::Model,
        diagnostics: &mut Diagnostics,
    ) -> AppResult<Self::Model>;

    /// Refreshes state from the remote record.
    async fn read(&self, ctx: &RequestContext, state: Self::Model) -> AppResult<Self::Model>;

    /// Applies the difference between plan and state.
    async fn update(
        &self,
        ctx: &RequestContext,
        plan: Self::Model,
        state: Self::Model,
        diagnostics: &mut Diagnostics,
    ) -> AppResult<Self::Model>;

    /// Deletes the remote record.
    async fn delete(
        &self,
        ctx: &RequestContext,
        state: Self::Model,
        diagnostics: &mut Diagnostics,
    ) -> AppResult<()>;

    /// Builds the minimal state a following read needs.
    fn import(&self, id: &ImportId) -> AppResult<Self::Model>;
}

/// Object-safe resource entry published to the host runtime.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Entity name without the provider prefix.
    fn name(&self) -> &'static str;

    /// Resource schema.
    fn schema(&self) -> Schema;

    /// Validates a configuration before planning.
    fn validate(&self, config: &HostValue) -> Diagnostics;

    /// Runs Create.
    async fn create(&self, ctx: &RequestContext, plan: &HostValue) -> OperationResponse;

    /// Runs Read.
    async fn read(&self, ctx: &RequestContext, state: &HostValue) -> OperationResponse;

    /// Runs Update.
    async fn update(
        &self,
        ctx: &RequestContext,
        plan: &HostValue,
        state: &HostValue,
    ) -> OperationResponse;

    /// Runs Delete.
    async fn delete(&self, ctx: &RequestContext, state: &HostValue) -> OperationResponse;

    /// Runs Import.
    fn import(&self, id: &str) -> OperationResponse;
}

/// Publishes a [`ManagedResource`] as a [`ResourceHandler`].
pub struct ResourceAdapter<R> {
    resource: R,
}

impl<R: ManagedResource> ResourceAdapter<R> {
    /// Wraps a resource implementation.
    #[must_use]
    pub fn new(resource: R) -> Self {
        Self { resource }
    }

    fn decode(value: &HostValue, diagnostics: &mut Diagnostics) -> Option<R::Model> {
        match R::Model::from_host(value, &AttributePath::root()) {
            Ok(model) => Some(model),
            Err(diagnostic) => {
                diagnostics.push(diagnostic);
                None
            }
        }
    }

    fn decode_validated(&self, value: &HostValue, diagnostics: &mut Diagnostics) -> Option<R::Model> {
        let model = Self::decode(value, diagnostics)?;
        self.resource.validate(&model, diagnostics);
        (!diagnostics.has_errors()).then_some(model)
    }
}

#[async_trait]
impl<R: ManagedResource> ResourceHandler for ResourceAdapter<R> {
    fn name(&self) -> &'static str {
        R::NAME
    }

    fn schema(&self) -> Schema {
        self.resource.schema()
    }

    fn validate(&self, config: &HostValue) -> Diagnostics {
        let mut diagnostics = self.resource.schema().validate_config(config);
        if let Some(model) = Self::decode(config, &mut diagnostics) {
            self.resource.validate(&model, &mut diagnostics);
        }
        diagnostics
    }

    async fn create(&self, ctx: &RequestContext, plan: &HostValue) -> OperationResponse {
        let mut diagnostics = Diagnostics::new();
        let Some(model) = self.decode_validated(plan, &mut diagnostics) else {
            return OperationResponse::removed(diagnostics);
        };

        match self.resource.create(ctx, model, &mut diagnostics).await {
            Ok(created) => {
                info!(
                    resource = R::NAME,
                    id = R::id_of(&created).as_deref().unwrap_or_default(),
                    "created"
                );
                OperationResponse::with_state(created.to_host(), diagnostics)
            }
            Err(error) => {
                diagnostics.push(operation_error(R::LABEL, Operation::Create, None, &error));
                OperationResponse::removed(diagnostics)
            }
        }
    }

    async fn read(&self, ctx: &RequestContext, state: &HostValue) -> OperationResponse {
        let mut diagnostics = Diagnostics::new();
        let Some(model) = Self::decode(state, &mut diagnostics) else {
            return OperationResponse::unchanged(state, diagnostics);
        };
        let id = R::id_of(&model);

        match self.resource.read(ctx, model).await {
            Ok(refreshed) => OperationResponse::with_state(refreshed.to_host(), diagnostics),
            Err(error) if error.is_not_found() => {
                warn!(
                    resource = R::NAME,
                    id = id.as_deref().unwrap_or_default(),
                    "remote record vanished, removing from state"
                );
                OperationResponse::removed(diagnostics)
            }
            Err(error) => {
                diagnostics.push(operation_error(
                    R::LABEL,
                    Operation::Read,
                    id.as_deref(),
                    &error,
                ));
                OperationResponse::unchanged(state, diagnostics)
            }
        }
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        plan: &HostValue,
        state: &HostValue,
    ) -> OperationResponse {
        let mut diagnostics = Diagnostics::new();
        let Some(planned) = self.decode_validated(plan, &mut diagnostics) else {
            return OperationResponse::unchanged(state, diagnostics);
        };
        let Some(stored) = Self::decode(state, &mut diagnostics) else {
            return OperationResponse::unchanged(state, diagnostics);
        };
        let id = R::id_of(&stored);

        match self
            .resource
            .update(ctx, planned, stored, &mut diagnostics)
            .await
        {
            Ok(updated) => {
                info!(
                    resource = R::NAME,
                    id = id.as_deref().unwrap_or_default(),
                    "updated"
                );
                OperationResponse::with_state(updated.to_host(), diagnostics)
            }
            Err(error) => {
                diagnostics.push(operation_error(
                    R::LABEL,
                    Operation::Update,
                    id.as_deref(),
                    &error,
                ));
                OperationResponse::unchanged(state, diagnostics)
            }
        }
    }

    async fn delete(&self, ctx: &RequestContext, state: &HostValue) -> OperationResponse {
        let mut diagnostics = Diagnostics::new();
        let Some(model) = Self::decode(state, &mut diagnostics) else {
            return OperationResponse::unchanged(state, diagnostics);
        };
        let id = R::id_of(&model);

        match self.resource.delete(ctx, model, &mut diagnostics).await {
            Ok(()) => {
                info!(
                    resource = R::NAME,
                    id = id.as_deref().unwrap_or_default(),
                    "deleted"
                );
                OperationResponse::removed(diagnostics)
            }
            Err(error) if error.is_not_found() => OperationResponse::removed(diagnostics),
            Err(error) => {
                diagnostics.push(operation_error(
                    R::LABEL,
                    Operation::Delete,
                    id.as_deref(),
                    &error,
                ));
                OperationResponse::unchanged(state, diagnostics)
            }
        }
    }

    fn import(&self, id: &str) -> OperationResponse {
        let mut diagnostics = Diagnostics::new();
        let imported = ImportId::parse(id).and_then(|import_id| self.resource.import(&import_id));

        match imported {
            Ok(model) => OperationResponse::with_state(model.to_host(), diagnostics),
            Err(error) => {
                diagnostics.push(operation_error(
                    R::LABEL,
                    Operation::Import,
                    Some(id),
                    &error,
                ));
                OperationResponse::removed(diagnostics)
            }
        }
    }
}
