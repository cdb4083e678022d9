use async_trait::async_trait;
use oig_core::{
    AppResult, AttributePath, Diagnostics, HostType, HostValue, Requirement, RequestContext,
    Schema,
};
use tracing::debug;

use super::errors::{Operation, operation_error};
use super::resource::{ManagedResource, OperationResponse};

/// Typed read-only projection of remote state.
#[async_trait]
pub trait ManagedDataSource: Send + Sync {
    /// Configuration and state model; inputs are read from it and outputs
    /// written back into it.
    type Model: HostType + Send + Sync + 'static;

    /// Entity name appended to the provider prefix.
    const NAME: &'static str;

    /// Human-readable entity name used in diagnostics.
    const LABEL: &'static str;

    /// Data source schema.
    fn schema(&self) -> Schema;

    /// Reads remote state for the given configuration.
    async fn read(&self, ctx: &RequestContext, config: Self::Model) -> AppResult<Self::Model>;
}

/// Object-safe data source entry published to the host runtime.
#[async_trait]
pub trait DataSourceHandler: Send + Sync {
    /// Entity name without the provider prefix.
    fn name(&self) -> &'static str;

    /// Data source schema.
    fn schema(&self) -> Schema;

    /// Reads remote state for a configuration.
    async fn read(&self, ctx: &RequestContext, config: &HostValue) -> OperationResponse;
}

fn decode_config<M: HostType>(schema: &Schema, config: &HostValue) -> Result<M, Diagnostics> {
    let mut diagnostics = schema.validate_config(config);
    if diagnostics.has_errors() {
        return Err(diagnostics);
    }

    M::from_host(config, &AttributePath::root()).map_err(|diagnostic| {
        diagnostics.push(diagnostic);
        diagnostics
    })
}

fn finish_read<M: HostType>(
    name: &'static str,
    label: &'static str,
    result: AppResult<M>,
) -> OperationResponse {
    let mut diagnostics = Diagnostics::new();
    match result {
        Ok(state) => {
            debug!(data_source = name, "read");
            OperationResponse::with_state(state.to_host(), diagnostics)
        }
        Err(error) => {
            diagnostics.push(operation_error(label, Operation::Read, None, &error));
            OperationResponse::removed(diagnostics)
        }
    }
}

/// Publishes a [`ManagedDataSource`] as a [`DataSourceHandler`].
pub struct DataSourceAdapter<D> {
    data_source: D,
}

impl<D: ManagedDataSource> DataSourceAdapter<D> {
    /// Wraps a data source implementation.
    #[must_use]
    pub fn new(data_source: D) -> Self {
        Self { data_source }
    }
}

#[async_trait]
impl<D: ManagedDataSource> DataSourceHandler for DataSourceAdapter<D> {
    fn name(&self) -> &'static str {
        D::NAME
    }

    fn schema(&self) -> Schema {
        self.data_source.schema()
    }

    async fn read(&self, ctx: &RequestContext, config: &HostValue) -> OperationResponse {
        let model = match decode_config::<D::Model>(&self.data_source.schema(), config) {
            Ok(model) => model,
            Err(diagnostics) => return OperationResponse::removed(diagnostics),
        };

        finish_read(D::NAME, D::LABEL, self.data_source.read(ctx, model).await)
    }
}

/// Singular data source that looks one record up through its resource.
///
/// The schema is the resource schema with every attribute computed except the
/// lookup keys, which become required. A missing record is an error here,
/// unlike resource reads.
pub struct ResourceLookup<R> {
    resource: R,
    keys: &'static [&'static str],
}

impl<R: ManagedResource> ResourceLookup<R> {
    /// Wraps a resource with the attributes that identify one record.
    #[must_use]
    pub fn new(resource: R, keys: &'static [&'static str]) -> Self {
        Self { resource, keys }
    }
}

#[async_trait]
impl<R: ManagedResource> DataSourceHandler for ResourceLookup<R> {
    fn name(&self) -> &'static str {
        R::NAME
    }

    fn schema(&self) -> Schema {
        self.keys.iter().fold(
            self.resource.schema().into_computed(),
            |schema, key| schema.with_requirement(key, Requirement::Required),
        )
    }

    async fn read(&self, ctx: &RequestContext, config: &HostValue) -> OperationResponse {
        let model = match decode_config::<R::Model>(&DataSourceHandler::schema(self), config) {
            Ok(model) => model,
            Err(diagnostics) => return OperationResponse::removed(diagnostics),
        };

        finish_read(R::NAME, R::LABEL, self.resource.read(ctx, model).await)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use oig_core::{AppError, AppResult, HostValue, RequestContext, Schema, SchemaAttribute};

    use super::{DataSourceAdapter, DataSourceHandler, ManagedDataSource};

    oig_core::host_record! {
        struct Echo {
            id: String,
            label: String,
        }
    }

    struct EchoSource;

    #[async_trait]
    impl ManagedDataSource for EchoSource {
        type Model = Echo;

        const NAME: &'static str = "echo";
        const LABEL: &'static str = "Echo";

        fn schema(&self) -> Schema {
            Schema::new("echo")
                .with_attribute(SchemaAttribute::required_string("id", "id"))
                .with_attribute(SchemaAttribute::computed_string("label", "label"))
        }

        async fn read(&self, _ctx: &RequestContext, mut config: Echo) -> AppResult<Echo> {
            match config.id.as_deref() {
                Some("missing") => Err(AppError::NotFound("echo 'missing'".to_owned())),
                Some(id) => {
                    config.label = oig_core::Attr::known(format!("label of {id}"));
                    Ok(config)
                }
                None => Err(AppError::Internal("unreachable".to_owned())),
            }
        }
    }

    #[tokio::test]
    async fn reads_from_config_and_writes_state() {
        let handler = DataSourceAdapter::new(EchoSource);
        let config = HostValue::object([("id", HostValue::string("e1")), ("label", HostValue::Null)]);

        let response = handler.read(&RequestContext::new(), &config).await;

        assert!(response.diagnostics.is_empty());
        let state = response.state.unwrap_or(HostValue::Null);
        assert_eq!(state.get("label").and_then(HostValue::as_str), Some("label of e1"));
    }

    #[tokio::test]
    async fn missing_lookup_keys_fail_before_any_read() {
        let handler = DataSourceAdapter::new(EchoSource);
        let response = handler
            .read(&RequestContext::new(), &HostValue::object::<&str>([]))
            .await;

        assert!(response.state.is_none());
        assert_eq!(response.diagnostics.len(), 1);
    }

    #[tokio::test]
    async fn not_found_is_an_error_for_data_sources() {
        let handler = DataSourceAdapter::new(EchoSource);
        let config = HostValue::object([("id", HostValue::string("missing"))]);

        let response = handler.read(&RequestContext::new(), &config).await;

        assert!(response.state.is_none());
        assert!(response.diagnostics.has_errors());
        let summary = response.diagnostics.iter().next().map(|diagnostic| diagnostic.summary.clone());
        assert_eq!(summary.as_deref(), Some("Error reading Echo"));
    }
}
