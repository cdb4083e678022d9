//! Line-delimited JSON bridge between a host runtime and the provider registries.

use oig_application::GovernanceProvider;
use oig_core::{AppError, AppResult, Diagnostic, Diagnostics, HostValue, RequestContext, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// One host request.
#[derive(Debug, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum ShimRequest {
    ListTypes,
    Schema {
        type_name: String,
        #[serde(default)]
        data_source: bool,
    },
    Validate {
        type_name: String,
        config: Value,
    },
    Create {
        type_name: String,
        plan: Value,
    },
    Read {
        type_name: String,
        state: Value,
    },
    Update {
        type_name: String,
        plan: Value,
        state: Value,
    },
    Delete {
        type_name: String,
        state: Value,
    },
    Import {
        type_name: String,
        id: String,
    },
    ReadDataSource {
        type_name: String,
        config: Value,
    },
}

/// One host response. `state: null` means the object is gone.
#[derive(Debug, Default, Serialize)]
pub struct ShimResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_sources: Option<Vec<String>>,
    pub diagnostics: Diagnostics,
}

impl ShimResponse {
    fn failed(summary: &str, detail: impl Into<String>) -> Self {
        Self {
            diagnostics: Diagnostic::error(summary, detail).into(),
            ..Self::default()
        }
    }

    fn operation(state: Option<HostValue>, diagnostics: Diagnostics) -> Self {
        Self {
            state: Some(state.map_or(Value::Null, |state| state.to_json())),
            diagnostics,
            ..Self::default()
        }
    }
}

/// Serves requests until `input` is exhausted.
pub async fn serve<R, W>(
    provider: &GovernanceProvider,
    shutdown: &CancellationToken,
    input: R,
    mut output: W,
) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.map_err(io_error)? {
        if line.trim().is_empty() {
            continue;
        }

        let ctx = RequestContext::with_cancellation(shutdown.child_token());
        let response = match serde_json::from_str::<ShimRequest>(&line) {
            Ok(request) => handle(provider, &ctx, request).await,
            Err(error) => ShimResponse::failed("Invalid request", error.to_string()),
        };

        let mut encoded = serde_json::to_string(&response)
            .map_err(|error| AppError::Internal(format!("failed to encode response: {error}")))?;
        encoded.push('\n');
        output.write_all(encoded.as_bytes()).await.map_err(io_error)?;
        output.flush().await.map_err(io_error)?;
    }

    info!("host input closed");
    Ok(())
}

pub async fn handle(
    provider: &GovernanceProvider,
    ctx: &RequestContext,
    request: ShimRequest,
) -> ShimResponse {
    debug!(request = ?request, "host request");
    match request {
        ShimRequest::ListTypes => ShimResponse {
            resources: Some(provider.resource_type_names()),
            data_sources: Some(provider.data_source_type_names()),
            ..ShimResponse::default()
        },
        ShimRequest::Schema {
            type_name,
            data_source: true,
        } => match provider.data_source(&type_name) {
            Some(handler) => ShimResponse {
                schema: Some(handler.schema()),
                ..ShimResponse::default()
            },
            None => unknown_data_source(&type_name),
        },
        ShimRequest::Schema { type_name, .. } => match provider.resource(&type_name) {
            Some(handler) => ShimResponse {
                schema: Some(handler.schema()),
                ..ShimResponse::default()
            },
            None => unknown_resource(&type_name),
        },
        ShimRequest::Validate { type_name, config } => match provider.resource(&type_name) {
            Some(handler) => ShimResponse {
                diagnostics: handler.validate(&HostValue::from_json(&config)),
                ..ShimResponse::default()
            },
            None => unknown_resource(&type_name),
        },
        ShimRequest::Create { type_name, plan } => match provider.resource(&type_name) {
            Some(handler) => {
                let response = handler.create(ctx, &HostValue::from_json(&plan)).await;
                ShimResponse::operation(response.state, response.diagnostics)
            }
            None => unknown_resource(&type_name),
        },
        ShimRequest::Read { type_name, state } => match provider.resource(&type_name) {
            Some(handler) => {
                let response = handler.read(ctx, &HostValue::from_json(&state)).await;
                ShimResponse::operation(response.state, response.diagnostics)
            }
            None => unknown_resource(&type_name),
        },
        ShimRequest::Update {
            type_name,
            plan,
            state,
        } => match provider.resource(&type_name) {
            Some(handler) => {
                let response = handler
                    .update(ctx, &HostValue::from_json(&plan), &HostValue::from_json(&state))
                    .await;
                ShimResponse::operation(response.state, response.diagnostics)
            }
            None => unknown_resource(&type_name),
        },
        ShimRequest::Delete { type_name, state } => match provider.resource(&type_name) {
            Some(handler) => {
                let response = handler.delete(ctx, &HostValue::from_json(&state)).await;
                ShimResponse::operation(response.state, response.diagnostics)
            }
            None => unknown_resource(&type_name),
        },
        ShimRequest::Import { type_name, id } => match provider.resource(&type_name) {
            Some(handler) => {
                let response = handler.import(&id);
                ShimResponse::operation(response.state, response.diagnostics)
            }
            None => unknown_resource(&type_name),
        },
        ShimRequest::ReadDataSource { type_name, config } => {
            match provider.data_source(&type_name) {
                Some(handler) => {
                    let response = handler.read(ctx, &HostValue::from_json(&config)).await;
                    ShimResponse::operation(response.state, response.diagnostics)
                }
                None => unknown_data_source(&type_name),
            }
        }
    }
}

fn unknown_resource(type_name: &str) -> ShimResponse {
    ShimResponse::failed(
        "Unknown resource type",
        format!("no resource type named '{type_name}'"),
    )
}

fn unknown_data_source(type_name: &str) -> ShimResponse {
    ShimResponse::failed(
        "Unknown data source",
        format!("no data source named '{type_name}'"),
    )
}

fn io_error(error: std::io::Error) -> AppError {
    AppError::Internal(format!("host i/o error: {error}"))
}
