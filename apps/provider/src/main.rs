//! Okta Identity Governance provider process.

#![forbid(unsafe_code)]

mod host_shim;
mod provider_config;

use oig_application::GovernanceProvider;
use oig_core::{AppError, AppResult};
use oig_infrastructure::HttpGovernanceClient;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::provider_config::{ProviderConfig, init_tracing};

#[tokio::main]
async fn main() -> AppResult<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ProviderConfig::load()?;
    let client = HttpGovernanceClient::new(config.client_config())?;
    let provider = GovernanceProvider::new(
        &client.into_governance_client(),
        config.type_name_prefix.as_str(),
    );

    info!(
        org_url = %config.org_url,
        page_limit = config.page_limit,
        timeout_secs = config.timeout.as_secs(),
        prefix = %provider.prefix(),
        resources = provider.resource_type_names().len(),
        data_sources = provider.data_source_type_names().len(),
        "oig-provider started"
    );

    let shutdown = CancellationToken::new();
    let serving = host_shim::serve(
        &provider,
        &shutdown,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    );

    tokio::select! {
        result = serving => result,
        signal = tokio::signal::ctrl_c() => {
            shutdown.cancel();
            signal.map_err(|error| AppError::Internal(format!("failed to listen for shutdown: {error}")))?;
            warn!("interrupted; pending operations cancelled");
            Ok(())
        }
    }
}
