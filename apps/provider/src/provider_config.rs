use std::env;
use std::time::Duration;

use oig_application::DEFAULT_TYPE_NAME_PREFIX;
use oig_core::{AppError, AppResult};
use oig_infrastructure::{Credentials, HttpGovernanceConfig};
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PAGE_LIMIT: u32 = 200;

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub org_url: Url,
    pub credentials: Credentials,
    pub timeout: Duration,
    pub page_limit: u32,
    pub type_name_prefix: String,
}

impl ProviderConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let org_url = read("OKTA_ORG_URL")
            .ok_or_else(|| AppError::Validation("OKTA_ORG_URL is required".to_owned()))?;
        let org_url = Url::parse(&org_url).map_err(|error| {
            AppError::Validation(format!("invalid OKTA_ORG_URL value '{org_url}': {error}"))
        })?;
        if !matches!(org_url.scheme(), "https" | "http") {
            return Err(AppError::Validation(
                "OKTA_ORG_URL must be an http(s) url".to_owned(),
            ));
        }

        let credentials = match (read("OKTA_API_TOKEN"), read("OKTA_ACCESS_TOKEN")) {
            (Some(token), None) => Credentials::ApiToken(token),
            (None, Some(token)) => Credentials::AccessToken(token),
            (Some(_), Some(_)) => {
                return Err(AppError::Validation(
                    "set only one of OKTA_API_TOKEN or OKTA_ACCESS_TOKEN".to_owned(),
                ));
            }
            (None, None) => {
                return Err(AppError::Validation(
                    "OKTA_API_TOKEN or OKTA_ACCESS_TOKEN is required".to_owned(),
                ));
            }
        };

        let timeout_secs = parse_or(read("OIG_HTTP_TIMEOUT_SECS"), "OIG_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(AppError::Validation(
                "OIG_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        let page_limit = parse_or(read("OIG_PAGE_LIMIT"), "OIG_PAGE_LIMIT", DEFAULT_PAGE_LIMIT)?;
        if page_limit == 0 {
            return Err(AppError::Validation(
                "OIG_PAGE_LIMIT must be greater than zero".to_owned(),
            ));
        }

        let type_name_prefix = read("OIG_TYPE_NAME_PREFIX")
            .unwrap_or_else(|| DEFAULT_TYPE_NAME_PREFIX.to_owned());

        Ok(Self {
            org_url,
            credentials,
            timeout: Duration::from_secs(timeout_secs),
            page_limit,
            type_name_prefix,
        })
    }

    pub fn client_config(&self) -> HttpGovernanceConfig {
        HttpGovernanceConfig {
            org_url: self.org_url.clone(),
            credentials: self.credentials.clone(),
            timeout: self.timeout,
            page_limit: self.page_limit,
        }
    }
}

fn parse_or<T>(value: Option<String>, name: &str, default: T) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(value) => value.parse::<T>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

/// Logs go to stderr; stdout carries the host protocol.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
