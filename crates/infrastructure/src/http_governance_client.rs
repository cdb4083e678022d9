use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use oig_application::GovernanceClient;
use oig_core::{AppError, AppResult, RequestContext};
use oig_domain::{ListQuery, Page};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

mod access_requests;
mod campaigns;
mod catalogs;
mod collections;
mod entitlements;
mod errors;
mod grants;

#[cfg(test)]
mod tests;

use errors::{status_error, transport_error};

/// Credentials sent with every governance call.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Okta API token, sent as `SSWS <token>`.
    ApiToken(String),
    /// OAuth access token, sent as `Bearer <token>`.
    AccessToken(String),
}

impl Credentials {
    fn header_value(&self) -> String {
        match self {
            Self::ApiToken(token) => format!("SSWS {token}"),
            Self::AccessToken(token) => format!("Bearer {token}"),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiToken(_) => formatter.write_str("ApiToken(<redacted>)"),
            Self::AccessToken(_) => formatter.write_str("AccessToken(<redacted>)"),
        }
    }
}

/// Connection settings of [`HttpGovernanceClient`].
#[derive(Debug, Clone)]
pub struct HttpGovernanceConfig {
    /// Okta org URL, e.g. `https://example.okta.com`.
    pub org_url: Url,
    /// Credentials for the `Authorization` header.
    pub credentials: Credentials,
    /// Timeout applied to each HTTP exchange.
    pub timeout: Duration,
    /// Page size sent when a list query carries none.
    pub page_limit: u32,
}

/// Okta Identity Governance REST client implementing every governance port.
pub struct HttpGovernanceClient {
    http_client: reqwest::Client,
    org_url: Url,
    credentials: Credentials,
    page_limit: u32,
}

#[derive(Clone, Copy)]
enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

impl HttpGovernanceClient {
    /// Builds the client; fails when the org URL cannot carry API paths.
    pub fn new(config: HttpGovernanceConfig) -> AppResult<Self> {
        if config.org_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "org url '{}' is not a base url",
                config.org_url
            )));
        }
        if config.page_limit == 0 {
            return Err(AppError::Validation(
                "page limit must be greater than zero".to_owned(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("oig-provider/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;

        Ok(Self {
            http_client,
            org_url: config.org_url,
            credentials: config.credentials,
            page_limit: config.page_limit,
        })
    }

    /// Wraps the client into the handle the provider registries consume.
    #[must_use]
    pub fn into_governance_client(self) -> GovernanceClient {
        GovernanceClient::from_api(Arc::new(self))
    }

    fn v1(&self, segments: &[&str]) -> AppResult<Url> {
        self.endpoint(ApiVersion::V1, segments)
    }

    fn v2(&self, segments: &[&str]) -> AppResult<Url> {
        self.endpoint(ApiVersion::V2, segments)
    }

    fn endpoint(&self, version: ApiVersion, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.org_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                AppError::Validation(format!("org url '{}' is not a base url", self.org_url))
            })?;
            path.clear()
                .extend(["governance", "api", version.as_str()])
                .extend(segments);
        }
        url.set_query(None);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, ctx: &RequestContext, url: Url) -> AppResult<T> {
        let body = self.exchange(ctx, Method::GET, url, |request| request).await?;
        decode(&body)
    }

    async fn list<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        mut url: Url,
        query: &ListQuery,
    ) -> AppResult<Page<T>> {
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(filter) = query.filter.as_deref() {
                pairs.append_pair("filter", filter);
            }
            if let Some(after) = query.after.as_deref() {
                pairs.append_pair("after", after);
            }
            pairs.append_pair("limit", &query.limit.unwrap_or(self.page_limit).to_string());
        }
        self.get(ctx, url).await
    }

    async fn send<B, T>(
        &self,
        ctx: &RequestContext,
        method: Method,
        url: Url,
        payload: &B,
    ) -> AppResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let body = self
            .exchange(ctx, method, url, |request| request.json(payload))
            .await?;
        decode(&body)
    }

    /// Bodyless POST whose response carries the updated object.
    async fn post_action<T: DeserializeOwned>(&self, ctx: &RequestContext, url: Url) -> AppResult<T> {
        let body = self.exchange(ctx, Method::POST, url, |request| request).await?;
        decode(&body)
    }

    /// Call whose response body is ignored.
    async fn execute(&self, ctx: &RequestContext, method: Method, url: Url) -> AppResult<()> {
        self.exchange(ctx, method, url, |request| request).await?;
        Ok(())
    }

    async fn exchange<F>(
        &self,
        ctx: &RequestContext,
        method: Method,
        url: Url,
        configure: F,
    ) -> AppResult<String>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        ctx.ensure_active()?;
        debug!(method = %method, path = url.path(), "governance request");

        let request = configure(
            self.http_client
                .request(method.clone(), url.clone())
                .header(AUTHORIZATION, self.credentials.header_value())
                .header(ACCEPT, "application/json"),
        );
        let round_trip = async {
            let response = request.send().await.map_err(transport_error)?;
            let status = response.status();
            let body = response.text().await.map_err(transport_error)?;
            Ok::<_, AppError>((status, body))
        };

        let (status, body) = tokio::select! {
            () = ctx.cancelled() => return Err(AppError::Cancelled),
            result = round_trip => result?,
        };

        if !status.is_success() {
            warn!(
                method = %method,
                path = url.path(),
                status = status.as_u16(),
                "governance request failed"
            );
            return Err(status_error(status.as_u16(), &body));
        }

        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> AppResult<T> {
    serde_json::from_str(body)
        .map_err(|error| AppError::Decode(format!("unexpected response body: {error}")))
}
