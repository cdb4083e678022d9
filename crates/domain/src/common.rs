use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use oig_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Hypermedia link returned by the governance service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Absolute or relative target URL.
    pub href: String,
}

/// `_links` object attached to records and list pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    /// Canonical location of the record or page.
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    /// Next page of a cursor-paginated listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records in server order.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Pagination links.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl<T> Page<T> {
    /// Creates a page with an optional next link.
    #[must_use]
    pub fn new(data: Vec<T>, next_href: Option<String>) -> Self {
        Self {
            data,
            links: Some(Links {
                self_link: None,
                next: next_href.map(|href| Link { href }),
            }),
        }
    }

    /// Returns the `next` href, if present.
    #[must_use]
    pub fn next_href(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.next.as_ref())
            .map(|link| link.href.as_str())
    }
}

/// Query parameters accepted by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Filter expression; `None` lists everything.
    pub filter: Option<String>,
    /// Opaque pagination cursor.
    pub after: Option<String>,
    /// Page size hint.
    pub limit: Option<u32>,
}

impl ListQuery {
    /// Creates a query from a composed filter; an empty filter means none.
    #[must_use]
    pub fn filtered(filter: impl Into<String>) -> Self {
        let filter = filter.into();
        Self {
            filter: (!filter.is_empty()).then_some(filter),
            after: None,
            limit: None,
        }
    }

    /// Returns the same query positioned at another cursor.
    #[must_use]
    pub fn with_after(&self, after: Option<String>) -> Self {
        Self {
            after,
            ..self.clone()
        }
    }

    /// Sets the page size hint.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }
}

/// Server-maintained audit fields shared by most records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditMetadata {
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Creator principal id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Last modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Last modifier principal id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_by: Option<String>,
}

/// Reference to an object by external id and type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalRef {
    /// Okta id of the referenced object.
    pub external_id: String,
    /// Object type, e.g. `APPLICATION` or `OKTA_USER`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Reference to an object by id only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    /// Referenced id.
    pub id: String,
}

/// Reference to an application or group resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    /// Resource id.
    pub resource_id: String,
    /// `APPLICATION` or `GROUP`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

/// Entitlement chosen by id together with a subset of its values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementSelection {
    /// Entitlement id.
    pub id: String,
    /// Selected values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<IdRef>,
}

/// Source of a grant or assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    /// Created through an access request.
    AccessRequest,
    /// Created by an administrator.
    Admin,
    /// Created through the API.
    Api,
    /// No specific actor.
    None,
}

impl Actor {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessRequest => "ACCESS_REQUEST",
            Self::Admin => "ADMIN",
            Self::Api => "API",
            Self::None => "NONE",
        }
    }

    /// Every accepted wire value.
    pub const VALUES: &'static [&'static str] = &["ACCESS_REQUEST", "ADMIN", "API", "NONE"];
}

impl FromStr for Actor {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ACCESS_REQUEST" => Ok(Self::AccessRequest),
            "ADMIN" => Ok(Self::Admin),
            "API" => Ok(Self::Api),
            "NONE" => Ok(Self::None),
            _ => Err(AppError::Validation(format!("unknown actor '{value}'"))),
        }
    }
}

/// Formats a timestamp in RFC3339 with second precision.
#[must_use]
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
#[must_use]
pub fn format_timestamp_millis(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an RFC3339 timestamp, with or without fractional seconds.
pub fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|error| {
            AppError::Validation(format!("'{value}' is not an RFC3339 timestamp: {error}"))
        })
}

#[cfg(test)]
mod tests {
    use super::{Page, format_timestamp, format_timestamp_millis, parse_timestamp};

    #[test]
    fn both_timestamp_forms_parse_to_the_same_instant() {
        let plain = parse_timestamp("2026-03-01T09:30:00Z");
        let millis = parse_timestamp("2026-03-01T09:30:00.000Z");
        assert!(plain.is_ok());
        assert_eq!(plain.ok(), millis.ok());
    }

    #[test]
    fn timestamps_format_in_both_precisions() {
        let parsed = parse_timestamp("2026-03-01T09:30:00+02:00");
        let parsed = parsed.unwrap_or_else(|_| unreachable!());
        assert_eq!(format_timestamp(&parsed), "2026-03-01T07:30:00Z");
        assert_eq!(format_timestamp_millis(&parsed), "2026-03-01T07:30:00.000Z");
    }

    #[test]
    fn page_decodes_links() {
        let page: Result<Page<serde_json::Value>, _> = serde_json::from_str(
            r#"{"data":[{"id":"a"}],"_links":{"self":{"href":"/x"},"next":{"href":"/x?after=abc"}}}"#,
        );
        let page = page.unwrap_or_else(|_| unreachable!());
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.next_href(), Some("/x?after=abc"));
    }
}
