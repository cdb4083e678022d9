//! Record shapes and mapping helpers shared by several entities.

use chrono::{DateTime, Utc};
use oig_core::{
    AppError, AppResult, Attr, AttributePath, AttributeType, Diagnostics, NestedBlock, Schema,
    SchemaAttribute,
};
use oig_domain::validation::one_of;
use oig_domain::{
    AuditMetadata, EntitlementSelection, ExternalRef, IdRef, Links, RequestedItem,
    RequesterFieldValue, ResourceRef, format_timestamp, parse_timestamp,
};

use crate::provider::check;

oig_core::host_record! {
    /// Reference by id.
    pub struct IdModel {
        /// Referenced id.
        pub id: String,
    }
}

impl IdModel {
    /// Maps a wire reference.
    #[must_use]
    pub fn from_ref(reference: &IdRef) -> Self {
        Self {
            id: Attr::known(reference.id.clone()),
        }
    }

    /// Returns the wire reference, skipping entries without a known id.
    #[must_use]
    pub fn to_ref(&self) -> Option<IdRef> {
        self.id.known_cloned().map(|id| IdRef { id })
    }
}

oig_core::host_record! {
    /// Reference to an application or group resource.
    pub struct ResourceRefModel {
        /// Resource id.
        pub resource_id: String,
        /// `APPLICATION` or `GROUP`.
        pub resource_type: String,
    }
}

impl ResourceRefModel {
    /// Maps a wire reference.
    #[must_use]
    pub fn from_ref(reference: &ResourceRef) -> Self {
        Self {
            resource_id: Attr::known(reference.resource_id.clone()),
            resource_type: Attr::from_option(reference.resource_type.clone()),
        }
    }

    /// Returns the wire reference, skipping entries without a known id.
    #[must_use]
    pub fn to_ref(&self) -> Option<ResourceRef> {
        Some(ResourceRef {
            resource_id: self.resource_id.known_cloned()?,
            resource_type: self.resource_type.known_cloned(),
        })
    }
}

oig_core::host_record! {
    /// Reference by external id and object type.
    pub struct ExternalRefModel {
        /// Okta id of the referenced object.
        pub external_id: String,
        /// Object type.
        pub kind as "type": String,
    }
}

impl ExternalRefModel {
    /// Maps a wire reference.
    #[must_use]
    pub fn from_ref(reference: &ExternalRef) -> Self {
        Self {
            external_id: Attr::known(reference.external_id.clone()),
            kind: Attr::known(reference.kind.clone()),
        }
    }

    /// Returns the wire reference when both parts are known.
    #[must_use]
    pub fn to_ref(&self) -> Option<ExternalRef> {
        Some(ExternalRef {
            external_id: self.external_id.known_cloned()?,
            kind: self.kind.known_cloned()?,
        })
    }
}

oig_core::host_record! {
    /// Entitlement picked together with some of its values.
    pub struct EntitlementSelectionModel {
        /// Entitlement id.
        pub id: String,
        /// Selected values.
        pub values: Vec<IdModel>,
    }
}

impl EntitlementSelectionModel {
    /// Maps a wire selection.
    #[must_use]
    pub fn from_selection(selection: &EntitlementSelection) -> Self {
        Self {
            id: Attr::known(selection.id.clone()),
            values: list_or_null(selection.values.iter().map(IdModel::from_ref).collect()),
        }
    }

    /// Returns the wire selection, skipping entries without a known id.
    #[must_use]
    pub fn to_selection(&self) -> Option<EntitlementSelection> {
        Some(EntitlementSelection {
            id: self.id.known_cloned()?,
            values: known_list(&self.values)
                .iter()
                .filter_map(IdModel::to_ref)
                .collect(),
        })
    }
}

oig_core::host_record! {
    /// Access asked for by a request.
    pub struct RequestedItemModel {
        /// Catalog entry id.
        pub entry_id: String,
        /// Resource id.
        pub resource_id: String,
        /// Access scope id.
        pub access_scope_id: String,
        /// Access scope type.
        pub access_scope_type: String,
        /// Requested object type.
        pub kind as "type": String,
    }
}

impl RequestedItemModel {
    /// Maps a wire item.
    #[must_use]
    pub fn from_item(item: &RequestedItem) -> Self {
        Self {
            entry_id: Attr::from_option(item.entry_id.clone()),
            resource_id: Attr::from_option(item.resource_id.clone()),
            access_scope_id: Attr::from_option(item.access_scope_id.clone()),
            access_scope_type: Attr::from_option(item.access_scope_type.clone()),
            kind: Attr::from_option(item.kind.clone()),
        }
    }

    /// Returns the wire item with the known fields.
    #[must_use]
    pub fn to_item(&self) -> RequestedItem {
        RequestedItem {
            entry_id: self.entry_id.known_cloned(),
            resource_id: self.resource_id.known_cloned(),
            access_scope_id: self.access_scope_id.known_cloned(),
            access_scope_type: self.access_scope_type.known_cloned(),
            kind: self.kind.known_cloned(),
        }
    }
}

oig_core::host_record! {
    /// Answer to one requester field.
    pub struct FieldValueModel {
        /// Field id.
        pub id: String,
        /// Single answer.
        pub value: String,
        /// Multiple answers.
        pub values: Vec<String>,
    }
}

impl FieldValueModel {
    /// Maps a wire answer.
    #[must_use]
    pub fn from_value(value: &RequesterFieldValue) -> Self {
        Self {
            id: Attr::known(value.id.clone()),
            value: Attr::from_option(value.value.clone()),
            values: list_or_null(value.values.clone()),
        }
    }

    /// Returns the wire answer, skipping entries without a known id.
    #[must_use]
    pub fn to_value(&self) -> Option<RequesterFieldValue> {
        Some(RequesterFieldValue {
            id: self.id.known_cloned()?,
            value: self.value.known_cloned(),
            values: known_list(&self.values),
        })
    }
}

/// Schema of a requested item block; every field is optional.
#[must_use]
pub fn requested_item_schema(description: &str) -> Schema {
    Schema::new(description)
        .with_attribute(SchemaAttribute::optional_string("entry_id", "Catalog entry id."))
        .with_attribute(SchemaAttribute::optional_string("resource_id", "Resource id."))
        .with_attribute(SchemaAttribute::optional_string("access_scope_id", "Access scope id."))
        .with_attribute(SchemaAttribute::optional_string(
            "access_scope_type",
            "Access scope type.",
        ))
        .with_attribute(SchemaAttribute::optional_string("type", "Requested object type."))
}

/// Schema of the requester field answers block.
#[must_use]
pub fn field_values_block() -> NestedBlock {
    NestedBlock::list(
        "requester_field_values",
        Schema::new("Answer to one requester field.")
            .with_attribute(SchemaAttribute::required_string("id", "Field id."))
            .with_attribute(SchemaAttribute::optional_string("value", "Single answer."))
            .with_attribute(string_list("values", "Multiple answers.", true)),
    )
}

/// Maps requester field answers, skipping entries without a known id.
#[must_use]
pub fn field_values(values: &Attr<Vec<FieldValueModel>>) -> Vec<RequesterFieldValue> {
    known_list(values)
        .iter()
        .filter_map(FieldValueModel::to_value)
        .collect()
}

/// Schema of an external reference block.
#[must_use]
pub fn external_ref_schema(description: &str, types: &str) -> Schema {
    Schema::new(description)
        .with_attribute(SchemaAttribute::required_string("external_id", "Okta id."))
        .with_attribute(SchemaAttribute::required_string("type", types))
}

/// Schema of an entitlement selection block.
#[must_use]
pub fn entitlement_selection_schema(description: &str) -> Schema {
    Schema::new(description)
        .with_attribute(SchemaAttribute::required_string("id", "Entitlement id."))
        .with_block(NestedBlock::list("values", id_schema("Selected value.")))
}

oig_core::host_record! {
    /// One hypermedia link.
    pub struct HrefModel {
        /// Target URL.
        pub href: String,
    }
}

oig_core::host_record! {
    /// `_links` projection exposed as `links.self.href`.
    pub struct LinksModel {
        /// Canonical location of the record.
        pub self_link as "self": HrefModel,
    }
}

impl LinksModel {
    /// Maps server links; absent links become null.
    #[must_use]
    pub fn from_links(links: Option<&Links>) -> Attr<Self> {
        Attr::from_option(links.map(|links| Self {
            self_link: Attr::from_option(links.self_link.as_ref().map(|link| HrefModel {
                href: Attr::known(link.href.clone()),
            })),
        }))
    }
}

/// Schema of the `id` reference block.
#[must_use]
pub fn id_schema(description: &str) -> Schema {
    Schema::new(description).with_attribute(SchemaAttribute::required_string("id", "Referenced id."))
}

/// Schema of the resource reference block.
#[must_use]
pub fn resource_ref_schema(description: &str) -> Schema {
    Schema::new(description)
        .with_attribute(SchemaAttribute::required_string("resource_id", "Resource id."))
        .with_attribute(SchemaAttribute::optional_string(
            "resource_type",
            "APPLICATION or GROUP.",
        ))
}

/// Schema of the computed `links` block.
#[must_use]
pub fn links_block() -> NestedBlock {
    NestedBlock::single(
        "links",
        Schema::new("Hypermedia links.").with_block(NestedBlock::single(
            "self",
            Schema::new("Canonical location.")
                .with_attribute(SchemaAttribute::computed_string("href", "Target URL.")),
        )),
    )
}

/// Adds the computed audit attributes.
#[must_use]
pub fn with_audit_attributes(schema: Schema) -> Schema {
    schema
        .with_attribute(SchemaAttribute::computed_string("created", "Creation time (RFC3339)."))
        .with_attribute(SchemaAttribute::computed_string("created_by", "Creator id."))
        .with_attribute(SchemaAttribute::computed_string(
            "last_updated",
            "Last modification time (RFC3339).",
        ))
        .with_attribute(SchemaAttribute::computed_string(
            "last_updated_by",
            "Last modifier id.",
        ))
}

/// Audit attributes projected from server metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditState {
    /// Creation time.
    pub created: Attr<String>,
    /// Creator id.
    pub created_by: Attr<String>,
    /// Last modification time.
    pub last_updated: Attr<String>,
    /// Last modifier id.
    pub last_updated_by: Attr<String>,
}

impl AuditState {
    /// Formats server audit fields with second precision.
    #[must_use]
    pub fn from_metadata(audit: &AuditMetadata) -> Self {
        Self::formatted(audit, format_timestamp)
    }

    /// Formats server audit fields with a custom timestamp format.
    #[must_use]
    pub fn formatted(audit: &AuditMetadata, format: fn(&DateTime<Utc>) -> String) -> Self {
        Self {
            created: Attr::from_option(audit.created.as_ref().map(format)),
            created_by: Attr::from_option(audit.created_by.clone()),
            last_updated: Attr::from_option(audit.last_updated.as_ref().map(format)),
            last_updated_by: Attr::from_option(audit.last_updated_by.clone()),
        }
    }
}

/// Schema attribute for a list of strings.
#[must_use]
pub fn string_list(name: &str, description: &str, optional: bool) -> SchemaAttribute {
    if optional {
        SchemaAttribute::optional(name, AttributeType::string_list(), description)
    } else {
        SchemaAttribute::computed(name, AttributeType::string_list(), description)
    }
}

/// Returns the known value or a validation error naming the attribute.
pub fn require<T: Clone>(value: &Attr<T>, field: &str) -> AppResult<T> {
    value
        .known_cloned()
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

/// Returns the server id stored in state.
pub fn state_id(id: &Attr<String>, label: &str) -> AppResult<String> {
    id.non_blank()
        .map(str::to_owned)
        .ok_or_else(|| AppError::Internal(format!("{label} state has no id")))
}

/// Reads a known list, treating null and unknown as empty.
#[must_use]
pub fn known_list<T: Clone>(value: &Attr<Vec<T>>) -> Vec<T> {
    value.known_cloned().unwrap_or_default()
}

/// Maps a server list; an empty list becomes null.
#[must_use]
pub fn list_or_null<T>(items: Vec<T>) -> Attr<Vec<T>> {
    if items.is_empty() {
        Attr::Null
    } else {
        Attr::Known(items)
    }
}

/// Maps a server list for a user-authored attribute: an empty list becomes
/// null unless the prior value was an explicit empty list.
#[must_use]
pub fn refresh_list<T>(prior: &Attr<Vec<T>>, items: Vec<T>) -> Attr<Vec<T>> {
    match prior {
        Attr::Known(previous) if previous.is_empty() && items.is_empty() => Attr::Known(items),
        _ => list_or_null(items),
    }
}

/// Maps a server flag that defaults to `false` when omitted.
#[must_use]
pub fn flag(value: Option<bool>) -> Attr<bool> {
    Attr::known(value.unwrap_or(false))
}

/// Reconciles a user-authored timestamp with the server instant.
///
/// The configured text is kept when it denotes the same instant, so either
/// timestamp form may be configured without drift.
#[must_use]
pub fn refresh_timestamp(
    prior: &Attr<String>,
    server: Option<&DateTime<Utc>>,
    format: fn(&DateTime<Utc>) -> String,
) -> Attr<String> {
    if let Some(instant) = server
        && let Some(Ok(configured)) = prior.as_deref().map(parse_timestamp)
        && configured == *instant
    {
        return prior.clone();
    }

    let mut refreshed = prior.clone();
    refreshed.refresh(server.map(format));
    refreshed
}

/// Parses an optional known timestamp attribute.
pub fn parse_optional_timestamp(
    value: &Attr<String>,
    field: &str,
) -> AppResult<Option<DateTime<Utc>>> {
    value
        .non_blank()
        .map(|text| oig_domain::validation::rfc3339(field, text))
        .transpose()
}

/// Returns true when a string is supplied or still unknown.
#[must_use]
pub fn supplied(value: &Attr<String>) -> bool {
    value.is_unknown() || value.non_blank().is_some()
}

/// Returns true when a list is non-empty or still unknown.
#[must_use]
pub fn supplied_list<T>(value: &Attr<Vec<T>>) -> bool {
    match value {
        Attr::Unknown => true,
        Attr::Known(items) => !items.is_empty(),
        Attr::Null => false,
    }
}

/// Checks a known string against an allowed vocabulary.
pub fn check_one_of(
    diagnostics: &mut Diagnostics,
    path: AttributePath,
    value: &Attr<String>,
    allowed: &[&str],
) {
    if let Some(text) = value.as_deref() {
        let field = path.to_string();
        check(diagnostics, path, one_of(&field, text, allowed));
    }
}

/// Reports a missing required block.
pub fn require_block(diagnostics: &mut Diagnostics, name: &str) {
    diagnostics.attribute_error(
        AttributePath::attribute(name),
        "Missing required block",
        format!("The block \"{name}\" is required."),
    );
}

/// Checks that a supplied string is present.
pub fn check_required_when(
    diagnostics: &mut Diagnostics,
    path: AttributePath,
    value: &Attr<String>,
    condition: &str,
) {
    let field = path.to_string();
    let present = supplied(value);
    check(
        diagnostics,
        path,
        oig_domain::validation::required_when(&field, present, condition),
    );
}
