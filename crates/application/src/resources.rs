//! Entity mappers and lifecycle implementations, one module per resource.

pub mod campaign;
pub mod collection;
pub mod collection_assignment;
pub mod common;
pub mod entitlement;
pub mod entitlement_bundle;
pub mod grant;
pub mod my_request;
pub mod request_condition;
pub mod request_sequence;
pub mod request_setting_organization;
pub mod request_setting_resource;
pub mod request_type;
pub mod request_v2;
pub mod review;
pub mod risk_rule;

pub use campaign::CampaignResource;
pub use collection::CollectionResource;
pub use collection_assignment::CollectionAssignmentResource;
pub use entitlement::EntitlementResource;
pub use entitlement_bundle::EntitlementBundleResource;
pub use grant::GrantResource;
pub use my_request::MyRequestResource;
pub use request_condition::RequestConditionResource;
pub use request_sequence::RequestSequenceResource;
pub use request_setting_organization::OrgRequestSettingsResource;
pub use request_setting_resource::ResourceRequestSettingsResource;
pub use request_type::RequestTypeResource;
pub use request_v2::RequestV2Resource;
pub use review::ReviewResource;
pub use risk_rule::RiskRuleResource;
