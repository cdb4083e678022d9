mod access_requests;
mod campaigns;
mod catalogs;
mod collections;
mod entitlements;
mod grants;

use std::sync::Arc;

pub use access_requests::{
    MyRequestsApi, RequestConditionsApi, RequestSequencesApi, RequestSettingsApi, RequestTypesApi,
    RequestsApi,
};
pub use campaigns::{CampaignsApi, ReviewsApi};
pub use catalogs::{CatalogsApi, MyCatalogsApi};
pub use collections::CollectionsApi;
pub use entitlements::{
    EntitlementBundlesApi, EntitlementsApi, PrincipalAccessApi, PrincipalEntitlementsApi,
};
pub use grants::{GrantsApi, RiskRulesApi};

/// Every governance API group in one shareable handle.
#[derive(Clone)]
pub struct GovernanceClient {
    campaigns: Arc<dyn CampaignsApi>,
    reviews: Arc<dyn ReviewsApi>,
    entitlements: Arc<dyn EntitlementsApi>,
    entitlement_bundles: Arc<dyn EntitlementBundlesApi>,
    principal_entitlements: Arc<dyn PrincipalEntitlementsApi>,
    principal_access: Arc<dyn PrincipalAccessApi>,
    grants: Arc<dyn GrantsApi>,
    risk_rules: Arc<dyn RiskRulesApi>,
    collections: Arc<dyn CollectionsApi>,
    request_conditions: Arc<dyn RequestConditionsApi>,
    request_sequences: Arc<dyn RequestSequencesApi>,
    request_settings: Arc<dyn RequestSettingsApi>,
    requests: Arc<dyn RequestsApi>,
    request_types: Arc<dyn RequestTypesApi>,
    my_requests: Arc<dyn MyRequestsApi>,
    catalogs: Arc<dyn CatalogsApi>,
    my_catalogs: Arc<dyn MyCatalogsApi>,
}

impl GovernanceClient {
    /// Builds a client from one value implementing every API group.
    #[must_use]
    pub fn from_api<T>(api: Arc<T>) -> Self
    where
        T: CampaignsApi
            + ReviewsApi
            + EntitlementsApi
            + EntitlementBundlesApi
            + PrincipalEntitlementsApi
            + PrincipalAccessApi
            + GrantsApi
            + RiskRulesApi
            + CollectionsApi
            + RequestConditionsApi
            + RequestSequencesApi
            + RequestSettingsApi
            + RequestsApi
            + RequestTypesApi
            + MyRequestsApi
            + CatalogsApi
            + MyCatalogsApi
            + 'static,
    {
        Self {
            campaigns: api.clone(),
            reviews: api.clone(),
            entitlements: api.clone(),
            entitlement_bundles: api.clone(),
            principal_entitlements: api.clone(),
            principal_access: api.clone(),
            grants: api.clone(),
            risk_rules: api.clone(),
            collections: api.clone(),
            request_conditions: api.clone(),
            request_sequences: api.clone(),
            request_settings: api.clone(),
            requests: api.clone(),
            request_types: api.clone(),
            my_requests: api.clone(),
            catalogs: api.clone(),
            my_catalogs: api,
        }
    }

    /// Campaign endpoints.
    #[must_use]
    pub fn campaigns(&self) -> &dyn CampaignsApi {
        self.campaigns.as_ref()
    }

    /// Review endpoints.
    #[must_use]
    pub fn reviews(&self) -> &dyn ReviewsApi {
        self.reviews.as_ref()
    }

    /// Entitlement endpoints.
    #[must_use]
    pub fn entitlements(&self) -> &dyn EntitlementsApi {
        self.entitlements.as_ref()
    }

    /// Entitlement bundle endpoints.
    #[must_use]
    pub fn entitlement_bundles(&self) -> &dyn EntitlementBundlesApi {
        self.entitlement_bundles.as_ref()
    }

    /// Principal entitlement endpoints.
    #[must_use]
    pub fn principal_entitlements(&self) -> &dyn PrincipalEntitlementsApi {
        self.principal_entitlements.as_ref()
    }

    /// Principal access endpoints.
    #[must_use]
    pub fn principal_access(&self) -> &dyn PrincipalAccessApi {
        self.principal_access.as_ref()
    }

    /// Grant endpoints.
    #[must_use]
    pub fn grants(&self) -> &dyn GrantsApi {
        self.grants.as_ref()
    }

    /// Risk rule endpoints.
    #[must_use]
    pub fn risk_rules(&self) -> &dyn RiskRulesApi {
        self.risk_rules.as_ref()
    }

    /// Collection endpoints.
    #[must_use]
    pub fn collections(&self) -> &dyn CollectionsApi {
        self.collections.as_ref()
    }

    /// Request condition endpoints.
    #[must_use]
    pub fn request_conditions(&self) -> &dyn RequestConditionsApi {
        self.request_conditions.as_ref()
    }

    /// Request sequence endpoints.
    #[must_use]
    pub fn request_sequences(&self) -> &dyn RequestSequencesApi {
        self.request_sequences.as_ref()
    }

    /// Request settings endpoints.
    #[must_use]
    pub fn request_settings(&self) -> &dyn RequestSettingsApi {
        self.request_settings.as_ref()
    }

    /// Access request endpoints.
    #[must_use]
    pub fn requests(&self) -> &dyn RequestsApi {
        self.requests.as_ref()
    }

    /// Request type endpoints.
    #[must_use]
    pub fn request_types(&self) -> &dyn RequestTypesApi {
        self.request_types.as_ref()
    }

    /// End-user request endpoints.
    #[must_use]
    pub fn my_requests(&self) -> &dyn MyRequestsApi {
        self.my_requests.as_ref()
    }

    /// Default catalog endpoints.
    #[must_use]
    pub fn catalogs(&self) -> &dyn CatalogsApi {
        self.catalogs.as_ref()
    }

    /// End-user catalog endpoints.
    #[must_use]
    pub fn my_catalogs(&self) -> &dyn MyCatalogsApi {
        self.my_catalogs.as_ref()
    }
}
