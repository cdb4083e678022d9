//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_governance_client;

pub use http_governance_client::{Credentials, HttpGovernanceClient, HttpGovernanceConfig};
