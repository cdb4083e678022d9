//! Okta Identity Governance provider: lifecycle engine, entity mappers,
//! data sources, and the ports the HTTP adapter implements.

#![forbid(unsafe_code)]

pub mod data_sources;
pub mod governance_ports;
pub mod pagination;
pub mod provider;
pub mod registry;
pub mod resources;

#[cfg(test)]
mod testing;

pub use governance_ports::GovernanceClient;
pub use registry::{DEFAULT_TYPE_NAME_PREFIX, GovernanceProvider};
