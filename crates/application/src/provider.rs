//! Resource Lifecycle Engine: the typed traits each entity implements and the
//! object-safe handlers published to the host runtime.

mod data_source;
mod diff;
mod errors;
mod import;
mod resource;

pub use data_source::{DataSourceAdapter, DataSourceHandler, ManagedDataSource, ResourceLookup};
pub use diff::changed_attributes;
pub use errors::{Operation, check, operation_error};
pub use import::ImportId;
pub use resource::{ManagedResource, OperationResponse, ResourceAdapter, ResourceHandler};
