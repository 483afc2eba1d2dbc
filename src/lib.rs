pub mod catalog;
pub mod client;
pub mod dispatcher;
pub mod error;
pub mod fields;
pub mod node_registry;
pub mod operations;
pub mod resolvers;

// Re-export the types a host needs to drive the connector.
pub use catalog::{Operation, RequestTemplate, Resource};
pub use client::ApiClient;
pub use dispatcher::{execute, ResultRecord};
pub use error::ConnectorError;
pub use fields::FieldValues;
pub use resolvers::{OptionPair, ResolverRegistry};
