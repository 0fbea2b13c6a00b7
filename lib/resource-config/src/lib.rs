//! Configuration for the Azure resource-provisioning samples.
//!
//! This crate provides:
//! - `ResourceConfig`: immutable settings loaded once from the environment
//! - `CloudEnvironment`: the named Azure clouds and their default endpoints
//! - `generate_group_name`: collision-avoiding resource group names
//!
//! # Example
//!
//! ```
//! use entra_samples_resource_config::ResourceConfig;
//! use std::collections::HashMap;
//!
//! let vars: HashMap<String, String> = [
//!     ("AZURE_CLIENT_ID", "client"),
//!     ("AZURE_CLIENT_SECRET", "secret"),
//!     ("AZURE_TENANT_ID", "tenant"),
//!     ("AZURE_SUBSCRIPTION_ID", "subscription"),
//!     ("AZURE_BASE_GROUP_NAME", "samples"),
//! ]
//! .into_iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//!
//! let config = ResourceConfig::from_source(vars).expect("load config");
//! assert_eq!(config.default_location(), "westus2");
//! assert!(config.generate_group_name(&["vm"]).starts_with("samples-vm-"));
//! ```

pub mod cloud;
pub mod config;
pub mod error;
pub mod group_name;

pub use cloud::CloudEnvironment;
pub use config::ResourceConfig;
pub use error::ResourceConfigError;
pub use group_name::generate_group_name;
