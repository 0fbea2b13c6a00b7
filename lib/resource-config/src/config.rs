//! Resource sample configuration loaded from environment variables.
//!
//! Some of these values are base names and defaults rather than exact
//! settings: group names in particular are combined with random suffixes by
//! [`ResourceConfig::generate_group_name`].

use crate::cloud::CloudEnvironment;
use crate::error::ResourceConfigError;
use crate::group_name::generate_group_name;
use rootcause::Report;
use serde::Deserialize;
use std::collections::HashMap;

/// Group name used when `AZURE_GROUP_NAME` is not set.
pub const DEFAULT_GROUP_NAME: &str = "azure-samples";

/// Location used when `AZURE_LOCATION_DEFAULT` is not set.
pub const DEFAULT_LOCATION: &str = "westus2";

/// Raw environment values, keyed by the lowercased variable name.
#[derive(Debug, Default, Deserialize)]
struct EnvVars {
    azure_client_id: Option<String>,
    azure_client_secret: Option<String>,
    azure_tenant_id: Option<String>,
    azure_subscription_id: Option<String>,
    azure_group_name: Option<String>,
    azure_base_group_name: Option<String>,
    azure_resource_url: Option<String>,
    azure_location_default: Option<String>,
    azure_use_deviceflow: Option<String>,
    azure_samples_keep_resources: Option<String>,
    azure_cloud_name: Option<String>,
}

/// Immutable configuration for the Azure resource samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    client_id: String,
    client_secret: String,
    tenant_id: String,
    subscription_id: String,
    location: String,
    resource_url: String,
    authorization_server_url: String,
    environment: CloudEnvironment,
    use_device_flow: bool,
    keep_resources: bool,
    group_name: String,
    base_group_name: String,
}

impl ResourceConfig {
    /// Loads a sibling `.env` file, then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if any of `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET`,
    /// `AZURE_TENANT_ID` or `AZURE_SUBSCRIPTION_ID` is missing.
    pub fn from_env() -> Result<Self, Report<ResourceConfigError>> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "no .env file loaded");
        }
        Ok(Self::load(None)?)
    }

    /// Reads configuration from an explicit set of variables instead of the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing.
    pub fn from_source(vars: HashMap<String, String>) -> Result<Self, ResourceConfigError> {
        Self::load(Some(vars))
    }

    fn load(source: Option<HashMap<String, String>>) -> Result<Self, ResourceConfigError> {
        let vars: EnvVars = config::Config::builder()
            .add_source(config::Environment::default().source(source))
            .build()?
            .try_deserialize()?;

        Self::from_vars(vars)
    }

    fn from_vars(vars: EnvVars) -> Result<Self, ResourceConfigError> {
        // these must be provided by the environment
        let client_id = required(vars.azure_client_id, "AZURE_CLIENT_ID")?;
        let client_secret = required(vars.azure_client_secret, "AZURE_CLIENT_SECRET")?;
        let tenant_id = required(vars.azure_tenant_id, "AZURE_TENANT_ID")?;
        let subscription_id = required(vars.azure_subscription_id, "AZURE_SUBSCRIPTION_ID")?;

        let environment = match non_empty(vars.azure_cloud_name) {
            Some(name) => name.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to the public cloud");
                CloudEnvironment::Public
            }),
            None => CloudEnvironment::Public,
        };

        let group_name =
            non_empty(vars.azure_group_name).unwrap_or_else(|| DEFAULT_GROUP_NAME.to_string());
        let base_group_name =
            non_empty(vars.azure_base_group_name).unwrap_or_else(|| group_name.clone());
        let resource_url = non_empty(vars.azure_resource_url)
            .unwrap_or_else(|| environment.resource_manager_endpoint().to_string());
        let location =
            non_empty(vars.azure_location_default).unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        let use_device_flow = parse_flag(
            "AZURE_USE_DEVICEFLOW",
            non_empty(vars.azure_use_deviceflow).as_deref(),
        );
        let keep_resources = parse_flag(
            "AZURE_SAMPLES_KEEP_RESOURCES",
            non_empty(vars.azure_samples_keep_resources).as_deref(),
        );

        Ok(Self {
            client_id,
            client_secret,
            tenant_id,
            subscription_id,
            location,
            resource_url,
            authorization_server_url: environment.active_directory_endpoint().to_string(),
            environment,
            use_device_flow,
            keep_resources,
            group_name,
            base_group_name,
        })
    }

    /// Returns the OAuth client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the OAuth client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the Azure AD tenant to which this client belongs.
    #[must_use]
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Returns the target subscription for resource management.
    #[must_use]
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Returns the URL of the resource used with OAuth requests.
    #[must_use]
    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    /// Returns the default location for new resources.
    ///
    /// Some resource types are not available in every location, so callers
    /// may need to pick another one.
    #[must_use]
    pub fn default_location(&self) -> &str {
        &self.location
    }

    /// Returns the OAuth authorization server URL.
    #[must_use]
    pub fn authorization_server_url(&self) -> &str {
        &self.authorization_server_url
    }

    /// Returns the Azure cloud the samples target.
    #[must_use]
    pub fn environment(&self) -> CloudEnvironment {
        self.environment
    }

    /// Returns true if interactive device-code authentication should be used.
    #[must_use]
    pub fn use_device_flow(&self) -> bool {
        self.use_device_flow
    }

    /// Returns true if created resources should be kept after a sample runs.
    #[must_use]
    pub fn keep_resources(&self) -> bool {
        self.keep_resources
    }

    /// Returns the configured resource group name.
    #[must_use]
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Returns the prefix for new resource groups.
    #[must_use]
    pub fn base_group_name(&self) -> &str {
        &self.base_group_name
    }

    /// Appends the affixes and a random suffix to the base group name.
    #[must_use]
    pub fn generate_group_name(&self, affixes: &[&str]) -> String {
        generate_group_name(&self.base_group_name, affixes)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ResourceConfigError> {
    non_empty(value).ok_or(ResourceConfigError::MissingVariable { name })
}

fn parse_flag(name: &str, value: Option<&str>) -> bool {
    match value {
        None => false,
        Some("1" | "t" | "T" | "TRUE" | "true" | "True") => true,
        Some("0" | "f" | "F" | "FALSE" | "false" | "False") => false,
        Some(other) => {
            tracing::warn!(
                variable = name,
                value = other,
                "invalid boolean value, defaulting to false"
            );
            false
        }
    }
}
