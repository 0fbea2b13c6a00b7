//! Named Azure cloud environments.
//!
//! Each cloud exposes its own resource-manager and Active Directory endpoints.
//! Names follow the conventional Azure SDK spelling (`AzurePublicCloud`,
//! `AzureChinaCloud`, ...) and are matched case-insensitively.

use std::fmt;
use std::str::FromStr;

/// An Azure cloud environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CloudEnvironment {
    /// The global Azure cloud.
    #[default]
    Public,
    /// Azure operated by 21Vianet.
    China,
    /// Azure Government.
    UsGovernment,
    /// Azure Germany.
    Germany,
}

impl CloudEnvironment {
    /// Returns the canonical name of this cloud.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Public => "AzurePublicCloud",
            Self::China => "AzureChinaCloud",
            Self::UsGovernment => "AzureUSGovernmentCloud",
            Self::Germany => "AzureGermanCloud",
        }
    }

    /// Returns the Azure Resource Manager endpoint.
    #[must_use]
    pub fn resource_manager_endpoint(&self) -> &'static str {
        match self {
            Self::Public => "https://management.azure.com/",
            Self::China => "https://management.chinacloudapi.cn/",
            Self::UsGovernment => "https://management.usgovcloudapi.net/",
            Self::Germany => "https://management.microsoftazure.de/",
        }
    }

    /// Returns the Active Directory (authorization server) endpoint.
    #[must_use]
    pub fn active_directory_endpoint(&self) -> &'static str {
        match self {
            Self::Public => "https://login.microsoftonline.com/",
            Self::China => "https://login.chinacloudapi.cn/",
            Self::UsGovernment => "https://login.microsoftonline.us/",
            Self::Germany => "https://login.microsoftonline.de/",
        }
    }
}

impl fmt::Display for CloudEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a cloud name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCloudError {
    pub name: String,
}

impl fmt::Display for UnknownCloudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown Azure cloud environment '{}'", self.name)
    }
}

impl std::error::Error for UnknownCloudError {}

impl FromStr for CloudEnvironment {
    type Err = UnknownCloudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AZUREPUBLICCLOUD" | "AZURECLOUD" => Ok(Self::Public),
            "AZURECHINACLOUD" => Ok(Self::China),
            "AZUREUSGOVERNMENTCLOUD" | "AZUREUSGOVERNMENT" => Ok(Self::UsGovernment),
            "AZUREGERMANCLOUD" => Ok(Self::Germany),
            _ => Err(UnknownCloudError {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_names() {
        for cloud in [
            CloudEnvironment::Public,
            CloudEnvironment::China,
            CloudEnvironment::UsGovernment,
            CloudEnvironment::Germany,
        ] {
            assert_eq!(cloud.name().parse::<CloudEnvironment>(), Ok(cloud));
        }
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(
            "azurechinacloud".parse::<CloudEnvironment>(),
            Ok(CloudEnvironment::China)
        );
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = "MarsCloud".parse::<CloudEnvironment>().unwrap_err();
        assert_eq!(err.name, "MarsCloud");
    }

    #[test]
    fn public_cloud_endpoints() {
        let cloud = CloudEnvironment::default();
        assert_eq!(
            cloud.resource_manager_endpoint(),
            "https://management.azure.com/"
        );
        assert_eq!(
            cloud.active_directory_endpoint(),
            "https://login.microsoftonline.com/"
        );
    }
}
