//! Error types for resource configuration loading.

use std::fmt;

/// Errors from loading the resource configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceConfigError {
    /// A required environment variable is not set (or is empty).
    MissingVariable { name: &'static str },
    /// The configuration source could not be read or deserialized.
    Source { details: String },
}

impl fmt::Display for ResourceConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVariable { name } => {
                write!(f, "required environment variable {name} is not set")
            }
            Self::Source { details } => {
                write!(f, "failed to read configuration: {details}")
            }
        }
    }
}

impl std::error::Error for ResourceConfigError {}

impl From<config::ConfigError> for ResourceConfigError {
    fn from(err: config::ConfigError) -> Self {
        Self::Source {
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_display_names_variable() {
        let err = ResourceConfigError::MissingVariable {
            name: "AZURE_TENANT_ID",
        };
        assert!(err.to_string().contains("AZURE_TENANT_ID"));
    }
}
