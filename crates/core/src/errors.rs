use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown dimension `{0}`")]
    UnknownDimension(String),
    #[error("invalid requirement: {0}")]
    InvalidRequirement(String),
    #[error("invalid budget: {0}")]
    InvalidBudget(String),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("invalid input: {0}")]
    Input(String),
}

impl ApplicationError {
    /// Stable machine-readable class used by command envelopes.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain_validation",
            Self::Configuration(_) => "config_validation",
            Self::Catalog(_) => "catalog",
            Self::Input(_) => "input",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Catalog(_) => 3,
            Self::Domain(_) | Self::Input(_) => 4,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(_) | Self::Input(_) => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::Configuration(_) => {
                "Configuration is invalid. Run `phonematch config` to inspect it."
            }
            Self::Catalog(_) => "The catalog could not be loaded. Check the file path and format.",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ConfigError;
    use crate::errors::{ApplicationError, DomainError};

    #[test]
    fn domain_error_maps_to_domain_class() {
        let error = ApplicationError::from(DomainError::UnknownDimension("speed".to_owned()));

        assert_eq!(error.error_class(), "domain_validation");
        assert_eq!(error.exit_code(), 4);
        assert_eq!(
            error.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
    }

    #[test]
    fn configuration_error_maps_to_exit_code_two() {
        let error =
            ApplicationError::from(ConfigError::Validation("bad weight".to_owned()));

        assert_eq!(error.error_class(), "config_validation");
        assert_eq!(error.exit_code(), 2);
        assert!(error.to_string().contains("bad weight"));
    }

    #[test]
    fn unknown_dimension_message_names_the_input() {
        let error = DomainError::UnknownDimension("warp_drive".to_owned());
        assert_eq!(error.to_string(), "unknown dimension `warp_drive`");
    }
}
