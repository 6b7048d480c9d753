use crate::domain::{
    entities::{AppName, NewAppConfig},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across call-sites.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_name(raw: &str) -> Result<AppName, DomainError> {
        AppName::parse(raw)
    }

    pub fn validate_config(config: &NewAppConfig) -> Result<(), DomainError> {
        config.validate()
    }
}
