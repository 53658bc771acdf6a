//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every mask so broken regexes fail at load time, not per request
//! - Validate addresses and timeouts
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::resources::{MaskError, ResourceMap};

/// A single semantic problem in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Mask(#[from] MaskError),

    #[error("{field} is not a socket address: `{value}`")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("module name must not be empty")]
    EmptyModuleName,

    #[error("module `{0}` is declared more than once")]
    DuplicateModule(String),
}

/// Check a parsed configuration, collecting every error.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(mask_errors) = ResourceMap::compile(&config.resources) {
        errors.extend(mask_errors.into_iter().map(ValidationError::from));
    }

    check_address(&mut errors, "server.bind_address", &config.server.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "server.request_timeout_secs",
        });
    }
    if config.server.scan_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "server.scan_timeout_secs",
        });
    }

    let mut seen = HashSet::new();
    for module in &config.templates.modules {
        if module.name.trim().is_empty() {
            errors.push(ValidationError::EmptyModuleName);
        } else if !seen.insert(module.name.as_str()) {
            errors.push(ValidationError::DuplicateModule(module.name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ModuleConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config: AppConfig = toml::from_str(
            r##"
            [resources]
            "#(#" = ["a.js"]
            "#[z#" = ["b.js"]
            "/fine/:id" = ["c.js"]
            "##,
        )
        .unwrap();
        config.server.bind_address = "not-an-address".into();
        config.server.scan_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidAddress { .. })));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::ZeroTimeout { .. })));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_duplicate_modules() {
        let mut config = AppConfig::default();
        for name in ["blog", "blog", ""] {
            config.templates.modules.push(ModuleConfig {
                name: name.into(),
                template_dir: None,
            });
        }

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].to_string(), "module `blog` is declared more than once");
        assert_eq!(errors[1].to_string(), "module name must not be empty");
    }
}
