//! Configuration loading from disk.
//!
//! Parsing, validation and the specificity sort happen here, in that
//! order; the rest of the system only ever sees a validated config
//! whose route policies are already ordered most specific first.
//! Reading and finalizing are separate steps so flag overrides can be
//! merged in before validation runs.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::routing::specificity::sort_by_specificity;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read and deserialize a configuration file without validating it.
/// Flag overrides are folded in between this step and
/// [`finalize_config`], so that they face the same checks as file
/// values.
pub fn read_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Validate and specificity-sort a deserialized configuration.
///
/// Route policies come back sorted with decreasing specificity; the
/// anonymous-access decision relies on that order at request time.
pub fn finalize_config(mut config: GatewayConfig) -> Result<GatewayConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    sort_by_specificity(&mut config.route_policies);

    Ok(config)
}

/// Parse and validate configuration from YAML text.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    finalize_config(serde_yaml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
server:
  upstreamUrl: http://localhost:8080

authentication:
  issuer: https://issuer.example.com
  clockSkewInSeconds: 30

claimPolicies:
  CanDeleteUsers:
    - claim: permission
      values: [DeleteUser]
  EmployeeOnly:
    - claim: employee_id

routePolicies:
  - path: /**
    allowAnonymous: true
  - path: /users/*
    methods: [DELETE]
    policyName: CanDeleteUsers
  - path: /users
    methods: [GET]
    policyName: EmployeeOnly
"#;

    #[test]
    fn test_parse_sample_config() {
        let config = parse_config(SAMPLE).unwrap();

        assert_eq!(
            config.server.upstream_url.as_deref(),
            Some("http://localhost:8080")
        );
        assert_eq!(
            config.authentication.issuer.as_deref(),
            Some("https://issuer.example.com")
        );
        assert_eq!(config.authentication.clock_skew_in_seconds, 30);
        assert_eq!(config.claim_policies.len(), 2);
        assert_eq!(config.route_policies.len(), 3);

        // existence-only requirement deserializes without values
        let employee = &config.claim_policies["EmployeeOnly"][0];
        assert_eq!(employee.claim, "employee_id");
        assert!(employee.values.is_none());
    }

    #[test]
    fn test_route_policies_sorted_on_load() {
        let config = parse_config(SAMPLE).unwrap();

        // /users/* (1 segment separator, 1 wildcard) before /users, /** last
        let paths: Vec<&str> = config
            .route_policies
            .iter()
            .map(|p| p.path.as_str())
            .collect();
        assert_eq!(paths, vec!["/users/*", "/users", "/**"]);
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        let err = parse_config("routePolicies: {not: [valid").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_semantic_violation_rejected() {
        let err = parse_config(
            r#"
routePolicies:
  - path: /admin
    policyName: NoSuchPolicy
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_finalize_validates_merged_config() {
        let mut config = GatewayConfig::default();
        config.server.upstream_url = Some("ftp://files.example.com".to_string());

        let err = finalize_config(config).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = parse_config("{}").unwrap();
        assert!(config.server.upstream_url.is_none());
        assert!(!config.authentication.ignore_expiration);
        assert_eq!(config.authentication.clock_skew_in_seconds, 0);
        assert!(config.route_policies.is_empty());
    }
}
