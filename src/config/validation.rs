//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Require an API key for every enabled provider
//! - Validate value ranges (timeouts > 0, request deadline above upstream
//!   deadline, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::proxy::provider::Provider;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing API key for enabled provider '{provider}' (set {env_var})")]
    MissingApiKey {
        provider: &'static str,
        env_var: &'static str,
    },

    #[error("invalid base_url for provider '{provider}': {reason}")]
    InvalidBaseUrl {
        provider: &'static str,
        reason: String,
    },

    #[error("invalid {field} address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error(
        "timeouts.request_secs ({request_ms}ms) must exceed timeouts.upstream_ms ({upstream_ms}ms)"
    )]
    RequestDeadlineTooShort { request_ms: u64, upstream_ms: u64 },

    #[error("no provider is enabled")]
    NoProviders,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("timeouts.request_secs", timeouts.request_secs),
        ("timeouts.upstream_ms", timeouts.upstream_ms),
        ("timeouts.connect_secs", timeouts.connect_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroValue { field });
        }
    }

    // The upstream call must give up before the whole request does, so a slow
    // provider is reported as a fetch failure.
    let request_ms = timeouts.request_secs.saturating_mul(1000);
    if timeouts.request_secs > 0 && timeouts.upstream_ms > 0 && request_ms <= timeouts.upstream_ms {
        errors.push(ValidationError::RequestDeadlineTooShort {
            request_ms,
            upstream_ms: timeouts.upstream_ms,
        });
    }

    if config.security.max_upstream_body_size == 0 {
        errors.push(ValidationError::ZeroValue { field: "security.max_upstream_body_size" });
    }

    if config.rate_limit.enabled {
        if config.rate_limit.max_requests == 0 {
            errors.push(ValidationError::ZeroValue { field: "rate_limit.max_requests" });
        }
        if config.rate_limit.window_secs == 0 {
            errors.push(ValidationError::ZeroValue { field: "rate_limit.window_secs" });
        }
    }

    for provider in Provider::ALL {
        let provider_config = config.providers.get(provider);
        if !provider_config.enabled {
            continue;
        }

        let spec = provider.spec();
        let has_key = provider_config
            .api_key
            .as_ref()
            .is_some_and(|k| !k.is_blank());
        if !has_key {
            errors.push(ValidationError::MissingApiKey {
                provider: spec.name,
                env_var: spec.key_env_var,
            });
        }

        match url::Url::parse(provider_config.base_url_for(provider)) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::InvalidBaseUrl {
                provider: spec.name,
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidBaseUrl {
                provider: spec.name,
                reason: e.to_string(),
            }),
        }
    }

    if config.providers.enabled().next().is_none() {
        errors.push(ValidationError::NoProviders);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ApiKey;

    fn keyed_config() -> ProxyConfig {
        let mut config = ProxyConfig::default();
        for provider in Provider::ALL {
            config.providers.get_mut(provider).api_key = Some(ApiKey::new("k"));
        }
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&keyed_config()).is_ok());
    }

    #[test]
    fn test_missing_keys_are_all_reported() {
        let errors = validate_config(&ProxyConfig::default()).unwrap_err();
        let missing: Vec<_> = errors
            .iter()
            .filter_map(|e| match e {
                ValidationError::MissingApiKey { env_var, .. } => Some(*env_var),
                _ => None,
            })
            .collect();
        assert_eq!(
            missing,
            vec!["NEWSAPI_KEY", "NEWSDATA_KEY", "GNEWS_KEY", "CURRENTS_KEY"]
        );
    }

    #[test]
    fn test_blank_key_is_missing() {
        let mut config = keyed_config();
        config.providers.gnews.api_key = Some(ApiKey::new("   "));
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::MissingApiKey {
                provider: "gnews",
                env_var: "GNEWS_KEY",
            }]
        );
    }

    #[test]
    fn test_disabled_provider_needs_no_key() {
        let mut config = keyed_config();
        config.providers.currents.enabled = false;
        config.providers.currents.api_key = None;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_all_disabled_is_rejected() {
        let mut config = keyed_config();
        for provider in Provider::ALL {
            config.providers.get_mut(provider).enabled = false;
        }
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::NoProviders));
    }

    #[test]
    fn test_ranges_and_addresses() {
        let mut config = keyed_config();
        config.timeouts.upstream_ms = 0;
        config.rate_limit.window_secs = 0;
        config.listener.bind_address = "not-an-address".into();
        config.providers.newsdata.base_url = Some("ftp://newsdata.io/api".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroValue { field: "timeouts.upstream_ms" }));
        assert!(errors.contains(&ValidationError::ZeroValue { field: "rate_limit.window_secs" }));
        assert!(matches!(
            errors.iter().find(|e| matches!(e, ValidationError::InvalidBaseUrl { .. })),
            Some(ValidationError::InvalidBaseUrl { provider: "newsdata", .. })
        ));
    }

    #[test]
    fn test_request_deadline_must_exceed_upstream_deadline() {
        let mut config = keyed_config();
        config.timeouts.request_secs = 1;
        config.timeouts.upstream_ms = 2_500;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::RequestDeadlineTooShort {
                request_ms: 1_000,
                upstream_ms: 2_500,
            }]
        );

        config.timeouts.upstream_ms = 1_000;
        assert!(validate_config(&config).is_err());

        config.timeouts.upstream_ms = 999;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_body_limit_is_rejected() {
        let mut config = keyed_config();
        config.security.max_upstream_body_size = 0;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::ZeroValue { field: "security.max_upstream_body_size" }]
        );
    }
}
