//! Upstream provider table.
//!
//! Each news API differs only in data: where it lives, what its query
//! parameters are called and how it reports a bad key. One generic handler
//! reads these records instead of carrying per-provider code.

use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use url::Url;

use crate::config::schema::{ApiKey, ProvidersConfig};
use crate::proxy::params::ValidatedParams;

/// The news APIs the proxy can front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    NewsApi,
    NewsData,
    GNews,
    Currents,
}

/// How an upstream reports that the API key was rejected, beyond a 401/403.
#[derive(Debug, Clone, Copy)]
pub enum AuthSignal {
    /// Only the HTTP status says so.
    Status,
    /// A string field at `pointer` (RFC 6901) holds one of `codes`.
    CodeField {
        pointer: &'static str,
        codes: &'static [&'static str],
    },
}

/// Static description of one provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderSpec {
    /// Route segment under `/api/` and label in logs/metrics.
    pub name: &'static str,
    pub default_base_url: &'static str,
    /// Environment variable holding the key.
    pub key_env_var: &'static str,
    pub key_param: &'static str,
    pub country_param: &'static str,
    /// `None` when the endpoint has no language filter.
    pub language_param: Option<&'static str>,
    pub auth_signal: AuthSignal,
}

const NEWSAPI: ProviderSpec = ProviderSpec {
    name: "newsapi",
    default_base_url: "https://newsapi.org/v2/top-headlines",
    key_env_var: "NEWSAPI_KEY",
    key_param: "apiKey",
    country_param: "country",
    language_param: None,
    auth_signal: AuthSignal::CodeField {
        pointer: "/code",
        codes: &["apiKeyMissing", "apiKeyInvalid", "apiKeyDisabled", "apiKeyExhausted"],
    },
};

const NEWSDATA: ProviderSpec = ProviderSpec {
    name: "newsdata",
    default_base_url: "https://newsdata.io/api/1/news",
    key_env_var: "NEWSDATA_KEY",
    key_param: "apikey",
    country_param: "country",
    language_param: Some("language"),
    auth_signal: AuthSignal::CodeField {
        pointer: "/results/code",
        codes: &["Unauthorized"],
    },
};

const GNEWS: ProviderSpec = ProviderSpec {
    name: "gnews",
    default_base_url: "https://gnews.io/api/v4/top-headlines",
    key_env_var: "GNEWS_KEY",
    key_param: "apikey",
    country_param: "country",
    language_param: Some("lang"),
    auth_signal: AuthSignal::Status,
};

const CURRENTS: ProviderSpec = ProviderSpec {
    name: "currents",
    default_base_url: "https://api.currentsapi.services/v1/latest-news",
    key_env_var: "CURRENTS_KEY",
    key_param: "apiKey",
    country_param: "country",
    language_param: Some("language"),
    auth_signal: AuthSignal::Status,
};

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::NewsApi,
        Provider::NewsData,
        Provider::GNews,
        Provider::Currents,
    ];

    pub fn spec(self) -> &'static ProviderSpec {
        match self {
            Provider::NewsApi => &NEWSAPI,
            Provider::NewsData => &NEWSDATA,
            Provider::GNews => &GNEWS,
            Provider::Currents => &CURRENTS,
        }
    }

    /// Look up a provider by its route segment.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.spec().name == name)
    }

    /// Public path of this provider's endpoint.
    pub fn path(self) -> String {
        format!("/api/{}", self.spec().name)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().name)
    }
}

impl ProviderSpec {
    /// Build the upstream request URL.
    ///
    /// Any query already present on `base_url` is kept.
    pub fn upstream_url(
        &self,
        base_url: &str,
        params: ValidatedParams,
        key: &ApiKey,
    ) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(base_url)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(self.country_param, params.country);
            if let Some(language_param) = self.language_param {
                query.append_pair(language_param, params.language);
            }
            query.append_pair(self.key_param, key.expose());
        }
        Ok(url)
    }

    /// Whether an upstream reply means the configured key was refused.
    pub fn is_auth_failure(&self, status: StatusCode, body: Option<&Value>) -> bool {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return true;
        }
        match self.auth_signal {
            AuthSignal::Status => false,
            AuthSignal::CodeField { pointer, codes } => body
                .and_then(|b| b.pointer(pointer))
                .and_then(Value::as_str)
                .is_some_and(|code| codes.contains(&code)),
        }
    }
}

/// A provider ready to serve: its record plus resolved runtime settings.
#[derive(Debug, Clone)]
pub struct ProviderEndpoint {
    pub provider: Provider,
    pub base_url: String,
    pub api_key: ApiKey,
}

impl ProviderEndpoint {
    pub fn spec(&self) -> &'static ProviderSpec {
        self.provider.spec()
    }

    pub fn upstream_url(&self, params: ValidatedParams) -> Result<Url, url::ParseError> {
        self.spec().upstream_url(&self.base_url, params, &self.api_key)
    }
}

/// Dispatch table of enabled providers, built once at startup.
///
/// Disabled providers and providers without a key are left out, so every
/// lookup that succeeds can be served.
#[derive(Debug, Clone, Default)]
pub struct ProviderTable {
    endpoints: Vec<ProviderEndpoint>,
}

impl ProviderTable {
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let endpoints = Provider::ALL
            .into_iter()
            .filter_map(|provider| {
                let provider_config = config.get(provider);
                if !provider_config.enabled {
                    return None;
                }
                let api_key = provider_config.api_key.clone()?;
                Some(ProviderEndpoint {
                    provider,
                    base_url: provider_config.base_url_for(provider).to_string(),
                    api_key,
                })
            })
            .collect();
        Self { endpoints }
    }

    /// Find an endpoint by route segment.
    pub fn get(&self, name: &str) -> Option<&ProviderEndpoint> {
        self.endpoints.iter().find(|e| e.spec().name == name)
    }

    pub fn providers(&self) -> impl Iterator<Item = Provider> + '_ {
        self.endpoints.iter().map(|e| e.provider)
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
