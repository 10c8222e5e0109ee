//! Credential handling for LLM providers.
//!
//! Every provider loads its API key through [`ApiCredential`], which:
//!
//! - **Never prints**: `Debug`/`Display` show `[REDACTED]`
//! - **Zeroes on drop**: the value lives in a `secrecy::SecretString`
//! - **Tracks origin**: config, environment or programmatic
//!
//! Blank values count as missing, so `OPENAI_API_KEY=""` is reported as an
//! unconfigured provider rather than failing later with a 401.
//!
//! ## Usage
//!
//! ```ignore
//! use surety_runtime::providers::secrets::ApiCredential;
//!
//! // Config first, then environment
//! let cred = ApiCredential::from_config_or_env(&config, "api_key", "OPENAI_API_KEY", "OpenAI API key")?;
//!
//! // Explicit exposure at the point of use
//! request.bearer_auth(cred.expose());
//! ```

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

use super::ProviderError;

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from configuration file/JSON
    Config,
    /// Loaded from environment variable
    Environment,
    /// Provided programmatically
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Config => write!(f, "config"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    /// Wrap a value. It cannot be logged after this point.
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Load a credential from JSON config, falling back to an environment
    /// variable.
    ///
    /// 1. `config[config_key]`, if it is a non-blank string
    /// 2. otherwise `env_var`, if set and non-blank
    /// 3. otherwise [`ProviderError::NotConfigured`] naming both
    pub fn from_config_or_env(
        config: &JsonValue,
        config_key: &str,
        env_var: &str,
        name: &'static str,
    ) -> Result<Self, ProviderError> {
        if let Some(value) = non_blank_config(config, config_key) {
            return Ok(Self::new(value, CredentialSource::Config, name));
        }

        if let Some(value) = non_blank_env(env_var) {
            return Ok(Self::new(value, CredentialSource::Environment, name));
        }

        Err(ProviderError::NotConfigured(format!(
            "{name} required: set '{config_key}' in config or {env_var} environment variable"
        )))
    }

    /// Check if a credential is available without loading it.
    pub fn is_available(config: &JsonValue, config_key: &str, env_var: &str) -> bool {
        non_blank_config(config, config_key).is_some() || non_blank_env(env_var).is_some()
    }

    /// Expose the value for an API call.
    ///
    /// Call this only where the credential is used (e.g. setting an HTTP
    /// header). Never store the exposed value.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().trim().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} [REDACTED]", self.name, self.source)
    }
}

fn non_blank_config<'a>(config: &'a JsonValue, key: &str) -> Option<&'a str> {
    config
        .get(key)
        .and_then(JsonValue::as_str)
        .filter(|v| !v.trim().is_empty())
}

fn non_blank_env(env_var: &str) -> Option<String> {
    std::env::var(env_var)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Loads several credentials for one provider.
///
/// OpenAI takes a required API key plus an optional organization id:
///
/// ```ignore
/// let creds = CredentialBuilder::new()
///     .require("api_key", "OPENAI_API_KEY", "OpenAI API key")
///     .optional("organization", "OPENAI_ORG_ID", "OpenAI organization")
///     .build(&config)?;
///
/// let api_key = creds.take("api_key");
/// let organization = creds.take("organization");
/// ```
#[derive(Default)]
pub struct CredentialBuilder {
    required: Vec<CredentialSpec>,
    optional: Vec<CredentialSpec>,
}

struct CredentialSpec {
    config_key: &'static str,
    env_var: &'static str,
    name: &'static str,
}

impl CredentialBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a credential whose absence is an error.
    pub fn require(
        mut self,
        config_key: &'static str,
        env_var: &'static str,
        name: &'static str,
    ) -> Self {
        self.required.push(CredentialSpec {
            config_key,
            env_var,
            name,
        });
        self
    }

    /// Add a credential that is loaded only when present.
    pub fn optional(
        mut self,
        config_key: &'static str,
        env_var: &'static str,
        name: &'static str,
    ) -> Self {
        self.optional.push(CredentialSpec {
            config_key,
            env_var,
            name,
        });
        self
    }

    /// Resolve every credential against `config` and the environment.
    pub fn build(self, config: &JsonValue) -> Result<CredentialSet, ProviderError> {
        let mut credentials = BTreeMap::new();

        for spec in self.required {
            let cred =
                ApiCredential::from_config_or_env(config, spec.config_key, spec.env_var, spec.name)?;
            credentials.insert(spec.config_key, cred);
        }

        for spec in self.optional {
            if ApiCredential::is_available(config, spec.config_key, spec.env_var) {
                let cred = ApiCredential::from_config_or_env(
                    config,
                    spec.config_key,
                    spec.env_var,
                    spec.name,
                )?;
                credentials.insert(spec.config_key, cred);
            }
        }

        Ok(CredentialSet { credentials })
    }
}

/// Credentials resolved by a [`CredentialBuilder`], keyed by config key.
pub struct CredentialSet {
    credentials: BTreeMap<&'static str, ApiCredential>,
}

impl CredentialSet {
    /// Take a credential out of the set.
    pub fn take(&mut self, key: &str) -> Option<ApiCredential> {
        self.credentials.remove(key)
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("keys", &self.credentials.keys().collect::<Vec<_>>())
            .finish()
    }
}
