//! Environment-driven configuration
//!
//! | Variable                     | Required | Default |
//! |------------------------------|----------|---------|
//! | `AUTH_SIGNING_KEY`           | yes      |         |
//! | `AUTH_ACCESS_TOKEN_TTL_SECS` | no       | 3600    |
//!
//! ```rust,no_run
//! use token_manager::AuthConfig;
//!
//! # fn example() -> Result<(), token_manager::TokenError> {
//! let config = AuthConfig::load()?;
//! let manager = config.build_manager()?;
//! # Ok(())
//! # }
//! ```

use chrono::Duration;
use serde::Deserialize;
use std::fmt;
use tracing::{info, warn};

use crate::error::TokenError;
use crate::manager::TokenManager;
use crate::secret_validation::{validate_secret_strength, SecretStrength};

const ENV_PREFIX: &str = "AUTH_";
const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 3600;

fn default_access_token_ttl_secs() -> i64 {
    DEFAULT_ACCESS_TOKEN_TTL_SECS
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 secret
    pub signing_key: String,

    /// Lifetime handed to `issue` by services minting access tokens
    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: i64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_key", &"<redacted>")
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .finish()
    }
}

impl AuthConfig {
    /// Read `.env` if present, then the process environment
    pub fn load() -> Result<Self, TokenError> {
        if let Ok(path) = dotenvy::dotenv() {
            info!(path = %path.display(), "Loaded environment file");
        }
        Self::from_env()
    }

    /// Read the process environment only
    pub fn from_env() -> Result<Self, TokenError> {
        let config = envy::prefixed(ENV_PREFIX)
            .from_env::<Self>()
            .map_err(|e| TokenError::Configuration(e.to_string()))?;
        config.audit();
        Ok(config)
    }

    /// Build from explicit key/value pairs (unprefixed keys are ignored)
    pub fn from_pairs<I>(pairs: I) -> Result<Self, TokenError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Self>(pairs)
            .map_err(|e| TokenError::Configuration(e.to_string()))?;
        config.audit();
        Ok(config)
    }

    pub fn access_token_ttl(&self) -> Duration {
        Duration::seconds(self.access_token_ttl_secs)
    }

    /// Construct the manager; fails if the signing key is empty
    pub fn build_manager(&self) -> Result<TokenManager, TokenError> {
        TokenManager::new(&self.signing_key)
    }

    fn audit(&self) {
        if validate_secret_strength(&self.signing_key) == SecretStrength::Weak {
            warn!(
                key_len = self.signing_key.len(),
                "AUTH_SIGNING_KEY is weak; use at least 32 random bytes"
            );
        }
        if self.access_token_ttl_secs <= 0 {
            warn!(
                ttl_secs = self.access_token_ttl_secs,
                "Access token TTL is not positive; issued tokens will already be expired"
            );
        }
    }
}
