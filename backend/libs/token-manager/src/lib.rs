//! Stateless bearer credentials for gRPC services
//!
//! This library mints and verifies short-lived, self-contained tokens carrying a
//! caller's identity (user id, display name, role). Services authenticate incoming
//! calls purely from request metadata; there is no server-side session store.
//!
//! ## Core Components
//!
//! - **TokenManager**: Owns the shared secret, issues and verifies HS256 tokens
//! - **PrincipalClaims**: The identity a token carries
//! - **MetadataSource**: Read-only view over inbound request metadata
//! - **Clock**: Injectable time source used for `iat`/`exp`
//! - **AuthConfig**: Environment-driven construction of a manager
//!
//! ## Wire Format
//!
//! `base64url(header).base64url(payload).base64url(hmac_sha256)`, no padding.
//! The header is always `{"alg":"HS256","typ":"JWT"}` and the payload carries
//! `user_id`, `user_name`, `user_role`, `iat` and `exp`.
//!
//! ## Usage Example
//!
//! ```rust
//! use chrono::Duration;
//! use token_manager::{PrincipalClaims, TokenManager};
//!
//! # fn example() -> Result<(), token_manager::TokenError> {
//! let manager = TokenManager::new("s3cr3t")?;
//!
//! let claims = PrincipalClaims::new(7, "alice", "admin");
//! let token = manager.issue(&claims, Duration::hours(1))?;
//!
//! assert_eq!(manager.verify(&token)?, claims);
//! # Ok(())
//! # }
//! ```
//!
//! ## Security Guarantees
//!
//! - The header algorithm is checked before any signature is computed
//! - Only HS256 is accepted (`none`, RS*/ES* and other HMAC sizes are rejected)
//! - Signatures are compared in constant time
//! - `exp` is enforced on every verification
//! - Payloads are decoded strictly: missing or unknown fields are rejected

mod claims;
mod clock;
mod codec;
pub mod config;
mod error;
mod manager;
mod metadata;
pub mod secret_validation;

pub use claims::{PrincipalClaims, UserId};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{TokenHeader, JWT_ALGORITHM, JWT_TYPE};
pub use config::AuthConfig;
pub use error::TokenError;
pub use manager::TokenManager;
pub use metadata::{MetadataSource, AUTHORIZATION_KEY, BEARER_PREFIX};
pub use secret_validation::{generate_signing_key, validate_secret_strength, SecretStrength};
