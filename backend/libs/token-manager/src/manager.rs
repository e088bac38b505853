//! Token issuance and verification
//!
//! `TokenManager` owns the shared secret and an injectable clock. It holds no
//! other state, so one instance (or clones of it) can serve any number of
//! concurrent callers without locking.
//!
//! ## Verification Order
//!
//! 1. Structure: three base64url segments
//! 2. Algorithm: header must declare HS256
//! 3. Signature: HMAC-SHA256 over `header.payload`, constant-time compare
//! 4. Expiry: `now >= exp` is expired
//! 5. Shape: payload must map exactly onto the claim envelope
//!
//! The algorithm check MUST stay ahead of the signature check. Trusting the
//! header's `alg` before that point is what enables `none`/RS-as-HS forgeries.

use chrono::Duration;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use zeroize::Zeroizing;

use crate::claims::{PrincipalClaims, TokenEnvelope};
use crate::clock::{Clock, SystemClock};
use crate::codec::{self, TokenHeader};
use crate::error::TokenError;
use crate::metadata::{MetadataSource, AUTHORIZATION_KEY, BEARER_PREFIX};

/// Longest `alg` value echoed back in errors; the header is attacker-controlled.
const MAX_REPORTED_ALG_CHARS: usize = 32;

/// Issues and verifies HS256 bearer tokens
#[derive(Clone)]
pub struct TokenManager {
    signing_key: Zeroizing<Vec<u8>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("signing_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Create a manager using the system clock
    ///
    /// ## Errors
    ///
    /// Returns `TokenError::Configuration` if the signing key is empty.
    pub fn new(signing_key: impl AsRef<[u8]>) -> Result<Self, TokenError> {
        Self::with_clock(signing_key, Arc::new(SystemClock))
    }

    /// Create a manager with an explicit time source
    pub fn with_clock(
        signing_key: impl AsRef<[u8]>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TokenError> {
        let signing_key = signing_key.as_ref();
        if signing_key.is_empty() {
            return Err(TokenError::Configuration("empty signing key".to_string()));
        }

        Ok(Self {
            signing_key: Zeroizing::new(signing_key.to_vec()),
            clock,
        })
    }

    /// Mint a token for `claims`, valid for `ttl` from now
    ///
    /// A zero or negative `ttl` is accepted and yields a token that is already
    /// expired. Sub-second precision is truncated.
    pub fn issue(&self, claims: &PrincipalClaims, ttl: Duration) -> Result<String, TokenError> {
        let iat = self.clock.now().timestamp();
        let envelope = TokenEnvelope::new(claims, iat, ttl.num_seconds());

        let header = serde_json::to_vec(&TokenHeader::hs256())
            .map_err(|e| TokenError::Encoding(e.to_string()))?;
        let payload =
            serde_json::to_vec(&envelope).map_err(|e| TokenError::Encoding(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            codec::encode_segment(header),
            codec::encode_segment(payload)
        );
        let signature = codec::sign(&self.signing_key, &signing_input)?;

        Ok(format!(
            "{}.{}",
            signing_input,
            codec::encode_segment(signature)
        ))
    }

    /// Verify a compact token and return the claims it carries
    ///
    /// ## Errors
    ///
    /// - `MalformedToken` - not three base64url segments, or unreadable header
    /// - `UnsupportedAlgorithm` - header `alg` is anything but HS256
    /// - `InvalidSignature` - signature does not match
    /// - `Expired` - current time is at or past `exp`
    /// - `InvalidClaims` - payload is not exactly the claim envelope
    pub fn verify(&self, token: &str) -> Result<PrincipalClaims, TokenError> {
        let raw = codec::split_segments(token)?;

        let header = raw.header()?;
        if !header.is_supported() {
            return Err(TokenError::UnsupportedAlgorithm(
                header.alg.chars().take(MAX_REPORTED_ALG_CHARS).collect(),
            ));
        }

        codec::verify_signature(&self.signing_key, raw.signing_input, &raw.signature)?;

        let payload: Value = serde_json::from_slice(&raw.payload)
            .map_err(|e| TokenError::InvalidClaims(e.to_string()))?;
        let exp = payload
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or_else(|| TokenError::InvalidClaims("missing or non-integer exp".to_string()))?;

        // `iat` is deliberately not compared to the clock: no skew tolerance exists.
        if self.clock.now().timestamp() >= exp {
            return Err(TokenError::Expired);
        }

        let envelope: TokenEnvelope = serde_json::from_value(payload)
            .map_err(|e| TokenError::InvalidClaims(e.to_string()))?;

        Ok(envelope.into_claims())
    }

    /// Pull a `Bearer` credential out of request metadata and verify it
    ///
    /// `None` and an empty metadata set both mean the request carried no
    /// metadata. Verification errors are propagated unchanged.
    ///
    /// ## Errors
    ///
    /// - `MissingMetadata` - no metadata at all
    /// - `MissingCredential` - `authorization` absent or empty
    /// - `MalformedCredential` - value is not `Bearer <token>`
    pub fn extract_from_metadata<M>(
        &self,
        metadata: Option<&M>,
    ) -> Result<PrincipalClaims, TokenError>
    where
        M: MetadataSource + ?Sized,
    {
        let metadata = metadata
            .filter(|metadata| !metadata.is_empty())
            .ok_or(TokenError::MissingMetadata)?;

        let value = metadata
            .first_value(AUTHORIZATION_KEY)
            .filter(|value| !value.is_empty())
            .ok_or(TokenError::MissingCredential)?;

        let token = std::str::from_utf8(value)
            .ok()
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .ok_or(TokenError::MalformedCredential)?;

        self.verify(token)
    }
}
