//! Error taxonomy for token issuance, verification and extraction

use thiserror::Error;

/// Every failure the token manager can report
///
/// Variants are split so the transport layer can choose a distinct status per
/// kind ("no credential supplied" vs "credential supplied in the wrong format").
/// Nothing here is retried internally: inputs are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Manager construction failed (e.g. empty signing key)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Wrong segment count or invalid base64url/JSON framing
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// Header declares an algorithm other than HS256
    #[error("unexpected signing method: {0}")]
    UnsupportedAlgorithm(String),

    #[error("signature is invalid")]
    InvalidSignature,

    #[error("token is expired")]
    Expired,

    /// Payload decoded but does not have the expected claim shape
    #[error("error parsing claims: {0}")]
    InvalidClaims(String),

    #[error("no metadata in request")]
    MissingMetadata,

    #[error("no authorization header")]
    MissingCredential,

    #[error(r#"missing "Bearer " prefix in "authorization" header"#)]
    MalformedCredential,

    /// Claims could not be serialized while issuing
    #[error("failed to encode token: {0}")]
    Encoding(String),
}

impl TokenError {
    /// Stable snake_case label for logs and status details
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::MalformedToken(_) => "malformed_token",
            Self::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "token_expired",
            Self::InvalidClaims(_) => "invalid_claims",
            Self::MissingMetadata => "missing_metadata",
            Self::MissingCredential => "missing_credential",
            Self::MalformedCredential => "malformed_credential",
            Self::Encoding(_) => "encoding",
        }
    }

    /// Whether the caller is at fault (as opposed to a server-side fault)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Configuration(_) | Self::Encoding(_))
    }
}
