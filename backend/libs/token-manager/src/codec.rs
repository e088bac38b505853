//! Compact token framing and HMAC-SHA256 signing
//!
//! A token is `header.payload.signature`, each segment base64url without padding.
//! The signature covers the ASCII bytes of `header.payload` exactly as they
//! appear on the wire.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::TokenError;

type HmacSha256 = Hmac<Sha256>;

/// The only algorithm this crate signs with or accepts
pub const JWT_ALGORITHM: &str = "HS256";
pub const JWT_TYPE: &str = "JWT";

/// JOSE header
///
/// Extra header members (`kid`, `cty`, ...) are tolerated on decode; only `alg`
/// drives verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl TokenHeader {
    pub fn hs256() -> Self {
        Self {
            alg: JWT_ALGORITHM.to_string(),
            typ: Some(JWT_TYPE.to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.alg == JWT_ALGORITHM
    }
}

/// Token split into its decoded segments
#[derive(Debug)]
pub(crate) struct RawToken<'a> {
    /// `header.payload` as received, i.e. the signed bytes
    pub signing_input: &'a str,
    pub header: Vec<u8>,
    pub payload: Vec<u8>,
    pub signature: Vec<u8>,
}

impl RawToken<'_> {
    pub fn header(&self) -> Result<TokenHeader, TokenError> {
        serde_json::from_slice(&self.header)
            .map_err(|e| TokenError::MalformedToken(format!("invalid header: {e}")))
    }
}

pub(crate) fn encode_segment(bytes: impl AsRef<[u8]>) -> String {
    BASE64_URL.encode(bytes)
}

fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>, TokenError> {
    BASE64_URL
        .decode(segment)
        .map_err(|e| TokenError::MalformedToken(format!("invalid {name} encoding: {e}")))
}

/// Structural parse: exactly three well-encoded segments
///
/// An empty segment is structurally fine here (`alg: none` tokens carry an empty
/// signature); the algorithm and signature checks reject it afterwards.
pub(crate) fn split_segments(token: &str) -> Result<RawToken<'_>, TokenError> {
    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::MalformedToken(
            "token must have exactly three segments".to_string(),
        ));
    };

    Ok(RawToken {
        signing_input: &token[..header.len() + 1 + payload.len()],
        header: decode_segment(header, "header")?,
        payload: decode_segment(payload, "payload")?,
        signature: decode_segment(signature, "signature")?,
    })
}

fn mac(key: &[u8], signing_input: &str) -> Result<HmacSha256, TokenError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| TokenError::Configuration(format!("invalid signing key: {e}")))?;
    mac.update(signing_input.as_bytes());
    Ok(mac)
}

pub(crate) fn sign(key: &[u8], signing_input: &str) -> Result<Vec<u8>, TokenError> {
    Ok(mac(key, signing_input)?.finalize().into_bytes().to_vec())
}

/// Constant-time comparison against the recomputed MAC
pub(crate) fn verify_signature(
    key: &[u8],
    signing_input: &str,
    signature: &[u8],
) -> Result<(), TokenError> {
    mac(key, signing_input)?
        .verify_slice(signature)
        .map_err(|_| TokenError::InvalidSignature)
}
