//! Signing key strength checks
//!
//! Advisory only. `TokenManager` accepts any non-empty key; configuration
//! loading uses this to warn about keys that are easy to brute-force offline.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};

use crate::error::TokenError;

const MIN_SECRET_LENGTH: usize = 32; // 256 bits minimum
const RECOMMENDED_SECRET_LENGTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStrength {
    Weak,
    Acceptable,
    Strong,
}

/// Classify a key for HS256 use
///
/// **Criteria**:
/// - Minimum 32 bytes, recommended 64
/// - Shannon entropy above 4.0 bits/byte
/// - No runs of 4+ repeated or ascending bytes ("aaaa", "1234")
pub fn validate_secret_strength(secret: impl AsRef<[u8]>) -> SecretStrength {
    let bytes = secret.as_ref();

    if bytes.len() < MIN_SECRET_LENGTH {
        return SecretStrength::Weak;
    }

    let entropy = shannon_entropy(bytes);
    if entropy < 4.0 || has_obvious_patterns(bytes) {
        return SecretStrength::Weak;
    }

    if bytes.len() >= RECOMMENDED_SECRET_LENGTH && entropy >= 5.0 {
        SecretStrength::Strong
    } else {
        SecretStrength::Acceptable
    }
}

/// Random key from the OS RNG, base64url-encoded
///
/// `length` is in raw bytes and must be at least 32.
pub fn generate_signing_key(length: usize) -> Result<String, TokenError> {
    if length < MIN_SECRET_LENGTH {
        return Err(TokenError::Configuration(format!(
            "signing key must be at least {MIN_SECRET_LENGTH} bytes"
        )));
    }

    let mut buffer = vec![0u8; length];
    OsRng.fill_bytes(&mut buffer);
    Ok(URL_SAFE_NO_PAD.encode(&buffer))
}

/// Bits per byte (0-8)
fn shannon_entropy(data: &[u8]) -> f64 {
    let mut freq = [0u32; 256];
    for &byte in data {
        freq[byte as usize] += 1;
    }

    let len = data.len() as f64;
    freq.iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = f64::from(count) / len;
            -p * p.log2()
        })
        .sum()
}

fn has_obvious_patterns(data: &[u8]) -> bool {
    let mut repeated = 1;
    let mut ascending = 1;

    for window in data.windows(2) {
        repeated = if window[0] == window[1] { repeated + 1 } else { 1 };
        ascending = if i16::from(window[1]) - i16::from(window[0]) == 1 {
            ascending + 1
        } else {
            1
        };

        if repeated >= 4 || ascending >= 4 {
            return true;
        }
    }

    false
}
