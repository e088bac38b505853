//! Inbound request metadata as seen by the token manager

use std::collections::HashMap;
use tonic::metadata::MetadataMap;

/// Metadata key carrying the credential
pub const AUTHORIZATION_KEY: &str = "authorization";

/// Literal, case-sensitive prefix in front of the compact token
pub const BEARER_PREFIX: &str = "Bearer ";

/// Read-only view over a request's key/value headers
pub trait MetadataSource {
    /// True when the request carried no metadata at all
    fn is_empty(&self) -> bool;

    /// Raw bytes of the first value stored under `key`
    fn first_value(&self, key: &str) -> Option<&[u8]>;
}

impl MetadataSource for MetadataMap {
    fn is_empty(&self) -> bool {
        MetadataMap::is_empty(self)
    }

    fn first_value(&self, key: &str) -> Option<&[u8]> {
        self.get(key).map(|value| value.as_encoded_bytes())
    }
}

/// gRPC keys are lowercase on the wire, so lookups ignore ASCII case.
impl MetadataSource for HashMap<String, String> {
    fn is_empty(&self) -> bool {
        HashMap::is_empty(self)
    }

    fn first_value(&self, key: &str) -> Option<&[u8]> {
        self.get(key)
            .or_else(|| {
                self.iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })
            .map(|value| value.as_bytes())
    }
}
