//! Principal claims and the signed envelope that carries them
//!
//! `PrincipalClaims` is what callers hand to `issue` and get back from `verify`.
//! `TokenEnvelope` adds the timestamps and is the exact JSON payload on the wire;
//! it never leaves this crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Subject identity, either numeric or textual
///
/// Serialized untagged, so `7` and `"7"` are different identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Int(i64),
    Str(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self::Str(id.to_string())
    }
}

/// Identity carried by a token
///
/// Fields are public for direct access (no getter boilerplate). `user_name` is
/// display-only and must not be used for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalClaims {
    pub user_id: UserId,
    pub user_name: String,
    pub user_role: String,
}

impl PrincipalClaims {
    pub fn new(
        user_id: impl Into<UserId>,
        user_name: impl Into<String>,
        user_role: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            user_role: user_role.into(),
        }
    }

    /// Check if the subject owns a resource
    pub fn is_owner(&self, resource_owner_id: &UserId) -> bool {
        &self.user_id == resource_owner_id
    }

    /// Exact, case-sensitive role comparison
    pub fn has_role(&self, role: &str) -> bool {
        self.user_role == role
    }
}

/// Signed payload: claims plus issuance timestamps (Unix seconds)
///
/// Decoding is strict. Every field is required and unknown fields are rejected,
/// so a partially shaped payload never turns into claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TokenEnvelope {
    pub user_id: UserId,
    pub user_name: String,
    pub user_role: String,
    pub iat: i64,
    pub exp: i64,
}

impl TokenEnvelope {
    /// `exp` is always derived from `iat`; there is no way to set it directly.
    pub fn new(claims: &PrincipalClaims, iat: i64, ttl_secs: i64) -> Self {
        Self {
            user_id: claims.user_id.clone(),
            user_name: claims.user_name.clone(),
            user_role: claims.user_role.clone(),
            iat,
            exp: iat.saturating_add(ttl_secs),
        }
    }

    pub fn into_claims(self) -> PrincipalClaims {
        PrincipalClaims {
            user_id: self.user_id,
            user_name: self.user_name,
            user_role: self.user_role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_id_untagged_serialization() {
        assert_eq!(serde_json::to_value(UserId::from(7)).unwrap(), json!(7));
        assert_eq!(
            serde_json::to_value(UserId::from("u-42")).unwrap(),
            json!("u-42")
        );
    }

    #[test]
    fn test_user_id_numeric_and_text_differ() {
        let numeric: UserId = serde_json::from_value(json!(7)).unwrap();
        let text: UserId = serde_json::from_value(json!("7")).unwrap();

        assert_eq!(numeric, UserId::Int(7));
        assert_eq!(text, UserId::Str("7".to_string()));
        assert_ne!(numeric, text);
    }

    #[test]
    fn test_user_id_from_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(UserId::from(id).to_string(), id.to_string());
    }

    #[test]
    fn test_envelope_wire_field_names() {
        let claims = PrincipalClaims::new(7, "alice", "admin");
        let envelope = TokenEnvelope::new(&claims, 1_700_000_000, 3600);

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "user_id": 7,
                "user_name": "alice",
                "user_role": "admin",
                "iat": 1_700_000_000,
                "exp": 1_700_003_600,
            })
        );
    }

    #[test]
    fn test_envelope_negative_ttl() {
        let claims = PrincipalClaims::new(1, "bob", "user");
        let envelope = TokenEnvelope::new(&claims, 1000, -10);
        assert_eq!(envelope.exp, 990);
    }

    #[test]
    fn test_envelope_rejects_unknown_fields() {
        let payload = json!({
            "user_id": 7,
            "user_name": "alice",
            "user_role": "admin",
            "iat": 0,
            "exp": 10,
            "is_admin": true,
        });
        assert!(serde_json::from_value::<TokenEnvelope>(payload).is_err());
    }

    #[test]
    fn test_envelope_rejects_missing_fields() {
        let payload = json!({ "user_id": 7, "iat": 0, "exp": 10 });
        assert!(serde_json::from_value::<TokenEnvelope>(payload).is_err());
    }

    #[test]
    fn test_is_owner_and_has_role() {
        let claims = PrincipalClaims::new("u-1", "carol", "editor");

        assert!(claims.is_owner(&UserId::from("u-1")));
        assert!(!claims.is_owner(&UserId::from("u-2")));
        assert!(claims.has_role("editor"));
        assert!(!claims.has_role("Editor"));
    }
}
