//! Integration Tests for the Token Manager
//!
//! These tests exercise the public API end to end:
//! issue -> transport in metadata -> extract -> verify

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use std::sync::Arc;
use token_manager::{
    ManualClock, MetadataSource, PrincipalClaims, TokenError, TokenManager, UserId,
};
use tonic::metadata::{MetadataMap, MetadataValue};

const SECRET: &str = "s3cr3t";
const EPOCH: i64 = 1_700_000_000;

fn manager_at(secret: &str, now: i64) -> (TokenManager, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Utc.timestamp_opt(now, 0).unwrap()));
    let manager = TokenManager::with_clock(secret, clock.clone()).expect("valid secret");
    (manager, clock)
}

fn bearer_metadata(token: &str) -> MetadataMap {
    let mut metadata = MetadataMap::new();
    metadata.insert(
        "authorization",
        format!("Bearer {token}").parse().expect("ascii token"),
    );
    metadata
}

/// Flip one bit of a decoded segment and re-encode it
fn flip_bit(token: &str, segment: usize, bit: usize) -> String {
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let mut bytes = URL_SAFE_NO_PAD.decode(&parts[segment]).unwrap();
    let bit = bit % (bytes.len() * 8);
    bytes[bit / 8] ^= 1 << (bit % 8);
    parts[segment] = URL_SAFE_NO_PAD.encode(bytes);
    parts.join(".")
}

#[test]
fn test_scenario_alice_admin() {
    let (manager, clock) = manager_at(SECRET, EPOCH);
    let claims = PrincipalClaims::new(7, "alice", "admin");

    let token = manager.issue(&claims, Duration::hours(1)).unwrap();
    assert_eq!(token.split('.').count(), 3);

    let verified = manager.verify(&token).unwrap();
    assert_eq!(verified.user_id, UserId::Int(7));
    assert_eq!(verified.user_name, "alice");
    assert_eq!(verified.user_role, "admin");

    clock.advance(Duration::hours(2));
    assert_eq!(manager.verify(&token), Err(TokenError::Expired));
}

#[test]
fn test_grpc_metadata_round_trip() {
    let (manager, _) = manager_at(SECRET, EPOCH);
    let claims = PrincipalClaims::new("u-42", "bob", "viewer");
    let token = manager.issue(&claims, Duration::minutes(10)).unwrap();

    let metadata = bearer_metadata(&token);
    assert_eq!(
        manager.extract_from_metadata(Some(&metadata)).unwrap(),
        manager.verify(&token).unwrap()
    );
}

#[test]
fn test_grpc_metadata_without_prefix() {
    let (manager, _) = manager_at(SECRET, EPOCH);
    let token = manager
        .issue(&PrincipalClaims::new(1, "a", "b"), Duration::minutes(10))
        .unwrap();

    let mut metadata = MetadataMap::new();
    metadata.insert("authorization", token.parse().unwrap());

    assert_eq!(
        manager.extract_from_metadata(Some(&metadata)),
        Err(TokenError::MalformedCredential)
    );
}

#[test]
fn test_grpc_metadata_empty() {
    let (manager, _) = manager_at(SECRET, EPOCH);

    assert_eq!(
        manager.extract_from_metadata(Some(&MetadataMap::new())),
        Err(TokenError::MissingMetadata)
    );
    assert_eq!(
        manager.extract_from_metadata::<MetadataMap>(None),
        Err(TokenError::MissingMetadata)
    );
}

#[test]
fn test_grpc_metadata_other_headers_only() {
    let (manager, _) = manager_at(SECRET, EPOCH);

    let mut metadata = MetadataMap::new();
    metadata.insert("x-correlation-id", MetadataValue::from_static("abc"));

    assert_eq!(
        manager.extract_from_metadata(Some(&metadata)),
        Err(TokenError::MissingCredential)
    );
}

#[test]
fn test_metadata_source_as_trait_object() {
    let (manager, _) = manager_at(SECRET, EPOCH);
    let token = manager
        .issue(&PrincipalClaims::new(3, "c", "d"), Duration::minutes(1))
        .unwrap();

    let metadata = bearer_metadata(&token);
    let source: &dyn MetadataSource = &metadata;
    assert!(manager.extract_from_metadata(Some(source)).is_ok());
}

#[test]
fn test_different_secrets_do_not_cross_verify() {
    let (issuer, _) = manager_at("secret-a", EPOCH);
    let (verifier, _) = manager_at("secret-b", EPOCH);

    let token = issuer
        .issue(&PrincipalClaims::new(1, "a", "b"), Duration::hours(1))
        .unwrap();
    assert_eq!(verifier.verify(&token), Err(TokenError::InvalidSignature));
}

#[test]
fn test_character_substitution_never_verifies() {
    let (manager, _) = manager_at(SECRET, EPOCH);
    let token = manager
        .issue(&PrincipalClaims::new(7, "alice", "admin"), Duration::hours(1))
        .unwrap();

    for (i, c) in token.char_indices() {
        if c == '.' {
            continue;
        }
        let replacement = if c == 'A' { 'B' } else { 'A' };
        let mut tampered = token.clone();
        tampered.replace_range(i..i + 1, &replacement.to_string());

        assert!(
            manager.verify(&tampered).is_err(),
            "substitution at {i} verified"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_use_of_one_manager() {
    let manager = Arc::new(TokenManager::new(SECRET).unwrap());

    let handles: Vec<_> = (0..64i64)
        .map(|i| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move {
                let claims = PrincipalClaims::new(i, format!("user-{i}"), "member");
                let token = manager.issue(&claims, Duration::minutes(5)).unwrap();
                assert_eq!(manager.verify(&token).unwrap(), claims);
            })
        })
        .collect();

    for handle in handles {
        handle.await.expect("task panicked");
    }
}

fn user_id_strategy() -> impl Strategy<Value = UserId> {
    prop_oneof![
        any::<i64>().prop_map(UserId::Int),
        "[a-zA-Z0-9-]{1,36}".prop_map(UserId::Str),
    ]
}

proptest! {
    #[test]
    fn prop_round_trip(
        user_id in user_id_strategy(),
        user_name in "\\PC{0,32}",
        user_role in "[a-z_]{1,16}",
        ttl_secs in 1i64..=30 * 24 * 3600,
    ) {
        let (manager, _) = manager_at(SECRET, EPOCH);
        let claims = PrincipalClaims { user_id, user_name, user_role };

        let token = manager.issue(&claims, Duration::seconds(ttl_secs)).unwrap();
        prop_assert_eq!(manager.verify(&token).unwrap(), claims);
    }

    #[test]
    fn prop_expired_at_or_after_exp(ttl_secs in -3600i64..=3600, after in 0i64..=7200) {
        let (manager, clock) = manager_at(SECRET, EPOCH);
        let token = manager
            .issue(&PrincipalClaims::new(1, "a", "b"), Duration::seconds(ttl_secs))
            .unwrap();

        clock.advance(Duration::seconds(ttl_secs.max(0) + after));
        prop_assert_eq!(manager.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn prop_payload_bit_flip_is_invalid_signature(bit in any::<usize>()) {
        let (manager, _) = manager_at(SECRET, EPOCH);
        let token = manager
            .issue(&PrincipalClaims::new(7, "alice", "admin"), Duration::hours(1))
            .unwrap();

        let tampered = flip_bit(&token, 1, bit);
        prop_assert_eq!(manager.verify(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn prop_signature_bit_flip_is_invalid_signature(bit in any::<usize>()) {
        let (manager, _) = manager_at(SECRET, EPOCH);
        let token = manager
            .issue(&PrincipalClaims::new(7, "alice", "admin"), Duration::hours(1))
            .unwrap();

        let tampered = flip_bit(&token, 2, bit);
        prop_assert_eq!(manager.verify(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn prop_foreign_algorithm_is_rejected(
        alg in prop_oneof![
            Just("none".to_string()),
            Just("RS256".to_string()),
            Just("ES256".to_string()),
            Just("HS512".to_string()),
            "[A-Z]{2}[0-9]{3}",
        ],
    ) {
        prop_assume!(alg != "HS256");
        let (manager, _) = manager_at(SECRET, EPOCH);
        let token = manager
            .issue(&PrincipalClaims::new(7, "alice", "admin"), Duration::hours(1))
            .unwrap();

        // Keep payload and signature, swap in a header naming another algorithm
        let (_, rest) = token.split_once('.').unwrap();
        let header = URL_SAFE_NO_PAD.encode(format!(r#"{{"alg":"{alg}","typ":"JWT"}}"#));
        let forged = format!("{header}.{rest}");

        prop_assert_eq!(
            manager.verify(&forged),
            Err(TokenError::UnsupportedAlgorithm(alg))
        );
    }

    #[test]
    fn prop_issue_is_deterministic(user_id in any::<i64>(), ttl_secs in 0i64..=86_400) {
        let (manager, _) = manager_at(SECRET, EPOCH);
        let claims = PrincipalClaims::new(user_id, "n", "r");

        prop_assert_eq!(
            manager.issue(&claims, Duration::seconds(ttl_secs)).unwrap(),
            manager.issue(&claims, Duration::seconds(ttl_secs)).unwrap()
        );
    }
}
