//! Tests for the auth module

use super::*;
use std::collections::HashMap;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

// ============================================================================
// Credentials Tests
// ============================================================================

#[test]
fn test_credentials_first_non_empty_wins() {
    let names = ["SUPABASE_SERVICE_ROLE_KEY", "SUPABASE_ANON_KEY"];
    let creds = Credentials::resolve_with(
        &names,
        lookup(&[
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]),
    )
    .unwrap();
    assert_eq!(creds.secret(), "service");
    assert_eq!(creds.source(), "SUPABASE_SERVICE_ROLE_KEY");
}

#[test]
fn test_credentials_blank_falls_through() {
    let names = ["SUPABASE_SERVICE_ROLE_KEY", "SUPABASE_ANON_KEY"];
    let creds = Credentials::resolve_with(
        &names,
        lookup(&[
            ("SUPABASE_SERVICE_ROLE_KEY", "   "),
            ("SUPABASE_ANON_KEY", " anon-key \n"),
        ]),
    )
    .unwrap();
    assert_eq!(creds.secret(), "anon-key");
    assert_eq!(creds.source(), "SUPABASE_ANON_KEY");
}

#[test]
fn test_credentials_missing_is_config_error() {
    let names = ["MEETGEEK_API_TOKEN"];
    let err = Credentials::resolve_with(&names, lookup(&[])).unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("MEETGEEK_API_TOKEN"));
}

#[test]
fn test_credentials_debug_hides_secret() {
    let creds = Credentials::new("super-secret");
    let printed = format!("{creds:?}");
    assert!(!printed.contains("super-secret"));
    assert!(printed.contains("literal"));
}

// ============================================================================
// Authenticator Tests
// ============================================================================

#[test]
fn test_no_auth() {
    let auth = Authenticator::new(AuthConfig::None);
    let client = reqwest::Client::new();
    let req = auth.apply(client.get("https://example.com/api"));

    let built = req.build().unwrap();
    assert!(built.headers().get("Authorization").is_none());
}

#[test]
fn test_supabase_auth_sets_both_headers() {
    let auth = Authenticator::new(AuthConfig::supabase(Credentials::new("key-123")));
    let client = reqwest::Client::new();
    let built = auth
        .apply(client.get("https://example.com/rest/v1/notes"))
        .build()
        .unwrap();

    assert_eq!(built.headers().get("apikey").unwrap(), "key-123");
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Bearer key-123"
    );
}

#[test]
fn test_bearer_auth() {
    let auth = Authenticator::new(AuthConfig::bearer(Credentials::new("tok")));
    let client = reqwest::Client::new();
    let built = auth
        .apply(client.get("https://example.com/api"))
        .build()
        .unwrap();

    assert_eq!(built.headers().get("Authorization").unwrap(), "Bearer tok");
}

#[test]
fn test_authenticator_keeps_config() {
    let auth = Authenticator::new(AuthConfig::bearer(Credentials::new("tok")));
    assert!(matches!(auth.config(), AuthConfig::Bearer { .. }));
    assert!(!auth.config().is_none());
    assert!(AuthConfig::default().is_none());
}
