//! Tests for link composition
//!
//! These exercise the composer directly, without storage or HTTP.

use linkly::composer::{compose, has_scheme, ComposeError};
use linkly::model::Parameter;

fn utm(value: &str) -> Vec<Parameter> {
    vec![Parameter::new("utm_source", value)]
}

#[test]
fn test_scheme_less_link_keeps_its_shape() {
    let url = compose("example.com", &utm("google")).unwrap();
    assert_eq!(url, "example.com/?utm_source=google");
}

#[test]
fn test_existing_query_is_preserved() {
    let url = compose("https://example.com?a=1", &utm("google")).unwrap();
    assert_eq!(url, "https://example.com/?a=1&utm_source=google");
}

#[test]
fn test_explicit_http_scheme_is_not_stripped() {
    let url = compose("http://example.com", &utm("google")).unwrap();
    assert_eq!(url, "http://example.com/?utm_source=google");
}

#[test]
fn test_other_letter_schemes_are_kept() {
    let url = compose("ftp://files.example.com/a", &[Parameter::new("x", "1")]).unwrap();
    assert_eq!(url, "ftp://files.example.com/a?x=1");

    let url = compose("HTTPS://Example.com", &[]).unwrap();
    assert_eq!(url, "https://example.com/");
}

#[test]
fn test_scheme_detection_is_letters_only() {
    assert!(has_scheme("https://example.com"));
    assert!(has_scheme("Mailto://x"));
    assert!(!has_scheme("example.com"));
    assert!(!has_scheme("h2://example.com"));
    assert!(!has_scheme("coap+tcp://example.com"));
    assert!(!has_scheme("svn-ssh://example.com"));
    assert!(!has_scheme("://example.com"));
}

#[test]
fn test_whitespace_is_trimmed() {
    let url = compose("   example.com/path  \n", &[]).unwrap();
    assert_eq!(url, "example.com/path");
}

#[test]
fn test_zero_params_adds_no_query() {
    assert_eq!(compose("example.com/landing", &[]).unwrap(), "example.com/landing");
    assert_eq!(
        compose("example.com/landing?ref=1", &[]).unwrap(),
        "example.com/landing?ref=1"
    );
}

#[test]
fn test_incomplete_params_are_skipped() {
    let params = vec![Parameter::new("utm_source", ""), Parameter::new("", "x")];
    let url = compose("example.com", &params).unwrap();
    assert_eq!(url, "example.com/");
}

#[test]
fn test_param_order_is_preserved() {
    let params = vec![
        Parameter::new("utm_source", "news"),
        Parameter::new("skipped", ""),
        Parameter::new("utm_medium", "email"),
        Parameter::new("utm_campaign", "launch"),
    ];
    let url = compose("https://example.com/p", &params).unwrap();
    assert_eq!(
        url,
        "https://example.com/p?utm_source=news&utm_medium=email&utm_campaign=launch"
    );
}

#[test]
fn test_repeated_keys_are_all_emitted() {
    let params = vec![Parameter::new("tag", "a"), Parameter::new("tag", "b")];
    let url = compose("https://example.com/?tag=z", &params).unwrap();
    assert_eq!(url, "https://example.com/?tag=z&tag=a&tag=b");
}

#[test]
fn test_values_are_form_encoded() {
    let params = vec![
        Parameter::new("utm_campaign", "summer sale"),
        Parameter::new("q", "a&b=c"),
    ];
    let url = compose("example.com", &params).unwrap();
    assert_eq!(url, "example.com/?utm_campaign=summer+sale&q=a%26b%3Dc");
}

#[test]
fn test_fragment_stays_after_query() {
    let url = compose("example.com/page#top", &[Parameter::new("a", "1")]).unwrap();
    assert_eq!(url, "example.com/page?a=1#top");
}

#[test]
fn test_invalid_link_reports_raw_input() {
    let err = compose("not a url", &[]).unwrap_err();
    assert!(matches!(err, ComposeError::InvalidUrl { .. }));
    assert_eq!(err.message(), "Invalid URL");
    assert_eq!(err.context(), "not a url");
}

#[test]
fn test_empty_and_blank_links_are_invalid() {
    for input in ["", "   ", "\t\n"] {
        let err = compose(input, &utm("google")).unwrap_err();
        assert!(
            matches!(err, ComposeError::InvalidUrl { .. }),
            "{input:?} should be invalid"
        );
    }
}

#[test]
fn test_compose_is_deterministic() {
    let params = vec![
        Parameter::new("utm_source", "google"),
        Parameter::new("utm_term", "rust lang"),
    ];
    let first = compose("example.com/x", &params).unwrap();
    let second = compose("example.com/x", &params).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_existing_query_is_form_reencoded_on_append() {
    let url = compose("example.com?flag", &utm("google")).unwrap();
    assert_eq!(url, "example.com/?flag=&utm_source=google");

    let url = compose("example.com?q=a%20b", &utm("google")).unwrap();
    assert_eq!(url, "example.com/?q=a+b&utm_source=google");

    let url = compose("example.com?a=1&&b=2", &utm("google")).unwrap();
    assert_eq!(url, "example.com/?a=1&b=2&utm_source=google");
}

#[test]
fn test_existing_query_untouched_without_params() {
    assert_eq!(compose("example.com?flag", &[]).unwrap(), "example.com/?flag");
    assert_eq!(
        compose("example.com?a=1&&b=2", &utm("")).unwrap(),
        "example.com/?a=1&&b=2"
    );
}
