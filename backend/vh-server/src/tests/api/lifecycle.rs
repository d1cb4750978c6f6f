use crate::api::lifecycle::parse_overrides;

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, none, some};
use vh_config::ConfigOverrides;

#[test]
fn given_empty_body_when_parsing_overrides_then_none_applied() {
    // Given
    let body = b"";

    // When
    let overrides = parse_overrides(body).unwrap();

    // Then
    assert_that!(overrides, eq(&ConfigOverrides::default()));
}

#[test]
fn given_whitespace_body_when_parsing_overrides_then_none_applied() {
    // Given / When
    let overrides = parse_overrides(b" \n").unwrap();

    // Then
    assert!(overrides.is_empty());
}

#[test]
fn given_partial_body_when_parsing_overrides_then_only_given_fields_set() {
    // Given
    let body = br#"{"port": 2457, "public": 0, "extra": "ignored"}"#;

    // When
    let overrides = parse_overrides(body).unwrap();

    // Then
    assert_that!(overrides.port, some(eq(2457)));
    assert_that!(overrides.public, some(eq(false)));
    assert_that!(overrides.name, none());
}

#[test]
fn given_malformed_body_when_parsing_overrides_then_bad_request() {
    // Given
    let body = br#"{"port": "#;

    // When
    let result = parse_overrides(body);

    // Then
    assert_that!(result, err(anything()));
}
