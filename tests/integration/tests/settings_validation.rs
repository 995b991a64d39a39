//! End-to-end connection-settings validation scenarios.

use channelkit_core::issue_codes;
use channelkit_integration_tests::{flexible_basic_schema, settings_from, strict_basic_sms_schema};

#[test]
fn test_clean_settings_pass_strict_validation() {
    let schema = strict_basic_sms_schema();
    let settings = settings_from(&[
        ("SenderId", "ACME"),
        ("Username", "u"),
        ("Password", "p"),
    ]);

    let issues = schema.validate_connection_settings(&settings);
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[test]
fn test_missing_required_parameter_reported_once() {
    let schema = strict_basic_sms_schema();
    let settings = settings_from(&[("Username", "u"), ("Password", "p")]);

    let issues = schema.validate_connection_settings(&settings);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, issue_codes::REQUIRED_PARAMETER_MISSING);
    assert_eq!(issues[0].field, "SenderId");
}

#[test]
fn test_strict_mode_rejects_unknown_key() {
    let schema = strict_basic_sms_schema();
    let settings = settings_from(&[
        ("SenderId", "ACME"),
        ("Username", "u"),
        ("Password", "p"),
        ("Region", "eu"),
    ]);

    let issues = schema.validate_connection_settings(&settings);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, issue_codes::UNKNOWN_PARAMETER);
    assert_eq!(issues[0].field, "Region");
}

#[test]
fn test_non_strict_mode_accepts_unknown_key() {
    let schema = flexible_basic_schema();
    let settings = settings_from(&[("Username", "u"), ("Password", "p"), ("Region", "eu")]);

    let issues = schema.validate_connection_settings(&settings);
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[test]
fn test_flexible_basic_either_pair_satisfies() {
    let schema = flexible_basic_schema();

    let first_pair = settings_from(&[("Username", "u"), ("Password", "p")]);
    assert!(schema.validate_connection_settings(&first_pair).is_empty());

    let second_pair = settings_from(&[("AccountSid", "AC1"), ("AuthToken", "t1")]);
    assert!(schema.validate_connection_settings(&second_pair).is_empty());
}

#[test]
fn test_flexible_basic_mismatched_halves_satisfy_nothing() {
    let schema = flexible_basic_schema();
    // One half of each pair; no alternative is complete.
    let settings = settings_from(&[("Username", "u"), ("AuthToken", "t1")]);

    let issues = schema.validate_connection_settings(&settings);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, issue_codes::AUTHENTICATION_NOT_SATISFIED);
}
