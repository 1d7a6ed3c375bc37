//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use serde_json::json;
use statuseq::api::{CompareRequest, CompareResponse, HealthResponse};
use statuseq_core::{Comparison, render_diff};

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_serialization() {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: "0.3.2".to_string(),
    };

    let json = serde_json::to_string(&health).unwrap();
    assert!(json.contains("\"status\":\"ok\""));
    assert!(json.contains("\"version\":\"0.3.2\""));
}

// =============================================================================
// COMPARE REQUEST TESTS
// =============================================================================

#[test]
fn test_compare_request_typed_defaults_to_false() {
    let request: CompareRequest =
        serde_json::from_str(r#"{"old": {"status": {}}, "new": {}}"#).unwrap();
    assert!(!request.typed);
    assert_eq!(request.old, json!({"status": {}}));
    assert_eq!(request.new, json!({}));
}

#[test]
fn test_compare_request_typed_flag() {
    let request: CompareRequest =
        serde_json::from_str(r#"{"old": {}, "new": {}, "typed": true}"#).unwrap();
    assert!(request.typed);
}

#[test]
fn test_compare_request_requires_both_documents() {
    let result = serde_json::from_str::<CompareRequest>(r#"{"old": {}}"#);
    assert!(result.is_err());
}

// =============================================================================
// COMPARE RESPONSE TESTS
// =============================================================================

#[test]
fn test_compare_response_equal_omits_optional_fields() {
    let response = CompareResponse::verdict(Comparison::equal());
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value, json!({"success": true, "equal": true}));
}

#[test]
fn test_compare_response_carries_diff_entries() {
    let diff = render_diff(&json!({"replicas": 3}), &json!({"replicas": 4})).unwrap();
    let response = CompareResponse::verdict(Comparison::unequal(Some(diff)));
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["success"], json!(true));
    assert_eq!(value["equal"], json!(false));
    assert_eq!(
        value["diff"],
        json!([{"path": "/replicas", "op": "changed", "from": 3, "to": 4}])
    );
}

#[test]
fn test_compare_response_error() {
    let response = CompareResponse::error("bad input");
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value, json!({"success": false, "error": "bad input"}));
}

#[test]
fn test_compare_response_deserialization() {
    let json = r#"{"success":true,"equal":false,"diff":[{"path":"/phase","op":"added","value":"Running"}]}"#;
    let response: CompareResponse = serde_json::from_str(json).unwrap();

    assert!(response.success);
    assert_eq!(response.equal, Some(false));
    assert_eq!(response.diff.unwrap().len(), 1);
    assert!(response.error.is_none());
}
