//! HTTP response assertions.

use axum_test::TestResponse;
use serde_json::Value;

/// Asserts that the response is a JSON error envelope with the given status.
///
/// Returns the error message.
pub fn assert_envelope(response: &TestResponse, expected_status: u64) -> String {
    let body: Value = response.json();
    assert_eq!(
        body["status"].as_u64(),
        Some(expected_status),
        "Expected envelope status {}, got {}",
        expected_status,
        body
    );
    let message = body["error"]
        .as_str()
        .unwrap_or_else(|| panic!("Envelope has no error message: {}", body));
    message.to_string()
}

/// Asserts a validation failure: HTTP 200 with envelope status 400.
pub fn assert_bad_request(response: &TestResponse) -> String {
    response.assert_status_ok();
    assert_envelope(response, 400)
}

/// Asserts the response Content-Type.
pub fn assert_content_type(response: &TestResponse, expected: &str) {
    let actual = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        actual.starts_with(expected),
        "Expected Content-Type {}, got {}",
        expected,
        actual
    );
}

/// Returns the values of `key` across the `results` array.
pub fn result_values(body: &Value, key: &str) -> Vec<Value> {
    body["results"]
        .as_array()
        .map(|results| results.iter().map(|r| r[key].clone()).collect())
        .unwrap_or_default()
}

/// Returns the `bill_id` of each result, in order.
pub fn bill_ids(body: &Value) -> Vec<String> {
    result_values(body, "bill_id")
        .into_iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect()
}
