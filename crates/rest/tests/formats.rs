//! Integration tests for output formats and route-level errors.
//!
//! Covers JSON, JSONP and XML rendering, the vote breakdown key rewrite in
//! XML, and the 404/415 responses for malformed routes.

mod common;

use axum::http::StatusCode;
use serde_json::Value;

use common::assertions::{assert_bad_request, assert_content_type, assert_envelope};
use common::harness::memory_server;

#[tokio::test]
async fn test_json_content_type() {
    let server = memory_server();

    let response = server.get("/bills.json").await;
    response.assert_status_ok();
    assert_content_type(&response, "application/json");
}

#[tokio::test]
async fn test_jsonp_callback() {
    let server = memory_server();

    let response = server.get("/bills.json?callback=app.render&per_page=1").await;
    response.assert_status_ok();
    assert_content_type(&response, "application/javascript");

    let text = response.text();
    assert!(text.starts_with("app.render("), "body: {}", text);
    assert!(text.ends_with(");"), "body: {}", text);

    let json: Value = serde_json::from_str(&text["app.render(".len()..text.len() - 2]).unwrap();
    assert_eq!(json["count"], 4);
}

#[tokio::test]
async fn test_jsonp_wraps_error_envelopes() {
    let server = memory_server();

    let response = server.get("/bills.json?callback=handle&color=red").await;
    assert_content_type(&response, "application/javascript");

    let text = response.text();
    assert!(text.starts_with("handle({"), "body: {}", text);
    assert!(text.contains("\"status\":400"), "body: {}", text);
}

#[tokio::test]
async fn test_invalid_callback() {
    let server = memory_server();

    let response = server
        .get("/bills.json")
        .add_query_param("callback", "alert(document.cookie)")
        .await;
    assert_content_type(&response, "application/json");
    let message = assert_bad_request(&response);
    assert!(message.contains("callback"), "message: {}", message);
}

#[tokio::test]
async fn test_blank_callback_is_ignored() {
    let server = memory_server();

    let response = server.get("/bills.json?callback=").await;
    assert_content_type(&response, "application/json");
    let body: Value = response.json();
    assert_eq!(body["count"], 4);
}

#[tokio::test]
async fn test_xml_output() {
    let server = memory_server();

    let response = server
        .get("/bills.xml?fields=bill_id,cosponsors_count,sponsor_id&chamber=house")
        .await;
    response.assert_status_ok();
    assert_content_type(&response, "application/xml");

    let xml = response.text();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<results type=\"array\">"));
    assert!(xml.contains("<result>"));
    assert!(xml.contains("<bill_id>hr1-113</bill_id>"));
    assert!(xml.contains("<cosponsors_count type=\"integer\">12</cosponsors_count>"));
    assert!(xml.contains("<sponsor_id nil=\"true\"/>"));
    assert!(xml.contains("<count type=\"integer\">3</count>"));
}

#[tokio::test]
async fn test_xml_ignores_callback() {
    let server = memory_server();

    let response = server.get("/bills.xml?callback=handle").await;
    assert_content_type(&response, "application/xml");
    assert!(!response.text().starts_with("handle("));
}

#[tokio::test]
async fn test_xml_error_envelope() {
    let server = memory_server();

    let response = server.get("/bills.xml?fields=bogus").await;
    response.assert_status_ok();
    assert_content_type(&response, "application/xml");

    let xml = response.text();
    assert!(xml.contains("<status type=\"integer\">400</status>"));
    assert!(xml.contains("<error>"));
}

#[tokio::test]
async fn test_vote_breakdown_keys_dasherized_in_xml_only() {
    let server = memory_server();

    let xml = server.get("/votes.xml?sort=voted_at").await.text();
    assert!(xml.contains("<Not-Voting type=\"integer\">19</Not-Voting>"));
    assert!(xml.contains("<Not-Voting type=\"integer\">4</Not-Voting>"));
    assert!(!xml.contains("<Not Voting"));
    assert!(xml.contains("<question>On Passage of H.R. 1</question>"));

    let body: Value = server.get("/votes.json?sort=voted_at").await.json();
    assert_eq!(body["results"][0]["vote_breakdown"]["total"]["Not Voting"], 19);
}

#[tokio::test]
async fn test_unsupported_format() {
    let server = memory_server();

    let response = server.get("/bills.csv").await;
    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_content_type(&response, "application/json");
    let message = assert_envelope(&response, 415);
    assert!(message.contains("csv"), "message: {}", message);

    let response = server.get("/bills/search.yaml?q=farm").await;
    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_missing_format_suffix() {
    let server = memory_server();

    let response = server.get("/bills").await;
    response.assert_status_not_found();
    assert_envelope(&response, 404);

    let response = server.get("/bills/search?q=farm").await;
    response.assert_status_not_found();
    assert_envelope(&response, 404);
}

#[tokio::test]
async fn test_unknown_collection() {
    let server = memory_server();

    let response = server.get("/widgets.json").await;
    response.assert_status_not_found();
    let message = assert_envelope(&response, 404);
    assert!(message.contains("widgets"), "message: {}", message);

    let response = server.get("/widgets.xml").await;
    response.assert_status_not_found();
    assert_content_type(&response, "application/xml");
    assert!(response.text().contains("<status type=\"integer\">404</status>"));
}

#[tokio::test]
async fn test_unknown_routes() {
    let server = memory_server();

    let response = server.get("/bills/find.json").await;
    response.assert_status_not_found();
    assert_envelope(&response, 404);

    let response = server.get("/bills/search/extra.json").await;
    response.assert_status_not_found();
    assert_envelope(&response, 404);
}
