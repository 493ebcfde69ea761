//! Integration tests for the queryable path.
//!
//! Covers default fields, filters with operator suffixes, sorting (including
//! the legacy `order` syntax), pagination bounds and parameter validation.

mod common;

use serde_json::Value;

use common::assertions::{assert_bad_request, bill_ids};
use common::harness::memory_server;

#[tokio::test]
async fn test_default_fields_and_page() {
    let server = memory_server();

    let response = server.get("/bills.json").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["count"], 4);
    assert_eq!(body["page"]["count"], 4);
    assert_eq!(body["page"]["per_page"], 20);
    assert_eq!(body["page"]["page"], 1);

    let first = body["results"][0].as_object().unwrap();
    assert_eq!(first["bill_id"], "hr1-113");
    assert_eq!(first["title"], "Farm Bill Reauthorization Act");
    assert!(first.contains_key("introduced_on"));
    assert!(!first.contains_key("status"), "status is not a default field");
    assert!(!first.contains_key("summary"));
}

#[tokio::test]
async fn test_equality_filter() {
    let server = memory_server();

    let body: Value = server
        .get("/bills.json")
        .add_query_param("chamber", "house")
        .await
        .json();

    assert_eq!(body["count"], 3);
    assert_eq!(bill_ids(&body), vec!["hr1-113", "hr2-113", "hr4-112"]);
}

#[tokio::test]
async fn test_range_filter_with_sort() {
    let server = memory_server();

    let body: Value = server
        .get("/bills.json?introduced_on__gte=2013-01-01&sort=-introduced_on")
        .await
        .json();

    assert_eq!(bill_ids(&body), vec!["s3-113", "hr2-113", "hr1-113"]);
}

#[tokio::test]
async fn test_legacy_order_syntax() {
    let server = memory_server();

    let body: Value = server
        .get("/bills.json?congress=113&order=cosponsors_count__desc")
        .await
        .json();

    assert_eq!(bill_ids(&body), vec!["hr2-113", "hr1-113", "s3-113"]);
}

#[tokio::test]
async fn test_operator_suffixes() {
    let server = memory_server();

    let body: Value = server.get("/bills.json?chamber__not=house").await.json();
    assert_eq!(bill_ids(&body), vec!["s3-113"]);

    let body: Value = server
        .get("/bills.json")
        .add_query_param("congress__in", "112|114")
        .await
        .json();
    assert_eq!(bill_ids(&body), vec!["hr4-112"]);

    let body: Value = server.get("/bills.json?title__match=FARM").await.json();
    assert_eq!(bill_ids(&body), vec!["hr1-113", "hr4-112"]);

    let body: Value = server
        .get("/bills.json?cosponsors_count__gt=5&cosponsors_count__lte=40")
        .await
        .json();
    assert_eq!(bill_ids(&body), vec!["hr1-113", "hr2-113"]);
}

#[tokio::test]
async fn test_nested_boolean_and_array_fields() {
    let server = memory_server();

    let body: Value = server.get("/bills.json?history.active=true").await.json();
    assert_eq!(bill_ids(&body), vec!["hr1-113", "s3-113"]);

    let body: Value = server.get("/bills.json?keywords=farm").await.json();
    assert_eq!(bill_ids(&body), vec!["hr1-113", "hr4-112"]);
}

#[tokio::test]
async fn test_null_filter() {
    let server = memory_server();

    let body: Value = server.get("/bills.json?sponsor_id=null").await.json();
    assert_eq!(bill_ids(&body), vec!["hr2-113"]);
}

#[tokio::test]
async fn test_repeated_parameters_are_anded() {
    let server = memory_server();

    let body: Value = server
        .get("/bills.json?chamber=house&chamber=senate")
        .await
        .json();
    assert_eq!(body["count"], 0);
    assert!(body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_requested_fields() {
    let server = memory_server();

    let body: Value = server
        .get("/bills.json?fields=bill_id,status,history.active&per_page=1")
        .await
        .json();

    let first = body["results"][0].as_object().unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(first["status"], "enacted");
    assert_eq!(first["history"]["active"], true);
}

#[tokio::test]
async fn test_pagination() {
    let server = memory_server();

    let body: Value = server.get("/bills.json?per_page=2&page=2").await.json();
    assert_eq!(body["count"], 4);
    assert_eq!(bill_ids(&body), vec!["s3-113", "hr4-112"]);
    assert_eq!(body["page"]["page"], 2);
    assert_eq!(body["page"]["per_page"], 2);

    let body: Value = server.get("/bills.json?per_page=2&page=9").await.json();
    assert_eq!(body["count"], 4);
    assert!(bill_ids(&body).is_empty());
}

#[tokio::test]
async fn test_per_page_is_clamped() {
    let server = memory_server();

    let body: Value = server.get("/bills.json?per_page=500&page=0").await.json();
    assert_eq!(body["page"]["per_page"], 50);
    assert_eq!(body["page"]["page"], 1);
}

#[tokio::test]
async fn test_oversized_page_numbers_are_clamped() {
    let server = memory_server();

    let response = server
        .get("/bills.json?page=99999999999999999999&per_page=99999999999999999999")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body.get("error").is_none(), "body: {}", body);
    assert_eq!(body["count"], 4);
    assert_eq!(body["page"]["per_page"], 50);
    assert!(bill_ids(&body).is_empty());
}

#[tokio::test]
async fn test_control_parameters_are_not_filters() {
    let server = memory_server();

    let body: Value = server
        .get("/bills.json?apikey=secret&format=json&timeout=1000")
        .await
        .json();
    assert_eq!(body["count"], 4);
}

#[tokio::test]
async fn test_unknown_filter_field() {
    let server = memory_server();

    let response = server.get("/bills.json?color=red").await;
    let message = assert_bad_request(&response);
    assert!(message.contains("color"), "message: {}", message);
}

#[tokio::test]
async fn test_unknown_operator() {
    let server = memory_server();

    let response = server.get("/bills.json?congress__between=1").await;
    let message = assert_bad_request(&response);
    assert!(message.contains("between"), "message: {}", message);
}

#[tokio::test]
async fn test_invalid_values() {
    let server = memory_server();

    assert_bad_request(&server.get("/bills.json?congress=abc").await);
    assert_bad_request(&server.get("/bills.json?introduced_on=yesterday").await);
    assert_bad_request(&server.get("/bills.json?page=two").await);
    assert_bad_request(&server.get("/bills.json?history.active=maybe").await);
}

#[tokio::test]
async fn test_invalid_fields_and_sort() {
    let server = memory_server();

    let message = assert_bad_request(&server.get("/bills.json?fields=bill_id,bogus").await);
    assert!(message.contains("bogus"), "message: {}", message);

    let message = assert_bad_request(&server.get("/bills.json?sort=title").await);
    assert!(message.contains("title"), "message: {}", message);
}
