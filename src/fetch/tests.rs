//! Tests for the paged fetch loop

use super::*;
use crate::decode::BodyFormat;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use serde::Deserialize;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn walker(server: &MockServer) -> PageWalker {
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    PageWalker::new(HttpClient::with_config(config))
}

/// Mount one JSON page at `/items?page=N`, linking to the next page when
/// `next` is given
async fn mount_page(server: &MockServer, page: u32, body: Value, next: Option<u32>) {
    let mut template = ResponseTemplate::new(200).set_body_json(body);
    if let Some(next) = next {
        template = template.insert_header(
            "link",
            format!(
                "<{}/items?page={next}>; rel=\"next\", <{}/items?page=1>; rel=\"first\"",
                server.uri(),
                server.uri()
            )
            .as_str(),
        );
    }

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", page.to_string()))
        .respond_with(template)
        .mount(server)
        .await;
}

// ============================================================================
// Walk Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_all_three_pages_in_order() {
    let server = MockServer::start().await;
    mount_page(&server, 1, json!([{"id": 1}, {"id": 2}]), Some(2)).await;
    mount_page(&server, 2, json!([{"id": 3}, {"id": 4}]), Some(3)).await;
    mount_page(&server, 3, json!([{"id": 5}, {"id": 6}]), None).await;

    let walker = walker(&server);
    let result = walker
        .fetch_all(&format!("{}/items?page=1", server.uri()))
        .await
        .unwrap();

    let ids: Vec<i64> = result
        .items
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(result.stats.pages_fetched, 3);
    assert_eq!(result.stats.items_fetched, 6);
    // The final page carried no next link
    assert!(!result.links.has_next());
    assert!(result.links.first.is_some());
}

#[tokio::test]
async fn test_fetch_all_single_page_without_link_header() {
    let server = MockServer::start().await;
    mount_page(&server, 1, json!([{"id": 1}]), None).await;

    let walker = walker(&server);
    let result = walker
        .fetch_all(&format!("{}/items?page=1", server.uri()))
        .await
        .unwrap();

    assert_eq!(result.items.len(), 1);
    assert_eq!(result.stats.pages_fetched, 1);
    assert!(result.links.is_empty());
}

#[tokio::test]
async fn test_fetch_all_mid_walk_transport_failure_discards_pages() {
    let server = MockServer::start().await;
    mount_page(&server, 1, json!([{"id": 1}]), Some(2)).await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let walker = walker(&server);
    let err = walker
        .fetch_all(&format!("{}/items?page=1", server.uri()))
        .await
        .unwrap_err();

    // First page's items are not returned as a partial success
    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_fetch_all_mid_walk_decode_failure_discards_pages() {
    let server = MockServer::start().await;
    mount_page(&server, 1, json!([{"id": 1}]), Some(2)).await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string("{not json"),
        )
        .mount(&server)
        .await;

    let walker = walker(&server);
    let err = walker
        .fetch_all(&format!("{}/items?page=1", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::JsonParse(_)));
}

#[tokio::test]
async fn test_fetch_while_caller_stops_between_pages() {
    let server = MockServer::start().await;
    mount_page(&server, 1, json!([{"id": 1}, {"id": 2}]), Some(2)).await;
    mount_page(&server, 2, json!([{"id": 3}]), None).await;

    let walker = walker(&server);
    let result = walker
        .fetch_while(&format!("{}/items?page=1", server.uri()), |_| {
            Continuation::Stop
        })
        .await
        .unwrap();

    // The inspected page's items are kept; no further request is made
    assert_eq!(result.items.len(), 2);
    assert_eq!(result.stats.pages_fetched, 1);
    assert!(result.links.has_next());
}

#[tokio::test]
async fn test_fetch_while_control_sees_each_page() {
    let server = MockServer::start().await;
    mount_page(&server, 1, json!([{"id": 1}]), Some(2)).await;
    mount_page(&server, 2, json!([{"id": 2}]), Some(3)).await;
    mount_page(&server, 3, json!([{"id": 3}]), None).await;

    let walker = walker(&server);
    let mut seen = Vec::new();
    let result = walker
        .fetch_while(&format!("{}/items?page=1", server.uri()), |page| {
            seen.push(page.len());
            if seen.len() == 2 {
                Continuation::Stop
            } else {
                Continuation::Continue
            }
        })
        .await
        .unwrap();

    assert_eq!(seen, vec![1, 1]);
    assert_eq!(result.items.len(), 2);
    assert_eq!(result.stats.pages_fetched, 2);
}

#[tokio::test]
async fn test_max_pages_guard_stops_walk() {
    let server = MockServer::start().await;
    mount_page(&server, 1, json!([{"id": 1}]), Some(2)).await;
    mount_page(&server, 2, json!([{"id": 2}]), Some(3)).await;
    mount_page(&server, 3, json!([{"id": 3}]), None).await;

    let walker = walker(&server).with_config(WalkConfig::new().max_pages(2));
    let result = walker
        .fetch_all(&format!("{}/items?page=1", server.uri()))
        .await
        .unwrap();

    assert_eq!(result.stats.pages_fetched, 2);
    assert_eq!(result.items.len(), 2);
}

#[tokio::test]
async fn test_max_items_guard_truncates() {
    let server = MockServer::start().await;
    mount_page(&server, 1, json!([{"id": 1}, {"id": 2}]), Some(2)).await;
    mount_page(&server, 2, json!([{"id": 3}, {"id": 4}]), Some(3)).await;

    let walker = walker(&server).with_config(WalkConfig::new().max_items(3));
    let result = walker
        .fetch_all(&format!("{}/items?page=1", server.uri()))
        .await
        .unwrap();

    assert_eq!(result.items.len(), 3);
    assert_eq!(result.stats.items_fetched, 3);
    assert_eq!(result.stats.pages_fetched, 2);
}

#[tokio::test]
async fn test_fetch_all_as_typed() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Course {
        id: u32,
        name: String,
    }

    let server = MockServer::start().await;
    mount_page(&server, 1, json!([{"id": 1, "name": "Algebra"}]), Some(2)).await;
    mount_page(&server, 2, json!([{"id": 2, "name": "Biology"}]), None).await;

    let walker = walker(&server);
    let courses: Vec<Course> = walker
        .fetch_all_as(&format!("{}/items?page=1", server.uri()))
        .await
        .unwrap();

    assert_eq!(
        courses,
        vec![
            Course {
                id: 1,
                name: "Algebra".to_string()
            },
            Course {
                id: 2,
                name: "Biology".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn test_fetch_all_as_shape_mismatch() {
    #[derive(Debug, Deserialize)]
    struct Course {
        #[allow(dead_code)]
        id: u32,
    }

    let server = MockServer::start().await;
    mount_page(&server, 1, json!([{"id": "not a number"}]), None).await;

    let walker = walker(&server);
    let err = walker
        .fetch_all_as::<Course>(&format!("{}/items?page=1", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::JsonParse(_)));
}

// ============================================================================
// Content Negotiation Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_page_negotiates_calendar() {
    let server = MockServer::start().await;
    let feed = "BEGIN:VCALENDAR\r\n\
                BEGIN:VEVENT\r\n\
                UID:e1\r\n\
                SUMMARY:Midterm\r\n\
                END:VEVENT\r\n\
                END:VCALENDAR\r\n";

    Mock::given(method("GET"))
        .and(path("/feed.ics"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(feed, "text/calendar"))
        .mount(&server)
        .await;

    let walker = walker(&server);
    let page = walker
        .fetch_page(&format!("{}/feed.ics", server.uri()))
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page.items[0]["SUMMARY"], "Midterm");
    assert!(page.links.is_empty());
}

#[tokio::test]
async fn test_fetch_page_negotiates_xml() {
    let server = MockServer::start().await;
    let body = "<rows><row><id>1</id></row><row><id>2</id></row></rows>";

    Mock::given(method("GET"))
        .and(path("/export"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/xml"))
        .mount(&server)
        .await;

    let walker = walker(&server);
    let page = walker
        .fetch_page(&format!("{}/export", server.uri()))
        .await
        .unwrap();

    // Without an item element the parsed document is a single item
    assert_eq!(page.len(), 1);
    assert_eq!(page.items[0]["row"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_fetch_page_pinned_format_overrides_negotiation() {
    let server = MockServer::start().await;

    // Server lies about the content type
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"[{"id": 1}]"#, "text/plain"))
        .mount(&server)
        .await;

    let walker = walker(&server).with_config(WalkConfig::new().format(BodyFormat::Json));
    let page = walker
        .fetch_page(&format!("{}/items", server.uri()))
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn test_item_path_applied_to_each_page() {
    let server = MockServer::start().await;
    mount_page(&server, 1, json!({"data": {"items": [{"id": 1}]}}), Some(2)).await;
    mount_page(&server, 2, json!({"data": {"items": [{"id": 2}]}}), None).await;

    let walker = walker(&server).with_config(WalkConfig::new().item_path("data.items"));
    let result = walker
        .fetch_all(&format!("{}/items?page=1", server.uri()))
        .await
        .unwrap();

    assert_eq!(result.items.len(), 2);
    assert_eq!(result.items[1]["id"], 2);
}

#[tokio::test]
async fn test_walk_headers_sent_on_every_page() {
    let server = MockServer::start().await;

    let mut template = ResponseTemplate::new(200).set_body_json(json!([{"id": 1}]));
    template = template.insert_header(
        "link",
        format!("<{}/items?page=2>; rel=\"next\"", server.uri()).as_str(),
    );
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", "1"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(template)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", "2"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 2}])))
        .mount(&server)
        .await;

    let walker =
        walker(&server).with_config(WalkConfig::new().header("Authorization", "Bearer tok"));
    let result = walker
        .fetch_all(&format!("{}/items?page=1", server.uri()))
        .await
        .unwrap();

    assert_eq!(result.items.len(), 2);
}

// ============================================================================
// Type Tests
// ============================================================================

#[test]
fn test_walk_config_builder() {
    let config = WalkConfig::new()
        .max_pages(10)
        .max_items(500)
        .format(BodyFormat::Json)
        .item_path("data")
        .header("X-Trace", "on");

    assert_eq!(config.max_pages, 10);
    assert_eq!(config.max_items, 500);
    assert_eq!(config.format, Some(BodyFormat::Json));
    assert_eq!(config.item_path, Some("data".to_string()));
    assert_eq!(config.headers.get("X-Trace"), Some(&"on".to_string()));
}

#[test]
fn test_continuation_is_stop() {
    assert!(Continuation::Stop.is_stop());
    assert!(!Continuation::Continue.is_stop());
}

#[test]
fn test_page_len_and_empty() {
    let page = Page {
        items: vec![json!({"id": 1})],
        links: crate::links::PageLinks::new(),
    };
    assert_eq!(page.len(), 1);
    assert!(!page.is_empty());

    let empty = Page {
        items: vec![],
        links: crate::links::PageLinks::new(),
    };
    assert!(empty.is_empty());
}
