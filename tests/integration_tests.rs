//! Integration tests against in-memory list endpoints
//!
//! Exercises the public API end to end: typed bindings, the JSON adapter,
//! shared descriptors and resumption from saved tokens.

use pagekit::{json, Error, PageDescriptor, PageRequest, PageResponse, PagedSequence};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Typed Binding
// ============================================================================

/// Object storage listing with offset-encoded page tokens
struct Bucket {
    objects: Vec<String>,
    page_size: usize,
    calls: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
struct ListObjectsRequest {
    prefix: String,
    page_token: Option<String>,
}

impl PageRequest for ListObjectsRequest {
    fn page_token(&self) -> Option<&str> {
        self.page_token.as_deref()
    }

    fn set_page_token(&mut self, token: Option<&str>) {
        self.page_token = token.map(str::to_string);
    }
}

struct ListObjectsResponse {
    objects: Vec<String>,
    next_page_token: Option<String>,
}

impl PageResponse for ListObjectsResponse {
    type Item = String;

    fn next_page_token(&self) -> pagekit::Result<Option<String>> {
        Ok(self.next_page_token.clone())
    }

    fn into_items(self) -> pagekit::Result<Vec<String>> {
        Ok(self.objects)
    }
}

impl Bucket {
    fn new(count: usize, page_size: usize) -> Self {
        Self {
            objects: (0..count).map(|i| format!("logs/{i:03}")).collect(),
            page_size,
            calls: AtomicUsize::new(0),
        }
    }

    fn list(&self, request: &ListObjectsRequest) -> anyhow::Result<ListObjectsResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let offset: usize = match request.page_token.as_deref() {
            None | Some("") => 0,
            Some(token) => token
                .strip_prefix("offset-")
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| anyhow::anyhow!("malformed page token {token}"))?,
        };

        let matching: Vec<&String> = self
            .objects
            .iter()
            .filter(|name| name.starts_with(&request.prefix))
            .collect();
        let end = (offset + self.page_size).min(matching.len());
        let objects = matching[offset.min(end)..end]
            .iter()
            .map(|name| (*name).clone())
            .collect();
        let next_page_token = (end < matching.len()).then(|| format!("offset-{end}"));

        Ok(ListObjectsResponse {
            objects,
            next_page_token,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[test]
fn test_typed_listing_spans_pages() {
    let bucket = Bucket::new(10, 3);
    let request = ListObjectsRequest {
        prefix: "logs/".to_string(),
        page_token: None,
    };
    let objects = PagedSequence::new(request, |req: &ListObjectsRequest| bucket.list(req));

    let names: Vec<String> = objects.collect::<pagekit::Result<_>>().unwrap();
    assert_eq!(names.len(), 10);
    assert_eq!(names.first().map(String::as_str), Some("logs/000"));
    assert_eq!(names.last().map(String::as_str), Some("logs/009"));
    assert_eq!(bucket.calls(), 4);
}

#[test]
fn test_typed_listing_resumes_from_saved_token() {
    let bucket = Bucket::new(7, 2);
    let mut objects = PagedSequence::new(ListObjectsRequest::default(), |req: &ListObjectsRequest| {
        bucket.list(req)
    });

    // Take the first page, remember where the next one starts
    let first_page = objects.current_page_items().unwrap().to_vec();
    let saved = objects.next_page_token().unwrap().map(str::to_string);
    assert_eq!(first_page, vec!["logs/000", "logs/001"]);
    assert_eq!(saved.as_deref(), Some("offset-2"));

    let mut resumed =
        PagedSequence::new(ListObjectsRequest::default(), |req: &ListObjectsRequest| {
            bucket.list(req)
        });
    resumed.resume_from(saved.as_deref().unwrap_or_default());
    let rest: Vec<String> = resumed.collect::<pagekit::Result<_>>().unwrap();
    assert_eq!(rest, vec!["logs/002", "logs/003", "logs/004", "logs/005", "logs/006"]);
}

#[test]
fn test_fetcher_error_is_preserved() {
    let bucket = Bucket::new(4, 2);
    let request = ListObjectsRequest {
        prefix: String::new(),
        page_token: Some("bogus".to_string()),
    };
    let mut objects = PagedSequence::new(request, |req: &ListObjectsRequest| bucket.list(req));

    let err = objects.next_item().unwrap_err();
    assert!(err.is_fetch());
    assert!(err.to_string().contains("malformed page token bogus"));
    assert_eq!(objects.next_item().unwrap(), None);
    assert_eq!(bucket.calls(), 1);
}

#[test]
fn test_independent_sequences_run_concurrently() {
    let bucket = &Bucket::new(25, 4);

    let totals: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || {
                    PagedSequence::new(ListObjectsRequest::default(), |req: &ListObjectsRequest| {
                        bucket.list(req)
                    })
                    .map(Result::unwrap)
                    .count()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(totals, vec![25; 4]);
    assert_eq!(bucket.calls(), 4 * 7);
}

// ============================================================================
// JSON Adapter
// ============================================================================

/// JSON endpoint paging with a cursor nested under `meta`
fn cursor_api(body: &Value) -> Result<Value, String> {
    let cursor = body["paging"]["cursor"].as_str().unwrap_or_default();
    match cursor {
        "" => Ok(json!({"data": {"rows": [{"id": 1}, {"id": 2}]}, "meta": {"next": "c2"}})),
        "c2" => Ok(json!({"data": {"rows": []}, "meta": {"next": "c3"}})),
        "c3" => Ok(json!({"data": {"rows": [{"id": 3}]}, "meta": {"next": null}})),
        other => Err(format!("unknown cursor {other}")),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Row {
    id: u32,
}

#[test]
fn test_json_nested_paths() {
    let descriptor =
        Arc::new(PageDescriptor::new("paging.cursor", "$.meta.next", "data.rows").unwrap());
    let rows = json::typed_paged_sequence::<Row, _, _>(
        descriptor,
        json!({"paging": {"limit": 2}}),
        cursor_api,
    )
    .unwrap();

    let ids: Vec<u32> = rows.map(|row| row.unwrap().id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_shared_descriptor_across_sequences() {
    let descriptor =
        Arc::new(PageDescriptor::new("paging.cursor", "meta.next", "data.rows").unwrap());

    let first = json::paged_sequence(Arc::clone(&descriptor), json!({}), cursor_api).unwrap();
    let second = json::paged_sequence(Arc::clone(&descriptor), json!({}), cursor_api).unwrap();

    let first: Vec<Value> = first.collect::<pagekit::Result<_>>().unwrap();
    let second: Vec<Value> = second.collect::<pagekit::Result<_>>().unwrap();
    assert_eq!(first, second);
    assert_eq!(Arc::strong_count(&descriptor), 1);
}

#[test]
fn test_json_pages() {
    let descriptor =
        Arc::new(PageDescriptor::new("paging.cursor", "meta.next", "data.rows").unwrap());
    let pages = json::paged_sequence(descriptor, json!({}), cursor_api)
        .unwrap()
        .into_pages();

    let sizes: Vec<(usize, Option<String>)> = pages
        .map(|page| {
            let page = page.unwrap();
            (page.len(), page.next_page_token().map(str::to_string))
        })
        .collect();
    assert_eq!(
        sizes,
        vec![
            (2, Some("c2".to_string())),
            (0, Some("c3".to_string())),
            (1, None)
        ]
    );
}

#[test]
fn test_json_descriptor_mismatch_is_protocol_error() {
    let descriptor = Arc::new(PageDescriptor::google("rows").unwrap());
    let mut rows = json::paged_sequence(descriptor, json!({}), cursor_api).unwrap();

    let err = rows.next_item().unwrap_err();
    assert!(matches!(err, Error::Protocol { .. }));
}
