//! Descriptor-driven JSON adapter
//!
//! Implements the pagination capability traits for untyped JSON bodies by
//! looking fields up through a [`PageDescriptor`]. Use this when requests and
//! responses are `serde_json::Value`s, e.g. a generic REST client; typed API
//! bindings should implement [`PageRequest`]/[`PageResponse`] directly.
//!
//! # Example
//!
//! ```rust,ignore
//! let descriptor = Arc::new(PageDescriptor::google("instances")?);
//! let request = json!({"project": "demo", "pageSize": 50});
//! let mut instances = json::paged_sequence(descriptor, request, |body: &Value| {
//!     client.post("/instances:list", body)
//! })?;
//! while let Some(instance) = instances.next_item()? {
//!     println!("{instance}");
//! }
//! ```

mod path;

use crate::descriptor::PageDescriptor;
use crate::error::{Error, Result};
use crate::pagination::{PageRequest, PageResponse, PagedSequence};
use crate::types::{BoxError, JsonValue};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;

// ============================================================================
// Request
// ============================================================================

/// JSON request body whose page token lives at the descriptor's
/// request-token path.
///
/// The body as given at construction is kept. Setting the token back to its
/// initial value restores that body exactly, including a token field that
/// was absent, null or nested under objects the caller never created.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRequest {
    descriptor: Arc<PageDescriptor>,
    body: JsonValue,
    initial_body: JsonValue,
}

impl JsonRequest {
    /// Wrap a request body.
    ///
    /// The body must be a JSON object, the token path must not run through a
    /// non-object value, and an existing token must be a string or null.
    pub fn new(descriptor: Arc<PageDescriptor>, body: JsonValue) -> Result<Self> {
        let field = descriptor.request_token_field();
        match &body {
            JsonValue::Object(_) => {}
            JsonValue::Null => return Err(Error::invalid_argument("request is absent")),
            other => {
                return Err(Error::invalid_argument(format!(
                    "request must be a JSON object, got {}",
                    path::kind(other)
                )))
            }
        }

        if !path::is_assignable(&body, field) {
            return Err(Error::invalid_argument(format!(
                "request has no room for page token field '{field}'"
            )));
        }

        match path::lookup(&body, field) {
            None | Some(JsonValue::Null | JsonValue::String(_)) => {}
            Some(other) => {
                return Err(Error::invalid_argument(format!(
                    "page token field '{field}' must be a string, got {}",
                    path::kind(other)
                )))
            }
        }

        Ok(Self {
            descriptor,
            initial_body: body.clone(),
            body,
        })
    }

    /// The request body as it currently stands
    pub fn body(&self) -> &JsonValue {
        &self.body
    }

    /// Consume the request and return its body
    pub fn into_body(self) -> JsonValue {
        self.body
    }

    /// Descriptor used to locate the token field
    pub fn descriptor(&self) -> &PageDescriptor {
        &self.descriptor
    }
}

impl PageRequest for JsonRequest {
    fn page_token(&self) -> Option<&str> {
        path::lookup(&self.body, self.descriptor.request_token_field()).and_then(JsonValue::as_str)
    }

    fn set_page_token(&mut self, token: Option<&str>) {
        let field = self.descriptor.request_token_field();
        let initial = path::lookup(&self.initial_body, field).and_then(JsonValue::as_str);
        if non_empty(token) == non_empty(initial) {
            self.body.clone_from(&self.initial_body);
            return;
        }
        match token {
            Some(token) => path::assign(&mut self.body, field, JsonValue::from(token)),
            None => path::remove(&mut self.body, field),
        }
    }
}

fn non_empty(token: Option<&str>) -> Option<&str> {
    token.filter(|t| !t.is_empty())
}

// ============================================================================
// Response
// ============================================================================

/// JSON response body; items are deserialized into `T` on demand
#[derive(Debug, Clone)]
pub struct JsonResponse<T = JsonValue> {
    descriptor: Arc<PageDescriptor>,
    body: JsonValue,
    _item: PhantomData<fn() -> T>,
}

impl<T> JsonResponse<T> {
    /// Wrap a response body
    pub fn new(descriptor: Arc<PageDescriptor>, body: JsonValue) -> Self {
        Self {
            descriptor,
            body,
            _item: PhantomData,
        }
    }

    /// The raw response body
    pub fn body(&self) -> &JsonValue {
        &self.body
    }
}

impl<T> PageResponse for JsonResponse<T>
where
    T: DeserializeOwned,
{
    type Item = T;

    fn next_page_token(&self) -> Result<Option<String>> {
        let field = self.descriptor.response_token_field();
        path::lookup_token(&self.body, field).map_err(|kind| {
            Error::protocol(field, format!("expected a string token, got {kind}"))
        })
    }

    fn into_items(self) -> Result<Vec<T>> {
        let field = self.descriptor.resource_field();
        let mut body = self.body;
        match path::lookup_mut(&mut body, field).map(JsonValue::take) {
            Some(JsonValue::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    serde_json::from_value(item)
                        .map_err(|e| Error::protocol(field, format!("item {index}: {e}")))
                })
                .collect(),
            None | Some(JsonValue::Null) => Err(Error::protocol(field, "field is missing")),
            Some(other) => Err(Error::protocol(
                field,
                format!("expected an array, got {}", path::kind(&other)),
            )),
        }
    }
}

// ============================================================================
// Sequence Builders
// ============================================================================

/// Build a sequence of raw JSON items over a JSON list call.
///
/// `fetch` receives the request body for each page and returns the response
/// body.
pub fn paged_sequence<F, E>(
    descriptor: Arc<PageDescriptor>,
    request: JsonValue,
    fetch: F,
) -> Result<
    PagedSequence<
        JsonRequest,
        JsonResponse,
        impl FnMut(&JsonRequest) -> std::result::Result<JsonResponse, E>,
    >,
>
where
    F: FnMut(&JsonValue) -> std::result::Result<JsonValue, E>,
    E: Into<BoxError>,
{
    typed_paged_sequence::<JsonValue, F, E>(descriptor, request, fetch)
}

/// Build a sequence whose items are deserialized into `T`.
///
/// An item that does not deserialize fails the page with
/// [`Error::Protocol`].
pub fn typed_paged_sequence<T, F, E>(
    descriptor: Arc<PageDescriptor>,
    request: JsonValue,
    mut fetch: F,
) -> Result<
    PagedSequence<
        JsonRequest,
        JsonResponse<T>,
        impl FnMut(&JsonRequest) -> std::result::Result<JsonResponse<T>, E>,
    >,
>
where
    T: DeserializeOwned,
    F: FnMut(&JsonValue) -> std::result::Result<JsonValue, E>,
    E: Into<BoxError>,
{
    let request = JsonRequest::new(Arc::clone(&descriptor), request)?;
    let fetcher = move |request: &JsonRequest| {
        fetch(request.body()).map(|body| JsonResponse::<T>::new(Arc::clone(&descriptor), body))
    };
    Ok(PagedSequence::new(request, fetcher))
}
