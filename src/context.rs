//! Per-request execution context and chain cursor.
//!
//! A [`Context`] is built for every inbound request and dropped once the
//! response is flushed. It carries the request snapshot, the path params
//! extracted by the router, the response being accumulated, and the ordered
//! handler chain with its cursor.
//!
//! The cursor is the whole middleware mechanism: a stage that awaits
//! [`Context::next`] runs everything after itself in the chain *before* its
//! own remaining code, so "before" and "after" logic wrap the inner stages
//! naturally. A stage that returns without calling `next` stops the chain
//! right there.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde::Serialize;
use tracing::warn;

use crate::handler::BoxedHandler;
use crate::response::Response;

/// Mutable per-request state threaded through every chain stage.
pub struct Context {
    method: Method,
    path: String,
    query: String,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
    response: Response,
    handlers: Vec<BoxedHandler>,
    // Cursor into `handlers`. Starts one before the first stage; forced
    // past the end by `abort`.
    index: isize,
}

impl Context {
    pub(crate) fn new(
        method: Method,
        path: String,
        query: String,
        headers: HeaderMap,
        body: Bytes,
        handlers: Vec<BoxedHandler>,
    ) -> Self {
        Self {
            method,
            path,
            query,
            headers,
            body,
            params: HashMap::new(),
            response: Response::new(),
            handlers,
            index: -1,
        }
    }

    // ── Chain cursor ─────────────────────────────────────────────────────────

    /// Runs the remainder of the chain.
    ///
    /// Advances the cursor and invokes stages until one of them declines to
    /// continue or the chain is exhausted. A stage observes the completed
    /// inner chain when its own `next().await` returns, which is what makes
    /// wrap-around middleware (timing, recovery) work.
    pub async fn next(&mut self) {
        self.index += 1;
        while (self.index as usize) < self.handlers.len() {
            let stage = Arc::clone(&self.handlers[self.index as usize]);
            stage.call(self).await;
            self.index += 1;
        }
    }

    /// Stops the chain: no stage after the current one will run.
    pub fn abort(&mut self) {
        self.index = self.handlers.len() as isize;
    }

    /// Stops the chain and writes an error response immediately.
    ///
    /// The body is `{"message": message}`, matching what auth-style
    /// middleware wants to hand back on rejection.
    pub fn fail(&mut self, status: StatusCode, message: &str) {
        self.abort();
        self.json(status, &serde_json::json!({ "message": message }));
    }

    pub(crate) fn push_handler(&mut self, handler: BoxedHandler) {
        self.handlers.push(handler);
    }

    // ── Request accessors ────────────────────────────────────────────────────

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw request body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// A named path parameter bound by the matched pattern.
    ///
    /// For a route `/hello/:name`, `ctx.param("name")` on `/hello/world`
    /// returns `Some("world")`; for `/assets/*filepath` the remainder of
    /// the path is bound verbatim, slashes included.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// A query-string value. The first occurrence of the key wins.
    pub fn query(&self, key: &str) -> Option<&str> {
        pairs(&self.query).find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// A field of an `application/x-www-form-urlencoded` request body.
    pub fn post_form(&self, key: &str) -> Option<&str> {
        let form = std::str::from_utf8(&self.body).ok()?;
        pairs(form).find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Case-insensitive request-header lookup. Non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }

    // ── Response writers ─────────────────────────────────────────────────────

    /// The response as accumulated so far.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Sets the response status without touching the body.
    pub fn status(&mut self, status: StatusCode) {
        self.response.status = status;
    }

    /// Sets a response header. Invalid names or values are dropped with a
    /// warning rather than poisoning the response.
    pub fn set_header(&mut self, name: &str, value: &str) {
        match (name.parse::<HeaderName>(), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.response.headers.insert(name, value);
            }
            _ => warn!(name, value, "dropping invalid response header"),
        }
    }

    /// Writes a plain-text response.
    pub fn string(&mut self, status: StatusCode, body: impl Into<String>) {
        let body: String = body.into();
        self.write(status, "text/plain; charset=utf-8", body.into());
    }

    /// Writes a JSON response. A value that fails to serialize turns into
    /// a 500 with a generic body; the cause is logged server-side.
    pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(body) => self.write(status, "application/json", body.into()),
            Err(e) => {
                warn!("response serialization failed: {e}");
                self.write(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "text/plain; charset=utf-8",
                    Bytes::from_static(b"Internal Server Error"),
                );
            }
        }
    }

    /// Writes an HTML response.
    pub fn html(&mut self, status: StatusCode, body: impl Into<String>) {
        let body: String = body.into();
        self.write(status, "text/html; charset=utf-8", body.into());
    }

    /// Writes raw bytes with no content type.
    pub fn data(&mut self, status: StatusCode, body: impl Into<Bytes>) {
        self.response.status = status;
        self.response.body = body.into();
    }

    fn write(&mut self, status: StatusCode, content_type: &'static str, body: Bytes) {
        self.response.status = status;
        self.response
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.response.body = body;
    }

    pub(crate) fn into_response(self) -> Response {
        self.response
    }
}

/// Splits `a=1&b=2`-shaped input into key/value pairs. A key with no `=`
/// yields an empty value.
fn pairs(input: &str) -> impl Iterator<Item = (&str, &str)> {
    input
        .split('&')
        .filter(|kv| !kv.is_empty())
        .map(|kv| kv.split_once('=').unwrap_or((kv, "")))
}
