//! Outgoing HTTP response accumulator.
//!
//! Handlers never build this directly — they write through the
//! [`Context`](crate::Context) writers (`string`, `json`, `html`, `data`),
//! which mutate the response owned by the context. The server converts the
//! finished value into a hyper response once the chain has run.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use http_body_util::Full;

/// The response being accumulated for one request.
///
/// Starts as `200 OK` with no body; whatever the chain leaves here is what
/// goes on the wire.
#[derive(Debug)]
pub struct Response {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

impl Response {
    pub(crate) fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Hands the accumulated parts to hyper. The connection layer owns all
    /// wire encoding from here.
    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut response = http::Response::new(Full::new(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
