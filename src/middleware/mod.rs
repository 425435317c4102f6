//! Built-in middleware.
//!
//! Middleware is the right place for cross-cutting concerns: request
//! logging, panic containment, auth-header inspection. A middleware is just
//! a [`Handler`](crate::Handler) that awaits [`Context::next`] somewhere in
//! its body — everything before the await runs on the way in, everything
//! after runs on the way out — or declines to, rejecting the request.
//!
//! Two stages ship with the crate:
//!
//! - [`Logger`] — method, path, status, and latency per request
//! - [`Recovery`] — converts a panicking handler into a 500 instead of a
//!   dead connection

mod logger;
mod recovery;

pub use logger::Logger;
pub use recovery::Recovery;
