//! Request logging middleware.

use std::time::Instant;

use tracing::info;

use crate::context::Context;
use crate::handler::{BoxFuture, Handler};

/// Logs one line per request: method, path, response status, and how long
/// the rest of the chain took. Install it first so the timing covers every
/// other stage.
#[derive(Clone, Copy, Debug, Default)]
pub struct Logger;

impl Handler for Logger {
    fn call<'c>(&'c self, ctx: &'c mut Context) -> BoxFuture<'c> {
        Box::pin(async move {
            let start = Instant::now();
            ctx.next().await;
            info!(
                method = %ctx.method(),
                path = ctx.path(),
                status = %ctx.response().status(),
                elapsed = ?start.elapsed(),
                "request"
            );
        })
    }
}
