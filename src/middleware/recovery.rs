//! Panic containment middleware.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use http::StatusCode;
use tracing::error;

use crate::context::Context;
use crate::handler::{BoxFuture, Handler};

/// Runs the remainder of the chain inside an unwind boundary.
///
/// A panic anywhere downstream is caught here: the payload and a backtrace
/// captured at the boundary are logged server-side, and the client gets a
/// 500 with a fixed generic body — no internals leak. The panic never
/// reaches the serving task, so one faulting request cannot take the
/// process (or any other request) with it.
///
/// Install it ahead of anything it should contain; stages *before* it in
/// the chain are outside the boundary.
#[derive(Clone, Copy, Debug, Default)]
pub struct Recovery;

impl Handler for Recovery {
    fn call<'c>(&'c self, ctx: &'c mut Context) -> BoxFuture<'c> {
        Box::pin(async move {
            if let Err(panic) = AssertUnwindSafe(ctx.next()).catch_unwind().await {
                let backtrace = Backtrace::force_capture();
                error!(
                    method = %ctx.method(),
                    path = ctx.path(),
                    panic = panic_message(panic.as_ref()),
                    %backtrace,
                    "handler panicked"
                );
                ctx.fail(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
            }
        })
    }
}

/// Best-effort extraction of the panic payload. `panic!` with a literal
/// yields `&str`; `panic!` with formatting yields `String`.
fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use http::{HeaderMap, Method};

    use super::*;
    use crate::handler::BoxedHandler;

    fn boom(_ctx: &mut Context) -> BoxFuture<'_> {
        Box::pin(async move {
            panic!("something went wrong");
        })
    }

    fn context(handlers: Vec<BoxedHandler>) -> Context {
        Context::new(
            Method::GET,
            "/panic".to_owned(),
            String::new(),
            HeaderMap::new(),
            Bytes::new(),
            handlers,
        )
    }

    #[tokio::test]
    async fn panicking_handler_becomes_a_500() {
        let mut ctx = context(vec![Arc::new(Recovery), Arc::new(boom) as BoxedHandler]);

        ctx.next().await;

        assert_eq!(ctx.response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ctx.response().body(),
            br#"{"message":"Internal Server Error"}"#,
        );
    }

    #[tokio::test]
    async fn stages_before_the_boundary_still_unwind_normally() {
        // Logger-shaped stage outside the boundary observes the 500.
        struct Probe(Arc<std::sync::Mutex<Option<StatusCode>>>);

        impl Handler for Probe {
            fn call<'c>(&'c self, ctx: &'c mut Context) -> BoxFuture<'c> {
                Box::pin(async move {
                    ctx.next().await;
                    *self.0.lock().unwrap() = Some(ctx.response().status());
                })
            }
        }

        let seen = Arc::new(std::sync::Mutex::new(None));
        let mut ctx = context(vec![
            Arc::new(Probe(Arc::clone(&seen))),
            Arc::new(Recovery),
            Arc::new(boom) as BoxedHandler,
        ]);

        ctx.next().await;

        assert_eq!(*seen.lock().unwrap(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn panic_payload_extraction() {
        assert_eq!(panic_message(&"literal"), "literal");
        assert_eq!(panic_message(&"formatted 42".to_owned()), "formatted 42");
        assert_eq!(panic_message(&17_u32), "non-string panic payload");
    }
}
