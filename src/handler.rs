//! Handler trait and type erasure.
//!
//! # How chain stages are stored
//!
//! The router and the middleware lists need to hold stages of *different*
//! types in plain `Vec`s and `HashMap`s. Rust collections hold one concrete
//! type, so stages are stored as trait objects behind a common interface.
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! fn hello(ctx: &mut Context) -> BoxFuture<'_> { … }   ← user writes this
//!        ↓ engine.get("/hello/:name", hello)
//! Arc::new(hello)                                      ← stored as Arc<dyn Handler>
//!        ↓
//! stage.call(ctx)  at request time                     ← one vtable dispatch
//! ```
//!
//! Every stage — global middleware, group middleware, the route handler —
//! has the same shape: it borrows the [`Context`] mutably for the duration
//! of its future, may read the request and write the response through it,
//! and may await [`Context::next`] to run the rest of the chain before its
//! own remaining code.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;

/// A heap-allocated future tied to the context borrow that drives it.
///
/// The boxing is also what lets a stage re-enter the chain (a stage awaits
/// `next()`, which awaits the following stage) without an infinitely sized
/// future type.
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// A shared, type-erased chain stage.
pub(crate) type BoxedHandler = Arc<dyn Handler>;

/// One stage of a request's handler chain.
///
/// Route handlers are usually plain functions — any
/// `fn(&mut Context) -> BoxFuture<'_>` implements this trait through the
/// blanket impl below:
///
/// ```rust,no_run
/// use wicket::{BoxFuture, Context, StatusCode};
///
/// fn hello(ctx: &mut Context) -> BoxFuture<'_> {
///     Box::pin(async move {
///         let name = ctx.param("name").unwrap_or("world").to_owned();
///         ctx.string(StatusCode::OK, format!("hello {name}\n"));
///     })
/// }
/// ```
///
/// Middleware that carries state implements the trait directly on a struct,
/// the way [`Logger`](crate::middleware::Logger) and
/// [`Recovery`](crate::middleware::Recovery) do.
pub trait Handler: Send + Sync + 'static {
    fn call<'c>(&'c self, ctx: &'c mut Context) -> BoxFuture<'c>;
}

impl<F> Handler for F
where
    F: for<'c> Fn(&'c mut Context) -> BoxFuture<'c> + Send + Sync + 'static,
{
    fn call<'c>(&'c self, ctx: &'c mut Context) -> BoxFuture<'c> {
        (self)(ctx)
    }
}
