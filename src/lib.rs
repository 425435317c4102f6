//! # wicket
//!
//! A minimal HTTP framework built around two pieces with real content:
//! a hand-built path-matching trie and a per-request middleware chain.
//! Nothing more. Nothing less.
//!
//! ## The model
//!
//! Routes are `(method, pattern, handler)` triples. Patterns are plain
//! segments plus two dynamic forms — `:name` matches one segment and binds
//! it, `*name` matches the remainder of the path, slashes included. Every
//! request resolves to the single best-matching pattern and runs an ordered
//! chain: global middleware, then the middleware of every group whose
//! prefix covers the path, then the route handler. Any stage can await
//! [`Context::next`] to wrap the rest of the chain, or decline to and stop
//! it — that one cursor is the entire middleware mechanism.
//!
//! The route table is built once at startup and is read-only while serving:
//! no locks on the hot path, just an `Arc` handed to each connection task.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use wicket::{BoxFuture, Context, Engine, StatusCode};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Logger + Recovery installed; a panicking handler answers 500
//!     // instead of killing the connection.
//!     let mut app = Engine::with_defaults();
//!
//!     app.get("/hello/:name", hello);
//!     app.get("/assets/*filepath", assets);
//!
//!     let mut v1 = app.group("/v1");
//!     v1.get("/ping", ping);
//!
//!     app.run("0.0.0.0:9999").await.expect("server error");
//! }
//!
//! fn hello(ctx: &mut Context) -> BoxFuture<'_> {
//!     Box::pin(async move {
//!         let name = ctx.param("name").unwrap_or("world").to_owned();
//!         ctx.string(StatusCode::OK, format!("hello {name}\n"));
//!     })
//! }
//!
//! fn assets(ctx: &mut Context) -> BoxFuture<'_> {
//!     Box::pin(async move {
//!         let filepath = ctx.param("filepath").unwrap_or_default().to_owned();
//!         ctx.json(StatusCode::OK, &serde_json::json!({ "filepath": filepath }));
//!     })
//! }
//!
//! fn ping(ctx: &mut Context) -> BoxFuture<'_> {
//!     Box::pin(async move {
//!         ctx.string(StatusCode::OK, "pong");
//!     })
//! }
//! ```

mod context;
mod engine;
mod error;
mod handler;
mod response;
mod router;
mod server;
mod trie;

pub mod middleware;

pub use context::Context;
pub use engine::{Engine, Group};
pub use error::Error;
pub use handler::{BoxFuture, Handler};
pub use response::Response;
pub use server::Server;

// Re-exported so applications don't need a direct `http` dependency for
// the two types every handler touches.
pub use http::{Method, StatusCode};
