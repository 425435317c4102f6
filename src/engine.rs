//! Application object and route groups.
//!
//! The [`Engine`] owns the route table and every group record; it is the
//! value you register routes on, then hand to [`Server::serve`] (or call
//! [`Engine::run`]). Registration happens once at startup — after that the
//! engine is shared read-only across connection tasks.
//!
//! Groups are prefix scopes. A group prepends its prefix to every route
//! registered through it, and its middleware runs for every request whose
//! path falls under that prefix. The engine itself is the root group with
//! an empty prefix, which is why "global" middleware is just the root
//! group's middleware.

use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};

use crate::context::Context;
use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::middleware::{Logger, Recovery};
use crate::response::Response;
use crate::router::Router;
use crate::server::Server;

struct GroupRecord {
    prefix: String,
    middlewares: Vec<BoxedHandler>,
}

/// The application: route table + group records.
///
/// ```rust,no_run
/// use wicket::{BoxFuture, Context, Engine, StatusCode};
///
/// fn hello(ctx: &mut Context) -> BoxFuture<'_> {
///     Box::pin(async move {
///         let name = ctx.param("name").unwrap_or("world").to_owned();
///         ctx.string(StatusCode::OK, format!("hello {name}\n"));
///     })
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let mut app = Engine::with_defaults();
///     app.get("/hello/:name", hello);
///     app.run("0.0.0.0:9999").await.expect("server error");
/// }
/// ```
pub struct Engine {
    router: Router,
    // Record 0 is the root group (empty prefix). Creation order doubles as
    // middleware precedence: ancestors always precede descendants.
    groups: Vec<GroupRecord>,
}

impl Engine {
    /// An engine with no middleware installed.
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            groups: vec![GroupRecord {
                prefix: String::new(),
                middlewares: Vec::new(),
            }],
        }
    }

    /// An engine with [`Logger`] and [`Recovery`] preinstalled — the stack
    /// most applications want.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.use_middleware(Logger).use_middleware(Recovery);
        engine
    }

    /// Installs global middleware; it runs for every request, ahead of any
    /// group middleware, in installation order.
    pub fn use_middleware(&mut self, middleware: impl Handler) -> &mut Self {
        self.groups[0].middlewares.push(Arc::new(middleware));
        self
    }

    /// Opens a prefix group rooted at the engine.
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        Group::open(self, 0, prefix)
    }

    /// Registers a handler for a method + pattern pair.
    pub fn add_route(&mut self, method: Method, pattern: &str, handler: impl Handler) -> &mut Self {
        self.router.add_route(method, pattern, Arc::new(handler));
        self
    }

    pub fn get(&mut self, pattern: &str, handler: impl Handler) -> &mut Self {
        self.add_route(Method::GET, pattern, handler)
    }

    pub fn post(&mut self, pattern: &str, handler: impl Handler) -> &mut Self {
        self.add_route(Method::POST, pattern, handler)
    }

    pub fn put(&mut self, pattern: &str, handler: impl Handler) -> &mut Self {
        self.add_route(Method::PUT, pattern, handler)
    }

    pub fn delete(&mut self, pattern: &str, handler: impl Handler) -> &mut Self {
        self.add_route(Method::DELETE, pattern, handler)
    }

    /// Every pattern registered for `method`, for introspection.
    pub fn routes(&self, method: &Method) -> Vec<&str> {
        self.router
            .get_routes(method)
            .into_iter()
            .filter_map(|node| node.pattern())
            .collect()
    }

    /// Binds `addr` and serves this engine until graceful shutdown.
    pub async fn run(self, addr: &str) -> Result<(), Error> {
        Server::bind(addr).serve(self).await
    }

    /// Drives one request through the full pipeline: assemble the chain
    /// from every group whose prefix covers the path, resolve the route,
    /// run the stages, and return whatever response they accumulated.
    pub(crate) async fn dispatch(
        &self,
        method: Method,
        uri: &Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> Response {
        let path = uri.path().to_owned();
        let query = uri.query().unwrap_or_default().to_owned();

        let chain: Vec<BoxedHandler> = self
            .groups
            .iter()
            .filter(|group| path.starts_with(group.prefix.as_str()))
            .flat_map(|group| group.middlewares.iter().map(Arc::clone))
            .collect();

        let mut ctx = Context::new(method, path, query, headers, body, chain);
        self.router.handle(&mut ctx).await;
        ctx.into_response()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

// ── Groups ───────────────────────────────────────────────────────────────────

/// A mutable registration view over one prefix scope.
///
/// Routes registered through a group get the group's full prefix prepended;
/// middleware installed on it runs for every request under that prefix.
/// Groups nest — a child's prefix is its parent's prefix plus its own
/// suffix, and ancestor middleware runs before the child's.
///
/// ```rust,no_run
/// # use wicket::{BoxFuture, Context, Engine};
/// # fn login(_ctx: &mut Context) -> BoxFuture<'_> { Box::pin(async move {}) }
/// # let mut app = Engine::new();
/// let mut v1 = app.group("/v1");
/// v1.post("/login", login); // registers POST /v1/login
/// ```
pub struct Group<'e> {
    engine: &'e mut Engine,
    index: usize,
}

impl<'e> Group<'e> {
    fn open(engine: &'e mut Engine, parent: usize, suffix: &str) -> Self {
        let prefix = format!("{}{}", engine.groups[parent].prefix, suffix);
        engine.groups.push(GroupRecord {
            prefix,
            middlewares: Vec::new(),
        });
        let index = engine.groups.len() - 1;
        Self { engine, index }
    }

    /// The group's effective prefix, ancestors included.
    pub fn prefix(&self) -> &str {
        &self.engine.groups[self.index].prefix
    }

    /// Opens a child group under this one.
    pub fn group(&mut self, suffix: &str) -> Group<'_> {
        Group::open(self.engine, self.index, suffix)
    }

    /// Installs middleware scoped to this group's prefix.
    pub fn use_middleware(&mut self, middleware: impl Handler) -> &mut Self {
        self.engine.groups[self.index]
            .middlewares
            .push(Arc::new(middleware));
        self
    }

    /// Registers a handler under this group's prefix.
    pub fn add_route(&mut self, method: Method, path: &str, handler: impl Handler) -> &mut Self {
        let pattern = format!("{}{}", self.prefix(), path);
        self.engine.router.add_route(method, &pattern, Arc::new(handler));
        self
    }

    pub fn get(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.add_route(Method::GET, path, handler)
    }

    pub fn post(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.add_route(Method::POST, path, handler)
    }

    pub fn put(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.add_route(Method::PUT, path, handler)
    }

    pub fn delete(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.add_route(Method::DELETE, path, handler)
    }
}
