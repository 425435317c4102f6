//! Route table.
//!
//! One trie per HTTP method plus a flat handler map. The trie answers
//! "which pattern does this path match"; the handler map, keyed by
//! `"{method}-{pattern}"`, answers "who runs it". The table is built once
//! during registration and only read while serving, so request handling
//! needs no locking.

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};

use crate::context::Context;
use crate::handler::{BoxFuture, BoxedHandler};
use crate::trie::{Node, parse_pattern};

pub(crate) struct Router {
    roots: HashMap<Method, Node>,
    handlers: HashMap<String, BoxedHandler>,
}

fn route_key(method: &Method, pattern: &str) -> String {
    format!("{method}-{pattern}")
}

impl Router {
    pub(crate) fn new() -> Self {
        Self {
            roots: HashMap::new(),
            handlers: HashMap::new(),
        }
    }

    /// Registers `handler` for a method + pattern pair.
    ///
    /// The method's trie root is created on first use. Registering the same
    /// pair again replaces the handler (last write wins) without reshaping
    /// the trie. Patterns are not validated — a `*` anywhere but last
    /// simply truncates the remainder per the decomposition rules.
    pub(crate) fn add_route(&mut self, method: Method, pattern: &str, handler: BoxedHandler) {
        let parts = parse_pattern(pattern);
        let key = route_key(&method, pattern);
        self.roots
            .entry(method)
            .or_insert_with(Node::root)
            .insert(pattern, &parts, 0);
        self.handlers.insert(key, handler);
    }

    /// Resolves a concrete path to its matched terminal node and the params
    /// bound by the pattern's dynamic segments.
    ///
    /// `None` means no trie exists for the method or no pattern matched —
    /// a normal outcome, surfaced to the client as a 404 by [`handle`].
    ///
    /// [`handle`]: Router::handle
    pub(crate) fn get_route(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(&Node, HashMap<String, String>)> {
        let search_parts = parse_pattern(path);
        let node = self.roots.get(method)?.search(&search_parts, 0)?;

        // Zip the matched pattern against the request segments: `:name`
        // binds one segment, `*name` binds the joined remainder and stops.
        let mut params = HashMap::new();
        for (index, part) in parse_pattern(node.pattern()?).iter().enumerate() {
            if let Some(name) = part.strip_prefix(':') {
                params.insert(name.to_owned(), search_parts[index].to_owned());
            } else if let Some(name) = part.strip_prefix('*') {
                if !name.is_empty() {
                    params.insert(name.to_owned(), search_parts[index..].join("/"));
                }
                break;
            }
        }
        Some((node, params))
    }

    /// Every registered terminal for `method`, for introspection.
    pub(crate) fn get_routes(&self, method: &Method) -> Vec<&Node> {
        let mut nodes = Vec::new();
        if let Some(root) = self.roots.get(method) {
            root.travel(&mut nodes);
        }
        nodes
    }

    /// Resolves the request in `ctx`, appends the terminal stage — the
    /// matched handler, or the synthetic 404 stage — and starts the chain.
    pub(crate) async fn handle(&self, ctx: &mut Context) {
        let matched = match self.get_route(ctx.method(), ctx.path()) {
            Some((node, params)) => {
                let key = node
                    .pattern()
                    .map(|pattern| route_key(ctx.method(), pattern));
                ctx.set_params(params);
                key.and_then(|key| self.handlers.get(&key)).map(Arc::clone)
            }
            None => None,
        };
        ctx.push_handler(matched.unwrap_or_else(|| Arc::new(not_found) as BoxedHandler));
        ctx.next().await;
    }
}

/// Terminal stage for unmatched requests: echoes the literal path back.
fn not_found(ctx: &mut Context) -> BoxFuture<'_> {
    Box::pin(async move {
        let body = format!("404 NOT FOUND: {}\n", ctx.path());
        ctx.string(StatusCode::NOT_FOUND, body);
    })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::HeaderMap;

    use super::*;

    fn ok(ctx: &mut Context) -> BoxFuture<'_> {
        Box::pin(async move {
            ctx.string(StatusCode::OK, "ok");
        })
    }

    fn named(ctx: &mut Context) -> BoxFuture<'_> {
        Box::pin(async move {
            let name = ctx.param("name").unwrap_or_default().to_owned();
            ctx.string(StatusCode::OK, name);
        })
    }

    fn table() -> Router {
        let mut router = Router::new();
        router.add_route(Method::GET, "/", Arc::new(ok));
        router.add_route(Method::GET, "/hello", Arc::new(ok));
        router.add_route(Method::GET, "/hello/:name", Arc::new(named));
        router.add_route(Method::GET, "/assets/*filepath", Arc::new(ok));
        router.add_route(Method::POST, "/login", Arc::new(ok));
        router
    }

    fn context(method: Method, path: &str) -> Context {
        Context::new(
            method,
            path.to_owned(),
            String::new(),
            HeaderMap::new(),
            Bytes::new(),
            Vec::new(),
        )
    }

    #[test]
    fn dynamic_segment_binds_a_param() {
        let router = table();
        let (node, params) = router.get_route(&Method::GET, "/hello/world").unwrap();

        assert_eq!(node.pattern(), Some("/hello/:name"));
        assert_eq!(params.get("name").map(String::as_str), Some("world"));
    }

    #[test]
    fn literal_route_wins_with_no_params() {
        let router = table();
        let (node, params) = router.get_route(&Method::GET, "/hello").unwrap();

        assert_eq!(node.pattern(), Some("/hello"));
        assert!(params.is_empty());
    }

    #[test]
    fn wildcard_binds_the_joined_remainder() {
        let router = table();
        let (node, params) = router.get_route(&Method::GET, "/assets/css/a.css").unwrap();

        assert_eq!(node.pattern(), Some("/assets/*filepath"));
        assert_eq!(params.get("filepath").map(String::as_str), Some("css/a.css"));
    }

    #[test]
    fn unknown_method_or_path_is_not_found() {
        let router = table();

        assert!(router.get_route(&Method::DELETE, "/hello").is_none());
        assert!(router.get_route(&Method::GET, "/unknown/path").is_none());
        assert!(router.get_route(&Method::POST, "/hello").is_none());
    }

    #[test]
    fn get_routes_lists_registered_patterns() {
        let router = table();
        let mut patterns: Vec<_> = router
            .get_routes(&Method::GET)
            .into_iter()
            .filter_map(|node| node.pattern())
            .collect();
        patterns.sort_unstable();

        assert_eq!(
            patterns,
            vec!["/", "/assets/*filepath", "/hello", "/hello/:name"],
        );
        assert!(router.get_routes(&Method::PUT).is_empty());
    }

    #[tokio::test]
    async fn handle_runs_the_matched_handler() {
        let router = table();
        let mut ctx = context(Method::GET, "/hello/maya");

        router.handle(&mut ctx).await;

        assert_eq!(ctx.response().status(), StatusCode::OK);
        assert_eq!(ctx.response().body(), b"maya");
    }

    #[tokio::test]
    async fn handle_echoes_the_path_on_miss() {
        let router = table();
        let mut ctx = context(Method::GET, "/unknown/path");

        router.handle(&mut ctx).await;

        assert_eq!(ctx.response().status(), StatusCode::NOT_FOUND);
        assert_eq!(ctx.response().body(), b"404 NOT FOUND: /unknown/path\n");
    }

    #[tokio::test]
    async fn reregistration_replaces_the_handler() {
        fn second(ctx: &mut Context) -> BoxFuture<'_> {
            Box::pin(async move {
                ctx.string(StatusCode::OK, "second");
            })
        }

        let mut router = Router::new();
        router.add_route(Method::GET, "/hello", Arc::new(ok));
        router.add_route(Method::GET, "/hello", Arc::new(second));

        let mut ctx = context(Method::GET, "/hello");
        router.handle(&mut ctx).await;

        assert_eq!(ctx.response().body(), b"second");
    }
}
