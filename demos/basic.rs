//! Minimal wicket example — groups, middleware, dynamic routes.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:9999/
//!   curl http://localhost:9999/hello/maya
//!   curl http://localhost:9999/assets/css/a.css
//!   curl http://localhost:9999/v1/hello?name=alice
//!   curl -X POST http://localhost:9999/v1/login -d 'username=alice&password=1234'
//!   curl http://localhost:9999/panic        # 500, process keeps serving
//!   curl http://localhost:9999/no/such/path # 404 echoes the path

use wicket::middleware::{Logger, Recovery};
use wicket::{BoxFuture, Context, Engine, StatusCode};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut app = Engine::new();
    app.use_middleware(Logger);
    app.use_middleware(Recovery);

    app.get("/", index);
    app.get("/hello/:name", hello);
    app.get("/assets/*filepath", assets);
    app.get("/panic", broken);

    {
        let mut v1 = app.group("/v1");
        v1.get("/hello", hello_query);
        v1.post("/login", login);
    }

    app.run("0.0.0.0:9999").await.expect("server error");
}

// GET /
fn index(ctx: &mut Context) -> BoxFuture<'_> {
    Box::pin(async move {
        ctx.html(StatusCode::OK, "<h1>Hello wicket</h1>");
    })
}

// GET /hello/:name
fn hello(ctx: &mut Context) -> BoxFuture<'_> {
    Box::pin(async move {
        let name = ctx.param("name").unwrap_or("world").to_owned();
        let path = ctx.path().to_owned();
        ctx.string(StatusCode::OK, format!("hello {name}, you're at {path}\n"));
    })
}

// GET /assets/*filepath — the wildcard swallows the rest of the path
fn assets(ctx: &mut Context) -> BoxFuture<'_> {
    Box::pin(async move {
        let filepath = ctx.param("filepath").unwrap_or_default().to_owned();
        ctx.json(StatusCode::OK, &serde_json::json!({ "filepath": filepath }));
    })
}

// GET /v1/hello?name=...
fn hello_query(ctx: &mut Context) -> BoxFuture<'_> {
    Box::pin(async move {
        let name = ctx.query("name").unwrap_or("nobody").to_owned();
        let path = ctx.path().to_owned();
        ctx.string(StatusCode::OK, format!("hello {name}, you're at {path}\n"));
    })
}

// POST /v1/login — reads urlencoded form fields from the body
fn login(ctx: &mut Context) -> BoxFuture<'_> {
    Box::pin(async move {
        let username = ctx.post_form("username").unwrap_or_default().to_owned();
        let password = ctx.post_form("password").unwrap_or_default().to_owned();
        ctx.json(
            StatusCode::OK,
            &serde_json::json!({ "username": username, "password": password }),
        );
    })
}

// GET /panic — Recovery turns this into a 500 instead of a dead connection
fn broken(_ctx: &mut Context) -> BoxFuture<'_> {
    Box::pin(async move {
        let values = vec!["wicket"];
        let _ = values[99];
    })
}
