use axum::{
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod audit;
mod config;
mod context;
mod db;
mod error;
mod handlers;
mod query;

use db::Db;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting admin API in {:?} mode", config.environment);

    // Explicitly constructed store client, injected into handlers via state.
    // Connections are lazy, so startup succeeds even when the store is down
    // and /health reports the outage instead.
    let db = match Db::connect(&config.database) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("failed to initialize database client: {}", e);
            std::process::exit(1);
        }
    };

    let app = app(db);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Admin API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(db: Db) -> Router {
    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health::health))
        .merge(api_routes())
        .layer(CorsLayer::permissive())
        .with_state(db);

    if config::config().server.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn api_routes() -> Router<Db> {
    use handlers::{ecommerce::categories, system::settings, user::roles, user::users};

    Router::new()
        .route(
            "/api/ecommerce/categories",
            get(categories::list).post(categories::create),
        )
        .route("/api/user/users", get(users::list).post(users::create))
        .route("/api/user/roles", get(roles::list))
        .route("/api/user/roles/select", get(roles::select))
        .route("/api/system/settings/social", post(settings::update_social))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Admin API",
        "version": version,
        "description": "Admin dashboard backend: paginated listings, gated mutations, audit logging",
        "endpoints": {
            "home": "/",
            "health": "/health",
            "categories": "/api/ecommerce/categories",
            "users": "/api/user/users",
            "roles": "/api/user/roles[/select]",
            "settings": "/api/system/settings/social",
        }
    }))
}
