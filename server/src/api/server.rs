//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{health, resources};
use crate::core::CoreApp;
use crate::core::config::QueryConfig;
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::data::SearchService;
use crate::data::sqlite::SqlitePool;

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.server.host, app.config.server.port);
        Self {
            app,
            allowed_origins,
        }
    }

    /// Serve until shutdown is triggered; returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        let shutdown = app.shutdown.clone();
        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);

        let router = router(app.database.pool(), &app.search, app.config.query)
            .layer(middleware::cors(&allowed_origins));

        let listener = TcpListener::bind(addr).await?;
        tracing::debug!(%addr, "API server listening");
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Every route the server exposes, without CORS
pub fn router(pool: &SqlitePool, search: &Arc<SearchService>, query: QueryConfig) -> Router<()> {
    Router::new()
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .nest("/api/v1/health", health::routes(search.clone()))
        .nest("/api/v1", resources::routes(pool, search, query))
        .fallback(middleware::handle_404)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
}
