//! ServerBuilder for fluent API to build HTTP servers

use super::registry::{ResourceDescriptor, ResourceRegistry};
use crate::config::PanelConfig;
use crate::resource::NavigationItem;
use anyhow::Result;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Builder for creating the panel HTTP server
///
/// # Example
///
/// ```ignore
/// let config = PanelConfig::from_yaml_file("panel.yaml")?;
/// let stores = ProductStores::in_memory();
///
/// ServerBuilder::new()
///     .with_config(config.clone())
///     .register(ProductDescriptor::new(
///         ProductResource::new(&config.panel.currency),
///         stores,
///         config.pagination.clone(),
///     ))
///     .serve()
///     .await?;
/// ```
pub struct ServerBuilder {
    config: PanelConfig,
    registry: ResourceRegistry,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            config: PanelConfig::default(),
            registry: ResourceRegistry::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Replace the panel configuration
    pub fn with_config(mut self, config: PanelConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a resource
    pub fn register(mut self, descriptor: impl ResourceDescriptor + 'static) -> Self {
        self.registry.register(Box::new(descriptor));
        self
    }

    /// Add custom routes to the server
    ///
    /// Use this for routes that are not part of a resource, such as
    /// dashboards or login endpoints.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the final router
    ///
    /// This generates:
    /// - Health routes (`/health`, `/healthz`)
    /// - The navigation menu at `{panel_path}/navigation`
    /// - Every registered resource under `{panel_path}/{slug}`
    pub fn build(self) -> Result<Router> {
        self.config.validate()?;

        let panel_path = self.config.panel_path().to_string();
        let navigation = Arc::new(self.registry.navigation(&panel_path));
        tracing::info!(
            panel_path = %panel_path,
            resources = ?self.registry.slugs(),
            "building panel router"
        );

        let mut app = health_routes()
            .route(
                &format!("{}/navigation", panel_path),
                get(move || navigation_menu(navigation.clone())),
            )
            .merge(self.registry.build_routes(&panel_path));

        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to `server.bind` from the configuration
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind.clone();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build health check routes
fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "product-panel"
    }))
}

async fn navigation_menu(items: Arc<Vec<NavigationItem>>) -> Json<Value> {
    Json(json!({ "items": *items }))
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
