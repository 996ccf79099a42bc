use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use docfinder_db_memory::InMemoryStorage;
use docfinder_notifications::{
    ChannelQueue, EmailAdapter, LogAdapter, NotificationAdapter, NotificationProcessor,
    NotificationQueue, TemplateRenderer,
};
use docfinder_search::PaginationConfig;
use docfinder_storage::DynRecordStore;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use url::Url;

use crate::{config::AppConfig, handlers, import, middleware as app_middleware};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: DynRecordStore,
    /// `None` when notifications are disabled.
    pub notifications: Option<Arc<dyn NotificationQueue>>,
    pub pagination: PaginationConfig,
    /// Origin for absolute links; the request `Host` is used when unset.
    pub base_url: Option<Url>,
}

impl AppState {
    /// Empty in-memory store, no notifications.
    pub fn in_memory(cfg: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            store: Arc::new(InMemoryStorage::new()),
            notifications: None,
            pagination: cfg.pagination(),
            base_url: configured_base_url(cfg)?,
        })
    }

    pub fn with_notifications(mut self, queue: Arc<dyn NotificationQueue>) -> Self {
        self.notifications = Some(queue);
        self
    }
}

fn configured_base_url(cfg: &AppConfig) -> anyhow::Result<Option<Url>> {
    cfg.server
        .base_url
        .as_deref()
        .map(|raw| {
            Url::parse(raw).map_err(|e| anyhow::anyhow!("server.base_url is not a URL: {e}"))
        })
        .transpose()
}

pub struct DocfinderServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(state: AppState, cfg: &AppConfig) -> Router {
    let body_limit = cfg.server.body_limit_bytes;

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .route("/metrics", get(handlers::metrics))
        // Directory
        .route("/api/", get(handlers::api_root))
        .route("/api/create/", post(handlers::doctors::create_doctor))
        .route("/api/doctors/", get(handlers::doctors::list_doctors))
        .route(
            "/api/doctors/filter/",
            get(handlers::doctors::filter_doctors),
        )
        .route(
            "/api/doctor/{practitioner_id}/",
            get(handlers::doctors::doctor_detail),
        )
        // Booking
        .route(
            "/api/appointments/create/",
            post(handlers::appointments::create_appointment),
        )
        // Admin
        .route("/api/admin/import/", post(handlers::admin::import_doctors))
        .route(
            "/api/admin/filters/{field}/",
            get(handlers::admin::distinct_values),
        )
        .route(
            "/api/admin/appointments/",
            get(handlers::admin::list_appointments),
        )
        .route(
            "/api/admin/doctors/{practitioner_id}/",
            delete(handlers::admin::delete_doctor),
        )
        .with_state(state)
        // Middleware stack, innermost first; request id wraps the trace layer
        // so the span can read it
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.route = Empty,
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Creates the store, runs the startup import and starts the
    /// notification processor.
    pub async fn build(self) -> anyhow::Result<DocfinderServer> {
        let mut state = AppState::in_memory(&self.config)?;
        tracing::info!(backend = state.store.backend_name(), "record store ready");

        if let Some(path) = &self.config.import.path {
            let report = import::import_file(state.store.as_ref(), path).await?;
            tracing::info!(
                path = %path,
                processed = report.processed,
                skipped = report.skipped,
                "startup import complete"
            );
        }

        if self.config.notifications.enabled {
            let adapter: Arc<dyn NotificationAdapter> =
                match self.config.notifications.smtp() {
                    Some(smtp) => {
                        tracing::info!(host = %smtp.host, port = smtp.port, "SMTP delivery enabled");
                        Arc::new(EmailAdapter::new(&smtp)?)
                    }
                    None => {
                        tracing::info!("no SMTP relay configured; confirmations are logged");
                        Arc::new(LogAdapter)
                    }
                };
            let (queue, receiver) = ChannelQueue::new();
            let processor = NotificationProcessor::new(
                receiver,
                Arc::new(TemplateRenderer::with_defaults()),
                adapter,
            );
            tokio::spawn(processor.run());
            state = state.with_notifications(Arc::new(queue));
        } else {
            tracing::info!("notifications disabled");
        }

        let app = build_app(state, &self.config);

        Ok(DocfinderServer {
            addr: self.addr,
            app,
        })
    }
}

impl DocfinderServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
