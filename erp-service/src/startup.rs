//! Application startup and lifecycle management.

use crate::config::ErpConfig;
use crate::handlers::{self, customers, invoices, reports};
use crate::services::metrics::HTTP_REQUESTS_TOTAL;
use crate::services::{
    init_metrics, BusinessClock, CustomerService, Database, ErpStore, InvoiceService,
    ReportService,
};
use crate::documents::CompanyProfile;
use axum::{
    extract::{MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::session::{require_session, SessionGate};
use service_core::middleware::tracing::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub invoices: InvoiceService,
    pub customers: CustomerService,
    pub reports: ReportService,
    pub store: Arc<dyn ErpStore>,
    pub store_timeout: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ErpStore>,
        store_timeout: Duration,
        clock: BusinessClock,
        company: CompanyProfile,
    ) -> Self {
        Self {
            invoices: InvoiceService::new(
                store.clone(),
                store_timeout,
                clock,
                Arc::new(company),
            ),
            customers: CustomerService::new(store.clone(), store_timeout, clock),
            reports: ReportService::new(store.clone(), store_timeout),
            store,
            store_timeout,
        }
    }
}

/// Count requests by matched route and status.
async fn track_http_metrics(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[route.as_str(), response.status().as_str()])
        .inc();

    response
}

/// Build the HTTP router. Everything under `/api` sits behind `gate`.
pub fn build_router(state: AppState, gate: SessionGate) -> Router {
    let api = Router::new()
        .route(
            "/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/customers/:id",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route("/customers/:id/invoices", get(customers::customer_invoices))
        .route(
            "/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route("/invoices/next-number", get(invoices::next_invoice_number))
        .route("/invoices/:id", get(invoices::get_invoice))
        .route("/invoices/:id/payments", post(invoices::record_payment))
        .route("/invoices/:id/print", get(invoices::print_invoice))
        .route("/reports/accounting", get(reports::accounting_report))
        .route("/reports/production", get(reports::production_report))
        .route("/reports/quarry", get(reports::quarry_report))
        .route("/reports/sales", get(reports::sales_report))
        .layer(middleware::from_fn_with_state(gate, require_session));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_handler))
        .nest("/api", api)
        .layer(middleware::from_fn(track_http_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: ErpConfig) -> Result<Self, AppError> {
        Self::build_internal(config, true).await
    }

    /// Build the application without running migrations.
    pub async fn build_without_migrations(config: ErpConfig) -> Result<Self, AppError> {
        Self::build_internal(config, false).await
    }

    async fn build_internal(config: ErpConfig, run_migrations: bool) -> Result<Self, AppError> {
        init_metrics();

        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        if run_migrations {
            db.run_migrations().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to run migrations");
                e
            })?;
        }

        let clock = BusinessClock::from_offset_minutes(config.utc_offset_minutes)?;
        let gate = SessionGate::from_secret(config.session_secret.as_deref());
        if !gate.is_enabled() {
            tracing::warn!("SESSION_SECRET not set, /api routes are open");
        }

        let state = AppState::new(
            Arc::new(db),
            config.store_timeout(),
            clock,
            config.company.clone(),
        );
        let router = build_router(state, gate);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "ERP service listener bound");

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!(
            service = "erp-service",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        axum::serve(self.listener, self.router).await.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}
