//! HTTP server core implementation

use crate::config::{Config, ServerConfig};
use crate::server::middleware::EdgeGuardMiddleware;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{Result, StorefrontError};
use actix_cors::Cors;
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::DefaultHeaders,
    web,
};
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Build state (hydrating the user directory) for a new server
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");
        let state = AppState::new(config.clone()).await?;

        Ok(Self {
            config: config.server().clone(),
            state,
        })
    }

    /// Create the Actix-web application
    ///
    /// The edge guard is the innermost middleware so it sees every routed
    /// request after CORS and request tracing.
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        debug!("Setting up routes and middleware");

        let cors_config = &state.config.server().cors;
        let mut cors = Cors::default();
        if cors_config.enabled() {
            for origin in &cors_config.allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            cors = cors
                .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE"])
                .allowed_headers(vec![
                    actix_web::http::header::CONTENT_TYPE,
                    actix_web::http::header::ACCEPT,
                ])
                .supports_credentials()
                .max_age(cors_config.max_age);
        }

        let edge_guard = EdgeGuardMiddleware::new(state.edge_guard());

        App::new()
            .app_data(state)
            .wrap(edge_guard)
            .wrap(TracingLogger::default())
            .wrap(DefaultHeaders::new().add(("Server", "storefront-gate")))
            .wrap(cors)
            .configure(routes::configure_routes)
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let workers = self.config.worker_count();

        info!("Starting HTTP server on {} with {} workers", bind_addr, workers);

        let sweeper = spawn_invitation_sweeper(&self.state);
        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .workers(workers)
            .bind(&bind_addr)
            .map_err(|e| bind_error(e, &bind_addr))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        let result = server
            .await
            .map_err(|e| StorefrontError::internal(format!("Server error: {}", e)));
        sweeper.abort();

        info!("HTTP server stopped");
        result
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Periodically mark lapsed invitations expired
fn spawn_invitation_sweeper(state: &AppState) -> tokio::task::JoinHandle<()> {
    let invitations = state.invitations.clone();
    let period = Duration::from_secs(state.config.invitations().sweep_interval_secs.max(1));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            let expired = invitations.sweep_expired();
            if expired > 0 {
                info!("Expired {} invitations", expired);
            }
        }
    })
}

fn bind_error(error: std::io::Error, bind_addr: &str) -> StorefrontError {
    if error.kind() == std::io::ErrorKind::AddrInUse {
        warn!("Address {} is already in use", bind_addr);
        return StorefrontError::Config(format!(
            "{} is already in use; set {} or server.port to use another port",
            bind_addr,
            crate::config::ENV_PORT
        ));
    }
    StorefrontError::Io(error)
}
