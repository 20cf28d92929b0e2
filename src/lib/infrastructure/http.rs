//! HTTP Server

use std::{
    net::{Ipv4Addr, SocketAddr, TcpListener},
    time::Duration,
};

use anyhow::Context;
use axum::{extract::Request, Router};
use axum_server::Handle;
use clap::Parser;
use state::AppState;
use tokio::signal;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{debug, error, info, info_span};

use crate::domain::mail::MailService;

mod body;
mod errors;
mod handlers;
mod state;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct HttpServerConfig {
    /// The port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,
}

/// The application's HTTP server
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the port specified in `config`.
    pub async fn new(
        mail_service: impl MailService,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        let router = router(AppState::new(mail_service));

        let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
        let listener = TcpListener::bind(address)
            .inspect_err(|e| error!(port = config.port, error = %e, "server error"))
            .with_context(|| format!("failed to listen on {}", config.port))?;

        listener
            .set_nonblocking(true)
            .context("failed to set listener to non-blocking")?;

        Ok(Self { router, listener })
    }

    /// Runs the HTTP server until it fails or a shutdown signal arrives.
    #[mutants::skip]
    pub async fn run(self) -> anyhow::Result<()> {
        info!(
            "HTTP server listening on {}",
            self.listener
                .local_addr()
                .context("failed to get local address")?
        );

        let handle = Handle::new();

        let server = axum_server::from_tcp(self.listener)
            .handle(handle.clone())
            .serve(self.router.into_make_service());

        tokio::select! {
            result = server => {
                if let Err(e) = &result {
                    error!(error = %e, "server error");
                }
                result.context("server error")?
            },
            _ = shutdown_signal(Some(handle)) => {
                info!("Shutting down HTTP server");
            }
        }

        Ok(())
    }
}

/// Create the application's router.
///
/// Every path is served by the send-mail pipeline; method and content type are checked there.
pub fn router<M: MailService>(state: AppState<M>) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let uri = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    Router::new()
        .fallback(handlers::send_mail::handler::<M>)
        .layer(CatchPanicLayer::custom(handlers::panic_handler))
        .layer(trace_layer)
        .with_state(state)
}

#[mutants::skip]
async fn shutdown_signal(handle: Option<Handle>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    if let Some(handle) = handle {
        debug!("shutting down gracefully");
        handle.graceful_shutdown(Some(Duration::from_secs(10)));
    }
}
