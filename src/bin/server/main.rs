#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Email relay: accepts JSON email descriptions over HTTP and sends them through SMTP

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use mail_relay::{
    domain::mail::MailServiceImpl,
    infrastructure::{
        email::smtp::{SMTPConfig, SMTPMailer},
        http::{HttpServer, HttpServerConfig},
        logging::{self, LogConfig},
    },
};
use tracing::info;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The SMTP transport configuration
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// The logging configuration
    #[clap(flatten)]
    pub log: LogConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load environment: {}", e);

            return Err(e.into());
        }
    }

    let args = Args::parse();

    logging::init(&args.log)?;

    info!(
        sender = args.smtp.sender(),
        host = %args.smtp.host,
        port = args.smtp.port,
        "using SMTP relay"
    );

    let mailer = SMTPMailer::new(&args.smtp)?;
    let mail_service = MailServiceImpl::new(Arc::new(mailer));

    HttpServer::new(mail_service, args.server)
        .await?
        .run()
        .await
}
