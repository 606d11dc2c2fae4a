//! # hrms-boot
//!
//! Boot context server binary: loads the site, wires the session store into
//! the HTTP server and serves until Ctrl-C.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hrms_server::{HrmsServer, ServerConfig};
use hrms_settings::SiteSettings;
use hrms_store::{Database, SessionStore};

/// HRMS boot context server.
#[derive(Parser, Debug)]
#[command(name = "hrms-boot", about = "HRMS boot context server")]
struct Cli {
    /// Bench `sites/` directory.
    #[arg(long, env = "HRMS_SITES_DIR", default_value = "sites", global = true)]
    sites_dir: PathBuf,

    /// Site to serve (defaults to `sites/currentsite.txt`).
    #[arg(long, env = "HRMS_SITE", global = true)]
    site: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the boot context endpoints.
    Serve {
        /// Host to bind (overrides `webserver_host`).
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides `webserver_port`).
        #[arg(long)]
        port: Option<u16>,
    },
    /// Create a session and print its `sid`.
    NewSession {
        /// User the session belongs to.
        #[arg(long)]
        user: String,
    },
}

fn open_store(site: &SiteSettings) -> Result<SessionStore> {
    let path = site.session_db_path();
    let db = Database::open(&path)
        .with_context(|| format!("Failed to open session database: {}", path.display()))?;
    Ok(SessionStore::new(db))
}

fn server_config(site: &SiteSettings, host: Option<String>, port: Option<u16>) -> ServerConfig {
    let mut config = ServerConfig::from_site_config(&site.config);
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    config
}

fn new_session(store: &SessionStore, user: &str) -> Result<String> {
    let session = store
        .create_session(user)
        .context("Failed to create session")?;
    tracing::info!(user, "session created");
    Ok(session.session_id.to_string())
}

async fn serve(site: SiteSettings, store: SessionStore, config: ServerConfig) -> Result<()> {
    let metrics = hrms_server::metrics::install_recorder()
        .context("Failed to install metrics recorder")?;

    if site.config.developer_mode {
        tracing::warn!(
            site = %site.site_name,
            "developer mode enabled: dev context endpoint is open"
        );
    }

    let server = HrmsServer::new(config, Arc::new(site), store, metrics);
    server
        .serve_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl+c");
            }
        })
        .await
        .context("Failed to bind server")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log = hrms_core::logging::init_subscriber(hrms_core::logging::BOOTSTRAP_LEVEL);
    let site = hrms_settings::load_site(&cli.sites_dir, cli.site.as_deref())
        .context("Failed to load site configuration")?;
    if let Some(log) = &log {
        log.set_level(&site.config.log_level);
    }
    tracing::debug!(site = %site.site_name, dir = %site.site_dir.display(), "site loaded");

    let store = open_store(&site)?;

    match cli.command {
        Command::Serve { host, port } => {
            let config = server_config(&site, host, port);
            serve(site, store, config).await
        }
        Command::NewSession { user } => {
            let sid = new_session(&store, &user)?;
            println!("{sid}");
            Ok(())
        }
    }
}
