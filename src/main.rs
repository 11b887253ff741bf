//! Portfolio Server
//!
//! Backend for a personal portfolio site:
//! - Rate-limited contact form relayed by email
//! - Markdown blog content API
//! - Optional static file serving for the site itself

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use api::middleware::GateConfig;
use api::{router, router_with_static, AppState};
use contact_core::ContactVariant;
use content::{ContentConfig, PostStore};
use mailer::{transport_from_config, Dispatcher, MailerConfig};
use telemetry::init_tracing_from_env;

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Directory of static site files, served for unmatched paths
    #[serde(default)]
    static_dir: Option<String>,

    #[serde(default)]
    contact: ContactConfig,

    #[serde(default)]
    mailer: MailerConfig,

    #[serde(default)]
    gate: GateConfig,

    #[serde(default)]
    content: ContentConfig,
}

/// Contact form settings.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ContactConfig {
    /// Which validation rule set applies
    #[serde(default)]
    variant: ContactVariant,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            contact: ContactConfig::default(),
            mailer: MailerConfig::default(),
            gate: GateConfig::default(),
            content: ContentConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting portfolio server v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    info!(
        variant = config.contact.variant.as_str(),
        to = ?config.mailer.to,
        dry_run = config.mailer.dry_run,
        posts_dir = %config.content.posts_dir,
        "Loaded configuration"
    );

    let transport =
        transport_from_config(&config.mailer).context("Failed to create mail transport")?;
    if !transport.is_configured() {
        warn!("RESEND_API_KEY is not set; contact submissions will be refused");
    }

    let dispatcher = Dispatcher::new(transport, &config.mailer, config.contact.variant);
    let posts = PostStore::from_config(&config.content);
    let state = AppState::new(dispatcher, config.gate.clone(), posts);

    state.refresh_health().await;

    let _gate_sweeper = state.start_gate_sweeper();
    info!(
        every_secs = config.gate.sweep_interval_secs,
        trust_proxy_headers = config.gate.trust_proxy_headers,
        "Started submission gate sweeper"
    );

    let app = match &config.static_dir {
        Some(dir) => {
            info!(dir = %dir, "Serving static files");
            router_with_static(state, dir)
        }
        None => router(state),
    };

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Connect info gives the gate its client key
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("PORTFOLIO")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Conventional variable names used by hosting platforms and the mail provider
    if let Ok(port) = std::env::var("PORT") {
        config.port = port.trim().parse().context("PORT must be a port number")?;
    }
    if let Ok(key) = std::env::var("RESEND_API_KEY") {
        config.mailer.api_key = Some(key);
    }
    if let Ok(to) = std::env::var("CONTACT_EMAIL") {
        config.mailer.set_destination(&to);
    }
    if let Ok(variant) = std::env::var("CONTACT_VARIANT") {
        config.contact.variant = variant
            .parse()
            .map_err(anyhow::Error::msg)
            .context("Invalid CONTACT_VARIANT")?;
    }
    if let Ok(dir) = std::env::var("POSTS_DIR") {
        config.content.posts_dir = dir;
    }
    if let Ok(dir) = std::env::var("STATIC_DIR") {
        config.static_dir = Some(dir).filter(|d| !d.trim().is_empty());
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
