use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cookup_server::{
    config::Config,
    generate::{GenerationSettings, RecipeGenerator},
    provider::{AiProvider, GatewayProvider},
    routes, shutdown,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// YAML configuration file. Defaults apply when omitted.
    #[clap(long)]
    config: Option<String>,

    /// The address and optionally port to bind to, overriding the config file
    #[clap(long)]
    address: Option<String>,

    /// Write JSON logs to a daily-rolling file in this directory instead of stdout
    #[clap(long)]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // initialize tracing
    let _guard = match &args.log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "access.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .json()
                .with_writer(non_blocking)
                .with_env_filter(EnvFilter::from_default_env())
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(EnvFilter::from_default_env())
                .init();
            None
        }
    };

    let mut config = Config::load_or_default(args.config.as_deref()).context("Loading config")?;
    if let Some(address) = args.address {
        config.server.address = address;
    }
    tracing::info!("AI settings: {:?}", config.ai);

    let provider = GatewayProvider::new(&config.ai).context("Building AI provider client")?;
    if !provider.is_configured() {
        // Generation requests answer 500 until a key is set
        tracing::error!("AI provider API key is not configured");
    }
    let generator = RecipeGenerator::new(Arc::new(provider), GenerationSettings::from(&config.ai));
    let app = routes::router(generator);

    // In development, use HTTP. In production, use HTTPS.
    if let Some(tls) = &config.server.tls {
        rustls::crypto::ring::default_provider()
            .install_default()
            .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;
        let tls_config =
            axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                .await
                .context("Loading TLS certificate")?;

        let addr = config.server.address.parse()?;
        let handle = axum_server::Handle::new();
        shutdown::drain_on(shutdown::ctrl_c(), handle.clone());

        tracing::info!("Listening on {} (TLS)", addr);
        axum_server::bind_rustls(addr, tls_config)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("Starting TLS server")?;
    } else {
        let listener = tokio::net::TcpListener::bind(&config.server.address).await?;
        tracing::info!("Listening on {}", config.server.address);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::ctrl_c())
            .await?;
    }
    Ok(())
}
