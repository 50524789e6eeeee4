//! Wiring & DI. Entry point: load config, bootstrap adapters, inject into services, serve.
//! No business logic here.

use dotenv::dotenv;
use multi_ai_bot::adapters::ai::build_adapters;
use multi_ai_bot::adapters::http::{AppState, http_router};
use multi_ai_bot::adapters::telegram::BotApiGateway;
use multi_ai_bot::ports::{ChatGateway, UpdateSink};
use multi_ai_bot::shared::AppConfig;
use multi_ai_bot::usecases::{
    ChatHandler, FanOutService, FormatLimits, PollingService, ResponseFormatter, StatusService,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv();
    let cfg = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cfg.log_level_or_default())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env found; using process environment"),
    }

    cfg.validate()?;
    let token = cfg
        .telegram_bot_token()
        .ok_or_else(|| anyhow::anyhow!("TELEGRAM_BOT_TOKEN environment variable is required"))?;

    // --- Shared HTTP client; per-call timeouts are applied on top ---
    let http = reqwest::Client::builder()
        .timeout(cfg.request_timeout_or_default())
        .build()?;

    // --- AI services ---
    let fan_out = Arc::new(FanOutService::new(build_adapters(&cfg, http.clone())));
    let status = Arc::new(StatusService::new(Arc::clone(&fan_out)));
    let formatter = ResponseFormatter::new(
        fan_out.descriptors(),
        FormatLimits::for_max_length(cfg.max_message_length_or_default()),
    );

    // --- Telegram ---
    let gateway: Arc<dyn ChatGateway> = Arc::new(BotApiGateway::new(
        http,
        &cfg.telegram_api_url_or_default(),
        &token,
    ));
    match gateway.get_me().await {
        Ok(username) => info!(bot = %username, "connected to Bot API"),
        Err(e) => warn!(error = %e, "getMe failed; continuing"),
    }

    let handler: Arc<dyn UpdateSink> = Arc::new(ChatHandler::new(
        Arc::clone(&gateway),
        Arc::clone(&fan_out),
        Arc::clone(&status),
        formatter,
        cfg.aggregate_timeout_or_default(),
    ));

    // --- Update source: webhook when a public URL is configured, long-polling otherwise ---
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let polling = match cfg.webhook_url() {
        Some(url) => {
            gateway
                .set_webhook(&url)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            info!("webhook registered; updates arrive on POST /webhook");
            None
        }
        None => {
            if let Err(e) = gateway.delete_webhook().await {
                warn!(error = %e, "deleteWebhook failed; polling may be rejected");
            }
            let poller = PollingService::new(Arc::clone(&gateway), Arc::clone(&handler));
            Some(tokio::spawn(async move { poller.run_loop(shutdown_rx).await }))
        }
    };

    // --- HTTP surface ---
    let state = Arc::new(AppState {
        fan_out,
        status: Arc::clone(&status),
        sink: handler,
        bot_configured: cfg.is_bot_configured(),
        services_test_timeout: cfg.services_test_timeout_or_default(),
        dashboard_path: PathBuf::from(cfg.dashboard_path_or_default()),
        environment: cfg.environment_or_default(),
    });
    let app = http_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port_or_default()));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    status.mark_running().await;
    info!(%addr, "web server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // --- Shutdown ---
    let _ = shutdown_tx.send(true);
    if let Some(handle) = polling {
        if let Err(e) = handle.await {
            warn!(error = %e, "polling task ended abnormally");
        }
    }
    status.mark_stopped().await;
    info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received; shutting down");
}
