//! # Shortlink - نقطه ورود برنامه
//!
//! ترتیب راه‌اندازی: `.env` ← tracing ← تنظیمات ← دیتابیس و migration ←
//! Router ← سرور. با Ctrl+C یا SIGTERM سرور درخواست‌های جاری رو تموم
//! میکنه و بعد pool دیتابیس بسته میشه.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shortlink::{api::create_router, config::Config, database::Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // نبودن فایل .env مشکلی نیست
    dotenvy::dotenv().ok();

    // تنظیمات قبل از tracing لازمه چون فرمت لاگ به محیط بستگی داره
    let config = Config::from_env().context("failed to load configuration")?;
    init_tracing(&config);

    info!(environment = ?config.environment, "🚀 Starting shortlink service...");

    let database = Database::connect(&config.database_url, config.database_max_connections)
        .await
        .context("failed to connect to database")?;
    info!("✅ Database connected successfully");

    database
        .migrate()
        .await
        .context("failed to run database migrations")?;
    info!("✅ Database migrations applied");

    let app = create_router(database.clone(), config.clone());

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("🌐 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    database.close().await;
    info!("👋 Shutdown complete");

    Ok(())
}

/// راه‌اندازی tracing
///
/// `RUST_LOG` اولویت داره. در production خروجی JSON و در بقیه محیط‌ها
/// فرمت pretty.
fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("shortlink=debug,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.environment.is_production() {
        registry
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .init();
    }
}

/// منتظر Ctrl+C یا SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
