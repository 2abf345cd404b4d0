//! WeightWise server and batch jobs.

use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use axum::{routing::get, Router};
use clap::{Parser, Subcommand};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use weightwise::adapters::auth::OidcSessionValidator;
use weightwise::adapters::email::ResendEmailSender;
use weightwise::adapters::http::middleware::AuthState;
use weightwise::adapters::http::{account_router, billing_router, AccountAppState, BillingAppState};
use weightwise::adapters::paystack::PaystackPaymentAdapter;
use weightwise::adapters::postgres::{
    PostgresActivitySummaryReader, PostgresExerciseLog, PostgresSubscriberRepository,
};
use weightwise::application::handlers::account::{
    LogExerciseHandler, ProvisionSubscriberHandler, SendWelcomeEmailHandler,
};
use weightwise::application::handlers::billing::{
    CheckEntitlementHandler, HandlePaystackWebhookHandler, InitiatePaymentHandler,
    SendWeeklyReportsHandler,
};
use weightwise::config::AppConfig;
use weightwise::domain::foundation::Timestamp;
use weightwise::ports::{EmailSender, SubscriberRepository};

#[derive(Debug, Parser)]
#[command(name = "weightwise", version, about = "WeightWise billing service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Email the weekly fitness summary to every premium subscriber, then exit
    SendWeeklyReports,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config);
    config.validate().context("validating configuration")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "Starting WeightWise"
    );

    let pool = connect(&config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, pool).await,
        Command::SendWeeklyReports => send_weekly_reports(&config, pool).await,
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await
        .context("connecting to PostgreSQL")?;
    tracing::info!("Database connection established");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("running migrations")?;
        tracing::info!("Database migrations applied");
    }

    Ok(pool)
}

async fn serve(config: AppConfig, pool: PgPool) -> anyhow::Result<()> {
    config.payment.warn_missing_secrets();
    let active_currency = config.payment.active_currency()?;
    let subscribers: Arc<dyn SubscriberRepository> =
        Arc::new(PostgresSubscriberRepository::new(pool.clone()));
    let email: Arc<dyn EmailSender> = Arc::new(ResendEmailSender::new(config.email.resend_config()));
    if !email.is_configured() {
        tracing::warn!("Resend API key not configured; welcome emails will not be sent");
    }

    let welcome = Arc::new(SendWelcomeEmailHandler::new(email));
    let provisioning = Arc::new(
        ProvisionSubscriberHandler::new(subscribers.clone()).with_welcome_email(welcome.clone()),
    );

    let billing = BillingAppState {
        webhook_handler: Arc::new(HandlePaystackWebhookHandler::new(
            config.payment.webhook_secret.clone(),
            subscribers.clone(),
            active_currency.clone(),
        )),
        initiate_payment_handler: Arc::new(InitiatePaymentHandler::new(
            Arc::new(PaystackPaymentAdapter::new(config.payment.paystack_config())),
            provisioning.clone(),
            active_currency,
        )),
        entitlement_handler: Arc::new(CheckEntitlementHandler::new(subscribers)),
    };
    let account = AccountAppState {
        provision_handler: provisioning,
        welcome_email_handler: welcome,
        log_exercise_handler: Arc::new(LogExerciseHandler::new(Arc::new(
            PostgresExerciseLog::new(pool),
        ))),
    };
    let auth: AuthState = Arc::new(OidcSessionValidator::new(config.auth.oidc_config()));

    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(billing_router(billing, auth.clone()))
        .merge(account_router(account, auth))
        .layer(cors_layer(&config.server.cors_origins_list()))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn send_weekly_reports(config: &AppConfig, pool: PgPool) -> anyhow::Result<()> {
    let handler = SendWeeklyReportsHandler::new(
        Arc::new(PostgresSubscriberRepository::new(pool.clone())),
        Arc::new(PostgresActivitySummaryReader::new(pool)),
        Arc::new(ResendEmailSender::new(config.email.resend_config())),
    );

    let summary = handler.run(Timestamp::now()).await?;
    tracing::info!(
        processed = summary.processed,
        sent = summary.sent,
        skipped = summary.skipped,
        failed = summary.failures.len(),
        "Weekly report job finished"
    );
    Ok(())
}
