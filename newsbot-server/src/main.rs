use std::sync::Arc;

use clap::Parser;
use newsbot_core::NewsbotConfig;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use newsbot_server::pipeline::Pipeline;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "newsbot.toml")]
    config: String,

    /// Check PostgreSQL and pgvector, then exit
    #[arg(long)]
    health: bool,

    /// Apply migrations, then exit
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (API keys in dev)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config
    let config = match NewsbotConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Init logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level));
    fmt().with_env_filter(filter).init();

    // Connect to DB
    let pool = match newsbot_core::db::create_pool(&config.database).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if args.health {
        match newsbot_core::db::health_check(&pool).await {
            Ok(v) => println!("✅ PostgreSQL connected: {}", v),
            Err(e) => {
                println!("❌ PostgreSQL connection failed: {}", e);
                std::process::exit(1);
            }
        }

        match newsbot_core::db::check_pgvector(&pool).await {
            Ok(v) => println!("✅ pgvector version: {}", v),
            Err(e) => {
                println!("❌ pgvector check failed: {}", e);
                std::process::exit(1);
            }
        }

        println!("✅ newsbot DB health check passed");
        return Ok(());
    }

    newsbot_core::db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");
    if args.migrate {
        return Ok(());
    }

    let pipeline = match Pipeline::from_config(&config, pool) {
        Ok(p) => Arc::new(p),
        Err(e) => {
            eprintln!("Failed to build news pipeline: {}", e);
            std::process::exit(1);
        }
    };

    let settings = pipeline.settings();
    tracing::info!(
        news_limit = settings.news_limit,
        max_concurrency = settings.max_concurrency,
        threshold = settings.matching.threshold,
        match_count = settings.matching.match_count,
        "News pipeline ready"
    );

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    newsbot_server::http::start_http_server(pipeline, &config, tx.subscribe()).await?;

    Ok(())
}
