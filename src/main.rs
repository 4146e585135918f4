use clap::Parser;
use pantry::{
    api::{handlers::AppState, routes},
    cli::{commands, Cli, Commands},
    config::Settings,
    recommend::{FilterParams, Recommender},
    Error, Result,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pantry=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env()?;
    if let Some(path) = cli.recipes {
        settings.corpus.recipes_path = path;
    }

    match cli.command {
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
        Commands::Search {
            query,
            diet,
            difficulty,
            time,
            top_n,
        } => {
            let (recommender, _) = load(&settings)?;
            let filters = FilterParams {
                diet,
                difficulty,
                time_limit: time,
            };
            commands::search(&recommender, &query, &filters, top_n)?;
        }
        Commands::Specials { date, n } => {
            let (recommender, _) = load(&settings)?;
            commands::specials(&recommender, date.as_deref(), n)?;
        }
        Commands::Show { id } => {
            let (recommender, _) = load(&settings)?;
            commands::show(&recommender, id)?;
        }
        Commands::Validate => {
            let (recommender, report) = load(&settings)?;
            commands::print_report(&recommender, &report, &settings.images.default_image);
        }
    }

    Ok(())
}

fn load(settings: &Settings) -> Result<(Recommender, pantry::corpus::LoadReport)> {
    settings.validate()?;
    Recommender::from_settings(settings)
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    // Override settings with CLI arguments
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting Pantry server");
    info!("Dataset: {:?}", settings.corpus.recipes_path);

    // The corpus is loaded once; a malformed dataset stops startup here
    let (recommender, report) = load(&settings)?;
    info!(
        "Corpus ready: {} recipes, {} missing values defaulted",
        report.loaded,
        report.missing.len()
    );

    let state = AppState {
        recommender: Arc::new(recommender),
    };
    let app = routes::create_router(state, &settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("Pantry Recipe Recommender");
    println!("========================================");
    println!("Address: http://{addr}");
    println!("Recipes: {}", report.loaded);
    println!("\nEndpoints:");
    println!("  GET  /health");
    println!("  GET  /api/specials");
    println!("  GET  /api/search?ingredients=...");
    println!("  POST /api/search");
    println!("  GET  /api/recipes/:id");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
