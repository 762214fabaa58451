mod config;
mod error;
mod handlers;
mod router;
mod state;

use clap::Parser;
use config::Config;
use router::create_router;
use state::AppState;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::parse();
    init_tracing(config.log_json);

    tracing::info!("Starting grid replay stream service");

    let datasets = config.dataset_paths();
    for path in [&datasets.all_jobs, &datasets.rl_min_instability] {
        if !path.is_file() {
            // Not fatal: each session reports the dataset as unavailable.
            tracing::warn!(path = %path.display(), "Dataset file not found");
        }
    }

    tracing::info!(
        pacing_interval_ms = config.pacing_interval_ms,
        queue_ceiling = config.queue_ceiling,
        exec_ceiling = config.exec_ceiling,
        cache_merged = config.cache_merged,
        "Replay configured"
    );

    let state = AppState::new(&config);
    let app = create_router(state);

    let listener = TcpListener::bind(config.bind).await?;

    tracing::info!("Listening on {}", config.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
