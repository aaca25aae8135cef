use std::path::PathBuf;

use clap::Parser;
use taskdeck_server::ServerConfig;
use taskdeck_store::Database;

#[derive(Parser, Debug)]
#[command(name = "taskdeck", about = "Task tracking server")]
struct Args {
    /// Host to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Path to the SQLite database file.
    #[arg(long, default_value = "tasks.db")]
    db: PathBuf,

    /// Directory of client assets to serve, if any.
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let db = Database::open(&args.db).expect("Failed to open database");
    tracing::info!(path = %args.db.display(), "Database opened");

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        static_dir: args.static_dir,
    };
    let handle = taskdeck_server::start(config, db)
        .await
        .expect("Failed to start server");

    tracing::info!(port = handle.port, "taskdeck ready");

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl+c");

    tracing::info!("Shutting down");
}
