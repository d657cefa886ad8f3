//! AulaSense - Classroom Feedback and Recommendation Service
//!
//! Entry point for the HTTP server and the maintenance commands.

use aulasense_core::{
    api::{ApiServer, ApiServerConfig, AppState},
    config::{Overrides, Settings},
    insights, ClassroomId, Generation, SqliteStorage,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aulasense")]
#[command(about = "Classroom feedback service with MINEDU-aligned AI recommendations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Database path (overrides AULASENSE_DB_PATH env var and default)
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Configuration file (default: ./aulasense.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Server address (overrides HOST and PORT)
        #[arg(long)]
        addr: Option<String>,

        /// Directory with the dashboard's static files
        #[arg(long)]
        public_dir: Option<PathBuf>,
    },

    /// Create the schema and seed classrooms and teachers
    Init,

    /// Print the answer statistics of one classroom as JSON
    Stats {
        /// Classroom id
        aula: ClassroomId,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Use the given level for our crates, WARN for request tracing unless debugging
    let http_level = if level >= Level::DEBUG { level } else { Level::WARN };
    let filter = EnvFilter::new(format!(
        "aulasense={lvl},aulasense_core={lvl},tower_http={http}",
        lvl = level.as_str().to_lowercase(),
        http = http_level.as_str().to_lowercase(),
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("AulaSense v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut overrides = Overrides {
        config_file: cli.config,
        db_path: cli.db_path,
        ..Default::default()
    };

    match cli.command.unwrap_or(Commands::Serve {
        addr: None,
        public_dir: None,
    }) {
        Commands::Serve { addr, public_dir } => {
            overrides.addr = addr;
            overrides.public_dir = public_dir;
            let settings = Settings::load(&overrides)?;

            info!("Using database: {}", settings.db_path.display());
            let storage = SqliteStorage::open(&settings.db_path).await?;
            let generation = Generation::from_config(settings.llm)?;

            let state = AppState {
                storage: Arc::new(storage),
                generation,
            };
            let config = ApiServerConfig {
                addr: settings.addr,
                public_dir: settings.public_dir,
            };

            ApiServer::new(config, state).serve().await
        }

        Commands::Init => {
            let settings = Settings::load(&overrides)?;
            SqliteStorage::open(&settings.db_path).await?;
            println!("Database ready at {}", settings.db_path.display());
            Ok(())
        }

        Commands::Stats { aula } => {
            let settings = Settings::load(&overrides)?;
            let storage = SqliteStorage::open(&settings.db_path).await?;
            let stats = insights::classroom_stats(&storage, aula).await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
    }
}
