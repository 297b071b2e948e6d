use clap::{Args, Parser, Subcommand};
use pl_events::{Broadcaster, ConnectionRegistry};
use pl_serve::config::ServeConfig;
use std::net::IpAddr;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str =
    "playerlog=info,pl_core=info,pl_events=info,pl_serve=info,tower_http=debug";

#[derive(Parser)]
#[command(name = "playerlog", version, about = "Record player events and push them to live clients")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP, WebSocket and SSE server.
    Serve(ServeArgs),
    /// Print the OpenAPI document.
    Openapi,
}

#[derive(Args)]
struct ServeArgs {
    /// Overrides PLAYERLOG_DB_PATH.
    #[arg(long)]
    db_path: Option<String>,
    /// Overrides PLAYERLOG_HOST.
    #[arg(long)]
    host: Option<IpAddr>,
    /// Overrides PLAYERLOG_PORT.
    #[arg(long)]
    port: Option<u16>,
}

impl ServeArgs {
    fn resolve(self, mut config: ServeConfig) -> ServeConfig {
        if let Some(db_path) = self.db_path {
            config.db_path = db_path;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => {
            init_tracing();
            let config = args.resolve(ServeConfig::from_env());
            if let Err(err) = pl_serve::prepare_database(&config.db_path) {
                error!(error = %err, db_path = %config.db_path, "database setup failed");
                return ExitCode::FAILURE;
            }
            let broadcaster = Broadcaster::new(ConnectionRegistry::new());
            let state = pl_serve::AppState::new(config.db_path.clone(), broadcaster);
            if let Err(err) = pl_serve::serve(state, config.addr()).await {
                error!(error = %err, "serve error");
                return ExitCode::FAILURE;
            }
        }
        Command::Openapi => {
            println!("{}", pl_serve::openapi::generate_spec());
        }
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
