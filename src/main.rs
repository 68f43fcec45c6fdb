use std::env;
use std::fs;
use std::io::{self, Read};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use ingredients_parser::{AppState, IngredientParser, ParserConfig, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Parser)]
#[command(name = "ingredients-parser")]
#[command(about = "Parse ingredient lines into quantity, unit, name and notes")]
struct Cli {
    /// JSON parser config (falls back to INGREDIENTS_PARSER_CONFIG).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// CRF++ model file, overriding the config (falls back to CRF_MODEL_PATH).
    #[arg(long, global = true)]
    model: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Parse ingredient lines from FILE or stdin and print JSON.
    Parse { file: Option<PathBuf> },
    /// Print the tagger input table for FILE or stdin.
    Encode { file: Option<PathBuf> },
    /// Decode existing tagger output from FILE or stdin and print JSON.
    Decode { file: Option<PathBuf> },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config, cli.model)?;
    let parser = IngredientParser::new(config)?;

    match cli.command {
        Commands::Serve { host, port } => serve(parser, host, port),
        Commands::Parse { file } => {
            let input = read_input(file.as_deref())?;
            let ingredients = parser.parse(&input)?;
            println!("{}", serde_json::to_string_pretty(&ingredients)?);
            Ok(())
        }
        Commands::Encode { file } => {
            let input = read_input(file.as_deref())?;
            print!("{}", parser.encode(&input));
            Ok(())
        }
        Commands::Decode { file } => {
            let input = read_input(file.as_deref())?;
            let ingredients = parser.decode(&input)?;
            println!("{}", serde_json::to_string_pretty(&ingredients)?);
            Ok(())
        }
    }
}

#[tokio::main]
async fn serve(parser: IngredientParser, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host
        .or_else(|| env::var("HOST").ok())
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = port
        .or_else(|| env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()))
        .unwrap_or(DEFAULT_PORT);

    if parser.is_configured() {
        info!(
            "using model at {}",
            parser
                .config()
                .model_file_path()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        );
    } else {
        warn!("no model configured; /v1/parse will answer 503");
    }
    info!("binding to {}:{}", host, port);

    let state = AppState {
        parser: Arc::new(parser),
    };
    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

fn load_config(path: Option<PathBuf>, model: Option<PathBuf>) -> Result<ParserConfig> {
    let path = path.or_else(|| env::var("INGREDIENTS_PARSER_CONFIG").ok().map(PathBuf::from));
    let mut config = match path {
        Some(path) => {
            info!("loading config from {}", path.display());
            ParserConfig::from_file(&path)
                .with_context(|| format!("load config {}", path.display()))?
        }
        None => ParserConfig::default(),
    };
    if let Some(model) = model.or_else(|| env::var("CRF_MODEL_PATH").ok().map(PathBuf::from)) {
        config = config.with_model(model);
    }
    Ok(config)
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("read stdin")?;
            Ok(buf)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .init();
}
