use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use spotify_dl_api::config::ApiConfig;
use spotify_dl_api::server::{self, AppState};
use spotify_dl_api::utils::logger::Logger;

#[derive(Parser)]
#[command(name = "spotify-dl-api")]
#[command(about = "Spotify track download proxy API", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Optional TOML config file, used when credentials are not in the environment
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Logger::init();

    let cli = Cli::parse();
    let config = ApiConfig::load(cli.config.as_deref())?;

    let addr = SocketAddr::new(cli.host.parse()?, cli.port);
    let app = server::create_router(AppState::new(config));

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
