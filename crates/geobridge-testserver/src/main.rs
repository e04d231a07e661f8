use clap::Parser;
use geobridge_testserver::Catalog;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "geobridge-testserver", about = "Reference map server for testing")]
struct Cli {
    /// Port to listen on.
    #[arg(long, default_value_t = 8780)]
    port: u16,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let addr = format!("0.0.0.0:{}", cli.port);
    info!("starting geobridge-testserver on {addr}");

    let catalog = Arc::new(Catalog::new());
    geobridge_testserver::run_server(&catalog, &addr);
}
