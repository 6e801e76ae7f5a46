//! Goliat Dashboard Terraform provider - plugin entry point

use clap::Parser;
use log::{debug, info};

use goliat_provider::{serve, Cli, GoliatProvider, ServeOptions};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // stdout carries the handshake, logs go to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .target(env_logger::Target::Stderr)
        .init();

    info!(
        "Starting terraform-provider-goliatdashboard v{}",
        env!("CARGO_PKG_VERSION")
    );
    debug!(
        "CLI args: debug={}, provider_address={}",
        cli.debug, cli.provider_address
    );

    let options = ServeOptions {
        debug: cli.debug,
        provider_address: cli.provider_address,
    };

    if let Err(e) = serve(GoliatProvider::new(), options).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
