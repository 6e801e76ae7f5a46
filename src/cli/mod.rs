//! CLI argument parsing

use clap::Parser;

use crate::config::defaults;

/// Terraform provider for Goliat Dashboard
///
/// Terraform starts this binary itself; run it by hand only with `--debug`.
#[derive(Parser, Debug)]
#[command(name = "terraform-provider-goliatdashboard")]
#[command(version)]
#[command(about = "Terraform provider for Goliat Dashboard organizations and projects", long_about = None)]
pub struct Cli {
    /// Run standalone and print TF_REATTACH_PROVIDERS for Terraform to attach to
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = defaults::LOG_LEVEL_ENV, default_value = defaults::LOG_LEVEL)]
    pub log_level: String,

    /// Registry address announced in debug mode
    #[arg(long, default_value = defaults::PROVIDER_ADDRESS)]
    pub provider_address: String,
}
