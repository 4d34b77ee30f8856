//! Utils

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Arguments for the checkout command
#[derive(Debug, Parser)]
#[command(name = "till", about = "Check out a cart fixture and print its receipt")]
pub struct CheckoutArgs {
    /// Fixture set to use for the products, offers & cart
    #[clap(short, long, default_value = "supermarket")]
    pub fixture: String,

    /// Directory holding the `products`, `offers` and `carts` fixture folders
    #[clap(short = 'd', long, default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,

    /// Log filter used when `RUST_LOG` is not set
    #[clap(short, long, default_value = "warn")]
    pub log_level: String,
}

/// Install a compact `tracing` subscriber writing to stderr.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(
    default_filter: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
}
