//! # Storefront Entry Point
//!
//! ```bash
//! storefront products --category sunscreen
//! storefront cart add 2
//! storefront --json cart
//! ```
//!
//! State lives in a local SQLite database (`STOREFRONT_DB_PATH`, or the
//! platform data directory) and carries over between invocations.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::Parser;
use storefront_cli::cli::Cli;

#[tokio::main]
async fn main() {
    storefront_cli::init_tracing();

    let cli = Cli::parse();
    let json = cli.json;

    match storefront_cli::run(cli).await {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            if json {
                match serde_json::to_string(&e) {
                    Ok(body) => eprintln!("{}", body),
                    Err(_) => eprintln!("{}", e),
                }
            } else {
                eprintln!("{}", e.message);
            }
            std::process::exit(1);
        }
    }
}
