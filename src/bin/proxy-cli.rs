//! Command line client for the proxy admin API.
//!
//! `list` prints the current routing table, `set` posts a route.

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Management CLI for the dynamic reverse proxy", long_about = None)]
struct Cli {
    /// Base URL of the admin listener.
    #[arg(short, long, default_value = "http://localhost:8001")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the active routes
    List,
    /// Add a route or replace the one registered under the same prefix
    Set {
        /// Upstream base URL, e.g. http://10.0.0.5:8080
        #[arg(short, long)]
        address: String,

        /// Path prefix; defaults to "/"
        #[arg(short, long)]
        path: Option<String>,

        /// Opaque JSON metadata stored with the route
        #[arg(short, long)]
        metadata: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let url = format!("{}/", cli.url.trim_end_matches('/'));

    match cli.command {
        Commands::List => {
            let res = client.get(&url).send().await?;
            print_response(res).await?;
        }
        Commands::Set {
            address,
            path,
            metadata,
        } => {
            let mut payload = json!({ "address": address });
            if let Some(path) = path {
                payload["path"] = Value::String(path);
            }
            if let Some(metadata) = metadata {
                payload["metadata"] = serde_json::from_str(&metadata)?;
            }
            let res = client.post(&url).json(&payload).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
