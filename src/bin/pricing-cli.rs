use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "pricing-cli")]
#[command(about = "Drive pricing actions through the storefront gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Session identity sent as X-Session-ID; the gateway generates one if omitted.
    #[arg(short, long)]
    session: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a new price to a catalog entry
    Apply {
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        price: f64,
    },
    /// Show the current recommendation for a catalog entry
    Recommendation {
        #[arg(long)]
        product_id: String,
    },
    /// Check gateway liveness
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(session) = &cli.session {
        headers.insert("x-session-id", HeaderValue::from_str(session)?);
    }

    let res = match cli.command {
        Commands::Apply { product_id, price } => {
            client
                .post(format!("{}/api/recommendations/apply", cli.url))
                .headers(headers)
                .json(&json!({ "product_id": product_id, "new_price": price }))
                .send()
                .await?
        }
        Commands::Recommendation { product_id } => {
            client
                .get(format!("{}/api/recommendations/{}", cli.url, product_id))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Health => {
            client
                .get(format!("{}/api/health", cli.url))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
    } else {
        eprintln!("Error: gateway returned status {}", status);
        eprintln!("{}", rendered);
        std::process::exit(1);
    }
    Ok(())
}
