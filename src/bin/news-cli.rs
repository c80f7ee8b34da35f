use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "news-cli")]
#[command(about = "Query a running news proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000", env = "NEWS_PROXY_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show service info and enabled endpoints
    Status,
    /// Check proxy health and uptime
    Health,
    /// Fetch headlines through a provider endpoint
    Fetch {
        /// Provider name: newsapi, newsdata, gnews or currents
        provider: String,
        #[arg(short, long)]
        country: Option<String>,
        #[arg(short, long)]
        language: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Status => client.get(format!("{}/", base)).send().await?,
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Fetch {
            provider,
            country,
            language,
        } => {
            let mut query = Vec::new();
            if let Some(country) = country {
                query.push(("country", country));
            }
            if let Some(language) = language {
                query.push(("language", language));
            }
            client
                .get(format!("{}/api/{}", base, provider))
                .query(&query)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let pretty = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        eprintln!("{}", pretty);
        std::process::exit(1);
    }

    println!("{}", pretty);
    Ok(())
}
