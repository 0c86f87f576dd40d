use clap::{Parser, Subcommand, ValueEnum};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use std::process::ExitCode;

use router_api::dispatch::INSTANCE_HEADER;

#[derive(Parser)]
#[command(name = "router-cli")]
#[command(about = "Management CLI for the router API", long_about = None)]
struct Cli {
    #[arg(short, long, env = "ROUTER_API_URL", default_value = "http://localhost:8077")]
    url: String,

    /// Mode to address; the server default when omitted.
    #[arg(short, long, global = true)]
    mode: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the addresses of an app's backend
    Backend {
        app: String,
        #[arg(short, long)]
        instance: Option<String>,
    },
    /// List the options the mode accepts
    Info,
    /// Run the aggregate health check
    Health,
    /// Ask whether an optional capability is supported
    Support {
        #[arg(value_enum)]
        capability: CapabilityArg,
    },
    /// List the CNAMEs bound to an app's backend
    Cnames {
        app: String,
        #[arg(short, long)]
        instance: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CapabilityArg {
    Tls,
    Cname,
}

impl Cli {
    fn api_url(&self, path: &str) -> String {
        let base = self.url.trim_end_matches('/');
        match &self.mode {
            Some(mode) => format!("{}/api/{}{}", base, mode, path),
            None => format!("{}/api{}", base, path),
        }
    }
}

fn instance_headers(instance: Option<&str>) -> Result<HeaderMap, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    if let Some(instance) = instance {
        headers.insert(INSTANCE_HEADER, HeaderValue::from_str(instance)?);
    }
    Ok(headers)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let request = match &cli.command {
        Commands::Backend { app, instance } => client
            .get(cli.api_url(&format!("/backend/{}", app)))
            .headers(instance_headers(instance.as_deref())?),
        Commands::Info => client.get(cli.api_url("/info")),
        Commands::Health => client.get(format!("{}/healthcheck", cli.url.trim_end_matches('/'))),
        Commands::Support { capability } => {
            let path = match capability {
                CapabilityArg::Tls => "/support/tls",
                CapabilityArg::Cname => "/support/cname",
            };
            client.get(cli.api_url(path))
        }
        Commands::Cnames { app, instance } => client
            .get(cli.api_url(&format!("/backend/{}/cname", app)))
            .headers(instance_headers(instance.as_deref())?),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: router API returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text.trim_end());
        }
        return Ok(ExitCode::FAILURE);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text.trim_end()),
    }
    Ok(ExitCode::SUCCESS)
}
