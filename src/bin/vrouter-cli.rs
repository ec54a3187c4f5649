use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use v_router::releases::{manifest, url_to_version, version_to_url, Resolver};

#[derive(Parser)]
#[command(name = "vrouter-cli")]
#[command(about = "Management CLI for the documentation version router", long_about = None)]
struct Cli {
    /// Address of a running router.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Channels file for offline commands.
    #[arg(short, long, default_value = "channels.yaml")]
    channels: PathBuf,

    /// Treat `latest` as a regular channel.
    #[arg(long)]
    latest: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the router status endpoint
    Status,
    /// Query the router health endpoint
    Health,
    /// List groups and their channels, newest first
    Groups,
    /// Resolve a group (and optionally a channel) to a version
    Resolve {
        group: String,
        #[arg(short = 'C', long)]
        channel: Option<String>,
    },
    /// Find the channel and group a version is published in
    Lookup { version: String },
    /// Encode a version as a URL token
    Encode { version: String },
    /// Decode a URL token into a version
    Decode { token: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Status => {
            let res = reqwest::get(format!("{}/status", cli.url)).await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = reqwest::get(format!("{}/health", cli.url)).await?;
            print_response(res).await?;
        }
        Commands::Groups => {
            let releases = manifest::load(&cli.channels)?;
            let resolver = Resolver::new(&releases).with_latest(cli.latest);
            for group in resolver.groups_descending() {
                let best = resolver.best_version_for(group).unwrap_or("-");
                println!("{} (best: {})", group, best);
                if let Some(release) = releases.group(group) {
                    for name in resolver.channel_order() {
                        if let Some(version) = release.channel_version(name) {
                            println!("  {:<12} {}", name, version);
                        }
                    }
                }
            }
        }
        Commands::Resolve { group, channel } => {
            let releases = manifest::load(&cli.channels)?;
            let resolver = Resolver::new(&releases).with_latest(cli.latest);
            let version = match channel {
                Some(channel) => resolver.version_for(group, channel)?,
                None => resolver.best_version_for(group)?,
            };
            println!("{} ({})", version, version_to_url(version));
        }
        Commands::Lookup { version } => {
            let releases = manifest::load(&cli.channels)?;
            let found = Resolver::new(&releases)
                .with_latest(cli.latest)
                .channel_and_group_for(version);
            if found.group.is_empty() {
                eprintln!("{} is not published in any channel", version);
                std::process::exit(1);
            }
            println!("group {} channel {}", found.group, found.channel);
        }
        Commands::Encode { version } => println!("{}", version_to_url(version)),
        Commands::Decode { token } => println!("{}", url_to_version(token)),
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: router returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
