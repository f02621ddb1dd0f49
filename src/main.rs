//! ACRFD - application tracking client
//!
//! Command-line front end over the application and URL services.

use std::time::Duration;

use anyhow::{anyhow, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use acrfd::models::Application;
use acrfd::services::ApplicationService;
use acrfd::{config, AppState};

#[derive(Debug, Parser)]
#[command(name = "acrfd", version, about = "Track Crown land tenure applications")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the number of applications
    Count,
    /// List applications with their current comment period
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one fully populated application
    Show {
        id: String,
        /// Bypass the cached record
        #[arg(long)]
        force_reload: bool,
        #[arg(long)]
        json: bool,
    },
    /// Describe a status code
    Status { code: String },
    /// Build a shareable link for a set of filters
    Link {
        /// Filter as key=value; repeatable
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
        #[arg(long)]
        fragment: Option<String>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(api = %config.api.base_url, "Configuration loaded");

    let state = AppState::new(config)?;

    match cli.command {
        Command::Count => {
            let count = state.applications.get_count().await?;
            println!("{}", count);
        }
        Command::List { json } => {
            let applications = state.applications.get_all().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&applications)?);
            } else {
                for application in &applications {
                    print_row(application);
                }
            }
        }
        Command::Show {
            id,
            force_reload,
            json,
        } => {
            let application = state
                .applications
                .get_by_id(&id, force_reload)
                .await?
                .ok_or_else(|| anyhow!("No application with id {}", id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&application)?);
            } else {
                print_detail(&application, state.api.base_url());
            }
        }
        Command::Status { code } => {
            println!("{}", acrfd::services::status_label(Some(&code)));
            println!("decision: {}", ApplicationService::is_decision(&code));
        }
        Command::Link { params, fragment } => {
            let has_state = params.iter().any(|(_, v)| !v.is_empty())
                || fragment.as_deref().is_some_and(|f| !f.is_empty());
            if !has_state {
                println!("{}", config.url.public_url);
                return Ok(());
            }

            let (urls, navigator) = state.url_service()?;
            let mut nav_end = urls.on_nav_end();

            for (key, value) in &params {
                urls.save(key, Some(value.as_str())).await;
            }
            urls.set_fragment(fragment.as_deref()).await;

            let wait = config.url.debounce() + Duration::from_secs(5);
            tokio::time::timeout(wait, nav_end.recv())
                .await
                .context("Timed out waiting for navigation")??;

            let url = navigator
                .current_url()
                .await
                .ok_or_else(|| anyhow!("No navigation recorded"))?;
            println!("{}", url);
        }
    }

    Ok(())
}

fn print_row(application: &Application) {
    let period = application
        .current_period
        .as_ref()
        .map(|p| p.status_at(Utc::now()).to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{:<26} {:<40} {:<36} {}",
        application.id,
        application.display_name(),
        ApplicationService::get_status(Some(application)),
        period
    );
}

fn print_detail(application: &Application, api_base: &str) {
    println!("{}", application.display_name());
    println!("  id:       {}", application.id);
    println!("  status:   {}", ApplicationService::get_status(Some(application)));
    if let Some(client) = &application.client {
        println!("  client:   {}", client);
    }
    if let Some(area) = application.area_hectares {
        println!("  area:     {:.2} ha", area);
    }
    if let Some(period) = &application.current_period {
        let now = Utc::now();
        match period.days_remaining_at(now) {
            Some(days) => println!("  comments: {} ({} days left)", period.status_at(now), days),
            None => println!("  comments: {}", period.status_at(now)),
        }
    }
    if let Some(decision) = &application.decision {
        println!(
            "  decision: {}",
            decision.name.as_deref().unwrap_or(decision.id.as_str())
        );
    }
    if let Some(description) = &application.description {
        println!();
        println!("{}", description);
    }
    if !application.documents.is_empty() {
        println!();
        println!("Documents:");
        for document in &application.documents {
            println!("  {}  {}", document.label(), document.download_url(api_base));
        }
    }
}
