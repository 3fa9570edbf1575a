//! agent-gateway - route requests to AI agent backends
//!
//! Command line front end over the routing core.

#![allow(missing_docs)]

use agent_gateway::core::analytics::UsageAnalyzer;
use agent_gateway::storage::InMemoryLogStore;
use agent_gateway::utils::logging::init_logging;
use agent_gateway::{AgentRequest, Config, Router, build_info};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// AI agent request router
#[derive(Parser, Debug)]
#[command(name = "agent-gateway")]
#[command(about = "Route requests across AI agent backends with failover")]
#[command(version)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, global = true, env = "AGENT_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Route one request and print the result as JSON
    Route {
        /// Prompt text
        prompt: String,
        /// Request type matched against agent capabilities
        #[arg(short = 't', long = "type", default_value = "text")]
        request_type: String,
        /// User whose preferences apply
        #[arg(short, long)]
        user: Option<String>,
        /// Send to this agent directly, without failover
        #[arg(short, long)]
        agent: Option<String>,
        /// Per-request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Probe every enabled agent's backend
    TestConnections,
    /// List configured agents
    Agents,
    /// Print build information
    Info,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    init_logging(&config.logging).context("Failed to initialize logging")?;
    debug!("Loaded {} agent(s)", config.agents.len());

    match cli.command {
        Commands::Route {
            prompt,
            request_type,
            user,
            agent,
            timeout_ms,
        } => {
            let router = build_router(&config).await?;

            let mut request = AgentRequest::text(prompt);
            request.request_type = request_type;
            if let Some(user) = user {
                request = request.with_user(user);
            }
            if let Some(agent) = agent {
                request = request.with_target_agent(agent);
            }
            if let Some(ms) = timeout_ms {
                request = request.with_timeout(Duration::from_millis(ms));
            }

            let result = router.route(&request).await?;
            info!(
                "Request {} served by {} after {} attempt(s)",
                result.request_id, result.agent_used, result.attempts
            );
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::TestConnections => {
            let router = build_router(&config).await?;
            let statuses = router.test_connections().await?;
            println!("{}", serde_json::to_string_pretty(&statuses)?);

            if statuses.iter().all(|s| s.result.ok) {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Agents => {
            println!("{}", serde_json::to_string_pretty(&config.agents)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Info => {
            let info = build_info();
            println!(
                "{} {} ({}, {})",
                agent_gateway::NAME,
                info.version,
                info.git_hash,
                info.rust_version
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn build_router(config: &Config) -> anyhow::Result<Router> {
    let analyzer = UsageAnalyzer::new(
        Arc::new(InMemoryLogStore::new()),
        config.analytics.clone(),
    );

    let router = Router::builder(Arc::new(config.agent_store()))
        .preferences(Arc::new(config.preference_store()))
        .analyzer(Arc::new(analyzer))
        .config(config.router.clone())
        .build()
        .await?;
    Ok(router)
}
