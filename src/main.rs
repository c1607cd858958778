/* 3rd party libraries */
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

/* Custom libraries */
use dispatch::DispatchEngine;
use session::SessionStateMachine;
use transport::HttpTransport;

/* Modules */
mod config;
mod dispatch;
mod session;
mod shared;
mod transport;

/// Turn-based controller for the BoxLift elevator simulation.
#[derive(Parser)]
#[clap(name = "boxlift", version)]
struct Args {
    /// Path to the configuration file
    #[clap(long, default_value = "config.toml")]
    config: PathBuf,
    /// Override the configured username
    #[clap(long)]
    username: Option<String>,
    /// Override the configured plan
    #[clap(long)]
    plan: Option<String>,
    /// Override the configured registration URL
    #[clap(long)]
    url: Option<String>,
}

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Load the configuration and apply CLI overrides
    let mut config = unwrap_or_exit!(config::load_config(&args.config));
    if let Some(username) = args.username {
        config.client.username = username;
    }
    if let Some(plan) = args.plan {
        config.client.plan = plan;
    }
    if let Some(url) = args.url {
        config.client.registration_url = url;
    }

    // Build the transport, the dispatch engine and the session
    let transport = unwrap_or_exit!(HttpTransport::new(&config.transport));
    let engine = DispatchEngine::new(&config.dispatch);
    let mut machine = SessionStateMachine::new(&config.client, engine, transport);

    // Run the simulation to completion
    match machine.start() {
        Ok(score) => info!("Run complete with score {}", score),
        Err(e) => {
            error!("Run aborted: {}", e);
            std::process::exit(1);
        }
    }
}
