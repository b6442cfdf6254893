use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use cookbook::config::CookbookConfig;
use cookbook::dispatch::Cookbook;
use cookbook::{cli, config, web};

#[derive(Debug, Parser)]
#[command(name = "cookbook")]
#[command(about = "Interactive walk-through of the Nexus APIs, over the SDK or directly")]
#[command(args_conflicts_with_subcommands = true)]
struct App {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Port to listen on (default: 1111)
    port: Option<u16>,
    /// Interface to bind
    #[arg(long)]
    bind: Option<String>,
    /// Node URL for direct API calls
    #[arg(long)]
    api_url: Option<String>,
    /// Node URL for SDK calls
    #[arg(long)]
    sdk_url: Option<String>,
    /// Number of worker threads
    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every operation the cook book serves
    Routes,
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config to ~/.cookbook/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the global config file path
    Path,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = App::parse();

    match app.command {
        Some(Commands::Routes) => cli::run_routes(),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Path => cli::run_config_path(),
        },
        None => serve(app.serve),
    }
}

fn serve(args: ServeArgs) -> Result<()> {
    let mut config = config::load();
    apply_flags(&mut config, args);

    log::info!(
        "cookbook starting up at {}",
        chrono::Local::now().format("%a %b %e %H:%M:%S %Y")
    );
    log::info!(
        "API node {}, SDK node {}",
        config.nodes.api_url,
        config.nodes.sdk_url
    );

    let cookbook = Arc::new(Cookbook::new(&config));
    web::serve(cookbook, &config.server)
}

fn apply_flags(config: &mut CookbookConfig, args: ServeArgs) {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(url) = args.api_url {
        config.nodes.api_url = url;
    }
    if let Some(url) = args.sdk_url {
        config.nodes.sdk_url = url;
    }
    if let Some(n) = args.workers
        && n > 0
    {
        config.server.workers = n;
    }
}
