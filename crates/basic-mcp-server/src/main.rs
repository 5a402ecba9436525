//! Basic MCP server: entry point.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use basic_mcp_server::config::ServerConfig;
use basic_mcp_server::types::{
    ServerCapabilities, LATEST_PROTOCOL_VERSION, SUPPORTED_PROTOCOL_VERSIONS,
};
use basic_mcp_server::{build_dispatcher, ProtocolHandler, StdioTransport};
use mcp_dispatch::Category;

#[derive(Parser)]
#[command(
    name = "basic-mcp-server",
    about = "Minimal MCP server exposing demonstration tools, resources and prompts over stdio",
    version
)]
struct Cli {
    /// Server name reported during the handshake (env: BASIC_MCP_NAME).
    #[arg(long)]
    name: Option<String>,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Do not serve tools.
    #[arg(long)]
    no_tools: bool,

    /// Do not serve resources.
    #[arg(long)]
    no_resources: bool,

    /// Do not serve prompts.
    #[arg(long)]
    no_prompts: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdio (default).
    Serve,

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   basic-mcp-server completions bash > ~/.local/share/bash-completion/completions/basic-mcp-server
    ///   basic-mcp-server completions zsh > ~/.zfunc/_basic-mcp-server
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch an interactive REPL against the built-in catalog.
    Repl,
}

impl Cli {
    fn disabled(&self) -> Vec<Category> {
        [
            (self.no_tools, Category::Tool),
            (self.no_resources, Category::Resource),
            (self.no_prompts, Category::Prompt),
        ]
        .into_iter()
        .filter_map(|(off, category)| off.then_some(category))
        .collect()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    // stdout carries the protocol; logs must go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Arc::new(ServerConfig::resolve(cli.name.as_deref(), &cli.disabled())?);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let dispatcher = Arc::new(build_dispatcher(&config)?);
            tracing::info!(
                "{} v{} starting (capabilities: {})",
                config.name,
                config.version,
                config
                    .capabilities
                    .iter()
                    .map(|c| c.plural())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            let handler = ProtocolHandler::new(dispatcher, Arc::clone(&config));
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        Commands::Info => {
            let dispatcher = build_dispatcher(&config)?;
            let names = |category: Category| {
                dispatcher
                    .list(category)
                    .iter()
                    .filter(|_| config.capabilities.contains(category))
                    .map(|d| d.name.as_str())
                    .collect::<Vec<_>>()
            };
            let info = serde_json::json!({
                "server": {"name": config.name, "version": config.version},
                "protocol_version": LATEST_PROTOCOL_VERSION,
                "supported_protocol_versions": SUPPORTED_PROTOCOL_VERSIONS,
                "capabilities": ServerCapabilities::advertise(config.capabilities),
                "tools": names(Category::Tool),
                "resources": names(Category::Resource),
                "prompts": names(Category::Prompt),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "basic-mcp-server", &mut std::io::stdout());
        }

        Commands::Repl => {
            let dispatcher = Arc::new(build_dispatcher(&config)?);
            let runtime = tokio::runtime::Handle::current();
            let config = Arc::clone(&config);
            tokio::task::spawn_blocking(move || {
                basic_mcp_server::repl::run(dispatcher, config, runtime)
            })
            .await??;
        }
    }

    Ok(())
}
