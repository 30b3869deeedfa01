use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use taskpilot_core::{Agent, Config, Provider, config, providers, tools};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod init;
mod render;
mod repl;

#[derive(Parser)]
#[command(name = "taskpilot")]
#[command(about = "taskpilot - an objective-driven agent that calls tools", long_about = None)]
struct Cli {
    /// Chat-completion provider (openai, openrouter, ollama)
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Model identifier sent with every request
    #[arg(long, global = true)]
    model: Option<String>,

    /// Log loop transitions and tool dispatch to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the configuration file interactively
    Init,
    /// Start an interactive session
    Chat,
    /// Run a single task and print the answer
    Run {
        task: String,
        #[arg(long)]
        max_turns: Option<usize>,
        /// Abort the whole run after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Print the full transcript as JSON instead of the answer
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "taskpilot=debug,taskpilot_core=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_agent(config: &Config) -> Result<Agent> {
    let provider: Arc<dyn Provider> = Arc::from(providers::create_provider(config)?);

    let agent = Agent::create(
        config.objective.clone(),
        config.model.clone(),
        config.system_message.clone(),
        provider,
    )
    .with_max_turns(config.max_turns);

    agent.add_tool(Box::new(tools::Calculator))?;
    agent.add_tool(Box::new(tools::WebsiteFetcher::new()))?;

    info!(
        session = agent.session_id(),
        model = agent.model(),
        tools = agent.tool_registry().len(),
        "Agent initialized"
    );

    Ok(agent)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or_else(|| {
        if !config::config_exists() {
            Commands::Init
        } else {
            Commands::Chat
        }
    });

    if let Commands::Init = command {
        let init_config = init::run_init().map_err(|e| {
            render::failure(&format!("Setup failed: {}", e));
            anyhow!("Setup failed: {}", e)
        })?;
        config::save_config(&init_config)?;
        println!("Configuration written to {}", config::get_config_path().display());
        return Ok(());
    }

    let mut config = Config::load_or_init()?;
    if let Some(provider) = cli.provider {
        config.provider = Some(provider);
    }
    if let Some(model) = cli.model {
        config.model = model;
    }

    let mut agent = build_agent(&config)?;

    match command {
        Commands::Init => {}
        Commands::Chat => {
            let history_path = config.history_path();
            repl::run(agent, &history_path, config.history_size).await?;
        }
        Commands::Run {
            task,
            max_turns,
            timeout,
            json,
        } => {
            let max_turns = max_turns.unwrap_or(config.max_turns);
            let run = agent.run(&task, max_turns);

            let outcome = match timeout {
                Some(secs) => tokio::time::timeout(Duration::from_secs(secs), run)
                    .await
                    .map_err(|_| anyhow!("Run timed out after {}s", secs))??,
                None => run.await?,
            };

            if json {
                println!("{}", agent.transcript().to_json()?);
            } else {
                render::outcome(&outcome);
            }
        }
    }

    Ok(())
}
