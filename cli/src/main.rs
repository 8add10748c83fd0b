use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use std::sync::Arc;
use switchboard_core::{agent, config, models, providers};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::InteractiveCommand;

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(about = "switchboard - let a language model drive tools from several providers", long_about = None)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.switchboard/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Ask a single question, or start an interactive session
    Chat {
        #[arg(short, long)]
        message: Option<String>,
    },
    /// List the tool catalog and exit
    Tools,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<config::Config> {
    let config = match path {
        Some(path) => config::load_config_from(path)?,
        None => config::Config::load_or_init()?,
    };
    config.validate()?;
    Ok(config)
}

fn run_init(path: Option<&PathBuf>, force: bool) -> Result<()> {
    let target = path.cloned().unwrap_or_else(config::get_config_path);
    if target.exists() && !force {
        println!(
            "{} Config already exists at {} (use --force to overwrite)",
            style("!").yellow(),
            target.display()
        );
        return Ok(());
    }

    if path.is_none() {
        config::ensure_switchboard_dir()?;
    }
    config::save_config_to(&config::Config::default(), &target)?;
    println!(
        "{} Wrote default config to {}",
        style("✓").green().bold(),
        target.display()
    );
    Ok(())
}

async fn build_agent(config: &config::Config) -> Result<agent::AgentLoop> {
    if !config.workspace_dir.exists() {
        std::fs::create_dir_all(&config.workspace_dir).with_context(|| {
            format!(
                "Could not create workspace at {}",
                config.workspace_dir.display()
            )
        })?;
    }

    let registry = providers::build_registry(&config.registry, &config.workspace_dir).await?;
    let model = models::create_model(config)?;
    info!(
        model = %model.name(),
        tools = registry.len(),
        mode = %registry.mode(),
        "Agent ready"
    );

    let mut context = agent::ContextBuilder::new(&config.workspace_dir)
        .with_tag_protocol(config.tag_protocol);
    if let Some(prompt) = &config.system_prompt {
        context = context.with_identity(prompt.clone());
    }

    let mut agent_loop = agent::AgentLoop::new(model, Arc::new(registry))
        .with_context(context)
        .with_max_iterations(config.max_iterations);
    if let Some(timeout) = config.model_timeout() {
        agent_loop = agent_loop.with_model_timeout(timeout);
    }
    if let Some(timeout) = config.tool_timeout() {
        agent_loop = agent_loop.with_tool_timeout(timeout);
    }

    Ok(agent_loop)
}

async fn run_query(agent_loop: &mut agent::AgentLoop, message: &str) {
    println!("\n{}\n", style("Thinking...").dim());
    match agent_loop.process(message).await {
        Ok(response) => println!("{}", response),
        Err(e) => eprintln!("{} {}", style("Error:").red().bold(), e),
    }
}

async fn run_interactive(agent_loop: &mut agent::AgentLoop) -> Result<()> {
    let history_path = config::get_switchboard_dir().join("history.txt");
    let mut editor = DefaultEditor::new()?;
    let _ = editor.load_history(&history_path);

    println!("{}", style("switchboard").cyan().bold());
    println!("Commands: quit, clear, tools, mode, history, history_full\n");

    loop {
        let line = match editor.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let Some(command) = commands::parse_command(&line) else {
            continue;
        };
        let _ = editor.add_history_entry(line.trim());

        match command {
            InteractiveCommand::Quit => break,
            InteractiveCommand::Clear => {
                agent_loop.clear_history();
                println!("{} Conversation cleared", style("✓").green());
            }
            InteractiveCommand::Tools => print!("{}", commands::render_tools(agent_loop.registry())),
            InteractiveCommand::Mode => println!(
                "{}",
                commands::render_mode(agent_loop.registry(), agent_loop.max_iterations())
            ),
            InteractiveCommand::History => {
                print!("{}", commands::render_history(agent_loop.history()))
            }
            InteractiveCommand::HistoryFull => {
                println!("{}", commands::render_history_full(agent_loop.history()))
            }
            InteractiveCommand::Query(query) => {
                run_query(agent_loop, &query).await;
                println!();
            }
        }
    }

    if config::ensure_switchboard_dir().is_ok() {
        let _ = editor.save_history(&history_path);
    }
    println!("\nGoodbye!");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Chat { message: None });

    match command {
        Commands::Init { force } => run_init(cli.config.as_ref(), force)?,
        Commands::Tools => {
            let config = load_config(cli.config.as_ref())?;
            let registry =
                providers::build_registry(&config.registry, &config.workspace_dir).await?;
            print!("{}", commands::render_tools(&registry));
            registry.close_all().await;
        }
        Commands::Chat { message } => {
            let config = load_config(cli.config.as_ref())?;
            let mut agent_loop = build_agent(&config).await?;

            let outcome = match message {
                Some(msg) => agent_loop
                    .process(&msg)
                    .await
                    .map(|response| println!("{}", response))
                    .map_err(anyhow::Error::from),
                None => run_interactive(&mut agent_loop).await,
            };

            agent_loop.registry().close_all().await;
            outcome?;
        }
    }

    Ok(())
}
