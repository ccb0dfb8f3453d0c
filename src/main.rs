use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use switchboard::config::Config;
use switchboard::core::{ResultStatus, TaskStatus};
use switchboard::decomposer::Decomposition;
use switchboard::orchestration::{Orchestrator, RunEvent, TaskResponse};
use switchboard::{sblog, server, Result};

/// Switchboard - route instructions to automation agents in dependency order
#[derive(Parser, Debug)]
#[command(name = "switchboard")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    SWITCHBOARD_DEBUG=1     Enable debug logging (alternative to --debug)")]
pub struct Cli {
    /// Enable debug logging (writes to ~/.switchboard/switchboard.log)
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Skip the simulated agent latency
    #[arg(long, global = true)]
    pub no_latency: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Serve the chat and health endpoints over HTTP
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Execute one instruction and print the summary
    Run {
        /// The instruction in natural language
        instruction: String,

        /// Print the full response as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },

    /// Show how an instruction would be decomposed, without running it
    Plan {
        /// The instruction in natural language
        instruction: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    switchboard::log::init_with_debug(cli.debug);
    if switchboard::log::is_debug() {
        sblog!("Switchboard starting (debug mode enabled)");
    } else {
        sblog!("Switchboard starting");
    }

    let mut config = Config::load()?;
    apply_overrides(&mut config, &cli);

    match cli.command {
        Command::Serve { .. } => run_serve(&config),
        Command::Run { instruction, json } => run_instruction(&config, &instruction, json),
        Command::Plan { instruction } => run_plan(&config, &instruction),
    }
}

/// Layer command-line flags over the loaded config.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if cli.no_latency {
        config.agents.simulate_latency = false;
    }
    if let Command::Serve { host, port } = &cli.command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }
}

fn run_serve(config: &Config) -> Result<()> {
    let orchestrator = Arc::new(Orchestrator::from_config(config)?);
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(server::run_server(orchestrator, &config.bind_addr()))
}

fn run_instruction(config: &Config, instruction: &str, json: bool) -> Result<()> {
    sblog!("Run command: instruction={:?}, json={}", instruction, json);
    let orchestrator = Orchestrator::from_config(config)?;
    let rt = tokio::runtime::Runtime::new()?;

    let response = rt.block_on(async {
        if json {
            return orchestrator.execute_instruction(instruction).await;
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let printer = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                print_event(&event);
            }
        });
        let response = orchestrator.execute_with_events(instruction, Some(tx)).await;
        // Sender is dropped with the run, so the printer drains and exits.
        let _ = printer.await;
        response
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }
    Ok(())
}

fn run_plan(config: &Config, instruction: &str) -> Result<()> {
    let orchestrator = Orchestrator::from_config(config)?;
    let plan = orchestrator.plan(instruction)?;
    print_plan(&plan);
    Ok(())
}

fn print_event(event: &RunEvent) {
    match event {
        RunEvent::TaskStatusChanged {
            task_id,
            agent,
            action,
            status: TaskStatus::Running,
        } => println!("  → {}.{} ({})", agent, action, task_id.short()),
        RunEvent::TaskFinished { agent, result, .. } => match result.status {
            ResultStatus::Success => println!("    \x1b[32m✓\x1b[0m {}: {}", agent, result.message),
            ResultStatus::Error => println!("    \x1b[31m✗\x1b[0m {}: {}", agent, result.message),
        },
        _ => {}
    }
}

fn print_response(response: &TaskResponse) {
    println!();
    println!("  Run:     {}", response.task_id);
    println!("  Status:  {}", response.status);
    println!("  Tasks:   {}", response.subtasks.len());
    println!();
    println!("{}", response.chat_response);
}

fn print_plan(plan: &Decomposition) {
    println!("Instruction: {}", plan.original_instruction);
    println!("Plan:        {}", plan.execution_plan);
    if plan.subtasks.is_empty() {
        println!("  (no recognized agents)");
        return;
    }
    for (i, task) in plan.subtasks.iter().enumerate() {
        let deps = if task.dependencies.is_empty() {
            "-".to_string()
        } else {
            task.dependencies.join(", ")
        };
        println!(
            "  {}. {}.{}  after: {}  params: {}",
            i + 1,
            task.agent,
            task.action,
            deps,
            serde_json::Value::Object(task.parameters.clone())
        );
    }
}
