//! cmdlens - analyze shell commands and scripts with an LLM.
//!
//! Takes a command string or script file, optionally executes it (locally or
//! in a best-effort Docker sandbox), and sends a prompt describing it to a
//! chat-completion endpoint. Without an API key it prints the prompt instead.
//! `cmdlens serve` exposes the same logic over authenticated HTTP.

mod config;
mod daemon;
mod exec;
mod llm;
mod prompt;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use config::Settings;
use llm::LlmClient;
use prompt::build_prompt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cmdlens")]
#[command(author, version, about = "Analyze shell commands and scripts, optionally with an LLM")]
#[command(subcommand_negates_reqs = true)]
struct Cli {
    /// Single command string to analyze
    #[arg(long, value_name = "COMMAND", required_unless_present = "script", conflicts_with = "script")]
    cmd: Option<String>,

    /// Path to a script file to analyze
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Execute the command locally and include real output (dangerous)
    #[arg(long)]
    exec: bool,

    /// Execute inside a Docker sandbox (with --exec)
    #[arg(long)]
    docker: bool,

    /// LLM model name
    #[arg(long, default_value = config::DEFAULT_MODEL)]
    model: String,

    /// Local execution timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Web API timeout in seconds
    #[arg(long, default_value_t = 60)]
    web_timeout: u64,

    /// Temperature for LLM responses
    #[arg(long = "temp", default_value_t = 0.0)]
    temp: f32,

    /// Do not prompt for confirmation before local execution
    #[arg(long)]
    no_confirm: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP daemon
    Serve {
        /// Listen address
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let settings = Settings::from_env();

    match cli.command {
        Some(Commands::Serve { listen }) => {
            init_logging();
            if let Err(e) = daemon::serve(settings, &listen).await {
                eprintln!("Daemon failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            let code = run_analysis(cli, &settings, &confirm_on_terminal).await;
            std::process::exit(code);
        }
    }
}

/// Initialize logging for the daemon. The CLI path talks to the user
/// directly on stdout/stderr instead.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("cmdlens=info".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap()),
        )
        .init();
}

/// Run the analyze flow and return the process exit code.
///
/// The confirmation prompt is injected so tests and non-interactive callers
/// can supply a scripted answer.
async fn run_analysis(cli: Cli, settings: &Settings, confirm: &dyn Fn(&str) -> bool) -> i32 {
    let text = match (&cli.cmd, &cli.script) {
        (Some(cmd), _) => cmd.clone(),
        (None, Some(path)) => {
            if !path.is_file() {
                eprintln!("Script not found: {}", path.display());
                return 2;
            }
            match std::fs::read_to_string(path) {
                Ok(contents) => contents,
                Err(e) => {
                    eprintln!("Failed to read script {}: {}", path.display(), e);
                    return 2;
                }
            }
        }
        (None, None) => unreachable!("clap requires --cmd or --script"),
    };

    let exec_timeout = Duration::from_secs(cli.timeout);
    let mut exec_output = None;

    if cli.exec {
        if cli.docker {
            if exec::docker_available() {
                println!("Running inside Docker (best-effort sandbox).");
                exec_output = Some(exec::run_in_docker(&text, exec_timeout).await);
            } else {
                eprintln!("Docker requested but not available; running locally instead.");
            }
        }
        if exec_output.is_none() {
            let approved = cli.no_confirm
                || confirm(
                    "About to execute the command/script locally. This is potentially unsafe. Proceed?",
                );
            if approved {
                exec_output = Some(exec::run_local(&text, exec_timeout, true).await);
            } else {
                println!("Execution aborted by user; continuing without execution.");
            }
        }
    }

    let prompt = build_prompt(&text, exec_output.as_deref(), None);

    let Some(api_key) = settings.api_key.clone() else {
        // Dry-run fallback: no credential means no network call at all.
        println!(
            "No API key found in environment (CMDLENS_API_KEY or OPENAI_API_KEY). Printing the prompt instead."
        );
        println!("\n--- PROMPT ---\n");
        println!("{}", prompt);
        if let Some(output) = &exec_output {
            println!("\n--- REAL EXECUTION OUTPUT ---\n");
            println!("{}", output);
        }
        return 0;
    };

    let client = LlmClient::new(settings.api_url_or_default(), api_key);
    println!("Sending request to LLM endpoint...");

    match client
        .analyze(
            &cli.model,
            &prompt,
            Duration::from_secs(cli.web_timeout),
            cli.temp,
        )
        .await
    {
        Ok(analysis) => {
            if let Some(output) = &exec_output {
                println!("\n--- REAL EXECUTION OUTPUT ---\n");
                println!("{}", output);
            }
            println!("\n--- LLM ANALYSIS / SUGGESTED OUTPUT ---\n");
            println!("{}", analysis);
            0
        }
        Err(e) => {
            eprintln!("Error calling API: {:#}", e);
            println!("\n--- PROMPT (debug) ---\n");
            println!("{}", prompt);
            1
        }
    }
}

/// Ask the user a yes/no question on the terminal. Anything other than an
/// explicit yes declines.
fn confirm_on_terminal(question: &str) -> bool {
    print!("{} [y/N]: ", question);
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut reply = String::new();
    if std::io::stdin().read_line(&mut reply).is_err() {
        return false;
    }
    matches!(reply.trim().to_lowercase().as_str(), "y" | "yes")
}
