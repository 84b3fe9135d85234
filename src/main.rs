mod config;
mod llm;
mod relay;
mod server;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Config, Provider};
use relay::ChatRelay;

#[derive(Parser)]
#[command(name = "chat-relay")]
#[command(about = "Relay a message to a hosted chat model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, value_enum, default_value_t = Provider::GoogleGenai)]
    provider: Provider,

    /// Model identifier, overrides CHAT_RELAY_MODEL
    #[arg(short, long)]
    model: Option<String>,

    /// Load variables from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    Ask {
        message: String,
    },
    Interactive,
    /// Expose the relay as `POST /chat`
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = server::DEFAULT_PORT)]
        port: u16,
    },
}

/// Seed the process environment from `--env-file`, or from `./.env` when
/// present.
fn load_env(env_file: Option<&Path>) -> Result<()> {
    match env_file {
        Some(path) => config::load_env_file(path),
        None => {
            dotenvy::dotenv().ok();
            Ok(())
        }
    }
}

fn log_filter(verbose: bool, directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| {
            if verbose {
                EnvFilter::new("chat_relay=debug,warn")
            } else {
                EnvFilter::new("chat_relay=info,warn")
            }
        })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG may come from the env file, so load it before building the filter.
    let env_loaded = load_env(cli.env_file.as_deref());

    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    env_loaded?;

    let config = Config::from_env(cli.provider, cli.model.clone())?;
    info!("Using {} model {}", config.provider, config.model);

    let relay = ChatRelay::new(config.into_client());

    match cli.command {
        Commands::Ask { message } => {
            let reply = relay.get_chat_response(&message).await?;
            println!("{}", reply);
        }
        Commands::Interactive => {
            use rustyline::error::ReadlineError;
            use rustyline::DefaultEditor;

            println!("Chatting with {} - type 'exit' to quit", relay.model());

            let mut rl = DefaultEditor::new()?;

            let history_path = std::env::var("HOME")
                .map(|h| format!("{}/.chat-relay-history.txt", h))
                .unwrap_or_else(|_| ".chat-relay-history.txt".to_string());

            let _ = rl.load_history(&history_path);

            loop {
                match rl.readline("\n> ") {
                    Ok(line) => {
                        let input = line.trim();

                        if input.is_empty() {
                            continue;
                        }

                        if input == "exit" || input == "quit" {
                            println!("Goodbye!");
                            break;
                        }

                        let _ = rl.add_history_entry(input);

                        match relay.get_chat_response(input).await {
                            Ok(reply) => println!("\n{}", reply),
                            Err(e) => eprintln!("\nError: {}", e),
                        }
                    }
                    Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                        println!("\nGoodbye!");
                        break;
                    }
                    Err(err) => {
                        eprintln!("Error reading input: {}", err);
                        break;
                    }
                }
            }

            let _ = rl.save_history(&history_path);
        }
        Commands::Serve { host, port } => {
            server::serve(Arc::new(relay), &host, port).await?;
        }
    }

    Ok(())
}
