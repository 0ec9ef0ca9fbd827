//! roboassist CLI: Terminal client for the RoboAnalyzer chatbot and community board

use clap::{Parser, Subcommand};
use roboassist_engine::{
    post_and_refresh, ApiClient, CommunityMessage, Config, PostOutcome, CHAT_ERROR_TEXT,
    LOAD_ERROR_TEXT, POST_FAILED_ALERT, POST_UNREACHABLE_ALERT,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Chatbot and community board client with TUI
#[derive(Parser)]
#[command(name = "roboassist")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend root URL (overrides the config file)
    #[arg(long, env = "ROBOASSIST_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file (the TUI logs nowhere otherwise)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Ask the chatbot one question and print the reply
    Chat {
        /// Query text; multiple words are joined with spaces
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Post a community message and print the refreshed list
    Post {
        /// Message text; multiple words are joined with spaces
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Print the community message list
    Messages {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let is_tui = matches!(cli.command, None | Some(Commands::Tui));
    if let Err(e) = init_logging(cli.log_file.as_deref(), is_tui) {
        eprintln!("Failed to open log file: {e}");
        std::process::exit(1);
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config.with_base_url(cli.base_url),
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };
    debug!(base_url = %config.base_url, "configuration resolved");

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        None | Some(Commands::Tui) => match rt.block_on(roboassist_tui::run_tui(&config)) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("Error: {e}");
                1
            }
        },
        Some(Commands::Chat { query }) => rt.block_on(cmd_chat(&config, &query.join(" "))),
        Some(Commands::Post { message }) => rt.block_on(cmd_post(&config, &message.join(" "))),
        Some(Commands::Messages { json }) => rt.block_on(cmd_messages(&config, json)),
    };

    std::process::exit(code);
}

/// Install the fmt subscriber.
///
/// `RUST_LOG` controls the filter. The TUI owns the terminal, so it only
/// logs when a file is given.
fn init_logging(log_file: Option<&Path>, is_tui: bool) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None if is_tui => {}
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config, roboassist_engine::ConfigError> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

fn connect(config: &Config) -> Option<ApiClient> {
    match ApiClient::new(config) {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Invalid backend URL: {e}");
            None
        }
    }
}

async fn cmd_chat(config: &Config, query: &str) -> i32 {
    let query = query.trim();
    if query.is_empty() {
        eprintln!("Nothing to send");
        return 1;
    }
    let Some(client) = connect(config) else {
        return 1;
    };

    match client.send_chat(query).await {
        Ok(reply) => {
            println!("{}", reply.reply);
            0
        }
        Err(e) => {
            warn!(error = %e, "error contacting chatbot");
            eprintln!("{CHAT_ERROR_TEXT}");
            1
        }
    }
}

async fn cmd_post(config: &Config, message: &str) -> i32 {
    let message = message.trim();
    if message.is_empty() {
        eprintln!("Nothing to send");
        return 1;
    }
    let Some(client) = connect(config) else {
        return 1;
    };

    match post_and_refresh(&client, message).await {
        PostOutcome::Posted(Ok(messages)) => {
            print_messages(&messages);
            0
        }
        PostOutcome::Posted(Err(e)) => {
            warn!(error = %e, "error fetching community messages");
            eprintln!("{LOAD_ERROR_TEXT}");
            1
        }
        PostOutcome::Rejected(reason) => {
            warn!(reason = reason.as_deref().unwrap_or(""), "error posting community message");
            eprintln!("{POST_FAILED_ALERT}");
            1
        }
        PostOutcome::Unreachable(e) => {
            warn!(error = %e, "network error posting community message");
            eprintln!("{POST_UNREACHABLE_ALERT}");
            1
        }
    }
}

async fn cmd_messages(config: &Config, json: bool) -> i32 {
    let Some(client) = connect(config) else {
        return 1;
    };

    let messages = match client.fetch_community().await {
        Ok(messages) => messages,
        Err(e) => {
            warn!(error = %e, "error fetching community messages");
            eprintln!("{LOAD_ERROR_TEXT}");
            return 1;
        }
    };

    if json {
        match serde_json::to_string_pretty(&messages) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Failed to serialize messages: {e}");
                return 1;
            }
        }
    } else {
        print_messages(&messages);
    }
    0
}

fn print_messages(messages: &[CommunityMessage]) {
    if messages.is_empty() {
        println!("No community messages yet.");
        return;
    }
    for message in messages {
        println!("{}", message.display_text());
    }
}
