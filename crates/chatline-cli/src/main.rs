//! chatline CLI: Command-line interface for the chatline chat client

use chatline_engine::{Config, ConfigError, Conversation, HttpBackend, RequestStatus};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Terminal chat client for a FastAPI + Gemini chat backend
#[derive(Parser, Debug)]
#[command(name = "chatline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the backend base URL from the config file
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Write TUI logs here instead of .chatline/chatline.log
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Open the chat TUI (default when no command specified)
    Tui,

    /// Send one message and print the reply
    Send {
        /// Message text
        message: String,

        /// Print the whole transcript as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config,

    /// Write a default config file
    Init,
}

const CHATLINE_DIR: &str = ".chatline";
const DEFAULT_CONFIG_PATH: &str = ".chatline/config.json";
const DEFAULT_LOG_FILE: &str = "chatline.log";

fn main() {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    if let Err(e) = init_logging(interactive, cli.log_file.as_deref()) {
        eprintln!("Failed to set up logging: {e}");
        std::process::exit(1);
    }

    if cli.command == Some(Commands::Init) {
        cmd_init(&cli.config);
        return;
    }

    let config = match effective_config(&cli.config, cli.backend_url.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        None | Some(Commands::Tui) => {
            let export_dir = PathBuf::from(CHATLINE_DIR);
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            if let Err(e) = rt.block_on(chatline_tui::run_tui(config, export_dir)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Send { message, json }) => cmd_send(config, &message, json),
        Some(Commands::Config) => cmd_config(&config),
        Some(Commands::Init) => {}
    }
}

/// Install the tracing subscriber.
///
/// The TUI owns the terminal, so interactive sessions log to a file. Other
/// commands log to stderr, quietly unless `RUST_LOG` says otherwise.
fn init_logging(interactive: bool, log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if interactive {
        let path = log_file.map_or_else(
            || Path::new(CHATLINE_DIR).join(DEFAULT_LOG_FILE),
            Path::to_path_buf,
        );
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        tracing_subscriber::registry()
            .with(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn,chatline_engine=info,chatline_tui=info".into()),
            )
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

/// Load the config file (defaults if missing), apply overrides, validate.
fn effective_config(path: &Path, backend_url: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = Config::load_or_default(path)?;
    if let Some(url) = backend_url {
        config.backend_url = url.to_string();
    }
    config.validate()?;
    Ok(config)
}

fn cmd_init(config_path: &Path) {
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return;
    }

    match Config::default().save(config_path) {
        Ok(()) => println!("Created {}", config_path.display()),
        Err(e) => {
            eprintln!("Failed to write config: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_config(config: &Config) {
    match serde_json::to_string_pretty(config) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize config: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_send(config: Config, message: &str, json: bool) {
    let backend = HttpBackend::new(&config.backend_url);
    let mut conversation = Conversation::new(config.greeting);

    info!(url = %backend.chat_url(), "Sending one-shot message");

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let status = conversation
        .update_draft(message)
        .and_then(|()| rt.block_on(conversation.submit(&backend)));

    let status = match status {
        Ok(status) => status,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if json {
        let output = serde_json::json!({
            "status": status,
            "messages": conversation.messages(),
            "last_error": conversation.last_error(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).expect("failed to serialize")
        );
    } else if let (RequestStatus::Succeeded, Some(reply)) = (status, conversation.messages().last()) {
        println!("{}", reply.text);
    }

    if status == RequestStatus::Failed {
        eprintln!(
            "Error: {}",
            conversation.last_error().unwrap_or("Something went wrong.")
        );
        std::process::exit(1);
    }
}
