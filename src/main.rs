use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use pulse_core::{ChatClient, Config};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod bubble;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "pulse-chat", version)]
#[command(about = "Chat with the Pulse AI symptom assistant from your terminal")]
struct Cli {
    /// Base URL of the Pulse AI server
    #[arg(long, global = true, env = "PULSE_SERVER_URL")]
    server: Option<String>,

    /// Increase log verbosity (logs go to the cache directory in TUI mode)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single message and print the reply
    Ask {
        /// Your message, e.g. "I have a fever and a cough"
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Check that the server is reachable
    Health,
    /// Write a default config file if none exists and print its path
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Before loading config, so its logging has somewhere to go
    init_tracing(cli.verbose, cli.command.is_none());

    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config");
        eprintln!("Ignoring unreadable config: {}", e);
        Config::new()
    });
    let client = ChatClient::new(&config.server_url(cli.server.as_deref()));

    match cli.command {
        None => run_tui(&config, client).await?,
        Some(Commands::Ask { message }) => ask(&client, &message.join(" ")).await?,
        Some(Commands::Health) => health(&client).await?,
        Some(Commands::Config) => write_default_config()?,
    }

    Ok(())
}

/// Log to stderr for one-shot commands, or to a file while the TUI owns the terminal
fn init_tracing(verbose: u8, to_file: bool) {
    let env_filter = log_filter(verbose);

    if !to_file {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    // No log file means no logging; the TUI must not write to the terminal
    let Some(log_dir) = dirs::cache_dir().map(|p| p.join("pulse-chat")) else {
        return;
    };
    if std::fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("pulse-chat.log"))
    else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

/// Warnings from dependencies, info (or debug with `-v`) from our own crates
fn log_filter(verbose: u8) -> EnvFilter {
    let mut env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());

    let level = if verbose > 0 { "debug" } else { "info" };
    for target in ["pulse_chat", "pulse_core"] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }
    env_filter
}

async fn run_tui(config: &Config, client: ChatClient) -> Result<()> {
    info!(server = client.base_url(), "starting chat");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let mut app = App::new(config, client, events.sender());
    app.spawn_health_check();

    let result = async {
        loop {
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event),
                None => break,
            }

            if app.should_quit {
                break;
            }
        }
        Ok::<_, anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    info!("chat closed");
    result
}

async fn ask(client: &ChatClient, message: &str) -> Result<()> {
    let message = message.trim();
    if message.is_empty() {
        bail!("Message cannot be empty");
    }

    match client.send(message).await {
        Ok(reply) => {
            println!("{}", reply);
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "ask failed");
            Err(anyhow!(e.bubble_text()))
        }
    }
}

async fn health(client: &ChatClient) -> Result<()> {
    match client.health().await {
        Ok(health) if health.is_ok() => {
            let service = health.service.unwrap_or_else(|| "server".to_string());
            println!("{} is up at {}", service, client.base_url());
            Ok(())
        }
        Ok(health) => bail!("{} reported status '{}'", client.base_url(), health.status),
        Err(e) => bail!("{} is unreachable: {}", client.base_url(), e),
    }
}

fn write_default_config() -> Result<()> {
    let path = Config::config_path()?;
    if path.exists() {
        println!("{} (already exists)", path.display());
    } else {
        Config::with_defaults().save_to(&path)?;
        println!("{} (created)", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn captured_logs(verbose: u8, f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(log_filter(verbose))
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_config_loading_reaches_verbose_logger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let logs = captured_logs(1, || {
            Config::load_from(&path).unwrap();
        });
        assert!(logs.contains("no config file, using defaults"));
    }
}
