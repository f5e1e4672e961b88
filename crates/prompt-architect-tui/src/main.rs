use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use prompt_architect_core::{
    CategoryId, Config, GeminiClient, KeySource, LoggingConfig, Session, CATEGORIES,
};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "prompt-architect", version)]
#[command(about = "Turn rough keywords into detailed prompts for generative AI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Enhance keywords once and print the prompt
    Enhance {
        /// Category to focus on (see `categories`)
        #[arg(short, long)]
        category: Option<String>,
        /// Your keywords
        #[arg(required = true)]
        keywords: Vec<String>,
    },
    /// List available categories
    Categories,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::detached(), Some(e.to_string())),
    };

    let mut logging = LoggingConfig::from_env();
    if cli.command.is_none() {
        // The TUI owns the terminal, so logs must go to a file
        if let Ok(dir) = Config::config_dir() {
            logging = logging.or_file_path(dir.join("prompt-architect.log"));
        }
    }
    if let Err(e) = logging.init() {
        eprintln!("Logging disabled: {}", e);
    }

    if let Some(e) = &config_error {
        warn!(error = %e, "config not loaded; theme changes will not be saved");
        if cli.command.is_some() {
            eprintln!("Ignoring unreadable config: {}", e);
        }
    }

    let client = GeminiClient::new(KeySource::Environment {
        fallback: config.api_key.clone(),
    });

    match cli.command {
        None => run_tui(config, config_error, client).await,
        Some(Commands::Enhance { category, keywords }) => {
            enhance_once(&client, category.as_deref(), &keywords.join(" ")).await
        }
        Some(Commands::Categories) => {
            list_categories();
            Ok(())
        }
    }
}

async fn run_tui(config: Config, config_error: Option<String>, client: GeminiClient) -> Result<()> {
    let model = client.model().to_string();
    let mut app = App::new(config, Arc::new(client), &model);
    app.status_message = config_error.map(|e| format!("Config not loaded: {}", e));

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    info!("interactive session started");

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    if app.generation_task.is_some() {
        warn!("quit while a request was still in flight");
    }
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}

async fn enhance_once(client: &GeminiClient, category: Option<&str>, keywords: &str) -> Result<()> {
    let mut session = Session::new();

    if let Some(name) = category {
        let id = CategoryId::from_str(name).ok_or_else(|| {
            let valid: Vec<&str> = CategoryId::all().iter().map(|id| id.as_str()).collect();
            anyhow!("Unknown category '{}'. Expected one of: {}", name, valid.join(", "))
        })?;
        session.select_category(id);
    }
    session.user_input = keywords.to_string();

    session.generate(client).await;

    match session.error_message {
        Some(message) => Err(anyhow!(message)),
        None => {
            println!("{}", session.generated_prompt);
            Ok(())
        }
    }
}

fn list_categories() {
    for category in CATEGORIES.iter() {
        println!("{:<18} {:<18} {}", category.id.as_str(), category.name, category.description);
    }
}
