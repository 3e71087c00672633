use clap::{Parser, ValueEnum};
use std::path::PathBuf;

mod api;
mod cli;
mod demo;
mod export;
mod gui;
mod payloads;
mod session;
mod settings;
mod stager;
mod stats;
mod table;
mod tasks;
mod theme;

use settings::{default_base_path, ensure_base_folders, load_or_init_settings, save_settings};

#[derive(Parser, Debug)]
#[command(
    name = "mentorai",
    version,
    about = "MentorAI teaching assistant desk (marks, syllabus, assessments, reports)"
)]
struct CliArgs {
    /// Choose GUI (default) or CLI mode
    #[arg(long, value_enum, default_value = "gui")]
    mode: RunMode,
    /// Override data base path (defaults to ./data next to the exe)
    #[arg(long)]
    base_path: Option<PathBuf>,
    /// Backend URL for this run; saved settings are left alone
    #[arg(long, env = "MENTORAI_API_URL")]
    api_url: Option<String>,
    /// Never contact the backend; every page shows demo data
    #[arg(long)]
    offline: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RunMode {
    Gui,
    Cli,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let base_path = args.base_path.unwrap_or_else(default_base_path);

    if let Err(e) = ensure_base_folders(&base_path) {
        log::error!(
            "Failed to create base folders at {}: {}",
            base_path.display(),
            e
        );
        return;
    }

    let mut settings = match load_or_init_settings(&base_path) {
        Ok(s) => s,
        Err(e) => {
            log::error!("Failed to load settings: {}", e);
            return;
        }
    };

    log::info!("Using data path: {}", base_path.display());

    settings.base_path = base_path.to_string_lossy().to_string();
    settings.mode = match args.mode {
        RunMode::Gui => "gui".to_string(),
        RunMode::Cli => "cli".to_string(),
    };
    settings.api.offline = args.offline;

    // The override is for this run only, so keep the stored URL for saving.
    let stored_url = settings.api.base_url.clone();
    if let Some(url) = args.api_url {
        log::info!("Backend overridden to {url}");
        settings.api.base_url = url;
    }

    match args.mode {
        RunMode::Gui => {
            if let Err(e) = gui::launch_gui(base_path.clone(), settings.clone(), stored_url) {
                log::error!("Failed to start GUI: {}", e);
            }
            // The GUI saves its own changes as it goes.
            return;
        }
        RunMode::Cli => {
            cli::run_cli(&mut settings, &base_path);
        }
    }

    settings.api.base_url = stored_url;
    if let Err(e) = save_settings(&settings, &base_path) {
        log::error!("Could not save settings: {}", e);
    }
}
