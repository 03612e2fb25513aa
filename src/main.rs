// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Mark It Down - Main Entry Point
//!
//! A focused markdown reader and editor. Built with Rust and egui.

mod app;
mod config;
mod editor;
mod error;
mod files;
mod markdown;
mod preview;
mod state;
mod theme;
mod ui;

use app::MarkItDownApp;
use clap::Parser;
use config::load_config;
use log::info;
use std::path::PathBuf;

/// Application name constant.
const APP_NAME: &str = "Mark It Down";

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "markitdown", version, about = "A focused markdown reader and editor")]
struct Cli {
    /// Markdown or text file to open at startup
    file: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    // Load settings to get window configuration
    let settings = load_config();
    let window_size = &settings.window_size;

    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    let mut viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([400.0, 300.0]);

    if let (Some(x), Some(y)) = (window_size.x, window_size.y) {
        viewport = viewport.with_position([x, y]);
    }
    if window_size.maximized {
        viewport = viewport.with_maximized(true);
    }

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(MarkItDownApp::new(cc, cli.file)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_optional_file() {
        let cli = Cli::parse_from(["markitdown"]);
        assert!(cli.file.is_none());

        let cli = Cli::parse_from(["markitdown", "notes/today.md"]);
        assert_eq!(cli.file, Some(PathBuf::from("notes/today.md")));
    }
}
